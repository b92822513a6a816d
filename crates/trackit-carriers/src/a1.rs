// ABOUTME: A1 International adapter for the AmazonTrackingResponse XML feed
// ABOUTME: Derives status from the numeric EVENT_<n> code of the most recent event
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use trackit_core::formatters::present_location;
use trackit_core::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, Status, TrackingError,
    TrackingResult,
};
use url::Url;

use crate::core::{BasicRequest, CarrierClient, ClientOptions};
use crate::timestamps::{parse_iso, wall_clock};
use crate::xml::from_xml;

const NAME: &str = "a1intl";

/// Tracking request endpoint
pub const A1_TRACK_URL: &str = "http://www.aoneonline.com/pages/customers/trackingrequest.php";

const STATUS_MAP: &[(u32, Status)] = &[
    (101, Status::EnRoute),
    (102, Status::EnRoute),
    (302, Status::OutForDelivery),
    (304, Status::Delayed),
    (301, Status::Delivered),
];

/// Codes below this value without an explicit mapping are in transit
const IN_TRANSIT_CEILING: u32 = 300;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AmazonTrackingResponse {
    #[serde(default)]
    package_tracking_info: Vec<A1Shipment>,
    tracking_error_info: Option<TrackingErrorInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrackingErrorInfo {
    #[serde(default)]
    tracking_error_detail: Vec<TrackingErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrackingErrorDetail {
    error_detail_code_desc: Option<String>,
}

/// PackageTrackingInfo section of an A1 response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct A1Shipment {
    tracking_number: Option<String>,
    package_destination_location: Option<A1Address>,
    tracking_event_history: Option<TrackingEventHistory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrackingEventHistory {
    #[serde(default)]
    tracking_event_detail: Vec<TrackingEventDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrackingEventDetail {
    event_code: Option<String>,
    event_code_desc: Option<String>,
    event_date_time: Option<String>,
    event_location: Option<A1Address>,
    estimated_delivery_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct A1Address {
    city: Option<String>,
    state_province: Option<String>,
    country_code: Option<String>,
    postal_code: Option<String>,
}

impl A1Shipment {
    /// Events, most recent first
    fn events(&self) -> &[TrackingEventDetail] {
        self.tracking_event_history
            .as_ref()
            .map_or(&[], |history| &history.tracking_event_detail)
    }
}

fn present_address(address: Option<&A1Address>) -> Option<String> {
    let address = address?;
    present_location(
        &Location::new(
            address.city.as_deref(),
            address.state_province.as_deref(),
            address.country_code.as_deref(),
        )
        .with_postal_code(address.postal_code.as_deref()),
    )
}

/// Map an `EVENT_<n>` code
fn present_status(event_code: Option<&str>) -> Status {
    let Some(code) = event_code
        .and_then(|c| c.trim().strip_prefix("EVENT_"))
        .and_then(|n| n.parse::<u32>().ok())
    else {
        return Status::Unknown;
    };
    STATUS_MAP
        .iter()
        .find(|(c, _)| *c == code)
        .map_or_else(
            || {
                if code < IN_TRANSIT_CEILING {
                    Status::EnRoute
                } else {
                    Status::Unknown
                }
            },
            |&(_, status)| status,
        )
}

/// A1 International adapter
#[derive(Debug, Clone, Default)]
pub struct A1Client {
    options: ClientOptions,
}

impl A1Client {
    /// Create an A1 International adapter
    #[must_use]
    pub const fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl CarrierClient for A1Client {
    type Shipment = A1Shipment;
    type Request = BasicRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::A1Intl
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<A1Shipment> {
        let reply: AmazonTrackingResponse = from_xml(NAME, response)?;
        let error_info = reply.tracking_error_info;
        match reply.package_tracking_info.into_iter().next() {
            Some(shipment) if shipment.tracking_number.is_some() => Ok(shipment),
            _ => {
                let message = error_info
                    .and_then(|info| info.tracking_error_detail.into_iter().next())
                    .and_then(|detail| detail.error_detail_code_desc)
                    .unwrap_or_else(|| "unknown error".to_owned());
                Err(TrackingError::carrier_reported(NAME, message))
            }
        }
    }

    fn activities_and_status(&self, shipment: &A1Shipment) -> ActivitiesAndStatus {
        let events = shipment.events();
        let status = present_status(events.first().and_then(|e| e.event_code.as_deref()));
        let activities = events
            .iter()
            .filter_map(|event| {
                let raw_timestamp = event.event_date_time.as_deref();
                let activity = Activity::from_parts(
                    raw_timestamp.and_then(parse_iso),
                    event.event_code_desc.clone(),
                )?;
                Some(
                    activity
                        .with_location(present_address(event.event_location.as_ref()))
                        .with_datetime(raw_timestamp.map(wall_clock)),
                )
            })
            .collect();
        ActivitiesAndStatus::new(activities, status)
    }

    /// Reported on the oldest event
    fn eta(&self, shipment: &A1Shipment) -> Option<DateTime<Utc>> {
        let oldest = shipment.events().last()?;
        parse_iso(oldest.estimated_delivery_date.as_deref()?)
    }

    fn service(&self, _shipment: &A1Shipment) -> Option<String> {
        None
    }

    fn weight(&self, _shipment: &A1Shipment) -> Option<String> {
        None
    }

    fn destination(&self, shipment: &A1Shipment) -> Option<String> {
        present_address(shipment.package_destination_location.as_ref())
    }

    fn build_request(&self, request: &BasicRequest) -> TrackingResult<CarrierRequest> {
        let url = Url::parse_with_params(
            A1_TRACK_URL,
            &[("tracking_number", request.tracking_number.as_str())],
        )
        .map_err(|e| TrackingError::invalid_request(NAME, e))?;
        Ok(CarrierRequest::get(
            url.as_str(),
            self.options.timeout_for(request),
        ))
    }
}
