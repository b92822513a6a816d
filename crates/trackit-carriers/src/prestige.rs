// ABOUTME: Prestige Delivery adapter for the JSON TrackingHandler endpoint
// ABOUTME: Event locations and the destination come from prefixed fields on each event record
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
use crate::json::{from_json, Piece};
use crate::timestamps::{date_and_time, date_at_midnight};

const NAME: &str = "prestige";

/// Tracking handler endpoint
pub const PRESTIGE_TRACK_URL: &str = "http://www.prestigedelivery.com/TrackingHandler.ashx";

const DATE_FORMAT: &str = "%m/%d/%Y";
const TIME_FORMAT: &str = "%I:%M %p";

const STATUS_MAP: &[(u32, Status)] = &[
    (301, Status::Delivered),
    (302, Status::OutForDelivery),
    (101, Status::Shipping),
];

/// Prestige shipment record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrestigeShipment {
    tracking_event_history: Option<Vec<PrestigeEvent>>,
    #[serde(default)]
    pieces: Vec<Piece>,
}

#[derive(Debug, Clone, Deserialize)]
struct PrestigeEvent {
    #[serde(rename = "ELCity")]
    el_city: Option<String>,
    #[serde(rename = "ELState")]
    el_state: Option<String>,
    #[serde(rename = "ELZip")]
    el_zip: Option<String>,
    #[serde(rename = "PDCity")]
    pd_city: Option<String>,
    #[serde(rename = "PDState")]
    pd_state: Option<String>,
    #[serde(rename = "PDZip")]
    pd_zip: Option<String>,
    #[serde(rename = "EventCode")]
    event_code: Option<String>,
    #[serde(rename = "EventCodeDesc")]
    event_code_desc: Option<String>,
    #[serde(rename = "EstimatedDeliveryDate")]
    estimated_delivery_date: Option<String>,
    #[serde(rename = "serverDate")]
    server_date: Option<String>,
    #[serde(rename = "serverTime")]
    server_time: Option<String>,
}

impl PrestigeEvent {
    fn event_location(&self) -> Option<String> {
        present_location(
            &Location::new(self.el_city.as_deref(), self.el_state.as_deref(), None)
                .with_postal_code(self.el_zip.as_deref()),
        )
    }

    fn destination(&self) -> Option<String> {
        present_location(
            &Location::new(self.pd_city.as_deref(), self.pd_state.as_deref(), None)
                .with_postal_code(self.pd_zip.as_deref()),
        )
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        date_and_time(
            self.server_date.as_deref()?,
            self.server_time.as_deref(),
            DATE_FORMAT,
            TIME_FORMAT,
        )
    }
}

impl PrestigeShipment {
    fn events(&self) -> &[PrestigeEvent] {
        self.tracking_event_history.as_deref().unwrap_or_default()
    }
}

/// Map an `EVENT_<n>` code; codes between 101 and 300 exclusive are in transit
fn present_status(event_code: Option<&str>) -> Option<Status> {
    let code = event_code?
        .trim()
        .strip_prefix("EVENT_")?
        .parse::<u32>()
        .ok()?;
    STATUS_MAP
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, status)| status)
        .or_else(|| (101 < code && code < 300).then_some(Status::EnRoute))
}

/// Prestige Delivery adapter
#[derive(Debug, Clone, Default)]
pub struct PrestigeClient {
    options: ClientOptions,
}

impl PrestigeClient {
    /// Create a Prestige Delivery adapter
    #[must_use]
    pub const fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl CarrierClient for PrestigeClient {
    type Shipment = PrestigeShipment;
    type Request = BasicRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::Prestige
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<PrestigeShipment> {
        let shipments: Vec<PrestigeShipment> = from_json(NAME, response)?;
        let shipment = shipments
            .into_iter()
            .next()
            .ok_or_else(|| TrackingError::carrier_reported(NAME, "no tracking info found"))?;
        if shipment.tracking_event_history.is_none() {
            return Err(TrackingError::missing_shipment(NAME, "missing events"));
        }
        Ok(shipment)
    }

    fn activities_and_status(&self, shipment: &PrestigeShipment) -> ActivitiesAndStatus {
        let mut activities = Vec::new();
        let mut status = None;

        for raw in shipment.events() {
            if let Some(activity) = Activity::from_parts(raw.timestamp(), raw.event_code_desc.clone()) {
                activities.push(activity.with_location(raw.event_location()));
            }
            if status.is_none() {
                status = present_status(raw.event_code.as_deref());
            }
        }
        ActivitiesAndStatus::new(activities, status.unwrap_or_default())
    }

    fn eta(&self, shipment: &PrestigeShipment) -> Option<DateTime<Utc>> {
        let eta = shipment.events().first()?.estimated_delivery_date.as_deref()?;
        date_at_midnight(eta, DATE_FORMAT)
    }

    fn service(&self, _shipment: &PrestigeShipment) -> Option<String> {
        None
    }

    fn weight(&self, shipment: &PrestigeShipment) -> Option<String> {
        shipment.pieces.first()?.presented_weight()
    }

    fn destination(&self, shipment: &PrestigeShipment) -> Option<String> {
        shipment.events().first()?.destination()
    }

    fn build_request(&self, request: &BasicRequest) -> TrackingResult<CarrierRequest> {
        let url = Url::parse_with_params(
            PRESTIGE_TRACK_URL,
            &[("trackingNumbers", request.tracking_number.as_str())],
        )
        .map_err(|e| TrackingError::invalid_request(NAME, e))?;
        Ok(CarrierRequest::get(
            url.as_str(),
            self.options.timeout_for(request),
        ))
    }
}
