// ABOUTME: Canada Post adapter for the tracking web service (tracking-detail documents)
// ABOUTME: Infers status from event text and authenticates with HTTP basic auth
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use trackit_core::formatters::{infer_status, present_location};
use trackit_core::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, RequestAuth, Status,
    TrackingError, TrackingResult,
};
use url::Url;

use crate::core::{BasicRequest, CarrierClient, ClientOptions};
use crate::timestamps::{date_and_time, date_at_midnight};
use crate::xml::{from_xml, root_element};

const NAME: &str = "canadapost";

/// Tracking web service base; requests append `pin/{number}/detail.xml`
pub const CANADA_POST_TRACK_URL: &str = "https://soa-gw.canadapost.ca/vis/track/";

const TRACK_MEDIA_TYPE: &str = "application/vnd.cpc.track+xml";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

const STATUS_VOCABULARY: &[(&str, Status)] = &[
    ("in transit", Status::EnRoute),
    ("processed", Status::EnRoute),
    ("information submitted", Status::Shipping),
    ("shipment picked up", Status::Shipping),
    ("shipment received", Status::EnRoute),
    ("delivered", Status::Delivered),
    ("out for delivery", Status::OutForDelivery),
    ("item released", Status::EnRoute),
    ("arrived", Status::EnRoute),
    ("departed", Status::EnRoute),
    ("is en route", Status::EnRoute),
    ("item mailed", Status::Shipping),
    ("available for pickup", Status::Delayed),
    ("attempted delivery", Status::Delayed),
];

/// Canada Post web service credentials
#[derive(Clone, PartialEq, Eq)]
pub struct CanadaPostCredentials {
    /// API key user name
    pub username: String,
    /// API key password
    pub password: String,
}

impl fmt::Debug for CanadaPostCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanadaPostCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `tracking-detail` document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CanadaPostShipment {
    changed_expected_date: Option<String>,
    expected_delivery_date: Option<String>,
    service_name: Option<String>,
    destination_postal_id: Option<String>,
    significant_events: Option<SignificantEvents>,
}

#[derive(Debug, Clone, Deserialize)]
struct SignificantEvents {
    #[serde(default)]
    occurrence: Vec<Occurrence>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Occurrence {
    event_date: Option<String>,
    event_time: Option<String>,
    event_description: Option<String>,
    event_site: Option<String>,
    event_province: Option<String>,
}

/// `messages` error envelope
#[derive(Debug, Deserialize)]
struct Messages {
    #[serde(default)]
    message: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    code: Option<String>,
    description: Option<String>,
}

impl Messages {
    fn into_error(self) -> TrackingError {
        let text = self
            .message
            .into_iter()
            .next()
            .map(|m| match (m.code, m.description) {
                (Some(code), Some(description)) => format!("{code}: {description}"),
                (code, description) => description.or(code).unwrap_or_default(),
            })
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| "error message without description".to_owned());
        TrackingError::carrier_reported(NAME, text)
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Canada Post tracking web service adapter
#[derive(Debug, Clone)]
pub struct CanadaPostClient {
    credentials: CanadaPostCredentials,
    options: ClientOptions,
}

impl CanadaPostClient {
    /// Create a Canada Post adapter
    #[must_use]
    pub const fn new(credentials: CanadaPostCredentials, options: ClientOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }
}

#[async_trait]
impl CarrierClient for CanadaPostClient {
    type Shipment = CanadaPostShipment;
    type Request = BasicRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::CanadaPost
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<CanadaPostShipment> {
        match root_element(NAME, response)?.as_deref() {
            Some("tracking-detail") => from_xml(NAME, response),
            Some("messages") => Err(from_xml::<Messages>(NAME, response)?.into_error()),
            Some(_) => Err(TrackingError::missing_shipment(NAME, "response not recognized")),
            None => Err(TrackingError::missing_shipment(NAME, "empty response")),
        }
    }

    fn activities_and_status(&self, shipment: &CanadaPostShipment) -> ActivitiesAndStatus {
        let occurrences = shipment
            .significant_events
            .as_ref()
            .map_or(&[][..], |events| events.occurrence.as_slice());

        let activities: Vec<Activity> = occurrences
            .iter()
            .filter_map(|event| {
                let timestamp = non_empty(event.event_date.as_ref()).and_then(|date| {
                    date_and_time(date, event.event_time.as_deref(), DATE_FORMAT, TIME_FORMAT)
                });
                let details = non_empty(event.event_description.as_ref()).map(str::to_owned);
                let location = present_location(&Location::new(
                    non_empty(event.event_site.as_ref()),
                    non_empty(event.event_province.as_ref()),
                    None,
                ));
                Activity::from_parts(timestamp, details).map(|a| a.with_location(location))
            })
            .collect();

        let status = infer_status(
            activities.first().map(|a| a.details.as_str()),
            STATUS_VOCABULARY,
        );
        ActivitiesAndStatus::new(activities, status)
    }

    fn eta(&self, shipment: &CanadaPostShipment) -> Option<DateTime<Utc>> {
        let raw = non_empty(shipment.changed_expected_date.as_ref())
            .or_else(|| non_empty(shipment.expected_delivery_date.as_ref()))?;
        date_at_midnight(raw, DATE_FORMAT)
    }

    fn service(&self, shipment: &CanadaPostShipment) -> Option<String> {
        non_empty(shipment.service_name.as_ref()).map(str::to_owned)
    }

    fn weight(&self, _shipment: &CanadaPostShipment) -> Option<String> {
        None
    }

    fn destination(&self, shipment: &CanadaPostShipment) -> Option<String> {
        non_empty(shipment.destination_postal_id.as_ref()).map(str::to_owned)
    }

    fn build_request(&self, request: &BasicRequest) -> TrackingResult<CarrierRequest> {
        let mut url =
            Url::parse(CANADA_POST_TRACK_URL).map_err(|e| TrackingError::invalid_request(NAME, e))?;
        url.path_segments_mut()
            .map_err(|()| TrackingError::invalid_request(NAME, "base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(["pin", request.tracking_number.as_str(), "detail.xml"]);
        Ok(
            CarrierRequest::get(url.as_str(), self.options.timeout_for(request))
                .with_header("Accept", TRACK_MEDIA_TYPE)
                .with_auth(RequestAuth {
                    username: self.credentials.username.clone(),
                    password: self.credentials.password.clone(),
                }),
        )
    }
}
