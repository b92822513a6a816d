// ABOUTME: DHL Express adapter for the XML-PI known tracking API (TrackingResponse documents)
// ABOUTME: Splits free-text service areas into locations and strips them from event details
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use trackit_core::formatters::present_location;
use trackit_core::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, Status, TrackingError,
    TrackingResult,
};

use crate::core::{BasicRequest, CarrierClient, ClientOptions};
use crate::timestamps::{date_and_time, wall_clock};
use crate::xml::{from_xml, XmlBuilder};

const NAME: &str = "dhl";

/// XML-PI servlet endpoint
pub const DHL_TRACK_URL: &str = "http://xmlpi-ea.dhl.com/XMLShippingServlet";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const ETA_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const STATUS_MAP: &[(&str, Status)] = &[
    ("AD", Status::EnRoute),
    ("AF", Status::EnRoute),
    ("AR", Status::EnRoute),
    ("BA", Status::Delayed),
    ("BN", Status::EnRoute),
    ("BR", Status::EnRoute),
    ("CA", Status::Delayed),
    ("CC", Status::OutForDelivery),
    ("CD", Status::Delayed),
    ("CM", Status::Delayed),
    ("CR", Status::EnRoute),
    ("CS", Status::Delayed),
    ("DD", Status::Delivered),
    ("DF", Status::EnRoute),
    ("DS", Status::Delayed),
    ("FD", Status::EnRoute),
    ("HP", Status::Delayed),
    ("IC", Status::EnRoute),
    ("MC", Status::Delayed),
    ("MD", Status::EnRoute),
    ("MS", Status::Delayed),
    ("ND", Status::Delayed),
    ("NH", Status::Delayed),
    ("OH", Status::Delayed),
    ("OK", Status::Delivered),
    ("PD", Status::EnRoute),
    ("PL", Status::EnRoute),
    ("PO", Status::EnRoute),
    ("PU", Status::EnRoute),
    ("RD", Status::Delayed),
    ("RR", Status::Delayed),
    ("RT", Status::Delayed),
    ("SA", Status::Shipping),
    ("SC", Status::Delayed),
    ("SS", Status::Delayed),
    ("TD", Status::Delayed),
    ("TP", Status::OutForDelivery),
    ("TR", Status::EnRoute),
    ("UD", Status::Delayed),
    ("WC", Status::OutForDelivery),
    ("WX", Status::Delayed),
];

static REPEATED_WHITESPACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\s\s+").ok());

/// DHL XML-PI credentials
#[derive(Clone, PartialEq, Eq)]
pub struct DhlCredentials {
    /// Site id
    pub user_id: String,
    /// Site password
    pub password: String,
}

impl fmt::Debug for DhlCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DhlCredentials")
            .field("user_id", &self.user_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TrackingResponse {
    #[serde(rename = "AWBInfo", default)]
    awb_info: Vec<AwbInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwbInfo {
    status: Option<AwbStatus>,
    #[serde(default)]
    shipment_info: Vec<DhlShipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwbStatus {
    action_status: Option<String>,
}

/// Shipment section of a DHL tracking response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DhlShipment {
    est_dlvy_date: Option<String>,
    weight: Option<String>,
    #[serde(default)]
    shipment_event: Vec<DhlEvent>,
    destination_service_area: Option<ServiceArea>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DhlEvent {
    date: Option<String>,
    time: Option<String>,
    service_event: Option<ServiceEvent>,
    service_area: Option<ServiceArea>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceEvent {
    event_code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceArea {
    description: Option<String>,
}

impl ServiceArea {
    fn description(area: Option<&Self>) -> Option<&str> {
        area?.description.as_deref()
    }
}

/// Present a DHL service area such as `WOODSIDE, NY - USA` or `AUCKLAND - NEW ZEALAND`
///
/// Text that matches neither shape is returned unchanged.
fn present_address(raw: &str) -> Option<String> {
    let (city, state, country) = match raw.find(',') {
        Some(comma) => {
            let Some(dash) = raw[comma..].find('-').map(|d| comma + d) else {
                return Some(raw.to_owned());
            };
            (
                raw[..comma].trim(),
                Some(raw[comma + 1..dash].trim()),
                raw[dash + 1..].trim(),
            )
        }
        None => match raw.find('-') {
            Some(dash) => (raw[..dash].trim(), None, raw[dash + 1..].trim()),
            None => return Some(raw.to_owned()),
        },
    };
    let city = city.replacen(" HUB", "", 1).replacen(" GATEWAY", "", 1);
    present_location(&Location::new(Some(&city), state, Some(country)))
}

/// Collapse whitespace and drop the trailing location and period from event text
fn present_details(raw_location: Option<&str>, raw_details: &str) -> String {
    let collapsed = REPEATED_WHITESPACE
        .as_ref()
        .map_or_else(|| raw_details.to_owned(), |re| re.replace_all(raw_details, " ").into_owned());
    let mut details = collapsed.trim().to_owned();

    if let Some(location) = raw_location.map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(head) = details
            .strip_suffix(location)
            .and_then(|head| head.strip_suffix(' '))
        {
            let head = head
                .strip_suffix(" at")
                .or_else(|| head.strip_suffix(" in"))
                .unwrap_or(head);
            details = head.to_owned();
        }
    }
    if let Some(stripped) = details.strip_suffix('.') {
        details = stripped.to_owned();
    }
    details
}

fn present_status(code: Option<&str>) -> Status {
    code.and_then(|code| STATUS_MAP.iter().find(|(c, _)| *c == code))
        .map_or(Status::Unknown, |&(_, status)| status)
}

/// DHL Express XML-PI adapter
#[derive(Debug, Clone)]
pub struct DhlClient {
    credentials: DhlCredentials,
    options: ClientOptions,
}

impl DhlClient {
    /// Create a DHL Express adapter
    #[must_use]
    pub const fn new(credentials: DhlCredentials, options: ClientOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }

    /// `req:KnownTrackingRequest` document for one air waybill
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn generate_request(&self, tracking_number: &str) -> TrackingResult<String> {
        let mut xml = XmlBuilder::new(NAME);
        xml.declaration(Some("yes"))?
            .open_with("req:KnownTrackingRequest", &[("xmlns:req", "http://www.dhl.com")])?
            .open("Request")?
            .open("ServiceHeader")?
            .text("SiteID", &self.credentials.user_id)?
            .text("Password", &self.credentials.password)?
            .close("ServiceHeader")?
            .close("Request")?
            .text("LanguageCode", "en")?
            .text("AWBNumber", tracking_number)?
            .text("LevelOfDetails", "ALL_CHECK_POINTS")?
            .close("req:KnownTrackingRequest")?;
        xml.finish()
    }
}

#[async_trait]
impl CarrierClient for DhlClient {
    type Shipment = DhlShipment;
    type Request = BasicRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::Dhl
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<DhlShipment> {
        let reply: TrackingResponse = from_xml(NAME, response)?;
        let awb_info = reply
            .awb_info
            .into_iter()
            .next()
            .ok_or_else(|| TrackingError::missing_shipment(NAME, "no AWBInfo in response"))?;
        let status_code = awb_info
            .status
            .and_then(|s| s.action_status)
            .unwrap_or_default();
        let shipment = awb_info
            .shipment_info
            .into_iter()
            .next()
            .ok_or_else(|| TrackingError::missing_shipment(NAME, "could not find shipment"))?;
        if status_code.trim() != "success" {
            return Err(TrackingError::carrier_reported(
                NAME,
                format!("unexpected track status code={status_code}"),
            ));
        }
        Ok(shipment)
    }

    fn activities_and_status(&self, shipment: &DhlShipment) -> ActivitiesAndStatus {
        let mut activities = Vec::new();
        let mut status = Status::Unknown;

        for raw in shipment.shipment_event.iter().rev() {
            let raw_location = ServiceArea::description(raw.service_area.as_ref());
            let timestamp = raw
                .date
                .as_deref()
                .and_then(|date| date_and_time(date, raw.time.as_deref(), DATE_FORMAT, TIME_FORMAT));
            let event = raw.service_event.as_ref();
            let details = event
                .and_then(|e| e.description.as_deref())
                .map(|d| present_details(raw_location, d));

            if let Some(activity) = Activity::from_parts(timestamp, details) {
                activities.push(activity.with_location(raw_location.and_then(present_address)));
            }
            if status.is_unknown() {
                status = present_status(event.and_then(|e| e.event_code.as_deref()));
            }
        }
        ActivitiesAndStatus::new(activities, status)
    }

    fn eta(&self, shipment: &DhlShipment) -> Option<DateTime<Utc>> {
        let raw = shipment.est_dlvy_date.as_deref()?;
        NaiveDateTime::parse_from_str(&wall_clock(raw), ETA_FORMAT)
            .ok()
            .map(|eta| eta.and_utc())
    }

    fn service(&self, _shipment: &DhlShipment) -> Option<String> {
        None
    }

    fn weight(&self, shipment: &DhlShipment) -> Option<String> {
        shipment
            .weight
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .map(|w| format!("{} LB", w.trim()))
    }

    fn destination(&self, shipment: &DhlShipment) -> Option<String> {
        ServiceArea::description(shipment.destination_service_area.as_ref())
            .and_then(present_address)
    }

    fn build_request(&self, request: &BasicRequest) -> TrackingResult<CarrierRequest> {
        Ok(CarrierRequest::post(
            DHL_TRACK_URL,
            self.generate_request(&request.tracking_number)?,
            self.options.timeout_for(request),
        ))
    }
}
