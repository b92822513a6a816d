// ABOUTME: USPS adapter for the TrackV2 Web Tools API (TrackResponse/TrackInfo documents)
// ABOUTME: Infers status from event text and sends the request document as a URL query parameter
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use trackit_core::formatters::{infer_status, present_location};
use trackit_core::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, Status, TrackingError,
    TrackingResult,
};
use url::Url;

use crate::core::{CarrierClient, ClientOptions, RequestOptions, TrackingRequest};
use crate::timestamps::{date_and_time, date_at_midnight};
use crate::xml::{from_xml, XmlBuilder};

const NAME: &str = "usps";

/// Production Web Tools endpoint
pub const USPS_TRACK_URL: &str = "http://production.shippingapis.com/ShippingAPI.dll";
/// Test Web Tools endpoint
pub const USPS_TEST_TRACK_URL: &str = "http://production.shippingapis.com/ShippingAPITest.dll";

const DEFAULT_CLIENT_IP: &str = "127.0.0.1";
const SOURCE_ID: &str = "shipit";
const DATE_FORMAT: &str = "%B %d, %Y";
const TIME_FORMAT: &str = "%I:%M %p";

/// Event text vocabulary, first case-insensitive match wins
const STATUS_VOCABULARY: &[(&str, Status)] = &[
    ("Accept", Status::EnRoute),
    ("Processed", Status::EnRoute),
    ("Depart", Status::EnRoute),
    ("Picked Up", Status::EnRoute),
    ("Arrival", Status::EnRoute),
    ("Sorting Complete", Status::EnRoute),
    ("Customs clearance", Status::EnRoute),
    ("Dispatch", Status::EnRoute),
    ("Arrive", Status::EnRoute),
    ("In Transit", Status::EnRoute),
    ("Inbound Out of Customs", Status::EnRoute),
    ("Inbound Into Customs", Status::EnRoute),
    ("Forwarded", Status::EnRoute),
    ("Out for Delivery", Status::OutForDelivery),
    ("Delivered", Status::Delivered),
    ("Notice Left", Status::Delayed),
    ("Refused", Status::Delayed),
    ("Item being held", Status::Delayed),
    ("Missed delivery", Status::Delayed),
    ("Addressee not available", Status::Delayed),
    ("Undeliverable as Addressed", Status::Delayed),
    ("Tendered to Military Agent", Status::Delivered),
    ("USPS Awaiting Item", Status::Shipping),
    ("USPS in possession of item", Status::EnRoute),
];

/// Trademark superscripts embedded in service class names
static SUPERSCRIPT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<SUP>.*</SUP>").ok());

/// USPS Web Tools credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UspsCredentials {
    /// Web Tools user id
    pub user_id: String,
}

/// USPS request options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UspsRequest {
    /// Tracking number being looked up
    pub tracking_number: String,
    /// Caller IP reported to USPS (127.0.0.1 when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    /// Use the test endpoint
    #[serde(default)]
    pub test: bool,
    /// Include the raw response
    #[serde(default)]
    pub raw: bool,
    /// Request timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl From<TrackingRequest> for UspsRequest {
    fn from(request: TrackingRequest) -> Self {
        Self {
            tracking_number: request.tracking_number,
            client_ip: request.client_ip,
            test: request.test,
            raw: request.raw,
            timeout_ms: request.timeout_ms,
        }
    }
}

impl RequestOptions for UspsRequest {
    fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    fn raw(&self) -> bool {
        self.raw
    }

    fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrackResponse {
    track_info: Option<UspsShipment>,
}

/// TrackInfo section of a USPS track response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UspsShipment {
    class: Option<String>,
    status: Option<String>,
    status_category: Option<String>,
    destination_city: Option<String>,
    destination_state: Option<String>,
    destination_zip: Option<String>,
    predicted_delivery_date: Option<String>,
    expected_delivery_date: Option<String>,
    track_summary: Option<UspsEvent>,
    #[serde(default)]
    track_detail: Vec<UspsEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UspsEvent {
    event_time: Option<String>,
    event_date: Option<String>,
    event: Option<String>,
    event_city: Option<String>,
    event_state: Option<String>,
    #[serde(rename = "EventZIPCode")]
    event_zip_code: Option<String>,
    event_country: Option<String>,
}

fn present_timestamp(date: Option<&str>, time: Option<&str>) -> Option<DateTime<Utc>> {
    let time = time.map(str::to_uppercase);
    date_and_time(date?, time.as_deref(), DATE_FORMAT, TIME_FORMAT)
}

fn present_activity(event: &UspsEvent) -> Option<Activity> {
    let location = present_location(
        &Location::new(
            event.event_city.as_deref(),
            event.event_state.as_deref(),
            event.event_country.as_deref(),
        )
        .with_postal_code(event.event_zip_code.as_deref()),
    );
    let timestamp = present_timestamp(event.event_date.as_deref(), event.event_time.as_deref());
    Activity::from_parts(timestamp, event.event.clone()).map(|a| a.with_location(location))
}

fn present_status(shipment: &UspsShipment) -> Status {
    match shipment.status_category.as_deref() {
        Some("Pre-Shipment") => Status::Shipping,
        Some("Delivered") => Status::Delivered,
        _ => infer_status(shipment.status.as_deref(), STATUS_VOCABULARY),
    }
}

/// USPS TrackV2 adapter
#[derive(Debug, Clone)]
pub struct UspsClient {
    credentials: UspsCredentials,
    options: ClientOptions,
}

impl UspsClient {
    /// Create a USPS adapter
    #[must_use]
    pub const fn new(credentials: UspsCredentials, options: ClientOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }

    /// `TrackFieldRequest` document for one tracking number
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn generate_request(
        &self,
        tracking_number: &str,
        client_ip: Option<&str>,
    ) -> TrackingResult<String> {
        let mut xml = XmlBuilder::new(NAME);
        xml.open_with("TrackFieldRequest", &[("USERID", self.credentials.user_id.as_str())])?
            .text("Revision", "1")?
            .text("ClientIp", client_ip.unwrap_or(DEFAULT_CLIENT_IP))?
            .text("SourceId", SOURCE_ID)?
            .empty_with("TrackID", &[("ID", tracking_number)])?
            .close("TrackFieldRequest")?;
        xml.finish()
    }
}

#[async_trait]
impl CarrierClient for UspsClient {
    type Shipment = UspsShipment;
    type Request = UspsRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::Usps
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<UspsShipment> {
        let reply: TrackResponse = from_xml(NAME, response)?;
        reply
            .track_info
            .ok_or_else(|| TrackingError::missing_shipment(NAME, "No Tracking Info"))
    }

    fn activities_and_status(&self, shipment: &UspsShipment) -> ActivitiesAndStatus {
        let activities = shipment
            .track_summary
            .iter()
            .chain(&shipment.track_detail)
            .filter_map(present_activity)
            .collect();
        ActivitiesAndStatus::new(activities, present_status(shipment))
    }

    fn eta(&self, shipment: &UspsShipment) -> Option<DateTime<Utc>> {
        let raw = shipment
            .predicted_delivery_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(shipment.expected_delivery_date.as_deref())?;
        date_at_midnight(raw, DATE_FORMAT)
    }

    fn service(&self, shipment: &UspsShipment) -> Option<String> {
        let class = shipment.class.as_deref()?;
        Some(
            SUPERSCRIPT_PATTERN
                .as_ref()
                .map_or_else(|| class.to_owned(), |re| re.replace(class, "").into_owned()),
        )
    }

    fn weight(&self, _shipment: &UspsShipment) -> Option<String> {
        None
    }

    fn destination(&self, shipment: &UspsShipment) -> Option<String> {
        present_location(
            &Location::new(
                shipment.destination_city.as_deref(),
                shipment.destination_state.as_deref(),
                None,
            )
            .with_postal_code(shipment.destination_zip.as_deref()),
        )
    }

    fn build_request(&self, request: &UspsRequest) -> TrackingResult<CarrierRequest> {
        let endpoint = if request.test {
            USPS_TEST_TRACK_URL
        } else {
            USPS_TRACK_URL
        };
        let xml = self.generate_request(&request.tracking_number, request.client_ip.as_deref())?;
        let url = Url::parse_with_params(endpoint, &[("API", "TrackV2"), ("XML", xml.as_str())])
            .map_err(|e| TrackingError::invalid_request(NAME, e))?;
        Ok(CarrierRequest::get(
            url.as_str(),
            self.options.timeout_for(request),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIVERED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrackResponse>
  <TrackInfo ID="9400111899223197428490">
    <Class>First-Class Package Service&lt;SUP&gt;&amp;reg;&lt;/SUP&gt;</Class>
    <ClassOfMailCode>FC</ClassOfMailCode>
    <DestinationCity>CHICAGO</DestinationCity>
    <DestinationState>IL</DestinationState>
    <DestinationZip>60654</DestinationZip>
    <Status>Delivered</Status>
    <StatusCategory>Delivered</StatusCategory>
    <TrackSummary>
      <EventTime>12:24 pm</EventTime>
      <EventDate>February 13, 2014</EventDate>
      <Event>Delivered</Event>
      <EventCity>CHICAGO</EventCity>
      <EventState>IL</EventState>
      <EventZIPCode>60610</EventZIPCode>
      <EventCountry/>
    </TrackSummary>
    <TrackDetail>
      <EventTime>7:01 am</EventTime>
      <EventDate>February 13, 2014</EventDate>
      <Event>Out for Delivery</Event>
      <EventCity>CHICAGO</EventCity>
      <EventState>IL</EventState>
      <EventZIPCode>60610</EventZIPCode>
      <EventCountry/>
    </TrackDetail>
    <TrackDetail>
      <EventTime>11:31 am</EventTime>
      <EventDate>Feb 10, 2014</EventDate>
      <Event>Acceptance</Event>
      <EventCity>POMONA</EventCity>
      <EventState>CA</EventState>
      <EventZIPCode>91768</EventZIPCode>
      <EventCountry/>
    </TrackDetail>
  </TrackInfo>
</TrackResponse>"#;

    const PRE_SHIPMENT: &str = r#"<TrackResponse>
  <TrackInfo ID="9400110200793596422990">
    <Class>Package Services</Class>
    <DestinationCity>KIHEI</DestinationCity>
    <DestinationState>HI</DestinationState>
    <DestinationZip>96753</DestinationZip>
    <Status>Electronic Shipping Info Received</Status>
    <StatusCategory>Pre-Shipment</StatusCategory>
    <PredictedDeliveryDate>September 25, 2015</PredictedDeliveryDate>
    <TrackSummary>
      <EventTime></EventTime>
      <EventDate>February 28, 2014</EventDate>
      <Event>Electronic Shipping Info Received</Event>
      <EventCity/>
      <EventState/>
      <EventZIPCode/>
      <EventCountry/>
    </TrackSummary>
  </TrackInfo>
</TrackResponse>"#;

    fn client() -> UspsClient {
        UspsClient::new(
            UspsCredentials {
                user_id: "hello-neuman".to_owned(),
            },
            ClientOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_delivered_package() {
        let client = client();
        let shipment = client.parse(DELIVERED).await.unwrap();

        let ActivitiesAndStatus { activities, status } = client.activities_and_status(&shipment);
        assert_eq!(status, Status::Delivered);
        assert_eq!(activities.len(), 3);
        assert_eq!(activities[0].details, "Delivered");
        assert_eq!(activities[0].location.as_deref(), Some("Chicago, IL 60610"));
        assert_eq!(
            activities[0].timestamp.to_rfc3339(),
            "2014-02-13T12:24:00+00:00"
        );
        assert_eq!(activities[2].details, "Acceptance");
        assert_eq!(activities[2].location.as_deref(), Some("Pomona, CA 91768"));
        assert_eq!(
            activities[2].timestamp.to_rfc3339(),
            "2014-02-10T11:31:00+00:00"
        );

        assert_eq!(
            client.service(&shipment).as_deref(),
            Some("First-Class Package Service")
        );
        assert_eq!(
            client.destination(&shipment).as_deref(),
            Some("Chicago, IL 60654")
        );
        assert!(client.weight(&shipment).is_none());
        assert!(client.eta(&shipment).is_none());
    }

    #[tokio::test]
    async fn test_pre_shipment_package() {
        let client = client();
        let shipment = client.parse(PRE_SHIPMENT).await.unwrap();

        let ActivitiesAndStatus { activities, status } = client.activities_and_status(&shipment);
        assert_eq!(status, Status::Shipping);
        assert_eq!(activities.len(), 1);
        assert_eq!(
            activities[0].timestamp.to_rfc3339(),
            "2014-02-28T00:00:00+00:00"
        );
        assert!(activities[0].location.is_none());
        assert_eq!(client.service(&shipment).as_deref(), Some("Package Services"));
        assert_eq!(client.destination(&shipment).as_deref(), Some("Kihei, HI 96753"));
        assert_eq!(
            client.eta(&shipment).map(|eta| eta.to_rfc3339()).as_deref(),
            Some("2015-09-25T00:00:00+00:00")
        );
    }

    #[tokio::test]
    async fn test_response_without_track_info() {
        let err = client()
            .parse("<TrackResponse></TrackResponse>")
            .await
            .unwrap_err();
        assert_eq!(err, TrackingError::missing_shipment("usps", "No Tracking Info"));
    }

    #[test]
    fn test_status_falls_back_to_event_text() {
        let shipment = |status: &str| UspsShipment {
            class: None,
            status: Some(status.to_owned()),
            status_category: Some("In Transit".to_owned()),
            destination_city: None,
            destination_state: None,
            destination_zip: None,
            predicted_delivery_date: None,
            expected_delivery_date: None,
            track_summary: None,
            track_detail: Vec::new(),
        };
        assert_eq!(
            present_status(&shipment("Out for Delivery, March 2, 2014")),
            Status::OutForDelivery
        );
        assert_eq!(
            present_status(&shipment("Notice Left (No Authorized Recipient Available)")),
            Status::Delayed
        );
        assert_eq!(present_status(&shipment("Label printed")), Status::Unknown);
    }

    #[test]
    fn test_generate_request_document() {
        let xml = client()
            .generate_request("9400111899560008231892", Some("10.10.5.2"))
            .unwrap();
        assert!(xml.starts_with(r#"<TrackFieldRequest USERID="hello-neuman">"#));
        assert!(xml.contains("<Revision>1</Revision>"));
        assert!(xml.contains("<ClientIp>10.10.5.2</ClientIp>"));
        assert!(xml.contains("<SourceId>shipit</SourceId>"));
        assert!(xml.contains(r#"<TrackID ID="9400111899560008231892"/>"#));

        let xml = client().generate_request("trk", None).unwrap();
        assert!(xml.contains("<ClientIp>127.0.0.1</ClientIp>"));
    }

    #[test]
    fn test_build_request_encodes_document_in_query() {
        let request = UspsRequest {
            tracking_number: "9400111899560008231892".to_owned(),
            test: true,
            ..UspsRequest::default()
        };
        let built = CarrierClient::build_request(&client(), &request).unwrap();
        assert_eq!(built.method.as_str(), "GET");
        assert!(built.url.starts_with(
            "http://production.shippingapis.com/ShippingAPITest.dll?API=TrackV2&XML=%3CTrackFieldRequest"
        ));
        assert!(built.body.is_none());
    }
}
