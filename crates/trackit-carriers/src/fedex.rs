// ABOUTME: FedEx adapter for the Track Service XML API (TrackReply documents)
// ABOUTME: Succeeds only on a "0" notification and maps FedEx status codes to the shared taxonomy
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trackit_core::formatters::present_location;
use trackit_core::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, Status, TrackingError,
    TrackingResult,
};

use crate::core::{CarrierClient, ClientOptions, RequestOptions, TrackingRequest};
use crate::timestamps::{parse_iso, wall_clock};
use crate::xml::{from_xml, XmlBuilder};

const NAME: &str = "fedex";

/// Track Service endpoint
pub const FEDEX_TRACK_URL: &str = "https://ws.fedex.com/xml";

const SMARTPOST_PREFIX: &str = "FEDEX SMARTPOST ";

const STATUS_MAP: &[(&str, Status)] = &[
    ("AA", Status::EnRoute),
    ("AD", Status::EnRoute),
    ("AF", Status::EnRoute),
    ("AP", Status::Shipping),
    ("EO", Status::EnRoute),
    ("EP", Status::Shipping),
    ("FD", Status::EnRoute),
    ("HL", Status::Delivered),
    ("IT", Status::EnRoute),
    ("LO", Status::EnRoute),
    ("OC", Status::Shipping),
    ("DL", Status::Delivered),
    ("DP", Status::EnRoute),
    ("DS", Status::EnRoute),
    ("ED", Status::OutForDelivery),
    ("OD", Status::OutForDelivery),
    ("PF", Status::EnRoute),
    ("PL", Status::EnRoute),
    ("PU", Status::EnRoute),
    ("SF", Status::EnRoute),
    ("AR", Status::EnRoute),
    ("CD", Status::EnRoute),
    ("CC", Status::EnRoute),
    ("DE", Status::Delayed),
    ("CA", Status::Delayed),
    ("CH", Status::Delayed),
    ("DY", Status::Delayed),
    ("SE", Status::Delayed),
    ("AX", Status::EnRoute),
    ("OF", Status::EnRoute),
    ("RR", Status::EnRoute),
    ("OX", Status::EnRoute),
    ("CP", Status::EnRoute),
];

/// FedEx web service credentials
#[derive(Clone, PartialEq, Eq)]
pub struct FedexCredentials {
    /// Developer key
    pub key: String,
    /// Developer password
    pub password: String,
    /// Account number
    pub account: String,
    /// Meter number
    pub meter: String,
}

impl fmt::Debug for FedexCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FedexCredentials")
            .field("key", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("account", &self.account)
            .field("meter", &self.meter)
            .finish()
    }
}

/// FedEx request options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FedexRequest {
    /// Tracking number or door tag
    pub tracking_number: String,
    /// Customer transaction id ("n/a" when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Include the raw response
    #[serde(default)]
    pub raw: bool,
    /// Request timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl From<TrackingRequest> for FedexRequest {
    fn from(request: TrackingRequest) -> Self {
        Self {
            tracking_number: request.tracking_number,
            reference: request.reference,
            raw: request.raw,
            timeout_ms: request.timeout_ms,
        }
    }
}

impl RequestOptions for FedexRequest {
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
struct TrackReply {
    #[serde(default)]
    notifications: Vec<Notification>,
    #[serde(default)]
    track_details: Vec<FedexShipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Notification {
    code: Option<String>,
    message: Option<String>,
}

/// Track detail section of a FedEx reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FedexShipment {
    status_code: Option<String>,
    destination_address: Option<FedexAddress>,
    estimated_delivery_timestamp: Option<String>,
    service_info: Option<String>,
    package_weight: Option<PackageWeight>,
    #[serde(default)]
    events: Vec<FedexEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FedexAddress {
    city: Option<String>,
    state_or_province_code: Option<String>,
    country_code: Option<String>,
    postal_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageWeight {
    units: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FedexEvent {
    address: Option<FedexAddress>,
    timestamp: Option<String>,
    event_description: Option<String>,
}

fn present_address(address: Option<&FedexAddress>) -> Option<String> {
    let address = address?;
    let city = address
        .city
        .as_deref()
        .map(|c| c.strip_prefix(SMARTPOST_PREFIX).unwrap_or(c));
    present_location(
        &Location::new(
            city,
            address.state_or_province_code.as_deref(),
            address.country_code.as_deref(),
        )
        .with_postal_code(address.postal_code.as_deref()),
    )
}

fn present_status(code: Option<&str>) -> Status {
    code.and_then(|code| STATUS_MAP.iter().find(|(c, _)| *c == code))
        .map_or(Status::Unknown, |&(_, status)| status)
}

/// FedEx Track Service adapter
#[derive(Debug, Clone)]
pub struct FedexClient {
    credentials: FedexCredentials,
    options: ClientOptions,
}

impl FedexClient {
    /// Create a FedEx adapter
    #[must_use]
    pub const fn new(credentials: FedexCredentials, options: ClientOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }

    /// `ns:TrackRequest` document for a tracking number or door tag
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn generate_request(
        &self,
        tracking_number: &str,
        reference: Option<&str>,
    ) -> TrackingResult<String> {
        let credentials = &self.credentials;
        let mut xml = XmlBuilder::new(NAME);
        xml.declaration(None)?
            .open_with(
                "ns:TrackRequest",
                &[
                    ("xmlns:ns", "http://fedex.com/ws/track/v5"),
                    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
                    (
                        "xsi:schemaLocation",
                        "http://fedex.com/ws/track/v4 TrackService_v4.xsd",
                    ),
                ],
            )?
            .open("ns:WebAuthenticationDetail")?
            .open("ns:UserCredential")?
            .text("ns:Key", &credentials.key)?
            .text("ns:Password", &credentials.password)?
            .close("ns:UserCredential")?
            .close("ns:WebAuthenticationDetail")?
            .open("ns:ClientDetail")?
            .text("ns:AccountNumber", &credentials.account)?
            .text("ns:MeterNumber", &credentials.meter)?
            .close("ns:ClientDetail")?
            .open("ns:TransactionDetail")?
            .text("ns:CustomerTransactionId", reference.unwrap_or("n/a"))?
            .close("ns:TransactionDetail")?
            .open("ns:Version")?
            .text("ns:ServiceId", "trck")?
            .text("ns:Major", "5")?
            .text("ns:Intermediate", "0")?
            .text("ns:Minor", "0")?
            .close("ns:Version")?
            .open("ns:PackageIdentifier")?
            .text("ns:Value", tracking_number)?
            .text("ns:Type", "TRACKING_NUMBER_OR_DOORTAG")?
            .close("ns:PackageIdentifier")?
            .text("ns:IncludeDetailedScans", "true")?
            .close("ns:TrackRequest")?;
        xml.finish()
    }
}

#[async_trait]
impl CarrierClient for FedexClient {
    type Shipment = FedexShipment;
    type Request = FedexRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::Fedex
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<FedexShipment> {
        let reply: TrackReply = from_xml(NAME, response)?;
        let succeeded = reply
            .notifications
            .iter()
            .any(|n| n.code.as_deref() == Some("0"));
        if !succeeded {
            let message = reply
                .notifications
                .iter()
                .find_map(|n| n.message.clone())
                .unwrap_or_else(|| "invalid reply".to_owned());
            return Err(TrackingError::carrier_reported(NAME, message));
        }
        reply
            .track_details
            .into_iter()
            .next()
            .ok_or_else(|| TrackingError::missing_shipment(NAME, "no track details in reply"))
    }

    fn activities_and_status(&self, shipment: &FedexShipment) -> ActivitiesAndStatus {
        let activities = shipment
            .events
            .iter()
            .filter_map(|event| {
                let raw_timestamp = event.timestamp.as_deref();
                let activity = Activity::from_parts(
                    raw_timestamp.and_then(parse_iso),
                    event.event_description.clone(),
                )?;
                Some(
                    activity
                        .with_location(present_address(event.address.as_ref()))
                        .with_datetime(raw_timestamp.map(wall_clock)),
                )
            })
            .collect();
        ActivitiesAndStatus::new(activities, present_status(shipment.status_code.as_deref()))
    }

    fn eta(&self, shipment: &FedexShipment) -> Option<DateTime<Utc>> {
        let raw = shipment.estimated_delivery_timestamp.as_deref()?;
        parse_iso(&wall_clock(raw))
    }

    fn service(&self, shipment: &FedexShipment) -> Option<String> {
        shipment.service_info.clone()
    }

    fn weight(&self, shipment: &FedexShipment) -> Option<String> {
        let weight = shipment.package_weight.as_ref()?;
        Some(format!(
            "{} {}",
            weight.value.as_deref()?,
            weight.units.as_deref()?
        ))
    }

    fn destination(&self, shipment: &FedexShipment) -> Option<String> {
        present_address(shipment.destination_address.as_ref())
    }

    fn build_request(&self, request: &FedexRequest) -> TrackingResult<CarrierRequest> {
        let body = self.generate_request(&request.tracking_number, request.reference.as_deref())?;
        Ok(CarrierRequest::post(
            FEDEX_TRACK_URL,
            body,
            self.options.timeout_for(request),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_TRANSIT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrackReply>
  <HighestSeverity>SUCCESS</HighestSeverity>
  <Notifications>
    <Severity>SUCCESS</Severity>
    <Source>trck</Source>
    <Code>0</Code>
    <Message>Request was successfully processed.</Message>
  </Notifications>
  <TrackDetails>
    <TrackingNumber>9400110200881269505160</TrackingNumber>
    <StatusCode>IT</StatusCode>
    <StatusDescription>In transit</StatusDescription>
    <ServiceInfo>FedEx SmartPost</ServiceInfo>
    <PackageWeight>
      <Units>LB</Units>
      <Value>1.2</Value>
    </PackageWeight>
    <EstimatedDeliveryTimestamp>2014-02-17T00:00:00-05:00</EstimatedDeliveryTimestamp>
    <DestinationAddress>
      <City>NORTON</City>
      <StateOrProvinceCode>VA</StateOrProvinceCode>
      <CountryCode>US</CountryCode>
    </DestinationAddress>
    <Events>
      <Timestamp>2014-02-16T12:05:00-05:00</Timestamp>
      <EventType>AR</EventType>
      <EventDescription>Arrived at FedEx location</EventDescription>
      <Address>
        <City>FEDEX SMARTPOST INDIANAPOLIS</City>
        <StateOrProvinceCode>IN</StateOrProvinceCode>
        <PostalCode>46241</PostalCode>
        <CountryCode>US</CountryCode>
      </Address>
    </Events>
    <Events>
      <Timestamp>2014-02-15T09:30:00-06:00</Timestamp>
      <EventType>PU</EventType>
      <EventDescription>Picked up</EventDescription>
      <Address>
        <City>SUGAR LAND</City>
        <StateOrProvinceCode>TX</StateOrProvinceCode>
        <CountryCode>US</CountryCode>
      </Address>
    </Events>
    <Events>
      <EventDescription>Shipment information sent to FedEx</EventDescription>
    </Events>
  </TrackDetails>
</TrackReply>"#;

    fn client() -> FedexClient {
        FedexClient::new(
            FedexCredentials {
                key: "fedex-key".to_owned(),
                password: "fedex-password".to_owned(),
                account: "fedex-account".to_owned(),
                meter: "what-can-brown-do-for-you".to_owned(),
            },
            ClientOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_in_transit_shipment() {
        let client = client();
        let shipment = client.parse(IN_TRANSIT).await.unwrap();

        let ActivitiesAndStatus { activities, status } = client.activities_and_status(&shipment);
        assert_eq!(status, Status::EnRoute);
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].details, "Arrived at FedEx location");
        assert_eq!(
            activities[0].location.as_deref(),
            Some("Indianapolis, IN 46241")
        );
        assert_eq!(
            activities[0].timestamp.to_rfc3339(),
            "2014-02-16T17:05:00+00:00"
        );
        assert_eq!(
            activities[0].datetime.as_deref(),
            Some("2014-02-16T12:05:00")
        );
        assert_eq!(activities[1].location.as_deref(), Some("Sugar Land, TX"));

        assert_eq!(
            client.eta(&shipment).map(|eta| eta.to_rfc3339()).as_deref(),
            Some("2014-02-17T00:00:00+00:00")
        );
        assert_eq!(client.service(&shipment).as_deref(), Some("FedEx SmartPost"));
        assert_eq!(client.weight(&shipment).as_deref(), Some("1.2 LB"));
        assert_eq!(client.destination(&shipment).as_deref(), Some("Norton, VA"));
    }

    #[tokio::test]
    async fn test_failed_notification_is_reported() {
        let response = "<TrackReply><Notifications><Code>9040</Code></Notifications></TrackReply>";
        let err = client().parse(response).await.unwrap_err();
        assert_eq!(err, TrackingError::carrier_reported("fedex", "invalid reply"));
    }

    #[test]
    fn test_status_lookup() {
        assert_eq!(present_status(Some("DL")), Status::Delivered);
        assert_eq!(present_status(Some("OD")), Status::OutForDelivery);
        assert_eq!(present_status(Some("OC")), Status::Shipping);
        assert_eq!(present_status(Some("DE")), Status::Delayed);
        assert_eq!(present_status(Some("ZZ")), Status::Unknown);
        assert_eq!(present_status(None), Status::Unknown);
    }

    #[test]
    fn test_generate_request_document() {
        let xml = client()
            .generate_request("1Z5678", Some("eloquent shipit"))
            .unwrap();
        assert!(xml.contains(r#"xmlns:ns="http://fedex.com/ws/track/v5""#));
        assert!(xml.contains("<ns:Key>fedex-key</ns:Key>"));
        assert!(xml.contains("<ns:MeterNumber>what-can-brown-do-for-you</ns:MeterNumber>"));
        assert!(xml.contains("<ns:CustomerTransactionId>eloquent shipit</ns:CustomerTransactionId>"));
        assert!(xml.contains("<ns:ServiceId>trck</ns:ServiceId><ns:Major>5</ns:Major>"));
        assert!(xml.contains("<ns:Value>1Z5678</ns:Value>"));
        assert!(xml.contains("<ns:Type>TRACKING_NUMBER_OR_DOORTAG</ns:Type>"));
        assert!(xml.contains("<ns:IncludeDetailedScans>true</ns:IncludeDetailedScans>"));
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let rendered = format!("{:?}", client().credentials);
        assert!(!rendered.contains("fedex-key"));
        assert!(!rendered.contains("fedex-password"));
    }
}
