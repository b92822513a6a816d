// ABOUTME: UPS adapter for the XML Track API (TrackResponse documents)
// ABOUTME: Maps UPS status types to the shared taxonomy and builds AccessRequest + TrackRequest bodies
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trackit_core::formatters::{present_location, title_case, upper_case_first};
use trackit_core::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, Status, TrackingError,
    TrackingResult,
};

use crate::core::{CarrierClient, ClientOptions, RequestOptions, TrackingRequest};
use crate::timestamps::date_and_time;
use crate::xml::{from_xml, XmlBuilder};

const NAME: &str = "ups";

/// Production track endpoint
pub const UPS_TRACK_URL: &str = "https://onlinetools.ups.com/ups.app/xml/Track";
/// Customer integration environment track endpoint
pub const UPS_TEST_TRACK_URL: &str = "https://wwwcie.ups.com/ups.app/xml/Track";

const DATE_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H%M%S";

/// UPS access credentials
#[derive(Clone, PartialEq, Eq)]
pub struct UpsCredentials {
    /// Access license number
    pub license_number: String,
    /// Account user id
    pub user_id: String,
    /// Account password
    pub password: String,
}

impl fmt::Debug for UpsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpsCredentials")
            .field("license_number", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// UPS request options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsRequest {
    /// Tracking number being looked up
    pub tracking_number: String,
    /// Customer context echoed in the response ("n/a" when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Use the customer integration environment
    #[serde(default)]
    pub test: bool,
    /// Include the raw response
    #[serde(default)]
    pub raw: bool,
    /// Request timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl From<TrackingRequest> for UpsRequest {
    fn from(request: TrackingRequest) -> Self {
        Self {
            tracking_number: request.tracking_number,
            reference: request.reference,
            test: request.test,
            raw: request.raw,
            timeout_ms: request.timeout_ms,
        }
    }
}

impl RequestOptions for UpsRequest {
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
    response: ResponseStatus,
    #[serde(default)]
    shipment: Vec<UpsShipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseStatus {
    response_status_description: Option<String>,
    #[serde(default)]
    error: Vec<ResponseError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseError {
    error_description: Option<String>,
}

/// Shipment section of a UPS track response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipment {
    #[serde(default)]
    package: Vec<Package>,
    ship_to: Option<ShipTo>,
    scheduled_delivery_date: Option<String>,
    service: Option<Description>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Package {
    rescheduled_delivery_date: Option<String>,
    package_weight: Option<PackageWeight>,
    #[serde(default)]
    activity: Vec<UpsActivity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PackageWeight {
    unit_of_measurement: Option<Coded>,
    weight: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Coded {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Description {
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipTo {
    address: Option<UpsAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpsAddress {
    city: Option<String>,
    state_province_code: Option<String>,
    country_code: Option<String>,
    postal_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpsActivity {
    activity_location: Option<ShipTo>,
    date: Option<String>,
    time: Option<String>,
    status: Option<ActivityStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ActivityStatus {
    status_type: Option<Coded>,
    status_code: Option<Coded>,
}

impl ActivityStatus {
    fn type_code(&self) -> Option<&str> {
        self.status_type.as_ref()?.code.as_deref()
    }

    fn status_code(&self) -> Option<&str> {
        self.status_code.as_ref()?.code.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.status_type.as_ref()?.description.as_deref()
    }
}

fn present_address(address: Option<&UpsAddress>) -> Option<String> {
    let address = address?;
    present_location(
        &Location::new(
            address.city.as_deref(),
            address.state_province_code.as_deref(),
            address.country_code.as_deref(),
        )
        .with_postal_code(address.postal_code.as_deref()),
    )
}

fn present_timestamp(date: Option<&str>, time: Option<&str>) -> Option<DateTime<Utc>> {
    date_and_time(date?, time, DATE_FORMAT, TIME_FORMAT)
}

fn present_status(status: Option<&ActivityStatus>) -> Status {
    let Some(status) = status else {
        return Status::Unknown;
    };
    match (status.type_code(), status.status_code()) {
        (Some("D"), _) => Status::Delivered,
        (Some("P"), _) => Status::EnRoute,
        (Some("M"), _) => Status::Shipping,
        (Some("I"), Some("OF")) => Status::OutForDelivery,
        (Some("I"), _) | (Some("X"), Some("U2")) => Status::EnRoute,
        (Some("X"), _) => Status::Delayed,
        _ => Status::Unknown,
    }
}

/// UPS Track API adapter
#[derive(Debug, Clone)]
pub struct UpsClient {
    credentials: UpsCredentials,
    options: ClientOptions,
}

impl UpsClient {
    /// Create a UPS adapter
    #[must_use]
    pub const fn new(credentials: UpsCredentials, options: ClientOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }

    /// AccessRequest and TrackRequest documents, concatenated
    ///
    /// # Errors
    ///
    /// Returns an error if either document cannot be written.
    pub fn generate_request(
        &self,
        tracking_number: &str,
        reference: Option<&str>,
    ) -> TrackingResult<String> {
        let mut access = XmlBuilder::new(NAME);
        access
            .declaration(Some("yes"))?
            .open("AccessRequest")?
            .text("AccessLicenseNumber", &self.credentials.license_number)?
            .text("UserId", &self.credentials.user_id)?
            .text("Password", &self.credentials.password)?
            .close("AccessRequest")?;

        let mut track = XmlBuilder::new(NAME);
        track
            .declaration(Some("yes"))?
            .open("TrackRequest")?
            .open("Request")?
            .open("TransactionReference")?
            .text("CustomerContext", reference.unwrap_or("n/a"))?
            .close("TransactionReference")?
            .text("RequestAction", "track")?
            .text("RequestOption", "3")?
            .close("Request")?
            .text("TrackingNumber", tracking_number)?
            .close("TrackRequest")?;

        Ok(format!("{}{}", access.finish()?, track.finish()?))
    }

    fn first_package(shipment: &UpsShipment) -> Option<&Package> {
        shipment.package.first()
    }
}

#[async_trait]
impl CarrierClient for UpsClient {
    type Shipment = UpsShipment;
    type Request = UpsRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::Ups
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<UpsShipment> {
        let reply: TrackResponse = from_xml(NAME, response)?;
        if reply.response.response_status_description.as_deref() != Some("Success") {
            let message = reply
                .response
                .error
                .iter()
                .find_map(|e| e.error_description.clone())
                .unwrap_or_else(|| "unknown error".to_owned());
            return Err(TrackingError::carrier_reported(NAME, message));
        }
        reply
            .shipment
            .into_iter()
            .next()
            .ok_or_else(|| TrackingError::missing_shipment(NAME, "missing shipment data"))
    }

    fn activities_and_status(&self, shipment: &UpsShipment) -> ActivitiesAndStatus {
        let mut activities = Vec::new();
        let mut status = Status::Unknown;
        let raw_activities = Self::first_package(shipment).map_or(&[][..], |p| &p.activity);

        for raw in raw_activities {
            let location = present_address(
                raw.activity_location
                    .as_ref()
                    .and_then(|l| l.address.as_ref()),
            );
            let timestamp = present_timestamp(raw.date.as_deref(), raw.time.as_deref());
            let details = raw
                .status
                .as_ref()
                .and_then(ActivityStatus::description)
                .map(|d| upper_case_first(&d.to_lowercase()));

            if let Some(activity) = Activity::from_parts(timestamp, details) {
                activities.push(activity.with_location(location));
            }
            if status.is_unknown() {
                status = present_status(raw.status.as_ref());
            }
        }
        ActivitiesAndStatus::new(activities, status)
    }

    fn eta(&self, shipment: &UpsShipment) -> Option<DateTime<Utc>> {
        let rescheduled = Self::first_package(shipment)
            .and_then(|p| p.rescheduled_delivery_date.as_deref())
            .filter(|d| !d.is_empty());
        let date = rescheduled.or(shipment.scheduled_delivery_date.as_deref())?;
        present_timestamp(Some(date), None)
    }

    fn service(&self, shipment: &UpsShipment) -> Option<String> {
        shipment
            .service
            .as_ref()?
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(title_case)
    }

    fn weight(&self, shipment: &UpsShipment) -> Option<String> {
        let weight = Self::first_package(shipment)?.package_weight.as_ref()?;
        let value = weight.weight.as_deref()?;
        let units = weight
            .unit_of_measurement
            .as_ref()
            .and_then(|u| u.code.as_deref())
            .filter(|u| !u.is_empty());
        Some(units.map_or_else(|| value.to_owned(), |u| format!("{value} {u}")))
    }

    fn destination(&self, shipment: &UpsShipment) -> Option<String> {
        present_address(shipment.ship_to.as_ref()?.address.as_ref())
    }

    fn build_request(&self, request: &UpsRequest) -> TrackingResult<CarrierRequest> {
        let url = if request.test {
            UPS_TEST_TRACK_URL
        } else {
            UPS_TRACK_URL
        };
        let body = self.generate_request(&request.tracking_number, request.reference.as_deref())?;
        Ok(CarrierRequest::post(url, body, self.options.timeout_for(request)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIVERED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrackResponse>
  <Response>
    <ResponseStatusCode>1</ResponseStatusCode>
    <ResponseStatusDescription>Success</ResponseStatusDescription>
  </Response>
  <Shipment>
    <ShipTo>
      <Address>
        <City>ANYTOWN</City>
        <StateProvinceCode>GA</StateProvinceCode>
        <PostalCode>30340</PostalCode>
        <CountryCode>US</CountryCode>
      </Address>
    </ShipTo>
    <Service>
      <Code>002</Code>
      <Description>2ND DAY AIR</Description>
    </Service>
    <Package>
      <TrackingNumber>1Z12345E0291980793</TrackingNumber>
      <Activity>
        <ActivityLocation>
          <Address>
            <City>ANYTOWN</City>
            <StateProvinceCode>GA</StateProvinceCode>
            <PostalCode>30340</PostalCode>
            <CountryCode>US</CountryCode>
          </Address>
        </ActivityLocation>
        <Status>
          <StatusType>
            <Code>D</Code>
            <Description>DELIVERED</Description>
          </StatusType>
          <StatusCode>
            <Code>KB</Code>
          </StatusCode>
        </Status>
        <Date>20100610</Date>
        <Time>120000</Time>
      </Activity>
      <Activity>
        <ActivityLocation>
          <Address>
            <CountryCode>US</CountryCode>
          </Address>
        </ActivityLocation>
        <Status>
          <StatusType>
            <Code>M</Code>
            <Description>BILLING INFORMATION RECEIVED</Description>
          </StatusType>
          <StatusCode>
            <Code>MP</Code>
          </StatusCode>
        </Status>
        <Date>20100608</Date>
        <Time>120000</Time>
      </Activity>
      <PackageWeight>
        <UnitOfMeasurement>
          <Code>LBS</Code>
        </UnitOfMeasurement>
        <Weight>5.00</Weight>
      </PackageWeight>
    </Package>
  </Shipment>
</TrackResponse>"#;

    fn client() -> UpsClient {
        UpsClient::new(
            UpsCredentials {
                license_number: "12345".to_owned(),
                user_id: "shipit".to_owned(),
                password: "password".to_owned(),
            },
            ClientOptions::default(),
        )
    }

    fn status_of(type_code: &str, status_code: Option<&str>) -> Status {
        let status = ActivityStatus {
            status_type: Some(Coded {
                code: Some(type_code.to_owned()),
                description: None,
            }),
            status_code: status_code.map(|c| Coded {
                code: Some(c.to_owned()),
                description: None,
            }),
        };
        present_status(Some(&status))
    }

    #[tokio::test]
    async fn test_delivered_shipment() {
        let client = client();
        let shipment = client.parse(DELIVERED).await.unwrap();

        let ActivitiesAndStatus { activities, status } = client.activities_and_status(&shipment);
        assert_eq!(status, Status::Delivered);
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].details, "Delivered");
        assert_eq!(activities[0].location.as_deref(), Some("Anytown, GA 30340"));
        assert_eq!(
            activities[0].timestamp.to_rfc3339(),
            "2010-06-10T12:00:00+00:00"
        );
        assert_eq!(activities[1].details, "Billing information received");
        assert_eq!(activities[1].location.as_deref(), Some("US"));

        assert_eq!(client.service(&shipment).as_deref(), Some("2 Nd Day Air"));
        assert_eq!(client.weight(&shipment).as_deref(), Some("5.00 LBS"));
        assert_eq!(
            client.destination(&shipment).as_deref(),
            Some("Anytown, GA 30340")
        );
        assert!(client.eta(&shipment).is_none());
    }

    #[tokio::test]
    async fn test_carrier_error_description_is_returned() {
        let response = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><TrackResponse><Response><ResponseStatusCode>1</ResponseStatusCode><ResponseStatusDescription>Exception</ResponseStatusDescription><Error><ErrorDescription>No data</ErrorDescription></Error></Response></TrackResponse>"#;
        let err = client().parse(response).await.unwrap_err();
        assert_eq!(err, TrackingError::carrier_reported("ups", "No data"));
    }

    #[tokio::test]
    async fn test_missing_status_is_unknown_error() {
        let response = "<TrackResponse><Response><ResponseStatusCode>1</ResponseStatusCode></Response></TrackResponse>";
        let err = client().parse(response).await.unwrap_err();
        assert_eq!(err, TrackingError::carrier_reported("ups", "unknown error"));
    }

    #[tokio::test]
    async fn test_success_without_shipment_is_missing_shipment() {
        let response = "<TrackResponse><Response><ResponseStatusDescription>Success</ResponseStatusDescription></Response></TrackResponse>";
        let err = client().parse(response).await.unwrap_err();
        assert_eq!(err.code(), trackit_core::ErrorCode::MissingShipment);
    }

    #[tokio::test]
    async fn test_non_xml_is_malformed() {
        let err = client().parse("bad xml").await.unwrap_err();
        assert_eq!(err.code(), trackit_core::ErrorCode::MalformedResponse);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of("D", None), Status::Delivered);
        assert_eq!(status_of("P", None), Status::EnRoute);
        assert_eq!(status_of("M", None), Status::Shipping);
        assert_eq!(status_of("I", Some("OF")), Status::OutForDelivery);
        assert_eq!(status_of("I", Some("DP")), Status::EnRoute);
        assert_eq!(status_of("X", Some("U2")), Status::EnRoute);
        assert_eq!(status_of("X", Some("NA")), Status::Delayed);
        assert_eq!(status_of("Z", None), Status::Unknown);
        assert_eq!(present_status(None), Status::Unknown);
    }

    #[test]
    fn test_generate_request_documents() {
        let xml = client()
            .generate_request("1Z5678", Some("eloquent shipit"))
            .unwrap();
        assert!(xml.contains("<AccessLicenseNumber>12345</AccessLicenseNumber>"));
        assert!(xml.contains("<UserId>shipit</UserId>"));
        assert!(xml.contains("<CustomerContext>eloquent shipit</CustomerContext>"));
        assert!(xml.contains("<RequestAction>track</RequestAction>"));
        assert!(xml.contains("<RequestOption>3</RequestOption>"));
        assert!(xml.contains("<TrackingNumber>1Z5678</TrackingNumber>"));
        assert_eq!(xml.matches("<?xml").count(), 2);

        let xml = client().generate_request("1Z5678", None).unwrap();
        assert!(xml.contains("<CustomerContext>n/a</CustomerContext>"));
    }

    #[test]
    fn test_build_request_selects_host() {
        let client = client();
        let request = UpsRequest {
            tracking_number: "1Z5678".to_owned(),
            test: true,
            ..UpsRequest::default()
        };
        let built = CarrierClient::build_request(&client, &request).unwrap();
        assert_eq!(built.url, UPS_TEST_TRACK_URL);
        assert_eq!(built.method.as_str(), "POST");

        let request = UpsRequest {
            test: false,
            ..request
        };
        let built = CarrierClient::build_request(&client, &request).unwrap();
        assert_eq!(built.url, UPS_TRACK_URL);
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let rendered = format!("{:?}", client().credentials);
        assert!(!rendered.contains("password\""));
        assert!(rendered.contains("[REDACTED]"));
    }
}
