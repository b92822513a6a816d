// ABOUTME: LaserShip adapter for the public JSON tracking endpoint
// ABOUTME: Event types map onto the shared taxonomy; the first mappable event sets the status
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
use crate::timestamps::parse_iso;

const NAME: &str = "lasership";

/// Base of the per-shipment JSON tracking URL
pub const LASERSHIP_BASE_URL: &str = "http://www.lasership.com/";

const STATUS_MAP: &[(&str, Status)] = &[
    ("Released", Status::Delivered),
    ("Delivered", Status::Delivered),
    ("OutForDelivery", Status::OutForDelivery),
    ("Arrived", Status::EnRoute),
    ("Received", Status::EnRoute),
    ("OrderReceived", Status::Shipping),
    ("OrderCreated", Status::Shipping),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LasershipAddress {
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

impl LasershipAddress {
    fn present(&self) -> Option<String> {
        present_location(
            &Location::new(
                self.city.as_deref(),
                self.state.as_deref(),
                self.country.as_deref(),
            )
            .with_postal_code(self.postal_code.as_deref()),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LasershipEvent {
    #[serde(flatten)]
    address: LasershipAddress,
    date_time: Option<String>,
    event_short_text: Option<String>,
    event_type: Option<String>,
}

/// LaserShip tracking document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LasershipShipment {
    destination: Option<LasershipAddress>,
    events: Option<Vec<LasershipEvent>>,
    estimated_delivery_date: Option<String>,
    #[serde(default)]
    pieces: Vec<Piece>,
}

fn present_status(event_type: Option<&str>) -> Option<Status> {
    let event_type = event_type?;
    STATUS_MAP
        .iter()
        .find(|(t, _)| *t == event_type)
        .map(|&(_, status)| status)
}

/// LaserShip adapter
#[derive(Debug, Clone, Default)]
pub struct LasershipClient {
    options: ClientOptions,
}

impl LasershipClient {
    /// Create a LaserShip adapter
    #[must_use]
    pub const fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl CarrierClient for LasershipClient {
    type Shipment = LasershipShipment;
    type Request = BasicRequest;

    fn name(&self) -> &'static str {
        NAME
    }

    fn carrier(&self) -> Carrier {
        Carrier::Lasership
    }

    fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn parse(&self, response: &str) -> TrackingResult<LasershipShipment> {
        let shipment: LasershipShipment = from_json(NAME, response)?;
        if shipment.events.is_none() {
            return Err(TrackingError::missing_shipment(NAME, "missing events"));
        }
        Ok(shipment)
    }

    fn activities_and_status(&self, shipment: &LasershipShipment) -> ActivitiesAndStatus {
        let mut activities = Vec::new();
        let mut status = None;

        for raw in shipment.events.iter().flatten() {
            let timestamp = raw.date_time.as_deref().and_then(parse_iso);
            if let Some(activity) = Activity::from_parts(timestamp, raw.event_short_text.clone()) {
                activities.push(activity.with_location(raw.address.present()));
            }
            if status.is_none() {
                status = present_status(raw.event_type.as_deref());
            }
        }
        ActivitiesAndStatus::new(activities, status.unwrap_or_default())
    }

    fn eta(&self, shipment: &LasershipShipment) -> Option<DateTime<Utc>> {
        parse_iso(shipment.estimated_delivery_date.as_deref()?)
    }

    fn service(&self, _shipment: &LasershipShipment) -> Option<String> {
        None
    }

    fn weight(&self, shipment: &LasershipShipment) -> Option<String> {
        shipment.pieces.first()?.presented_weight()
    }

    fn destination(&self, shipment: &LasershipShipment) -> Option<String> {
        shipment.destination.as_ref()?.present()
    }

    fn build_request(&self, request: &BasicRequest) -> TrackingResult<CarrierRequest> {
        let mut url =
            Url::parse(LASERSHIP_BASE_URL).map_err(|e| TrackingError::invalid_request(NAME, e))?;
        url.path_segments_mut()
            .map_err(|()| TrackingError::invalid_request(NAME, "base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(["track", request.tracking_number.as_str(), "json"]);
        Ok(CarrierRequest::get(
            url.as_str(),
            self.options.timeout_for(request),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIVERED: &str = r#"{
      "OrderNumber": "LA40305346",
      "EstimatedDeliveryDate": null,
      "Destination": {"City": "New York", "State": "NY", "PostalCode": "10001", "Country": "US"},
      "Pieces": [{"TrackingNumber": "1LS7", "Weight": 2.282, "WeightUnit": "LBS"}],
      "Events": [
        {
          "DateTime": "2014-03-04T10:45:34",
          "City": "New York", "State": "NY", "PostalCode": "100012828", "Country": "US",
          "EventType": "Delivered", "EventShortText": "Delivered"
        },
        {
          "DateTime": "2014-03-04T08:12:02",
          "City": "New York", "State": "NY", "PostalCode": "10001", "Country": "US",
          "EventType": "OutForDelivery", "EventShortText": "Out For Delivery"
        },
        {
          "DateTime": "2014-03-03T22:36:12",
          "City": "", "State": "", "PostalCode": "", "Country": "US",
          "EventType": "OrderReceived", "EventShortText": "Ship Request Received"
        }
      ]
    }"#;

    #[tokio::test]
    async fn test_delivered_package() {
        let client = LasershipClient::default();
        let shipment = client.parse(DELIVERED).await.unwrap();

        let ActivitiesAndStatus { activities, status } = client.activities_and_status(&shipment);
        assert_eq!(status, Status::Delivered);
        assert_eq!(activities.len(), 3);
        assert_eq!(
            activities[0].timestamp.to_rfc3339(),
            "2014-03-04T10:45:34+00:00"
        );
        assert_eq!(
            activities[0].location.as_deref(),
            Some("New York, NY 10001-2828")
        );
        assert_eq!(activities[0].details, "Delivered");
        assert_eq!(activities[2].location.as_deref(), Some("US"));
        assert_eq!(activities[2].details, "Ship Request Received");

        assert_eq!(
            client.destination(&shipment).as_deref(),
            Some("New York, NY 10001")
        );
        assert_eq!(client.weight(&shipment).as_deref(), Some("2.282 LBS"));
        assert!(client.eta(&shipment).is_none());
    }

    #[tokio::test]
    async fn test_unmapped_events_skip_to_first_known_type() {
        let response = r#"{
          "EstimatedDeliveryDate": "2015-09-23",
          "Events": [
            {"DateTime": "2015-09-20T14:42:14", "City": "Groveport", "State": "OH", "PostalCode": "43125", "Country": "US", "EventType": "OriginScan", "EventShortText": "Origin Scan"},
            {"DateTime": "2015-09-20T00:07:51", "EventType": "Received", "EventShortText": "Received"}
          ]
        }"#;
        let client = LasershipClient::default();
        let shipment = client.parse(response).await.unwrap();
        let result = client.activities_and_status(&shipment);
        assert_eq!(result.status, Status::EnRoute);
        assert_eq!(
            result.activities[0].location.as_deref(),
            Some("Groveport, OH 43125")
        );
        assert_eq!(
            client.eta(&shipment).map(|eta| eta.to_rfc3339()).as_deref(),
            Some("2015-09-23T00:00:00+00:00")
        );
        assert!(client.weight(&shipment).is_none());
    }

    #[tokio::test]
    async fn test_missing_events() {
        let err = LasershipClient::default()
            .parse(r#"{"Destination": {"City": "New York"}}"#)
            .await
            .unwrap_err();
        assert_eq!(err, TrackingError::missing_shipment("lasership", "missing events"));

        let err = LasershipClient::default().parse("<html>").await.unwrap_err();
        assert_eq!(err.code(), trackit_core::ErrorCode::MalformedResponse);
    }

    #[test]
    fn test_build_request_url() {
        let request = BasicRequest::new("LA40305346");
        let built = CarrierClient::build_request(&LasershipClient::default(), &request).unwrap();
        assert_eq!(built.url, "http://www.lasership.com/track/LA40305346/json");
        assert_eq!(built.method.as_str(), "GET");
    }
}
