// ABOUTME: Carrier adapter contract consumed by the normalization pipeline
// ABOUTME: Typed CarrierClient trait, request options, and the object-safe TrackingClient facade
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Carrier Adapter Contract
//!
//! Every carrier adapter implements [`CarrierClient`]. The pipeline only ever
//! talks to an adapter through this trait, so the carrier's shipment shape
//! stays private to the adapter module.
//!
//! ## Request Side
//!
//! Each adapter declares its own request-options type (tracking number plus
//! whatever the carrier needs, such as a customer reference or a test-host
//! switch). All of them can be built from the carrier-neutral
//! [`TrackingRequest`], which is what registries and the CLI deal in.
//!
//! ## Response Side
//!
//! `parse` turns raw response text into the adapter's shipment, failing
//! clearly when the carrier reports an error. The `activities_and_status`,
//! `eta`, `service`, `weight` and `destination` extractors then read from
//! that shipment.
//!
//! ## Type Erasure
//!
//! [`TrackingClient`] is the object-safe view of an adapter. It is
//! implemented for every `CarrierClient`, so registries can store
//! heterogeneous adapters as `Arc<dyn TrackingClient>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trackit_core::constants::transport::DEFAULT_TIMEOUT_MS;
use trackit_core::{
    ActivitiesAndStatus, Carrier, CarrierRequest, PresentedResult, TrackingError, TrackingResult,
};

use crate::pipeline;

/// Client-level defaults applied to every lookup made through an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Include the raw carrier response in presented results
    pub raw: bool,
    /// Default request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            raw: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientOptions {
    /// Timeout for a request, preferring the request's own override
    #[must_use]
    pub fn timeout_for<R: RequestOptions>(&self, request: &R) -> u64 {
        request.timeout_ms().unwrap_or(self.timeout_ms)
    }
}

/// Carrier-neutral lookup request
///
/// Carrier-specific fields are ignored by adapters that have no use for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRequest {
    /// Tracking number as supplied by the caller
    pub tracking_number: String,
    /// Customer reference echoed by carriers that support one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Client IP forwarded to carriers that require one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    /// Route the request to the carrier's test endpoint
    #[serde(default)]
    pub test: bool,
    /// Include the raw carrier response in the presented result
    #[serde(default)]
    pub raw: bool,
    /// Request timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl TrackingRequest {
    /// Request for `tracking_number` with no overrides
    #[must_use]
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            ..Self::default()
        }
    }

    /// Set the customer reference
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the client IP
    #[must_use]
    pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    /// Use the carrier's test endpoint
    #[must_use]
    pub const fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// Request raw passthrough
    #[must_use]
    pub const fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Options every adapter request type exposes to the pipeline
pub trait RequestOptions: Clone + Serialize + From<TrackingRequest> + Send + Sync {
    /// Tracking number being looked up
    fn tracking_number(&self) -> &str;

    /// Whether the caller asked for raw passthrough
    fn raw(&self) -> bool;

    /// Per-request timeout override
    fn timeout_ms(&self) -> Option<u64>;
}

impl RequestOptions for TrackingRequest {
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

/// Request options for carriers that only need the tracking number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicRequest {
    /// Tracking number being looked up
    pub tracking_number: String,
    /// Include the raw carrier response in the presented result
    #[serde(default)]
    pub raw: bool,
    /// Request timeout override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl BasicRequest {
    /// Request for `tracking_number` with no overrides
    #[must_use]
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            ..Self::default()
        }
    }
}

impl From<TrackingRequest> for BasicRequest {
    fn from(request: TrackingRequest) -> Self {
        Self {
            tracking_number: request.tracking_number,
            raw: request.raw,
            timeout_ms: request.timeout_ms,
        }
    }
}

impl RequestOptions for BasicRequest {
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

/// Carrier adapter contract
///
/// Implementations must not share mutable parser state between calls:
/// each `parse` builds its own deserializer, so one adapter instance can
/// serve any number of concurrent lookups.
#[async_trait]
pub trait CarrierClient: Send + Sync {
    /// Carrier-specific parsed response
    type Shipment: Send + Sync;

    /// Carrier-specific request options, echoed back in presented results
    type Request: RequestOptions;

    /// Adapter identifier (e.g. "ups")
    fn name(&self) -> &'static str;

    /// Carrier served by this adapter
    fn carrier(&self) -> Carrier;

    /// Client-level defaults
    fn options(&self) -> &ClientOptions;

    /// Parse a raw carrier response into a shipment
    ///
    /// # Errors
    ///
    /// Returns an error if the response is malformed, if the carrier reports
    /// a failure, or if the response holds no shipment.
    async fn parse(&self, response: &str) -> TrackingResult<Self::Shipment>;

    /// Activities (newest first) and current status
    fn activities_and_status(&self, shipment: &Self::Shipment) -> ActivitiesAndStatus;

    /// Estimated delivery as reported by the carrier
    fn eta(&self, shipment: &Self::Shipment) -> Option<DateTime<Utc>>;

    /// Service level description
    fn service(&self, shipment: &Self::Shipment) -> Option<String>;

    /// Package weight with unit
    fn weight(&self, shipment: &Self::Shipment) -> Option<String>;

    /// Presented destination
    fn destination(&self, shipment: &Self::Shipment) -> Option<String>;

    /// Describe the outbound request for `request`
    ///
    /// # Errors
    ///
    /// Returns an error if the request document or URL cannot be built.
    fn build_request(&self, request: &Self::Request) -> TrackingResult<CarrierRequest>;
}

/// Object-safe view of a carrier adapter
///
/// Requests go in as [`TrackingRequest`] and the echoed request comes back
/// as JSON, so adapters with different request types can share a registry.
#[async_trait]
pub trait TrackingClient: Send + Sync {
    /// Adapter identifier
    fn name(&self) -> &'static str;

    /// Carrier served by this adapter
    fn carrier(&self) -> Carrier;

    /// Describe the outbound request
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot build the request.
    fn build_request(&self, request: &TrackingRequest) -> TrackingResult<CarrierRequest>;

    /// Run the normalization pipeline over a raw response
    ///
    /// # Errors
    ///
    /// Returns the adapter's parse error, or an error if the echoed request
    /// cannot be serialized.
    async fn present(
        &self,
        response: &str,
        request: &TrackingRequest,
    ) -> TrackingResult<PresentedResult<serde_json::Value>>;
}

#[async_trait]
impl<C> TrackingClient for C
where
    C: CarrierClient,
{
    fn name(&self) -> &'static str {
        CarrierClient::name(self)
    }

    fn carrier(&self) -> Carrier {
        CarrierClient::carrier(self)
    }

    fn build_request(&self, request: &TrackingRequest) -> TrackingResult<CarrierRequest> {
        CarrierClient::build_request(self, &C::Request::from(request.clone()))
    }

    async fn present(
        &self,
        response: &str,
        request: &TrackingRequest,
    ) -> TrackingResult<PresentedResult<serde_json::Value>> {
        let typed = C::Request::from(request.clone());
        let presented = pipeline::present(self, response, typed).await?;
        let echoed = serde_json::to_value(&presented.request)
            .map_err(|e| TrackingError::invalid_request(CarrierClient::name(self), e))?;
        Ok(presented.map_request(|_| echoed))
    }
}
