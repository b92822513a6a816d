// ABOUTME: Carrier adapters for UPS, FedEx, USPS, DHL Express, Canada Post, A1 International, LaserShip, Prestige
// ABOUTME: Adapter contract, normalization pipeline, carrier descriptors, and shared wire helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! Carrier adapters and the normalization pipeline.
//!
//! Every adapter turns one carrier's raw tracking response into the unified
//! [`PresentedResult`](trackit_core::PresentedResult) through
//! [`pipeline::present`], and describes the outbound request for a lookup
//! without performing any network I/O.

// Core adapter infrastructure
/// Adapter contract and request options
pub mod core;
/// Normalization pipeline
pub mod pipeline;
/// Carrier descriptors
pub mod spi;

#[cfg(any(
    feature = "carrier-ups",
    feature = "carrier-fedex",
    feature = "carrier-usps",
    feature = "carrier-dhl",
    feature = "carrier-canada-post",
    feature = "carrier-a1",
    feature = "carrier-lasership",
    feature = "carrier-prestige"
))]
mod timestamps;

#[cfg(any(
    feature = "carrier-ups",
    feature = "carrier-fedex",
    feature = "carrier-usps",
    feature = "carrier-dhl",
    feature = "carrier-canada-post",
    feature = "carrier-a1"
))]
mod xml;

#[cfg(any(feature = "carrier-lasership", feature = "carrier-prestige"))]
mod json;

// Carrier implementations (conditionally compiled)

/// A1 International adapter
#[cfg(feature = "carrier-a1")]
pub mod a1;
/// Canada Post tracking adapter
#[cfg(feature = "carrier-canada-post")]
pub mod canada_post;
/// DHL Express XML-PI adapter
#[cfg(feature = "carrier-dhl")]
pub mod dhl;
/// FedEx Track Service adapter
#[cfg(feature = "carrier-fedex")]
pub mod fedex;
/// LaserShip JSON adapter
#[cfg(feature = "carrier-lasership")]
pub mod lasership;
/// Prestige Delivery JSON adapter
#[cfg(feature = "carrier-prestige")]
pub mod prestige;
/// UPS Track API adapter
#[cfg(feature = "carrier-ups")]
pub mod ups;
/// USPS TrackV2 adapter
#[cfg(feature = "carrier-usps")]
pub mod usps;

// Re-export key types for convenience

pub use self::core::{
    BasicRequest, CarrierClient, ClientOptions, RequestOptions, TrackingClient, TrackingRequest,
};
pub use pipeline::{present, round_eta_to_end_of_day};
pub use spi::{descriptors, CarrierCapabilities, CarrierDescriptor};

#[cfg(feature = "carrier-a1")]
pub use a1::A1Client;
#[cfg(feature = "carrier-canada-post")]
pub use canada_post::{CanadaPostClient, CanadaPostCredentials};
#[cfg(feature = "carrier-dhl")]
pub use dhl::{DhlClient, DhlCredentials};
#[cfg(feature = "carrier-fedex")]
pub use fedex::{FedexClient, FedexCredentials, FedexRequest};
#[cfg(feature = "carrier-lasership")]
pub use lasership::LasershipClient;
#[cfg(feature = "carrier-prestige")]
pub use prestige::PrestigeClient;
#[cfg(feature = "carrier-ups")]
pub use ups::{UpsClient, UpsCredentials, UpsRequest};
#[cfg(feature = "carrier-usps")]
pub use usps::{UspsClient, UspsCredentials, UspsRequest};
