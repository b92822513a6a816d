// ABOUTME: Main library entry point for trackit, the carrier-agnostic package tracking toolkit
// ABOUTME: Carrier identification, configuration, logging setup, and the carrier registry
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # trackit
//!
//! Identify which carriers a tracking number may belong to, and turn a
//! carrier's raw tracking response into one carrier-agnostic result.
//!
//! ## Architecture
//!
//! - **identification**: ordered pattern table with checksum confirmation
//! - **registry**: configured carrier adapters behind `TrackingClient`
//! - **config**: environment configuration and carrier credentials
//! - **logging**: tracing subscriber setup
//!
//! Data models and formatters live in `trackit_core`; the adapter contract,
//! normalization pipeline and adapters live in `trackit_carriers`. Both are
//! re-exported here.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trackit::config::TrackitConfig;
//! use trackit::registry::CarrierRegistry;
//! use trackit::TrackingRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TrackitConfig::from_env()?;
//!     let registry = CarrierRegistry::from_config(&config);
//!
//!     let request = TrackingRequest::new("LN12345678");
//!     for client in registry.candidates(&request.tracking_number) {
//!         let response = std::fs::read_to_string("response.json")?;
//!         let presented = client.present(&response, &request).await?;
//!         println!("{}: {:?}", client.name(), presented.status);
//!     }
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Carrier identification engine
pub mod identification;

/// Logging setup
pub mod logging;

/// Carrier registry
pub mod registry;

pub use trackit_carriers as carriers;
pub use trackit_core as core;

pub use identification::{guess_carrier, guess_carrier_with};
pub use trackit_carriers::{present, TrackingClient, TrackingRequest};
pub use trackit_core::{
    Activity, Carrier, ErrorCode, PresentedResult, Status, TrackingError, TrackingResult,
};
