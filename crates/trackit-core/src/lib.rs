// ABOUTME: Core types and formatters for the trackit package tracking toolkit
// ABOUTME: Foundation crate with error handling, carrier/status models, and location formatting
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Trackit Core
//!
//! Foundation crate providing the shared vocabulary of the trackit workspace.
//! Carrier adapters and the identification engine both build on it, so it is
//! kept free of parsing and transport dependencies.
//!
//! ## Modules
//!
//! - **errors**: `TrackingError`, `ErrorCode` and the `TrackingResult` alias
//! - **models**: `Carrier`, `Status`, `Activity`, `PresentedResult` and friends
//! - **formatters**: location presentation and free-text status inference
//! - **constants**: defaults shared by configuration and adapters

/// Unified error handling for classification, parsing and request building
pub mod errors;

/// Carrier-agnostic tracking data models
pub mod models;

/// Location and status presentation helpers
pub mod formatters;

/// Shared defaults and limits
pub mod constants;

pub use errors::{ErrorCode, TrackingError, TrackingResult};
pub use models::{
    ActivitiesAndStatus, Activity, Carrier, CarrierRequest, Location, PresentedResult,
    RequestAuth, Status,
};
