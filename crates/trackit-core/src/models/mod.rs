// ABOUTME: Carrier-agnostic data models for tracking lookups
// ABOUTME: Re-exports Carrier, Status, Activity, Location, PresentedResult and the outbound request shape
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Data Models
//!
//! These models are the unified representation every carrier adapter maps
//! onto. Carrier-specific shipment shapes never leave their adapter; only
//! the types in this module cross the adapter boundary.
//!
//! ## Core Models
//!
//! - `Carrier`: closed set of recognised carriers
//! - `Status`: fixed six-value status taxonomy
//! - `Activity`: one tracking event (timestamp and details are mandatory)
//! - `Location`: structured address input for the location formatter
//! - `PresentedResult`: the unified lookup result
//! - `CarrierRequest`: description of an outbound carrier request

mod activity;
mod carrier;
mod location;
mod presented;
mod request;
mod status;

pub use activity::{ActivitiesAndStatus, Activity};
pub use carrier::Carrier;
pub use location::Location;
pub use presented::PresentedResult;
pub use request::{CarrierRequest, RequestAuth};
pub use status::Status;
