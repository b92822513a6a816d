// ABOUTME: Presentation helpers shared by every carrier adapter
// ABOUTME: Location formatting, free-text status inference and word casing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Formatters
//!
//! Pure functions. Outputs are pinned by exact-match tests, so changes here
//! are visible in every adapter's presented result.

mod location;
mod status;
mod text;

pub use location::{present_location, present_location_string, present_postal_code};
pub use status::infer_status;
pub use text::{title_case, upper_case_first};
