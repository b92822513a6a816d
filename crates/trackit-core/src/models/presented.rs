// ABOUTME: Unified tracking result returned by every carrier adapter
// ABOUTME: Optional shipment attributes are omitted from JSON output when absent
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Activity, Status};

/// Carrier-agnostic view of a shipment
///
/// `R` is the adapter's request-options type, echoed back unchanged in
/// `request`. `raw` holds the carrier's response text only when raw
/// passthrough was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedResult<R> {
    /// Estimated delivery, end-of-day adjusted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<DateTime<Utc>>,
    /// Service level description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Package weight with unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Presented destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Tracking events
    pub activities: Vec<Activity>,
    /// Current status
    pub status: Status,
    /// Carrier response text, present only with raw passthrough
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Request options supplied by the caller
    pub request: R,
}

impl<R> PresentedResult<R> {
    /// Replace the echoed request, keeping every other field
    #[must_use]
    pub fn map_request<T>(self, f: impl FnOnce(R) -> T) -> PresentedResult<T> {
        PresentedResult {
            eta: self.eta,
            service: self.service,
            weight: self.weight,
            destination: self.destination,
            activities: self.activities,
            status: self.status,
            raw: self.raw,
            request: f(self.request),
        }
    }
}
