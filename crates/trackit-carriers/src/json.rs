// ABOUTME: JSON helpers shared by carriers with JSON APIs
// ABOUTME: Response deserialization and the per-piece weight record both JSON carriers report
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::de::DeserializeOwned;
use serde::Deserialize;
use trackit_core::{TrackingError, TrackingResult};

/// Deserialize a carrier JSON response
pub(crate) fn from_json<T: DeserializeOwned>(carrier: &'static str, response: &str) -> TrackingResult<T> {
    serde_json::from_str(response).map_err(|e| TrackingError::malformed(carrier, e))
}

/// One physical piece of a shipment
///
/// The weight is kept as a JSON number so it renders exactly as reported.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Piece {
    weight: Option<serde_json::Number>,
    weight_unit: Option<String>,
}

impl Piece {
    /// `"<weight> <unit>"`, or the bare weight when no unit is reported
    pub(crate) fn presented_weight(&self) -> Option<String> {
        let weight = self.weight.as_ref()?;
        Some(
            self.weight_unit
                .as_deref()
                .filter(|unit| !unit.is_empty())
                .map_or_else(|| weight.to_string(), |unit| format!("{weight} {unit}")),
        )
    }
}
