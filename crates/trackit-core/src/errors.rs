// ABOUTME: Unified error types for carrier classification, response parsing and request building
// ABOUTME: Maps every failure onto a stable error code so callers can branch without string matching
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Tracking Error Types
//!
//! All failures that cross the core/adapter boundary are returned as
//! `TrackingError` values. Nothing in the pipeline retries or assembles
//! partial results: a parse failure is terminal for that lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::Carrier;

/// Standard error codes for tracking failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Response could not be parsed as the carrier's wire format
    MalformedResponse,
    /// Carrier reported an error (unknown tracking number, invalid request)
    CarrierReported,
    /// Response parsed but required shipment data is absent
    MissingShipment,
    /// Outbound request could not be built from the supplied options
    InvalidRequest,
    /// No adapter is registered for the requested carrier
    UnsupportedCarrier,
    /// Configuration is missing or invalid
    ConfigInvalid,
}

impl ErrorCode {
    /// Get a user-friendly description of this error code
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::MalformedResponse => "The carrier response could not be parsed",
            Self::CarrierReported => "The carrier reported an error for this lookup",
            Self::MissingShipment => "The carrier response contains no shipment data",
            Self::InvalidRequest => "The tracking request could not be built",
            Self::UnsupportedCarrier => "No adapter is available for this carrier",
            Self::ConfigInvalid => "Configuration is missing or invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedResponse => "MALFORMED_RESPONSE",
            Self::CarrierReported => "CARRIER_REPORTED",
            Self::MissingShipment => "MISSING_SHIPMENT",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnsupportedCarrier => "UNSUPPORTED_CARRIER",
            Self::ConfigInvalid => "CONFIG_INVALID",
        };
        f.write_str(name)
    }
}

/// Errors produced while classifying, parsing, or presenting a shipment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// Raw response is not valid XML/JSON for the carrier
    #[error("{carrier}: malformed response: {details}")]
    Malformed {
        /// Adapter that rejected the response
        carrier: &'static str,
        /// Parser diagnostic
        details: String,
    },

    /// The carrier itself reported a failure
    #[error("{carrier}: {message}")]
    CarrierReported {
        /// Adapter that received the failure
        carrier: &'static str,
        /// Message supplied by the carrier
        message: String,
    },

    /// Response parsed but holds no usable shipment
    #[error("{carrier}: {details}")]
    MissingShipment {
        /// Adapter that parsed the response
        carrier: &'static str,
        /// What was missing
        details: String,
    },

    /// Request options cannot be turned into a carrier request
    #[error("{carrier}: invalid request: {reason}")]
    InvalidRequest {
        /// Adapter asked to build the request
        carrier: &'static str,
        /// Why the request is invalid
        reason: String,
    },

    /// No adapter registered for this carrier
    #[error("no adapter registered for carrier {0}")]
    UnsupportedCarrier(Carrier),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TrackingError {
    /// Create a "malformed response" error
    #[must_use]
    pub fn malformed(carrier: &'static str, details: impl fmt::Display) -> Self {
        Self::Malformed {
            carrier,
            details: details.to_string(),
        }
    }

    /// Create a "carrier reported" error
    #[must_use]
    pub fn carrier_reported(carrier: &'static str, message: impl Into<String>) -> Self {
        Self::CarrierReported {
            carrier,
            message: message.into(),
        }
    }

    /// Create a "missing shipment" error
    #[must_use]
    pub fn missing_shipment(carrier: &'static str, details: impl Into<String>) -> Self {
        Self::MissingShipment {
            carrier,
            details: details.into(),
        }
    }

    /// Create an "invalid request" error
    #[must_use]
    pub fn invalid_request(carrier: &'static str, reason: impl fmt::Display) -> Self {
        Self::InvalidRequest {
            carrier,
            reason: reason.to_string(),
        }
    }

    /// Get the stable error code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed { .. } => ErrorCode::MalformedResponse,
            Self::CarrierReported { .. } => ErrorCode::CarrierReported,
            Self::MissingShipment { .. } => ErrorCode::MissingShipment,
            Self::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Self::UnsupportedCarrier(_) => ErrorCode::UnsupportedCarrier,
            Self::Configuration(_) => ErrorCode::ConfigInvalid,
        }
    }
}

/// Result type alias for tracking operations
pub type TrackingResult<T> = Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TrackingError::malformed("ups", "bad xml").code(),
            ErrorCode::MalformedResponse
        );
        assert_eq!(
            TrackingError::carrier_reported("ups", "No data").code(),
            ErrorCode::CarrierReported
        );
        assert_eq!(
            TrackingError::UnsupportedCarrier(Carrier::Ontrac).code(),
            ErrorCode::UnsupportedCarrier
        );
    }

    #[test]
    fn test_carrier_message_is_preserved() {
        let err = TrackingError::carrier_reported("ups", "No data");
        assert_eq!(err.to_string(), "ups: No data");
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::MissingShipment).unwrap_or_default();
        assert_eq!(json, "\"MISSING_SHIPMENT\"");
        assert_eq!(ErrorCode::MissingShipment.to_string(), "MISSING_SHIPMENT");
    }
}
