// ABOUTME: Fixed status taxonomy every carrier status is mapped onto
// ABOUTME: Six closed tags with stable numeric codes; not a progress scale
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::fmt;

/// Carrier-agnostic shipment status
///
/// The numeric codes are stable identifiers only. They carry no ordering
/// semantics, so `Status` deliberately does not implement `PartialOrd`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Status {
    /// No status could be determined
    #[default]
    Unknown = 0,
    /// Label created, not yet handed to the carrier
    Shipping = 1,
    /// In the carrier network
    EnRoute = 2,
    /// On the delivery vehicle
    OutForDelivery = 3,
    /// Delivered to the recipient
    Delivered = 4,
    /// Exception, hold, or failed delivery attempt
    Delayed = 5,
}

impl Status {
    /// Stable numeric code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this is the `Unknown` tag
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Shipping => "SHIPPING",
            Self::EnRoute => "EN_ROUTE",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Delayed => "DELAYED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(Status::Unknown.code(), 0);
        assert_eq!(Status::Shipping.code(), 1);
        assert_eq!(Status::EnRoute.code(), 2);
        assert_eq!(Status::OutForDelivery.code(), 3);
        assert_eq!(Status::Delivered.code(), 4);
        assert_eq!(Status::Delayed.code(), 5);
    }

    #[test]
    fn test_status_serializes_by_name() {
        let json = serde_json::to_string(&Status::OutForDelivery).unwrap_or_default();
        assert_eq!(json, "\"OUT_FOR_DELIVERY\"");
        assert_eq!(Status::EnRoute.to_string(), "EN_ROUTE");
    }
}
