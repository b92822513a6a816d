// ABOUTME: Carrier enumeration for tracking number classification and adapter lookup
// ABOUTME: Defines every recognised carrier with its stable string identifier and parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shipping carriers recognised by the identification engine and adapters
///
/// New carriers are added as new variants; the string identifiers of
/// existing variants are stable and used in configuration and CLI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    /// Carrier could not be determined
    Unknown,
    /// United Parcel Service
    Ups,
    /// Amazon Logistics
    Amazon,
    /// FedEx (Express, Ground, SmartPost)
    Fedex,
    /// United States Postal Service
    Usps,
    /// UPS Mail Innovations
    Upsmi,
    /// DHL Global Mail
    Dhlgm,
    /// Canada Post
    #[serde(rename = "canadapost")]
    CanadaPost,
    /// `LaserShip` regional courier
    Lasership,
    /// `OnTrac` regional courier
    Ontrac,
    /// Prestige Delivery
    Prestige,
    /// A1 International
    #[serde(rename = "a1intl")]
    A1Intl,
    /// DHL Express (no tracking-number pattern; selected explicitly)
    Dhl,
}

impl Carrier {
    /// Every known carrier, in declaration order
    pub const ALL: [Self; 13] = [
        Self::Unknown,
        Self::Ups,
        Self::Amazon,
        Self::Fedex,
        Self::Usps,
        Self::Upsmi,
        Self::Dhlgm,
        Self::CanadaPost,
        Self::Lasership,
        Self::Ontrac,
        Self::Prestige,
        Self::A1Intl,
        Self::Dhl,
    ];

    /// Stable lowercase identifier (e.g. "ups", "canadapost")
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ups => "ups",
            Self::Amazon => "amazon",
            Self::Fedex => "fedex",
            Self::Usps => "usps",
            Self::Upsmi => "upsmi",
            Self::Dhlgm => "dhlgm",
            Self::CanadaPost => "canadapost",
            Self::Lasership => "lasership",
            Self::Ontrac => "ontrac",
            Self::Prestige => "prestige",
            Self::A1Intl => "a1intl",
            Self::Dhl => "dhl",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Carrier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|carrier| carrier.as_str() == wanted)
            .ok_or_else(|| format!("unknown carrier: {s}"))
    }
}
