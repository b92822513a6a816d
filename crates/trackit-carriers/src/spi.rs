// ABOUTME: Carrier descriptors describing each compiled-in adapter's identity and needs
// ABOUTME: Bitflag capabilities (credentials, wire format, test host) used by the registry and CLI
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Carrier Descriptors
//!
//! A [`CarrierDescriptor`] tells the registry what an adapter is called, which
//! [`Carrier`] it serves, how it talks to the carrier, and whether it needs
//! credentials before it can be constructed. Descriptors exist only for
//! adapters enabled through their `carrier-*` feature.

use std::fmt;

use trackit_core::Carrier;

bitflags::bitflags! {
    /// Carrier adapter capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct CarrierCapabilities: u8 {
        /// Adapter needs account credentials
        const CREDENTIALS = 0b0000_0001;
        /// Carrier responds with XML
        const XML_RESPONSE = 0b0000_0010;
        /// Carrier responds with JSON
        const JSON_RESPONSE = 0b0000_0100;
        /// Requests can be routed to a test host
        const TEST_ENDPOINT = 0b0000_1000;
        /// Requests carry a caller-supplied reference
        const REFERENCE = 0b0001_0000;
    }
}

impl CarrierCapabilities {
    /// Authenticated XML web service
    #[must_use]
    pub const fn xml_service() -> Self {
        Self::CREDENTIALS.union(Self::XML_RESPONSE)
    }

    /// Unauthenticated XML feed
    #[must_use]
    pub const fn xml_feed() -> Self {
        Self::XML_RESPONSE
    }

    /// Unauthenticated JSON feed
    #[must_use]
    pub const fn json_feed() -> Self {
        Self::JSON_RESPONSE
    }

    /// Check if credentials are required
    #[must_use]
    pub const fn requires_credentials(&self) -> bool {
        self.contains(Self::CREDENTIALS)
    }

    /// Check if the carrier responds with XML
    #[must_use]
    pub const fn is_xml(&self) -> bool {
        self.contains(Self::XML_RESPONSE)
    }

    /// Check if a test host is available
    #[must_use]
    pub const fn supports_test_endpoint(&self) -> bool {
        self.contains(Self::TEST_ENDPOINT)
    }

    /// Human-readable list of set flags
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.requires_credentials() {
            labels.push("credentials");
        }
        if self.is_xml() {
            labels.push("xml");
        }
        if self.contains(Self::JSON_RESPONSE) {
            labels.push("json");
        }
        if self.supports_test_endpoint() {
            labels.push("test-endpoint");
        }
        if self.contains(Self::REFERENCE) {
            labels.push("reference");
        }
        labels
    }
}

/// Describes a carrier adapter's identity and requirements
pub trait CarrierDescriptor: Send + Sync {
    /// Adapter identifier, matching `CarrierClient::name`
    fn name(&self) -> &'static str;

    /// Human-readable carrier name
    fn display_name(&self) -> &'static str;

    /// Carrier served by the adapter
    fn carrier(&self) -> Carrier;

    /// Adapter capabilities
    fn capabilities(&self) -> CarrierCapabilities;

    /// Production endpoint the adapter builds requests against
    fn api_base_url(&self) -> &'static str;

    /// Whether the adapter needs credentials
    fn requires_credentials(&self) -> bool {
        self.capabilities().requires_credentials()
    }
}

impl fmt::Debug for dyn CarrierDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarrierDescriptor")
            .field("name", &self.name())
            .field("carrier", &self.carrier())
            .field("capabilities", &self.capabilities())
            .finish_non_exhaustive()
    }
}

/// Descriptors for every adapter compiled into this build
#[must_use]
pub fn descriptors() -> Vec<Box<dyn CarrierDescriptor>> {
    let mut all: Vec<Box<dyn CarrierDescriptor>> = Vec::new();
    #[cfg(feature = "carrier-ups")]
    all.push(Box::new(UpsDescriptor));
    #[cfg(feature = "carrier-fedex")]
    all.push(Box::new(FedexDescriptor));
    #[cfg(feature = "carrier-usps")]
    all.push(Box::new(UspsDescriptor));
    #[cfg(feature = "carrier-dhl")]
    all.push(Box::new(DhlDescriptor));
    #[cfg(feature = "carrier-canada-post")]
    all.push(Box::new(CanadaPostDescriptor));
    #[cfg(feature = "carrier-a1")]
    all.push(Box::new(A1Descriptor));
    #[cfg(feature = "carrier-lasership")]
    all.push(Box::new(LasershipDescriptor));
    #[cfg(feature = "carrier-prestige")]
    all.push(Box::new(PrestigeDescriptor));
    all
}

// ============================================================================
// Built-in Carrier Descriptors (conditionally compiled)
// ============================================================================

/// UPS descriptor
#[cfg(feature = "carrier-ups")]
pub struct UpsDescriptor;

#[cfg(feature = "carrier-ups")]
impl CarrierDescriptor for UpsDescriptor {
    fn name(&self) -> &'static str {
        "ups"
    }

    fn display_name(&self) -> &'static str {
        "UPS"
    }

    fn carrier(&self) -> Carrier {
        Carrier::Ups
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::xml_service()
            .union(CarrierCapabilities::TEST_ENDPOINT)
            .union(CarrierCapabilities::REFERENCE)
    }

    fn api_base_url(&self) -> &'static str {
        crate::ups::UPS_TRACK_URL
    }
}

/// FedEx descriptor
#[cfg(feature = "carrier-fedex")]
pub struct FedexDescriptor;

#[cfg(feature = "carrier-fedex")]
impl CarrierDescriptor for FedexDescriptor {
    fn name(&self) -> &'static str {
        "fedex"
    }

    fn display_name(&self) -> &'static str {
        "FedEx"
    }

    fn carrier(&self) -> Carrier {
        Carrier::Fedex
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::xml_service().union(CarrierCapabilities::REFERENCE)
    }

    fn api_base_url(&self) -> &'static str {
        crate::fedex::FEDEX_TRACK_URL
    }
}

/// USPS descriptor
#[cfg(feature = "carrier-usps")]
pub struct UspsDescriptor;

#[cfg(feature = "carrier-usps")]
impl CarrierDescriptor for UspsDescriptor {
    fn name(&self) -> &'static str {
        "usps"
    }

    fn display_name(&self) -> &'static str {
        "USPS"
    }

    fn carrier(&self) -> Carrier {
        Carrier::Usps
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::xml_service().union(CarrierCapabilities::TEST_ENDPOINT)
    }

    fn api_base_url(&self) -> &'static str {
        crate::usps::USPS_TRACK_URL
    }
}

/// DHL Express descriptor
#[cfg(feature = "carrier-dhl")]
pub struct DhlDescriptor;

#[cfg(feature = "carrier-dhl")]
impl CarrierDescriptor for DhlDescriptor {
    fn name(&self) -> &'static str {
        "dhl"
    }

    fn display_name(&self) -> &'static str {
        "DHL Express"
    }

    fn carrier(&self) -> Carrier {
        Carrier::Dhl
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::xml_service()
    }

    fn api_base_url(&self) -> &'static str {
        crate::dhl::DHL_TRACK_URL
    }
}

/// Canada Post descriptor
#[cfg(feature = "carrier-canada-post")]
pub struct CanadaPostDescriptor;

#[cfg(feature = "carrier-canada-post")]
impl CarrierDescriptor for CanadaPostDescriptor {
    fn name(&self) -> &'static str {
        "canadapost"
    }

    fn display_name(&self) -> &'static str {
        "Canada Post"
    }

    fn carrier(&self) -> Carrier {
        Carrier::CanadaPost
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::xml_service()
    }

    fn api_base_url(&self) -> &'static str {
        crate::canada_post::CANADA_POST_TRACK_URL
    }
}

/// A1 International descriptor
#[cfg(feature = "carrier-a1")]
pub struct A1Descriptor;

#[cfg(feature = "carrier-a1")]
impl CarrierDescriptor for A1Descriptor {
    fn name(&self) -> &'static str {
        "a1intl"
    }

    fn display_name(&self) -> &'static str {
        "A1 International"
    }

    fn carrier(&self) -> Carrier {
        Carrier::A1Intl
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::xml_feed()
    }

    fn api_base_url(&self) -> &'static str {
        crate::a1::A1_TRACK_URL
    }
}

/// LaserShip descriptor
#[cfg(feature = "carrier-lasership")]
pub struct LasershipDescriptor;

#[cfg(feature = "carrier-lasership")]
impl CarrierDescriptor for LasershipDescriptor {
    fn name(&self) -> &'static str {
        "lasership"
    }

    fn display_name(&self) -> &'static str {
        "LaserShip"
    }

    fn carrier(&self) -> Carrier {
        Carrier::Lasership
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::json_feed()
    }

    fn api_base_url(&self) -> &'static str {
        crate::lasership::LASERSHIP_BASE_URL
    }
}

/// Prestige Delivery descriptor
#[cfg(feature = "carrier-prestige")]
pub struct PrestigeDescriptor;

#[cfg(feature = "carrier-prestige")]
impl CarrierDescriptor for PrestigeDescriptor {
    fn name(&self) -> &'static str {
        "prestige"
    }

    fn display_name(&self) -> &'static str {
        "Prestige Delivery"
    }

    fn carrier(&self) -> Carrier {
        Carrier::Prestige
    }

    fn capabilities(&self) -> CarrierCapabilities {
        CarrierCapabilities::json_feed()
    }

    fn api_base_url(&self) -> &'static str {
        crate::prestige::PRESTIGE_TRACK_URL
    }
}
