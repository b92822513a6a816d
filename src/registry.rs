// ABOUTME: Carrier registry mapping carriers to configured adapters behind the TrackingClient facade
// ABOUTME: Registers every compiled-in adapter whose credentials are available and resolves candidates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Carrier Registry
//!
//! [`CarrierRegistry::from_config`] builds one adapter per compiled-in
//! carrier. Carriers that authenticate are skipped until their credentials
//! are configured. Adapters are immutable once built and shared as
//! `Arc<dyn TrackingClient>`, so a registry can serve concurrent lookups.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};
use trackit_carriers::{descriptors, CarrierDescriptor, TrackingClient, TrackingRequest};
use trackit_core::{Carrier, CarrierRequest, PresentedResult, TrackingError, TrackingResult};

#[cfg(feature = "carrier-a1")]
use trackit_carriers::A1Client;
#[cfg(feature = "carrier-canada-post")]
use trackit_carriers::CanadaPostClient;
#[cfg(feature = "carrier-dhl")]
use trackit_carriers::DhlClient;
#[cfg(feature = "carrier-fedex")]
use trackit_carriers::FedexClient;
#[cfg(feature = "carrier-lasership")]
use trackit_carriers::LasershipClient;
#[cfg(feature = "carrier-prestige")]
use trackit_carriers::PrestigeClient;
#[cfg(feature = "carrier-ups")]
use trackit_carriers::UpsClient;
#[cfg(feature = "carrier-usps")]
use trackit_carriers::UspsClient;

use crate::config::TrackitConfig;
use crate::identification::guess_carrier;

/// Registered adapters keyed by carrier
#[derive(Default)]
pub struct CarrierRegistry {
    clients: BTreeMap<Carrier, Arc<dyn TrackingClient>>,
}

impl std::fmt::Debug for CarrierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierRegistry")
            .field("carriers", &self.carriers())
            .finish()
    }
}

impl CarrierRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every adapter `config` allows
    #[must_use]
    pub fn from_config(config: &TrackitConfig) -> Self {
        let mut registry = Self::new();

        registry.register_ups(config);
        registry.register_fedex(config);
        registry.register_usps(config);
        registry.register_dhl(config);
        registry.register_canada_post(config);
        registry.register_feeds(config);

        let names: Vec<&str> = registry.clients.values().map(|c| c.name()).collect();
        info!(
            "Carrier registry initialized with {} carrier(s): [{}]",
            names.len(),
            names.join(", ")
        );
        registry
    }

    /// Registry built from the process environment
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the environment holds invalid values or
    /// incomplete carrier credentials.
    pub fn from_env() -> TrackingResult<Self> {
        let config = TrackitConfig::from_env()?;
        Ok(Self::from_config(&config))
    }

    /// Add or replace the adapter for its carrier
    pub fn register(&mut self, client: Arc<dyn TrackingClient>) {
        let carrier = client.carrier();
        if self.clients.insert(carrier, client).is_some() {
            debug!(%carrier, "Replaced registered adapter");
        }
    }

    /// Adapter registered for `carrier`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCarrier` if no adapter is registered.
    pub fn get(&self, carrier: Carrier) -> TrackingResult<Arc<dyn TrackingClient>> {
        self.clients
            .get(&carrier)
            .cloned()
            .ok_or(TrackingError::UnsupportedCarrier(carrier))
    }

    /// Whether an adapter is registered for `carrier`
    #[must_use]
    pub fn is_registered(&self, carrier: Carrier) -> bool {
        self.clients.contains_key(&carrier)
    }

    /// Registered carriers in identifier order
    #[must_use]
    pub fn carriers(&self) -> Vec<Carrier> {
        self.clients.keys().copied().collect()
    }

    /// Number of registered adapters
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no adapter is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Registered adapters for the carriers `tracking_number` may belong to
    ///
    /// Adapters come back in candidate order. Candidates without a
    /// registered adapter are skipped.
    #[must_use]
    pub fn candidates(&self, tracking_number: &str) -> Vec<Arc<dyn TrackingClient>> {
        let guessed = guess_carrier(tracking_number);
        let clients: Vec<_> = guessed
            .iter()
            .filter_map(|carrier| self.clients.get(carrier).cloned())
            .collect();
        debug!(
            candidates = ?guessed,
            registered = clients.len(),
            "Resolved candidate adapters"
        );
        clients
    }

    /// Describe the outbound request `carrier` needs for `request`
    ///
    /// # Errors
    ///
    /// Returns an error if the carrier is not registered or the adapter
    /// cannot build the request.
    pub fn build_request(
        &self,
        carrier: Carrier,
        request: &TrackingRequest,
    ) -> TrackingResult<CarrierRequest> {
        self.get(carrier)?.build_request(request)
    }

    /// Present a raw response through the adapter registered for `carrier`
    ///
    /// # Errors
    ///
    /// Returns an error if the carrier is not registered or the adapter
    /// rejects the response.
    pub async fn present(
        &self,
        carrier: Carrier,
        response: &str,
        request: &TrackingRequest,
    ) -> TrackingResult<PresentedResult<serde_json::Value>> {
        self.get(carrier)?.present(response, request).await
    }

    /// Every compiled-in adapter's descriptor, paired with whether it is registered
    #[must_use]
    pub fn catalog(&self) -> Vec<(Box<dyn CarrierDescriptor>, bool)> {
        descriptors()
            .into_iter()
            .map(|descriptor| {
                let registered = self.is_registered(descriptor.carrier());
                (descriptor, registered)
            })
            .collect()
    }

    #[cfg(feature = "carrier-ups")]
    fn register_ups(&mut self, config: &TrackitConfig) {
        match &config.credentials.ups {
            Some(credentials) => {
                self.register(Arc::new(UpsClient::new(credentials.clone(), config.client)));
            }
            None => skip_unconfigured(Carrier::Ups),
        }
    }

    #[cfg(not(feature = "carrier-ups"))]
    fn register_ups(&mut self, _config: &TrackitConfig) {}

    #[cfg(feature = "carrier-fedex")]
    fn register_fedex(&mut self, config: &TrackitConfig) {
        match &config.credentials.fedex {
            Some(credentials) => {
                self.register(Arc::new(FedexClient::new(
                    credentials.clone(),
                    config.client,
                )));
            }
            None => skip_unconfigured(Carrier::Fedex),
        }
    }

    #[cfg(not(feature = "carrier-fedex"))]
    fn register_fedex(&mut self, _config: &TrackitConfig) {}

    #[cfg(feature = "carrier-usps")]
    fn register_usps(&mut self, config: &TrackitConfig) {
        match &config.credentials.usps {
            Some(credentials) => {
                self.register(Arc::new(UspsClient::new(credentials.clone(), config.client)));
            }
            None => skip_unconfigured(Carrier::Usps),
        }
    }

    #[cfg(not(feature = "carrier-usps"))]
    fn register_usps(&mut self, _config: &TrackitConfig) {}

    #[cfg(feature = "carrier-dhl")]
    fn register_dhl(&mut self, config: &TrackitConfig) {
        match &config.credentials.dhl {
            Some(credentials) => {
                self.register(Arc::new(DhlClient::new(credentials.clone(), config.client)));
            }
            None => skip_unconfigured(Carrier::Dhl),
        }
    }

    #[cfg(not(feature = "carrier-dhl"))]
    fn register_dhl(&mut self, _config: &TrackitConfig) {}

    #[cfg(feature = "carrier-canada-post")]
    fn register_canada_post(&mut self, config: &TrackitConfig) {
        match &config.credentials.canada_post {
            Some(credentials) => {
                self.register(Arc::new(CanadaPostClient::new(
                    credentials.clone(),
                    config.client,
                )));
            }
            None => skip_unconfigured(Carrier::CanadaPost),
        }
    }

    #[cfg(not(feature = "carrier-canada-post"))]
    fn register_canada_post(&mut self, _config: &TrackitConfig) {}

    /// Public feeds need no credentials
    #[allow(unused_variables)]
    fn register_feeds(&mut self, config: &TrackitConfig) {
        #[cfg(feature = "carrier-a1")]
        self.register(Arc::new(A1Client::new(config.client)));
        #[cfg(feature = "carrier-lasership")]
        self.register(Arc::new(LasershipClient::new(config.client)));
        #[cfg(feature = "carrier-prestige")]
        self.register(Arc::new(PrestigeClient::new(config.client)));
    }
}

#[cfg(any(
    feature = "carrier-ups",
    feature = "carrier-fedex",
    feature = "carrier-usps",
    feature = "carrier-dhl",
    feature = "carrier-canada-post"
))]
fn skip_unconfigured(carrier: Carrier) {
    debug!(%carrier, "Skipping adapter: no credentials configured");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_reports_unsupported() {
        let registry = CarrierRegistry::new();
        assert!(registry.is_empty());
        let err = registry.get(Carrier::Ups).err();
        assert_eq!(err, Some(TrackingError::UnsupportedCarrier(Carrier::Ups)));
    }

    #[cfg(all(feature = "carrier-lasership", feature = "carrier-ups"))]
    #[test]
    fn test_feeds_register_without_credentials() {
        let registry = CarrierRegistry::from_config(&TrackitConfig::default());
        assert!(registry.is_registered(Carrier::Lasership));
        assert!(!registry.is_registered(Carrier::Ups));

        let catalog = registry.catalog();
        let ups = catalog
            .iter()
            .find(|(descriptor, _)| descriptor.carrier() == Carrier::Ups)
            .unwrap();
        assert!(ups.0.requires_credentials());
        assert!(!ups.1);
    }
}
