// ABOUTME: Environment-driven configuration for trackit clients and carrier credentials
// ABOUTME: Read once at startup into an immutable TrackitConfig shared by every lookup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Configuration
//!
//! trackit is configured from environment variables only:
//!
//! - `TRACKIT_RAW` - include raw carrier responses in presented results
//! - `TRACKIT_TIMEOUT_MS` - default carrier request timeout
//! - `TRACKIT_<CARRIER>_*` - carrier credentials, see [`credentials`]
//!
//! The resulting [`TrackitConfig`] is never mutated after loading.

/// Carrier credential loading
pub mod credentials;

use std::env;

use thiserror::Error;
use tracing::debug;
use trackit_carriers::ClientOptions;
use trackit_core::constants::transport::DEFAULT_TIMEOUT_MS;
use trackit_core::TrackingError;

pub use credentials::CarrierCredentials;

/// Raw passthrough switch
pub const RAW_VAR: &str = "TRACKIT_RAW";
/// Default timeout in milliseconds
pub const TIMEOUT_VAR: &str = "TRACKIT_TIMEOUT_MS";

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be parsed
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },

    /// Some but not all credential variables for a carrier are set
    #[error("Incomplete credentials for {carrier}: missing {}", .missing.join(", "))]
    IncompleteCredentials {
        /// Carrier identifier
        carrier: &'static str,
        /// Variables that are unset or empty
        missing: Vec<String>,
    },
}

impl From<ConfigError> for TrackingError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Process-wide trackit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackitConfig {
    /// Defaults applied to every adapter
    pub client: ClientOptions,
    /// Credentials for carriers that need them
    pub credentials: CarrierCredentials,
}

impl TrackitConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparsable value or a
    /// carrier's credentials are only partially set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var(RAW_VAR)
            .ok()
            .map(|value| parse_bool(RAW_VAR, &value))
            .transpose()?
            .unwrap_or(false);

        let timeout_ms = env::var(TIMEOUT_VAR)
            .ok()
            .map(|value| parse_timeout(&value))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let credentials = CarrierCredentials::from_env()?;
        debug!(
            raw,
            timeout_ms,
            configured = ?credentials.configured(),
            "Loaded trackit configuration"
        );

        Ok(Self {
            client: ClientOptions { raw, timeout_ms },
            credentials,
        })
    }
}

/// Parse a boolean flag the way shell users write them
///
/// # Errors
///
/// Returns an error for anything other than true/false, 1/0, yes/no, on/off.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
            reason: "expected a boolean",
        }),
    }
}

fn parse_timeout(value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(timeout) if timeout > 0 => Ok(timeout),
        _ => Err(ConfigError::InvalidValue {
            key: TIMEOUT_VAR.to_owned(),
            value: value.to_owned(),
            reason: "expected a positive number of milliseconds",
        }),
    }
}
