// ABOUTME: Carrier credential loading from TRACKIT_<CARRIER>_* environment variables
// ABOUTME: A carrier is configured only when every one of its variables is set
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Credentials for carriers whose adapters authenticate.
//!
//! | Carrier | Variables |
//! |---|---|
//! | UPS | `TRACKIT_UPS_LICENSE_NUMBER`, `TRACKIT_UPS_USER_ID`, `TRACKIT_UPS_PASSWORD` |
//! | FedEx | `TRACKIT_FEDEX_KEY`, `TRACKIT_FEDEX_PASSWORD`, `TRACKIT_FEDEX_ACCOUNT`, `TRACKIT_FEDEX_METER` |
//! | USPS | `TRACKIT_USPS_USER_ID` |
//! | DHL | `TRACKIT_DHL_USER_ID`, `TRACKIT_DHL_PASSWORD` |
//! | Canada Post | `TRACKIT_CANADAPOST_USERNAME`, `TRACKIT_CANADAPOST_PASSWORD` |
//!
//! No variables set leaves the carrier unconfigured. A partial set is an error.

use std::env;

use trackit_core::Carrier;

#[cfg(feature = "carrier-canada-post")]
use trackit_carriers::CanadaPostCredentials;
#[cfg(feature = "carrier-dhl")]
use trackit_carriers::DhlCredentials;
#[cfg(feature = "carrier-fedex")]
use trackit_carriers::FedexCredentials;
#[cfg(feature = "carrier-ups")]
use trackit_carriers::UpsCredentials;
#[cfg(feature = "carrier-usps")]
use trackit_carriers::UspsCredentials;

use super::ConfigError;

/// Credentials for every compiled-in carrier that needs them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierCredentials {
    /// UPS access key and account
    #[cfg(feature = "carrier-ups")]
    pub ups: Option<UpsCredentials>,
    /// FedEx web service credentials
    #[cfg(feature = "carrier-fedex")]
    pub fedex: Option<FedexCredentials>,
    /// USPS Web Tools user id
    #[cfg(feature = "carrier-usps")]
    pub usps: Option<UspsCredentials>,
    /// DHL XML-PI site credentials
    #[cfg(feature = "carrier-dhl")]
    pub dhl: Option<DhlCredentials>,
    /// Canada Post API key
    #[cfg(feature = "carrier-canada-post")]
    pub canada_post: Option<CanadaPostCredentials>,
}

impl CarrierCredentials {
    /// Load credentials for every compiled-in carrier
    ///
    /// # Errors
    ///
    /// Returns an error if a carrier's variables are only partially set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            #[cfg(feature = "carrier-ups")]
            ups: load_carrier_env("ups", &["LICENSE_NUMBER", "USER_ID", "PASSWORD"])?.map(
                |[license_number, user_id, password]| UpsCredentials {
                    license_number,
                    user_id,
                    password,
                },
            ),
            #[cfg(feature = "carrier-fedex")]
            fedex: load_carrier_env("fedex", &["KEY", "PASSWORD", "ACCOUNT", "METER"])?.map(
                |[key, password, account, meter]| FedexCredentials {
                    key,
                    password,
                    account,
                    meter,
                },
            ),
            #[cfg(feature = "carrier-usps")]
            usps: load_carrier_env("usps", &["USER_ID"])?
                .map(|[user_id]| UspsCredentials { user_id }),
            #[cfg(feature = "carrier-dhl")]
            dhl: load_carrier_env("dhl", &["USER_ID", "PASSWORD"])?
                .map(|[user_id, password]| DhlCredentials { user_id, password }),
            #[cfg(feature = "carrier-canada-post")]
            canada_post: load_carrier_env("canadapost", &["USERNAME", "PASSWORD"])?
                .map(|[username, password]| CanadaPostCredentials { username, password }),
        })
    }

    /// Carriers with credentials present
    #[must_use]
    pub fn configured(&self) -> Vec<Carrier> {
        let mut carriers = Vec::new();
        #[cfg(feature = "carrier-ups")]
        if self.ups.is_some() {
            carriers.push(Carrier::Ups);
        }
        #[cfg(feature = "carrier-fedex")]
        if self.fedex.is_some() {
            carriers.push(Carrier::Fedex);
        }
        #[cfg(feature = "carrier-usps")]
        if self.usps.is_some() {
            carriers.push(Carrier::Usps);
        }
        #[cfg(feature = "carrier-dhl")]
        if self.dhl.is_some() {
            carriers.push(Carrier::Dhl);
        }
        #[cfg(feature = "carrier-canada-post")]
        if self.canada_post.is_some() {
            carriers.push(Carrier::CanadaPost);
        }
        carriers
    }
}

/// Environment variable holding `field` for `carrier`
#[must_use]
pub fn credential_var(carrier: &str, field: &str) -> String {
    format!("TRACKIT_{}_{field}", carrier.to_uppercase())
}

/// Read `TRACKIT_<CARRIER>_<FIELD>` for every field
///
/// Returns `None` when none are set, the values in field order when all are
/// set, and an error naming the missing variables otherwise. Empty values
/// count as unset.
fn load_carrier_env<const N: usize>(
    carrier: &'static str,
    fields: &[&str; N],
) -> Result<Option<[String; N]>, ConfigError> {
    let values = fields.map(|field| {
        env::var(credential_var(carrier, field))
            .ok()
            .filter(|value| !value.trim().is_empty())
    });

    let missing: Vec<String> = fields
        .iter()
        .zip(&values)
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| credential_var(carrier, field))
        .collect();

    if missing.len() == N {
        return Ok(None);
    }
    if !missing.is_empty() {
        return Err(ConfigError::IncompleteCredentials { carrier, missing });
    }
    Ok(Some(values.map(Option::unwrap_or_default)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_var_naming() {
        assert_eq!(credential_var("ups", "USER_ID"), "TRACKIT_UPS_USER_ID");
        assert_eq!(credential_var("fedex", "METER"), "TRACKIT_FEDEX_METER");
        assert_eq!(
            credential_var("canadapost", "USERNAME"),
            "TRACKIT_CANADAPOST_USERNAME"
        );
    }
}
