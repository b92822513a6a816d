// ABOUTME: Carrier identification engine classifying tracking numbers into candidate carriers
// ABOUTME: Scans the ordered matcher table with checksum confirmation and early termination
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Carrier Identification
//!
//! [`guess_carrier`] normalizes a tracking number (whitespace removed,
//! upper-cased) and runs it through the ordered [`matchers::MATCHERS`]
//! table. Many carriers issue numbers of the same shape, so the result is a
//! list of candidates in first-seen order. An empty list means the number
//! could not be classified.
//!
//! ```
//! use trackit::identification::guess_carrier;
//! use trackit_core::Carrier;
//!
//! assert_eq!(guess_carrier("1Z 12345E 0205271686"), vec![Carrier::Ups]);
//! assert!(guess_carrier("not a tracking number").is_empty());
//! ```

/// Weighted-sum check digits
pub mod checksum;
/// Classification table and confirmation rules
pub mod matchers;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};
use trackit_core::Carrier;

pub use checksum::{check_digit, Modulus};
pub use matchers::{CarrierMatcher, Confirm, Confirmation, MATCHERS};

/// Built-in table, compiled once per process
static DEFAULT_TABLE: LazyLock<Option<MatcherTable>> =
    LazyLock::new(|| match MatcherTable::new(MATCHERS) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Failed to compile carrier classification table: {e}");
            None
        }
    });

/// Strip all whitespace and upper-case
#[must_use]
pub fn normalize_tracking_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Compiled classification table
#[derive(Debug)]
pub struct MatcherTable {
    entries: Vec<(CarrierMatcher, Regex)>,
}

impl MatcherTable {
    /// Compile `matchers`, keeping their order
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid regular expression.
    pub fn new(matchers: &[CarrierMatcher]) -> Result<Self, regex::Error> {
        let entries = matchers
            .iter()
            .map(|matcher| Regex::new(matcher.pattern).map(|regex| (*matcher, regex)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate carriers for `raw`, deduplicated in first-seen order
    #[must_use]
    pub fn guess(&self, raw: &str) -> Vec<Carrier> {
        let trk = normalize_tracking_number(raw);
        let mut carriers: Vec<Carrier> = Vec::new();

        for (matcher, regex) in &self.entries {
            if !regex.is_match(&trk) {
                continue;
            }
            let confirmation = matcher
                .confirm
                .map_or(Confirmation::CANDIDATE, |confirm| confirm(&trk));

            if confirmation.is_match && !carriers.contains(&matcher.carrier) {
                carriers.push(matcher.carrier);
            }
            if confirmation.stop_scanning {
                debug!(
                    carrier = %matcher.carrier,
                    pattern = matcher.pattern,
                    "Classification stopped by exclusive match"
                );
                break;
            }
        }

        debug!(
            tracking_number = %trk,
            candidates = ?carriers,
            "Classified tracking number"
        );
        carriers
    }
}

/// Candidate carriers for a tracking number using the built-in table
///
/// Returns an empty list for input that matches no known format.
#[must_use]
pub fn guess_carrier(raw: &str) -> Vec<Carrier> {
    DEFAULT_TABLE
        .as_ref()
        .map_or_else(Vec::new, |table| table.guess(raw))
}

/// Candidate carriers for a tracking number using a caller-supplied table
///
/// # Errors
///
/// Returns an error if a pattern in `matchers` does not compile.
pub fn guess_carrier_with(
    matchers: &[CarrierMatcher],
    raw: &str,
) -> Result<Vec<Carrier>, regex::Error> {
    Ok(MatcherTable::new(matchers)?.guess(raw))
}
