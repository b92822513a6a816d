// ABOUTME: Free-text status inference against an ordered carrier vocabulary
// ABOUTME: First case-insensitive substring hit wins, so specific phrases must precede general ones
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use tracing::trace;

use crate::models::Status;

/// Classify carrier status text using an ordered vocabulary
///
/// Returns the status of the first vocabulary key contained in `text`
/// (case-insensitive), or [`Status::Unknown`] when `text` is absent, blank,
/// or matches nothing.
#[must_use]
pub fn infer_status(text: Option<&str>, vocabulary: &[(&str, Status)]) -> Status {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Status::Unknown;
    };
    let haystack = text.to_lowercase();

    vocabulary
        .iter()
        .find(|(key, _)| haystack.contains(&key.to_lowercase()))
        .map_or(Status::Unknown, |&(key, status)| {
            trace!(key, %status, "inferred status from text");
            status
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCABULARY: &[(&str, Status)] = &[
        ("shipment information received", Status::Shipping),
        ("out for delivery", Status::OutForDelivery),
        ("delivered", Status::Delivered),
        ("received", Status::EnRoute),
    ];

    #[test]
    fn test_specific_phrase_wins_over_substring() {
        assert_eq!(
            infer_status(Some("Shipment information received"), VOCABULARY),
            Status::Shipping
        );
        assert_eq!(
            infer_status(Some("Received at facility"), VOCABULARY),
            Status::EnRoute
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(
            infer_status(Some("OUT FOR DELIVERY"), VOCABULARY),
            Status::OutForDelivery
        );
    }

    #[test]
    fn test_missing_or_unmatched_text_is_unknown() {
        assert_eq!(infer_status(None, VOCABULARY), Status::Unknown);
        assert_eq!(infer_status(Some("  "), VOCABULARY), Status::Unknown);
        assert_eq!(infer_status(Some("Label void"), VOCABULARY), Status::Unknown);
        assert_eq!(infer_status(Some("Delivered"), &[]), Status::Unknown);
    }
}
