// ABOUTME: Ordered tracking number classification table and its checksum confirmation rules
// ABOUTME: Earlier entries run first; a confirmation may end the scan for authoritative formats
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use trackit_core::Carrier;

use super::checksum::{check_digit, ups_char_value, Modulus};

/// Outcome of a confirmation rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confirmation {
    /// The tracking number belongs to the entry's carrier
    pub is_match: bool,
    /// No later entry may add a candidate
    pub stop_scanning: bool,
}

impl Confirmation {
    /// Neither a match nor a stop
    pub const REJECTED: Self = Self {
        is_match: false,
        stop_scanning: false,
    };

    /// Match that leaves later entries in play
    pub const CANDIDATE: Self = Self {
        is_match: true,
        stop_scanning: false,
    };

    /// Match that ends the scan
    pub const EXCLUSIVE: Self = Self {
        is_match: true,
        stop_scanning: true,
    };

    const fn candidate_if(ok: bool) -> Self {
        if ok {
            Self::CANDIDATE
        } else {
            Self::REJECTED
        }
    }

    const fn exclusive_if(ok: bool) -> Self {
        if ok {
            Self::EXCLUSIVE
        } else {
            Self::REJECTED
        }
    }
}

/// Confirmation rule run against the normalized tracking number
pub type Confirm = fn(&str) -> Confirmation;

/// One entry in the classification table
#[derive(Debug, Clone, Copy)]
pub struct CarrierMatcher {
    /// Carrier added when the entry matches
    pub carrier: Carrier,
    /// Regular expression the normalized tracking number must match
    pub pattern: &'static str,
    /// Optional rule deciding the match and whether scanning stops
    pub confirm: Option<Confirm>,
}

impl CarrierMatcher {
    const fn pattern(carrier: Carrier, pattern: &'static str) -> Self {
        Self {
            carrier,
            pattern,
            confirm: None,
        }
    }

    const fn confirmed(carrier: Carrier, pattern: &'static str, confirm: Confirm) -> Self {
        Self {
            carrier,
            pattern,
            confirm: Some(confirm),
        }
    }
}

/// Built-in classification table, in precedence order
///
/// Formats shared between carriers appear once per carrier. New carriers are
/// appended; reordering entries changes which candidates are reported.
pub const MATCHERS: &[CarrierMatcher] = &[
    CarrierMatcher::confirmed(Carrier::Ups, r"^1Z[0-9A-Z]{16}$", confirm_ups),
    CarrierMatcher::confirmed(
        Carrier::Ups,
        r"^(H|T|J|K|F|W|M|Q|A)\d{10}$",
        confirm_ups_freight,
    ),
    CarrierMatcher::pattern(Carrier::Amazon, r"^1\d{2}-\d{7}-\d{7}:\d{13}$"),
    CarrierMatcher::confirmed(Carrier::Fedex, r"^\d{12}$", confirm_fedex_12),
    CarrierMatcher::confirmed(Carrier::Fedex, r"^\d{15}$", confirm_fedex_15),
    CarrierMatcher::confirmed(Carrier::Fedex, r"^\d{20}$", confirm_fedex_20),
    CarrierMatcher::confirmed(Carrier::Usps, r"^\d{20}$", confirm_usps_20),
    CarrierMatcher::confirmed(Carrier::Usps, r"^02\d{18}$", confirm_fedex_smartpost),
    CarrierMatcher::confirmed(Carrier::Fedex, r"^02\d{18}$", confirm_fedex_smartpost),
    CarrierMatcher::confirmed(Carrier::Fedex, r"^DT\d{12}$", confirm_fedex_door_tag),
    CarrierMatcher::pattern(Carrier::Fedex, r"^927489\d{16}$"),
    CarrierMatcher::pattern(Carrier::Fedex, r"^926129\d{16}$"),
    CarrierMatcher::pattern(Carrier::Upsmi, r"^927489\d{16}$"),
    CarrierMatcher::pattern(Carrier::Upsmi, r"^926129\d{16}$"),
    CarrierMatcher::pattern(Carrier::Upsmi, r"^927489\d{20}$"),
    CarrierMatcher::confirmed(Carrier::Fedex, r"^96\d{20}$", confirm_fedex_9622),
    CarrierMatcher::pattern(Carrier::Usps, r"^927489\d{16}$"),
    CarrierMatcher::pattern(Carrier::Usps, r"^926129\d{16}$"),
    CarrierMatcher::pattern(Carrier::Fedex, r"^7489\d{16}$"),
    CarrierMatcher::pattern(Carrier::Fedex, r"^6129\d{16}$"),
    CarrierMatcher::confirmed(Carrier::Usps, r"^(91|92|93|94|95|96)\d{20}$", confirm_usps_mod10),
    CarrierMatcher::confirmed(Carrier::Usps, r"^\d{26}$", confirm_usps_mod10),
    CarrierMatcher::confirmed(Carrier::Usps, r"^420\d{27}$", confirm_usps_420_zip),
    CarrierMatcher::confirmed(Carrier::Usps, r"^420\d{31}$", confirm_usps_420_zip_plus_4),
    CarrierMatcher::confirmed(Carrier::Dhlgm, r"^420\d{27}$", confirm_usps_420_zip),
    CarrierMatcher::confirmed(Carrier::Dhlgm, r"^420\d{31}$", confirm_usps_420_zip_plus_4),
    CarrierMatcher::confirmed(Carrier::Dhlgm, r"^94748\d{17}$", confirm_usps_mod10),
    CarrierMatcher::confirmed(Carrier::Dhlgm, r"^93612\d{17}$", confirm_usps_mod10),
    CarrierMatcher::pattern(Carrier::Dhlgm, r"^GM\d{16}"),
    CarrierMatcher::pattern(Carrier::Usps, r"^[A-Z]{2}\d{9}[A-Z]{2}$"),
    CarrierMatcher::confirmed(Carrier::CanadaPost, r"^\d{16}$", confirm_usps_mod10),
    CarrierMatcher::pattern(Carrier::Lasership, r"^L[A-Z]\d{8}$"),
    CarrierMatcher::pattern(Carrier::Lasership, r"^1LS\d{12}"),
    CarrierMatcher::pattern(Carrier::Lasership, r"^Q\d{8}[A-Z]"),
    CarrierMatcher::pattern(Carrier::Ontrac, r"^(C|D)\d{14}$"),
    CarrierMatcher::pattern(Carrier::Prestige, r"^P[A-Z]{1}\d{8}"),
    CarrierMatcher::confirmed(Carrier::A1Intl, r"^AZ.\d+", confirm_a1_international),
];

// ============================================================================
// Confirmation rules
// ============================================================================
// Each rule only runs after its pattern matched, so byte offsets below always
// land on ASCII digits. `get` keeps a mismatched pattern from panicking.

/// `1Z` numbers: alphanumeric walk over positions 2..=16, odd positions doubled
fn confirm_ups(trk: &str) -> Confirmation {
    let chars: Vec<char> = trk.chars().collect();
    let Some(body) = chars.get(2..=16) else {
        return Confirmation::REJECTED;
    };

    let mut sum = 0;
    for (offset, &c) in body.iter().enumerate() {
        let Some(value) = ups_char_value(c) else {
            return Confirmation::REJECTED;
        };
        let position = offset + 2;
        sum += if position % 2 == 1 { value * 2 } else { value };
    }
    let expected = match sum % 10 {
        0 => 0,
        rem => 10 - rem,
    };
    let check = chars.get(17).and_then(|c| c.to_digit(10));
    Confirmation::exclusive_if(check == Some(expected))
}

/// UPS freight: leading letter converted to a digit, then `[3, 1, 7]` mod 10
fn confirm_ups_freight(trk: &str) -> Confirmation {
    let mut chars = trk.chars();
    let Some(first) = chars.next().and_then(ups_char_value) else {
        return Confirmation::REJECTED;
    };
    let converted = format!("{first}{}", chars.as_str());
    Confirmation::exclusive_if(check_digit(&converted, &[3, 1, 7], Modulus::Ten))
}

fn confirm_fedex_12(trk: &str) -> Confirmation {
    Confirmation::candidate_if(check_digit(trk, &[3, 1, 7], Modulus::Eleven))
}

fn confirm_fedex_15(trk: &str) -> Confirmation {
    Confirmation::candidate_if(check_digit(trk, &[1, 3], Modulus::Ten))
}

/// 20 digits: Express check, or the Ground check with a `92` application identifier
fn confirm_fedex_20(trk: &str) -> Confirmation {
    Confirmation::candidate_if(
        check_digit(trk, &[3, 1, 7], Modulus::Eleven)
            || check_digit(&format!("92{trk}"), &[3, 1], Modulus::Ten),
    )
}

fn confirm_usps_20(trk: &str) -> Confirmation {
    Confirmation::candidate_if(check_digit(trk, &[3, 1], Modulus::Ten))
}

/// SmartPost numbers carry an implied `91` application identifier
fn confirm_fedex_smartpost(trk: &str) -> Confirmation {
    Confirmation::candidate_if(check_digit(&format!("91{trk}"), &[3, 1], Modulus::Ten))
}

/// Door tags are FedEx only
fn confirm_fedex_door_tag(trk: &str) -> Confirmation {
    Confirmation::exclusive_if(
        trk.get(2..)
            .is_some_and(|digits| check_digit(digits, &[3, 1, 7], Modulus::Eleven)),
    )
}

/// 22 digits prefixed `96`: whole-number check, or the 15-digit tail after the prefix
fn confirm_fedex_9622(trk: &str) -> Confirmation {
    Confirmation::candidate_if(
        check_digit(trk, &[3, 1, 7], Modulus::Eleven)
            || trk
                .get(7..)
                .is_some_and(|tail| check_digit(tail, &[1, 3], Modulus::Ten)),
    )
}

fn confirm_usps_mod10(trk: &str) -> Confirmation {
    Confirmation::candidate_if(check_digit(trk, &[3, 1], Modulus::Ten))
}

/// `420` + 5-digit ZIP routing prefix + 22-digit tracking number
fn confirm_usps_420_zip(trk: &str) -> Confirmation {
    Confirmation::candidate_if(
        trk.get(8..)
            .is_some_and(|tracking| check_digit(tracking, &[3, 1], Modulus::Ten)),
    )
}

/// `420` + ZIP+4 + 22 digits, or `420` + ZIP + 26 digits
fn confirm_usps_420_zip_plus_4(trk: &str) -> Confirmation {
    let zip_plus_4 = trk
        .get(12..)
        .is_some_and(|tracking| check_digit(tracking, &[3, 1], Modulus::Ten));
    let zip = trk
        .get(8..)
        .is_some_and(|tracking| check_digit(tracking, &[3, 1], Modulus::Ten));
    Confirmation::candidate_if(zip_plus_4 || zip)
}

fn confirm_a1_international(trk: &str) -> Confirmation {
    Confirmation::candidate_if(matches!(trk.len(), 9 | 13))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ups_confirmation_is_exclusive() {
        assert_eq!(confirm_ups("1Z12345E0205271686"), Confirmation::EXCLUSIVE);
        assert_eq!(confirm_ups("1Z879E930346834440"), Confirmation::EXCLUSIVE);
        assert_eq!(confirm_ups("1Z12345E0205271687"), Confirmation::REJECTED);
        assert_eq!(confirm_ups("1Z12345E020527168X"), Confirmation::REJECTED);
    }

    #[test]
    fn test_ups_freight_converts_leading_letter() {
        assert_eq!(confirm_ups_freight("H1234567892"), Confirmation::EXCLUSIVE);
        assert_eq!(confirm_ups_freight("H1234567893"), Confirmation::REJECTED);
    }

    #[test]
    fn test_fedex_rules_never_stop_except_door_tag() {
        assert_eq!(confirm_fedex_12("123456789012"), Confirmation::CANDIDATE);
        assert_eq!(confirm_fedex_20("10000000000000237571"), Confirmation::CANDIDATE);
        assert_eq!(
            confirm_fedex_9622("9612019059803563050071"),
            Confirmation::CANDIDATE
        );
        assert_eq!(confirm_fedex_door_tag("DT123456789012"), Confirmation::EXCLUSIVE);
        assert_eq!(confirm_fedex_door_tag("DT123456789013"), Confirmation::REJECTED);
    }

    #[test]
    fn test_smartpost_uses_implied_prefix() {
        assert_eq!(
            confirm_fedex_smartpost("02931503799192766595"),
            Confirmation::CANDIDATE
        );
    }

    #[test]
    fn test_usps_420_routing_prefixes() {
        assert_eq!(
            confirm_usps_420_zip("420606079400110200881234567896"),
            Confirmation::CANDIDATE
        );
        assert_eq!(
            confirm_usps_420_zip_plus_4("4206060712349400110200881234567896"),
            Confirmation::CANDIDATE
        );
        assert_eq!(
            confirm_usps_420_zip("420606079400110200881234567897"),
            Confirmation::REJECTED
        );
    }

    #[test]
    fn test_a1_length_rule() {
        assert!(confirm_a1_international("AZ1234567").is_match);
        assert!(confirm_a1_international("AZ12345678901").is_match);
        assert!(!confirm_a1_international("AZ123456789012").is_match);
    }
}
