// ABOUTME: Weighted-sum check-digit validation shared by tracking number confirmation rules
// ABOUTME: Generic mod 10 / mod 11 check plus the UPS alphanumeric letter-to-digit conversion
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;

/// Modulus applied to the weighted sum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulus {
    /// Check digit is `10 - sum % 10`, or 0 when the sum is a multiple of 10
    Ten,
    /// Check digit is `sum % 11`, with a remainder of 10 read as 0
    Eleven,
}

impl Modulus {
    const fn divisor(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Eleven => 11,
        }
    }

    const fn expected(self, sum: u32) -> u32 {
        match self {
            Self::Ten => match sum % 10 {
                0 => 0,
                rem => 10 - rem,
            },
            Self::Eleven => match sum % 11 {
                10 => 0,
                rem => rem,
            },
        }
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ten => f.write_str("mod 10"),
            Self::Eleven => f.write_str("mod 11"),
        }
    }
}

/// Validate the trailing check digit of `trk`
///
/// Every character except the last is multiplied by the next weight from
/// `multipliers` (cycling through the list) and summed. The last character
/// must equal the check digit derived from that sum under `modulus`.
///
/// Callers pass digit-only input. A non-digit character, an empty string or
/// an empty multiplier list never validates. The sum is kept reduced by the
/// modulus, so any `u32` weight is accepted.
///
/// ```
/// use trackit::identification::checksum::{check_digit, Modulus};
///
/// assert!(check_digit("123456789012", &[3, 1, 7], Modulus::Eleven));
/// assert!(!check_digit("123456789013", &[3, 1, 7], Modulus::Eleven));
/// ```
#[must_use]
pub fn check_digit(trk: &str, multipliers: &[u32], modulus: Modulus) -> bool {
    let digits: Option<Vec<u32>> = trk.chars().map(|c| c.to_digit(10)).collect();
    let Some((&check, body)) = digits.as_deref().and_then(<[u32]>::split_last) else {
        return false;
    };
    if multipliers.is_empty() {
        return false;
    }

    let m = modulus.divisor();
    let sum = body
        .iter()
        .zip(multipliers.iter().cycle())
        .fold(0, |sum, (digit, weight)| (sum + digit * (weight % m)) % m);
    modulus.expected(sum) == check
}

/// Numeric value UPS assigns to a tracking number character
///
/// Digits keep their face value; letters map to `(ascii - 63) % 10`.
#[must_use]
pub fn ups_char_value(c: char) -> Option<u32> {
    if c.is_ascii_digit() {
        return c.to_digit(10);
    }
    c.is_ascii_uppercase().then(|| (u32::from(c) - 63) % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_eleven_with_three_one_seven() {
        assert!(check_digit("123456789012", &[3, 1, 7], Modulus::Eleven));
        assert!(!check_digit("123456789019", &[3, 1, 7], Modulus::Eleven));
    }

    #[test]
    fn test_mod_eleven_remainder_ten_reads_as_zero() {
        assert!(check_digit("100000000070", &[3, 1, 7], Modulus::Eleven));
        assert!(!check_digit("100000000071", &[3, 1, 7], Modulus::Eleven));
    }

    #[test]
    fn test_mod_ten_with_alternating_weights() {
        assert!(check_digit("1234567890123452", &[3, 1], Modulus::Ten));
        assert!(!check_digit("1234567890123453", &[3, 1], Modulus::Ten));
        assert!(check_digit("12345678901234567890", &[3, 1], Modulus::Ten));
    }

    #[test]
    fn test_zero_sum_gives_zero_check_digit() {
        assert!(check_digit("00000", &[3, 1], Modulus::Ten));
        assert!(check_digit("00000", &[3, 1, 7], Modulus::Eleven));
        assert!(check_digit("0", &[3], Modulus::Ten));
    }

    #[test]
    fn test_large_weights_do_not_overflow() {
        assert!(check_digit("95", &[u32::MAX], Modulus::Ten));
        assert!(!check_digit("99", &[u32::MAX], Modulus::Ten));
        assert!(check_digit("95", &[u32::MAX], Modulus::Eleven));
        assert!(check_digit("990", &[u32::MAX], Modulus::Eleven));
        assert!(!check_digit("999999999999999999999", &[u32::MAX, u32::MAX - 1], Modulus::Ten));
    }

    #[test]
    fn test_invalid_input_never_validates() {
        assert!(!check_digit("", &[3, 1], Modulus::Ten));
        assert!(!check_digit("12A4", &[3, 1], Modulus::Ten));
        assert!(!check_digit("1234567890123452", &[], Modulus::Ten));
    }

    #[test]
    fn test_check_digit_is_deterministic() {
        let first = check_digit("9612019059803563050071", &[3, 1, 7], Modulus::Eleven);
        for _ in 0..3 {
            assert_eq!(
                check_digit("9612019059803563050071", &[3, 1, 7], Modulus::Eleven),
                first
            );
        }
    }

    #[test]
    fn test_ups_char_value() {
        assert_eq!(ups_char_value('7'), Some(7));
        assert_eq!(ups_char_value('A'), Some(2));
        assert_eq!(ups_char_value('H'), Some(9));
        assert_eq!(ups_char_value('Z'), Some(7));
        assert_eq!(ups_char_value('-'), None);
    }
}
