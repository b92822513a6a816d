// ABOUTME: Location presentation for structured address fields and free-text addresses
// ABOUTME: Produces the canonical "City, ST[, Country] ZIP" strings used in activities and destinations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::constants::formatting::{
    ABBREVIATION_MAX_LEN, DOMESTIC_COUNTRY_CODE, SEGMENT_ABBREVIATION_MAX_LEN,
};
use crate::models::Location;

use super::text::title_case;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Title-case spelled-out region names, keep abbreviations verbatim
fn present_region(value: &str) -> String {
    if value.chars().count() > ABBREVIATION_MAX_LEN {
        title_case(value)
    } else {
        value.to_owned()
    }
}

/// Trim a postal code and split nine-digit ZIP+4 codes as `12345-6789`
#[must_use]
pub fn present_postal_code(raw: Option<&str>) -> Option<String> {
    let code = non_blank(raw)?;
    if code.len() == 9 && code.bytes().all(|b| b.is_ascii_digit()) {
        let (zip, plus4) = code.split_at(5);
        Some(format!("{zip}-{plus4}"))
    } else {
        Some(code.to_owned())
    }
}

/// Present structured address fields as a single string
///
/// The country is omitted for domestic (`US`) addresses unless it is the
/// only field present. Returns `None` when every field is absent or blank.
#[must_use]
pub fn present_location(location: &Location<'_>) -> Option<String> {
    let city = non_blank(location.city).map(title_case);
    let state = non_blank(location.state_code).map(present_region);

    let mut address = match (city, state) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        (city, state) => city.or(state),
    };

    if let Some(country) = non_blank(location.country_code) {
        let presented = present_region(country);
        address = match address {
            Some(addr) if country == DOMESTIC_COUNTRY_CODE => Some(addr),
            Some(addr) => Some(format!("{addr}, {presented}")),
            None => Some(presented),
        };
    }

    match (address, present_postal_code(location.postal_code)) {
        (Some(addr), Some(postal)) => Some(format!("{addr} {postal}")),
        (addr, postal) => addr.or(postal),
    }
}

/// Re-case an already formatted, comma-separated address
///
/// Segments longer than two characters are title-cased; shorter ones are
/// treated as state or country codes and kept as-is.
#[must_use]
pub fn present_location_string(location: &str) -> String {
    location
        .split(',')
        .map(str::trim)
        .map(|field| {
            if field.chars().count() > SEGMENT_ABBREVIATION_MAX_LEN {
                title_case(field)
            } else {
                field.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
