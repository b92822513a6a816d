// ABOUTME: Structured location input accepted by the location formatter
// ABOUTME: Borrowed optional fields so adapters can pass slices of parsed responses
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Structured address parts as reported by a carrier
///
/// Every field is optional. Empty or whitespace-only values are treated as
/// absent by the formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location<'a> {
    /// City name in any casing
    pub city: Option<&'a str>,
    /// State or province code or name
    pub state_code: Option<&'a str>,
    /// Country code or name
    pub country_code: Option<&'a str>,
    /// Postal code (ZIP, ZIP+4, foreign)
    pub postal_code: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// Location with city, state and country; postal code left empty
    #[must_use]
    pub const fn new(
        city: Option<&'a str>,
        state_code: Option<&'a str>,
        country_code: Option<&'a str>,
    ) -> Self {
        Self {
            city,
            state_code,
            country_code,
            postal_code: None,
        }
    }

    /// Attach a postal code
    #[must_use]
    pub const fn with_postal_code(mut self, postal_code: Option<&'a str>) -> Self {
        self.postal_code = postal_code;
        self
    }
}
