// ABOUTME: Shared constants for trackit configuration defaults and formatting thresholds
// ABOUTME: Pure data constants used by the core formatters, adapters, and configuration layer
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Transport defaults carried in client options
pub mod transport {
    /// Default timeout for carrier requests, in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
}

/// Formatting thresholds used by the location presenter
pub mod formatting {
    /// State or country values longer than this are spelled-out names and get title-cased
    pub const ABBREVIATION_MAX_LEN: usize = 3;

    /// Free-text address segments longer than this get title-cased
    pub const SEGMENT_ABBREVIATION_MAX_LEN: usize = 2;

    /// Country code omitted from presented addresses
    pub const DOMESTIC_COUNTRY_CODE: &str = "US";
}
