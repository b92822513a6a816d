// ABOUTME: Tracking activity model representing one carrier scan or event
// ABOUTME: Timestamp and details are mandatory so incomplete events cannot be represented
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Status;

/// One discrete tracking event
///
/// Adapters build activities through [`Activity::from_parts`], which drops
/// events missing a timestamp or details, so the activity sequence handed to
/// the pipeline only ever contains complete events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Raw date/time text as reported by the carrier (local wall-clock time)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// Presented location of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Human-readable event description
    pub details: String,
}

impl Activity {
    /// Create an activity with the mandatory fields
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, details: impl Into<String>) -> Self {
        Self {
            timestamp,
            datetime: None,
            location: None,
            details: details.into(),
        }
    }

    /// Build an activity only when both mandatory fields are present
    #[must_use]
    pub fn from_parts(timestamp: Option<DateTime<Utc>>, details: Option<String>) -> Option<Self> {
        Some(Self::new(timestamp?, details?))
    }

    /// Attach a presented location
    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Attach the carrier's raw date/time text
    #[must_use]
    pub fn with_datetime(mut self, datetime: Option<String>) -> Self {
        self.datetime = datetime;
        self
    }
}

/// Activities and the status derived alongside them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitiesAndStatus {
    /// Events, newest first as reported by the carrier
    pub activities: Vec<Activity>,
    /// Current shipment status
    pub status: Status,
}

impl ActivitiesAndStatus {
    /// Bundle activities with a status
    #[must_use]
    pub const fn new(activities: Vec<Activity>, status: Status) -> Self {
        Self { activities, status }
    }
}
