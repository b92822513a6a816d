// ABOUTME: Normalization pipeline turning a carrier response into the unified presented result
// ABOUTME: Parse, extract, round date-only ETAs to end of day, and assemble; single pass, no retries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, NaiveTime, Utc};
use tracing::{debug, warn};
use trackit_core::{ActivitiesAndStatus, PresentedResult, TrackingResult};

use crate::core::{CarrierClient, RequestOptions};

/// Move a midnight ETA to the last millisecond of the same UTC day
///
/// Carriers that report only a date mean "by the end of that day". Any ETA
/// with a non-midnight time component is returned unchanged.
#[must_use]
pub fn round_eta_to_end_of_day(eta: DateTime<Utc>) -> DateTime<Utc> {
    if eta.time() != NaiveTime::default() {
        return eta;
    }
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        .map_or(eta, |end| eta.date_naive().and_time(end).and_utc())
}

/// Present a raw carrier response through `client`
///
/// A parse failure is returned as-is and no extractor runs. The raw
/// response is included only when the request or the client asks for it.
///
/// # Errors
///
/// Returns the error produced by the adapter's `parse`.
pub async fn present<C>(
    client: &C,
    response: &str,
    request: C::Request,
) -> TrackingResult<PresentedResult<C::Request>>
where
    C: CarrierClient + ?Sized,
{
    let shipment = client.parse(response).await.inspect_err(|e| {
        warn!(carrier = client.name(), code = %e.code(), error = %e, "carrier response rejected");
    })?;

    let ActivitiesAndStatus { activities, status } = client.activities_and_status(&shipment);
    let eta = client.eta(&shipment).map(round_eta_to_end_of_day);
    let raw = (request.raw() || client.options().raw).then(|| response.to_owned());

    debug!(
        carrier = client.name(),
        tracking_number = request.tracking_number(),
        %status,
        activities = activities.len(),
        "presented carrier response"
    );

    Ok(PresentedResult {
        eta,
        service: client.service(&shipment),
        weight: client.weight(&shipment),
        destination: client.destination(&shipment),
        activities,
        status,
        raw,
        request,
    })
}
