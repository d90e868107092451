// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::DateTime;
use common::{GeolocationError, LocationResult};
use provider_core::ProviderFix;

/// Translates a provider-native fix into the canonical result record.
///
/// This is the only place that inspects provider-native field shapes.
/// Negative speed and bearing values are the platform markers for "could
/// not be determined" and normalize to `None`.
pub fn translate_fix(fix: &ProviderFix) -> LocationResult {
    LocationResult {
        // An out-of-range timestamp clamps to the epoch rather than failing
        // the whole fix.
        time: DateTime::from_timestamp_millis(fix.timestamp_ms).unwrap_or_default(),
        latitude: fix.latitude,
        longitude: fix.longitude,
        horizontal_accuracy: fix.accuracy,
        altitude: fix.altitude,
        vertical_accuracy: fix.vertical_accuracy,
        course: (fix.bearing_deg >= 0.0).then_some(fix.bearing_deg),
        speed: (fix.speed_mps >= 0.0).then_some(fix.speed_mps),
    }
}

/// Translates a provider-native error payload into the typed failure.
pub fn translate_failure(message: &str) -> GeolocationError {
    GeolocationError::Provider(message.to_string())
}
