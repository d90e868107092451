// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// Latitude values range from -90.0 to 90.0 and longitude values range from
/// -180.0 to 180.0, both in decimal degrees.
///
/// # Example
///
/// ```rust
/// use common::position::Coordinates;
///
/// let pos = Coordinates {
///     latitude: 52.5200,
///     longitude: 13.4050,
/// };
///
/// println!("{:?}", pos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a new [`Coordinates`] with the given latitude and longitude
    /// in decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A single position fix as delivered to consumers.
///
/// The record is immutable, it is created once by the event translation
/// boundary from a provider-native fix and never modified afterwards.
/// Timestamps carry millisecond precision in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    /// Time of the fix.
    pub time: DateTime<Utc>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Horizontal accuracy radius in meters.
    pub horizontal_accuracy: f64,
    /// Altitude above sea level in meters.
    pub altitude: f64,
    /// Vertical accuracy in meters.
    pub vertical_accuracy: f64,
    /// Course over ground in degrees, when the provider could determine one.
    pub course: Option<f64>,
    /// Speed over ground in meters per second, when available.
    pub speed: Option<f64>,
}

impl LocationResult {
    /// The coordinates of this fix.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Age of the fix relative to `now`, in whole milliseconds.
    ///
    /// Negative when the fix timestamp lies in the future of `now`.
    pub fn age_ms(&self, now: &DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.time).num_milliseconds()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
