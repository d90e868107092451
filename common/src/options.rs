// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Desired accuracy tier of a location request.
///
/// The tiers form an ordinal scale from highest precision ([`Accuracy::Best`])
/// to coarsest ([`Accuracy::Significant`]), so the derived [`Ord`] picks the
/// most precise tier when taking the minimum over a set of requests.
///
/// [`Accuracy::value`] exposes the numeric tier that doubles as the distance
/// filter in meters for the tiers where that is meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Accuracy {
    /// Best accuracy the hardware can deliver.
    Best,
    /// High accuracy, typically GPS driven.
    High,
    /// Accuracy of around ten meters.
    Medium,
    /// Accuracy of around a hundred meters.
    Low,
    /// Only significant location changes are reported.
    Significant,
}

impl Accuracy {
    /// Numeric tier value. Negative values request the dedicated
    /// high-precision provider modes, non-negative values are the distance
    /// granularity in meters.
    pub fn value(&self) -> i32 {
        match self {
            Accuracy::Best => -2,
            Accuracy::High => -1,
            Accuracy::Medium => 10,
            Accuracy::Low => 100,
            Accuracy::Significant => 1000,
        }
    }
}

impl Default for Accuracy {
    /// The tier assumed for requests that do not specify one.
    fn default() -> Self {
        Accuracy::Medium
    }
}

/// Per-consumer request options.
///
/// Owned by the consumer and immutable for the lifetime of its subscription.
/// All fields are optional, an empty `LocationOptions::default()` requests
/// foreground updates at the default accuracy tier.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocationOptions {
    /// Maximum age a cached fix may have to satisfy a one-shot request.
    pub max_age: Option<Duration>,
    /// Deadline for a one-shot request. Defaults to 15 seconds when absent.
    pub timeout: Option<Duration>,
    /// Desired accuracy tier. Defaults to [`Accuracy::Medium`] when absent.
    pub accuracy: Option<Accuracy>,
    /// Whether updates shall continue while the application is backgrounded.
    pub background: bool,
    /// Whether the platform shall indicate background location usage.
    pub indicate_background: bool,
}
