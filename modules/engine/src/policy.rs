// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{Accuracy, LocationOptions};
use provider_core::{PowerMode, ProviderConfig};
use std::time::Duration;

/// Interval requested between continuous fixes.
const UPDATE_INTERVAL: Duration = Duration::from_secs(1);

/// The merged request derived from all live subscriptions.
///
/// Ephemeral, recomputed from scratch on every registry change and never
/// stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconciledPolicy {
    /// Whether any subscription exists at all.
    pub active: bool,
    /// Whether any subscription requests background updates.
    pub background: bool,
    /// Whether any subscription requests the background usage indicator.
    pub indicate_background: bool,
    /// The most precise accuracy tier requested by any subscription,
    /// [`Accuracy::Medium`] for subscriptions that do not specify one.
    pub accuracy: Accuracy,
}

/// Merges the options of all live subscriptions into one policy.
///
/// The empty set yields an inactive policy with all fields at their
/// defaults, which derives into the stop configuration.
pub fn reconcile_policy(options: &[LocationOptions]) -> ReconciledPolicy {
    ReconciledPolicy {
        active: !options.is_empty(),
        background: options.iter().any(|o| o.background),
        indicate_background: options.iter().any(|o| o.indicate_background),
        accuracy: options
            .iter()
            .map(|o| o.accuracy.unwrap_or_default())
            .min()
            .unwrap_or_default(),
    }
}

/// Derives the concrete provider instruction from a merged policy.
///
/// Tier values below zero request the dedicated high-precision mode, the
/// coarsest tier switches to significant-change monitoring, everything in
/// between runs balanced with the tier value as distance filter.
pub fn derive_config(policy: &ReconciledPolicy) -> ProviderConfig {
    let tier = policy.accuracy.value();
    ProviderConfig {
        active: policy.active,
        power: if tier < 0 {
            PowerMode::HighAccuracy
        } else if tier >= Accuracy::Significant.value() {
            PowerMode::NoPower
        } else {
            PowerMode::Balanced
        },
        distance_filter_m: tier.max(0) as f64,
        interval: UPDATE_INTERVAL,
        background: policy.background,
        indicate_background: policy.indicate_background,
        significant_only: tier >= Accuracy::Significant.value(),
    }
}

/// Whether `new` must be pushed to the provider given the last applied
/// configuration. Structural equality over every field, nothing else.
pub fn should_apply(new: &ProviderConfig, last_applied: Option<&ProviderConfig>) -> bool {
    last_applied.is_none_or(|last| new != last)
}
