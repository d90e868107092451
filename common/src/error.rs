// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use thiserror::Error;

/// Any error that occurs during geolocation.
///
/// The type is `Clone` on purpose: a single provider failure is fanned out
/// to every live subscription and re-raised from the reconciliation that
/// observed it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeolocationError {
    /// Location permission is denied at the required level.
    #[error("location permission denied")]
    PermissionDenied,
    /// Background updates were requested but the application does not
    /// declare the location background mode in its capabilities.
    #[error("missing location background mode in capabilities")]
    MissingBackgroundCapability,
    /// The underlying location provider reported a failure.
    #[error("location provider failure: {0}")]
    Provider(String),
    /// A one-shot request exceeded its deadline.
    #[error("timed out waiting for a location fix")]
    Timeout,
}
