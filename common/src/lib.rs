// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common module for geomux
//!
//! Provides the data types that are shared across every crate of the
//! workspace: coordinates, location results, per-consumer options and the
//! error type.

pub mod error;
pub mod options;
pub mod position;

pub use error::GeolocationError;
pub use options::{Accuracy, LocationOptions};
pub use position::{Coordinates, LocationResult};

use serde::{Deserialize, Serialize};

/// Outcome of a permission query or negotiation as seen by a consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    /// Location access is granted at the requested level.
    Granted,
    /// Location access is denied at the requested level.
    Denied,
    /// The platform has not decided yet, a prompt has never been answered.
    Unknown,
}
