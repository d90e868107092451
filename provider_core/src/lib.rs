//! Provider contract for geomux
//!
//! Defines the typed interface the multiplexing engine expects from a
//! platform location provider: configuration, authorization queries and a
//! broadcast event channel carrying fixes, failures and authorization
//! changes. Exactly one provider backs one engine.

use std::time::Duration;
use strum_macros::EnumDiscriminants;
use tokio::sync::broadcast;

/// Power and precision mode requested from the provider hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerMode {
    /// Dedicated high-precision positioning, typically GPS.
    HighAccuracy,
    /// Balanced mix of power draw and precision.
    Balanced,
    /// Passive operation, piggybacking on fixes requested by others.
    NoPower,
}

/// The single merged instruction pushed to the provider.
///
/// Equality is structural over every field, the engine relies on [`PartialEq`]
/// to suppress redundant `set_config` calls. Do not add fields that change
/// between semantically identical configurations.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderConfig {
    /// Whether the provider shall deliver updates at all. `false` means
    /// stop everything regardless of the remaining fields.
    pub active: bool,
    /// Requested power and precision mode.
    pub power: PowerMode,
    /// Minimum displacement in meters between reported fixes.
    pub distance_filter_m: f64,
    /// Desired interval between fixes.
    pub interval: Duration,
    /// Whether updates shall continue in background operation.
    pub background: bool,
    /// Whether the platform shall indicate background location usage.
    pub indicate_background: bool,
    /// Monitor significant location changes only instead of continuous
    /// updates.
    pub significant_only: bool,
}

/// Platform authorization level for location access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The user has never answered a permission prompt.
    NotDetermined,
    /// Location access is denied.
    Denied,
    /// Location access is granted while the application is in use.
    AuthorizedWhenInUse,
    /// Location access is granted including background operation.
    AuthorizedAlways,
}

/// Authorization state as reported by the provider in one read.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthorizationSnapshot {
    /// Current authorization level.
    pub authorization: AuthorizationStatus,
    /// Background modes declared in the application's static capabilities.
    /// Background location requires the `"location"` entry.
    pub background_modes: Vec<String>,
}

impl AuthorizationSnapshot {
    /// Whether the application's capabilities declare background location.
    pub fn declares_background_location(&self) -> bool {
        self.background_modes.iter().any(|mode| mode == "location")
    }
}

/// A provider-native position fix before translation.
///
/// Field semantics follow the platform conventions: `speed_mps` and
/// `bearing_deg` are negative when the provider could not determine them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProviderFix {
    /// Milliseconds since the unix epoch.
    pub timestamp_ms: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters.
    pub accuracy: f64,
    /// Altitude above sea level in meters.
    pub altitude: f64,
    /// Vertical accuracy in meters.
    pub vertical_accuracy: f64,
    /// Speed over ground in meters per second, negative when invalid.
    pub speed_mps: f64,
    /// Course over ground in degrees, negative when invalid.
    pub bearing_deg: f64,
}

/// Events emitted by a provider on its broadcast channel.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ProviderEventKind))]
pub enum ProviderEvent {
    /// A new position fix.
    Fix(ProviderFix),
    /// A provider-side failure, carrying the native error message.
    Failure(String),
    /// The platform authorization level changed, e.g. after a prompt.
    AuthorizationChanged(AuthorizationStatus),
}

impl ProviderEvent {
    /// The discriminant of this event, without its payload.
    pub fn kind(&self) -> ProviderEventKind {
        self.into()
    }
}

/// Interface every platform location provider must implement.
///
/// The engine drives exactly one provider: it pushes merged configurations
/// through [`set_config`](LocationProvider::set_config) and consumes the
/// event channel returned by [`events`](LocationProvider::events). Fixes
/// and failures are fanned out by the engine, authorization changes are
/// consumed by the permission negotiation.
#[async_trait::async_trait]
pub trait LocationProvider: Send + Sync {
    /// Applies a merged configuration. Fire-and-forget, the provider
    /// reports problems through the event channel.
    fn set_config(&self, config: &ProviderConfig);

    /// Reads the current authorization level together with the statically
    /// declared background modes.
    async fn authorization_status(&self) -> AuthorizationSnapshot;

    /// Asks the platform to prompt the user. Completion is signaled by an
    /// [`ProviderEvent::AuthorizationChanged`] event, never by this call.
    ///
    /// `always` requests authorization covering background operation.
    fn request_authorization(&self, always: bool);

    /// Subscribes to the provider event channel. Each call returns an
    /// independent receiver of all future events.
    fn events(&self) -> broadcast::Receiver<ProviderEvent>;

    /// Opens the platform settings screen for the application.
    fn open_settings(&self);
}

pub mod test_helper;
