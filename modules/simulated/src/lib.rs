// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Simulated location provider
//!
//! Replays a waypoint route at constant speed, for demos and integration
//! tests without location hardware. The provider honors the applied
//! configuration: fixes are only emitted while the configuration is active,
//! and authorization prompts are answered like a consenting user would.

use chrono::Utc;
use common::position::Coordinates;
use provider_core::{
    AuthorizationSnapshot, AuthorizationStatus, LocationProvider, PowerMode, ProviderConfig,
    ProviderEvent, ProviderFix,
};
use std::io::{Error, ErrorKind};
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

struct SimulatedState {
    config: Option<ProviderConfig>,
    authorization: AuthorizationStatus,
    background_modes: Vec<String>,
    route: Vec<Coordinates>,
    next_waypoint: usize,
    current: Coordinates,
    speed_mps: f64,
    interval: Duration,
}

/// A [`LocationProvider`] that replays a route at a constant speed.
///
/// Positions between waypoints are interpolated linearly; the route wraps
/// around at its end. Every authorization prompt is granted at the
/// requested level.
pub struct SimulatedProvider {
    events: broadcast::Sender<ProviderEvent>,
    state: Arc<RwLock<SimulatedState>>,
}

impl SimulatedProvider {
    /// Creates a new provider replaying `route` at `speed_mps`, one fix per
    /// `interval`.
    ///
    /// # Arguments
    ///
    /// * `route` - The waypoints that are replayed, at least one.
    /// * `speed_mps` - The constant speed reported with every fix.
    /// * `interval` - The time between two emitted fixes.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<SimulatedProvider>)` - The new created provider.
    /// * `Err(io::Error)` - If the route is empty.
    pub fn new(
        route: &[Coordinates],
        speed_mps: f64,
        interval: Duration,
    ) -> Result<Arc<SimulatedProvider>, Error> {
        let Some(&start) = route.first() else {
            return Err(Error::new(ErrorKind::InvalidData, "Route parameter is empty"));
        };
        let (events, _) = broadcast::channel(64);
        let state = Arc::new(RwLock::new(SimulatedState {
            config: None,
            authorization: AuthorizationStatus::NotDetermined,
            background_modes: vec!["location".to_string()],
            route: route.to_vec(),
            next_waypoint: 1 % route.len(),
            current: start,
            speed_mps,
            interval,
        }));
        let provider = Arc::new(SimulatedProvider {
            events: events.clone(),
            state: state.clone(),
        });
        tokio::spawn(replay_task(Arc::downgrade(&state), events));
        Ok(provider)
    }

    /// Overrides the statically declared background modes, e.g. with an
    /// empty set to exercise the capability check.
    pub fn set_background_modes(&self, modes: &[&str]) {
        self.state.write().unwrap().background_modes =
            modes.iter().map(|m| m.to_string()).collect();
    }
}

#[async_trait::async_trait]
impl LocationProvider for SimulatedProvider {
    fn set_config(&self, config: &ProviderConfig) {
        debug!("simulated provider reconfigured: {config:?}");
        self.state.write().unwrap().config = Some(config.clone());
    }

    async fn authorization_status(&self) -> AuthorizationSnapshot {
        let state = self.state.read().unwrap();
        AuthorizationSnapshot {
            authorization: state.authorization,
            background_modes: state.background_modes.clone(),
        }
    }

    fn request_authorization(&self, always: bool) {
        let authorization = if always {
            AuthorizationStatus::AuthorizedAlways
        } else {
            AuthorizationStatus::AuthorizedWhenInUse
        };
        self.state.write().unwrap().authorization = authorization;
        let _ = self
            .events
            .send(ProviderEvent::AuthorizationChanged(authorization));
    }

    fn events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }

    fn open_settings(&self) {
        info!("simulated provider has no settings screen");
    }
}

/// Emits fixes while the applied configuration is active, until the
/// provider is dropped.
async fn replay_task(
    state: Weak<RwLock<SimulatedState>>,
    events: broadcast::Sender<ProviderEvent>,
) {
    loop {
        let Some(state) = state.upgrade() else { break };
        let (interval, fix) = {
            let mut state = state.write().unwrap();
            let active = state.config.as_ref().is_some_and(|c| c.active);
            let fix = active.then(|| advance(&mut state));
            (state.interval, fix)
        };
        drop(state);
        if let Some(fix) = fix {
            let _ = events.send(ProviderEvent::Fix(fix));
        }
        tokio::time::sleep(interval).await;
    }
}

/// Moves the simulated position one interval further along the route and
/// builds the fix for the new position.
fn advance(state: &mut SimulatedState) -> ProviderFix {
    let previous = state.current;
    let mut remaining = state.speed_mps * state.interval.as_secs_f64();
    while remaining > 0.0 {
        let target = state.route[state.next_waypoint];
        let to_target = geodesy::distance(&state.current, &target);
        if to_target <= remaining {
            state.current = target;
            state.next_waypoint = (state.next_waypoint + 1) % state.route.len();
            remaining -= to_target;
            if to_target == 0.0 {
                break;
            }
        } else {
            let fraction = remaining / to_target;
            state.current = Coordinates::new(
                state.current.latitude + (target.latitude - state.current.latitude) * fraction,
                state.current.longitude + (target.longitude - state.current.longitude) * fraction,
            );
            remaining = 0.0;
        }
    }
    let moved = geodesy::distance(&previous, &state.current) > 0.0;
    let accuracy = match state.config.as_ref().map(|c| c.power) {
        Some(PowerMode::HighAccuracy) => 3.0,
        Some(PowerMode::NoPower) => 100.0,
        _ => 10.0,
    };
    ProviderFix {
        timestamp_ms: Utc::now().timestamp_millis(),
        latitude: state.current.latitude,
        longitude: state.current.longitude,
        accuracy,
        altitude: 100.0,
        vertical_accuracy: accuracy * 2.0,
        speed_mps: if moved { state.speed_mps } else { 0.0 },
        bearing_deg: if moved {
            geodesy::bearing(&previous, &state.current)
        } else {
            -1.0
        },
    }
}

#[cfg(test)]
mod tests;
