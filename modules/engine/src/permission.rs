// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{GeolocationError, PermissionStatus};
use provider_core::{AuthorizationStatus, LocationProvider, ProviderEvent};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

/// Runs the authorization negotiation against the platform permission
/// subsystem exposed by the provider.
///
/// A negotiation is a small state machine: undetermined, prompt issued,
/// waiting for the authorization-change event, resolved. At most one prompt
/// is in flight per controller; callers queued behind it re-read the
/// authorization state afterwards and adopt the outcome instead of
/// prompting again.
pub struct PermissionController {
    provider: Arc<dyn LocationProvider>,
    prompt_lock: Mutex<()>,
}

impl PermissionController {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        PermissionController {
            provider,
            prompt_lock: Mutex::new(()),
        }
    }

    /// Reads the current permission state without prompting.
    ///
    /// An undetermined platform state reports [`PermissionStatus::Unknown`]
    /// even when background access was asked for; only a determined grant
    /// that does not cover background operation degrades to denied.
    pub async fn status(&self, background: bool) -> PermissionStatus {
        let snapshot = self.provider.authorization_status().await;
        Self::evaluate(snapshot.authorization, background)
    }

    fn evaluate(authorization: AuthorizationStatus, background: bool) -> PermissionStatus {
        match authorization {
            AuthorizationStatus::Denied => PermissionStatus::Denied,
            AuthorizationStatus::NotDetermined => PermissionStatus::Unknown,
            AuthorizationStatus::AuthorizedAlways => PermissionStatus::Granted,
            AuthorizationStatus::AuthorizedWhenInUse => {
                if background {
                    PermissionStatus::Denied
                } else {
                    PermissionStatus::Granted
                }
            }
        }
    }

    /// Ensures authorization at the requested level, prompting when needed.
    ///
    /// Fails with [`GeolocationError::MissingBackgroundCapability`] before
    /// any prompt when background access is requested but the application
    /// does not declare the location background mode. A definitive denial
    /// resolves immediately, a sufficient grant likewise. Otherwise a
    /// platform prompt is issued and the call suspends until the provider
    /// emits the authorization-change event that settles it.
    pub async fn request(&self, background: bool) -> Result<PermissionStatus, GeolocationError> {
        let snapshot = self.provider.authorization_status().await;
        if background && !snapshot.declares_background_location() {
            return Err(GeolocationError::MissingBackgroundCapability);
        }
        let _guard = self.prompt_lock.lock().await;
        // Re-read after acquiring the lock, an in-flight negotiation may
        // have settled the state in the meantime.
        let snapshot = self.provider.authorization_status().await;
        match snapshot.authorization {
            AuthorizationStatus::Denied => Ok(PermissionStatus::Denied),
            AuthorizationStatus::AuthorizedWhenInUse if background => self.prompt(true).await,
            AuthorizationStatus::NotDetermined => self.prompt(background).await,
            _ => Ok(PermissionStatus::Granted),
        }
    }

    /// Issues a platform prompt and suspends until it resolves.
    ///
    /// The event receiver lives exactly as long as the in-flight request,
    /// dropping it detaches the listener on every outcome.
    async fn prompt(&self, always: bool) -> Result<PermissionStatus, GeolocationError> {
        // Subscribe before prompting so the change event cannot be missed.
        let mut events = self.provider.events();
        debug!("requesting authorization, always={always}");
        self.provider.request_authorization(always);
        loop {
            match events.recv().await {
                Ok(ProviderEvent::AuthorizationChanged(authorization)) => {
                    debug!("authorization changed to {authorization:?}");
                    match authorization {
                        AuthorizationStatus::NotDetermined => continue,
                        AuthorizationStatus::Denied => return Ok(PermissionStatus::Denied),
                        AuthorizationStatus::AuthorizedAlways => {
                            return Ok(PermissionStatus::Granted)
                        }
                        AuthorizationStatus::AuthorizedWhenInUse => {
                            return Ok(if always {
                                PermissionStatus::Denied
                            } else {
                                PermissionStatus::Granted
                            });
                        }
                    }
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(GeolocationError::Provider(
                        "provider event channel closed".to_string(),
                    ));
                }
            }
        }
    }
}
