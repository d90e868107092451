// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Geolocation multiplexing engine
//!
//! Many independent consumers observe position updates with differing
//! quality-of-service preferences while exactly one [`LocationProvider`]
//! runs with a single reconciled configuration at any time. The engine
//! merges the live subscriptions into one policy, negotiates permissions,
//! suppresses redundant reconfiguration and fans provider events out to
//! every subscriber.

use chrono::Utc;
use common::{GeolocationError, LocationOptions, LocationResult, PermissionStatus};
use provider_core::{LocationProvider, ProviderConfig, ProviderEvent};
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, warn};

mod permission;
mod policy;
mod registry;
mod translate;

pub use permission::PermissionController;
pub use policy::{derive_config, reconcile_policy, should_apply, ReconciledPolicy};
pub use registry::Delivery;
pub use translate::{translate_failure, translate_fix};

use registry::ObserverRegistry;

/// Deadline for one-shot requests that do not specify their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Buffered fixes per subscriber before fan-out awaits.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 16;

struct ControlState {
    last_applied: Option<ProviderConfig>,
    listener: Option<tokio::task::JoinHandle<()>>,
}

struct EngineInner {
    provider: Arc<dyn LocationProvider>,
    permissions: PermissionController,
    registry: Mutex<ObserverRegistry>,
    last_result: Mutex<Option<LocationResult>>,
    /// Serializes reconciliations: compute, negotiate, diff, apply never
    /// interleave between two callers.
    control: Mutex<ControlState>,
}

/// Handle to one engine instance. Cheap to clone, all clones share the same
/// registry, provider and caches.
#[derive(Clone)]
pub struct GeolocationEngine {
    inner: Arc<EngineInner>,
}

impl GeolocationEngine {
    /// Creates an engine driving the given provider. The provider event
    /// listener is attached lazily on the first reconciliation.
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        GeolocationEngine {
            inner: Arc::new(EngineInner {
                permissions: PermissionController::new(provider.clone()),
                provider,
                registry: Mutex::new(ObserverRegistry::new()),
                last_result: Mutex::new(None),
                control: Mutex::new(ControlState {
                    last_applied: None,
                    listener: None,
                }),
            }),
        }
    }

    /// Reads the current permission state without prompting the user.
    pub async fn permission_status(&self, background: bool) -> PermissionStatus {
        self.inner.permissions.status(background).await
    }

    /// Negotiates permissions at the requested level, prompting when needed.
    pub async fn request_permissions(
        &self,
        background: bool,
    ) -> Result<PermissionStatus, GeolocationError> {
        self.inner.permissions.request(background).await
    }

    /// Opens the platform settings screen for the application.
    pub fn show_settings(&self) {
        self.inner.provider.open_settings();
    }

    /// The most recent fix delivered to any consumer, if any.
    pub async fn last_result(&self) -> Option<LocationResult> {
        *self.inner.last_result.lock().await
    }

    /// Starts observing the location.
    ///
    /// Registers the subscription and reconciles the provider configuration.
    /// Reconciliation failures are delivered on the subscription's channel,
    /// like any later provider failure, and never remove the subscription.
    pub async fn observe(&self, options: LocationOptions) -> LocationSubscription {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let id = self.inner.registry.lock().await.add(options, sender);
        debug!("observe start id={id} options={options:?}");
        if let Err(error) = self.reconcile().await {
            warn!("reconciliation after subscribe failed: {error}");
        }
        LocationSubscription {
            id,
            engine: self.clone(),
            receiver,
            cancelled: false,
        }
    }

    /// Gets the current location once.
    ///
    /// A cached fix younger than `options.max_age` is returned immediately
    /// without engaging the provider. Otherwise a subscription races a
    /// deadline of `options.timeout` (default [`DEFAULT_TIMEOUT`]); the
    /// first of fix, error or deadline wins and the subscription is torn
    /// down on every exit path.
    pub async fn get(&self, options: LocationOptions) -> Result<LocationResult, GeolocationError> {
        if let Some(max_age) = options.max_age {
            if let Some(last) = *self.inner.last_result.lock().await {
                let age = last.age_ms(&Utc::now());
                if age < max_age.as_millis() as i64 {
                    debug!("get served from cache, age {age} ms");
                    return Ok(last);
                }
            }
        }
        let deadline = options.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let mut subscription = self.observe(options).await;
        let outcome = tokio::time::timeout(deadline, subscription.next_event()).await;
        subscription.cancel().await;
        match outcome {
            Err(_) => Err(GeolocationError::Timeout),
            Ok(None) => Err(GeolocationError::Provider(
                "subscription channel closed".to_string(),
            )),
            Ok(Some(Ok(result))) => Ok(*result),
            Ok(Some(Err(error))) => Err(error),
        }
    }

    /// Recomputes the merged policy and applies it to the provider.
    ///
    /// Runs under the control lock so two reconciliations never interleave
    /// their compute, negotiate, diff, apply sequence. Idempotent: without
    /// a registry change in between, the second run pushes nothing.
    async fn reconcile(&self) -> Result<(), GeolocationError> {
        let mut control = self.inner.control.lock().await;
        let policy = reconcile_policy(&self.inner.registry.lock().await.options());
        debug!(
            "reconcile active={} background={} indicate_background={} accuracy={:?}",
            policy.active, policy.background, policy.indicate_background, policy.accuracy
        );
        // Stopping needs no authorization; skipping the negotiation here
        // guarantees the stop instruction reaches the provider even after a
        // permission revocation.
        if policy.active {
            match self.inner.permissions.request(policy.background).await {
                Ok(PermissionStatus::Granted) => (),
                Ok(_) => {
                    let error = GeolocationError::PermissionDenied;
                    self.broadcast_error(&error).await;
                    return Err(error);
                }
                Err(error) => {
                    self.broadcast_error(&error).await;
                    return Err(error);
                }
            }
        }
        if control.listener.is_none() {
            control.listener = Some(spawn_listener(&self.inner));
        }
        let config = derive_config(&policy);
        if should_apply(&config, control.last_applied.as_ref()) {
            info!("applying provider config {config:?}");
            self.inner.provider.set_config(&config);
            control.last_applied = Some(config);
        }
        Ok(())
    }

    async fn broadcast_error(&self, error: &GeolocationError) {
        let senders = self.inner.registry.lock().await.senders();
        for sender in senders {
            let _ = sender.send(Err(error.clone())).await;
        }
    }

    async fn remove(&self, id: u64) {
        let remaining = {
            let mut registry = self.inner.registry.lock().await;
            registry.remove(id);
            registry.len()
        };
        debug!("observe stop id={id}, {remaining} subscriptions remain");
        if let Err(error) = self.reconcile().await {
            warn!("reconciliation after unsubscribe failed: {error}");
        }
    }

    #[cfg(test)]
    async fn subscription_count(&self) -> usize {
        self.inner.registry.lock().await.len()
    }
}

/// The single shared provider-event listener.
///
/// Attached at most once per engine and never detached while the engine
/// lives; it holds only a weak reference so a dropped engine ends the task.
fn spawn_listener(inner: &Arc<EngineInner>) -> tokio::task::JoinHandle<()> {
    let mut events = inner.provider.events();
    let inner: Weak<EngineInner> = Arc::downgrade(inner);
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("provider event listener lagged, {missed} events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let Some(inner) = inner.upgrade() else { break };
            match event {
                ProviderEvent::Fix(fix) => {
                    let result = translate_fix(&fix);
                    *inner.last_result.lock().await = Some(result);
                    let payload = Arc::new(result);
                    let senders = inner.registry.lock().await.senders();
                    for sender in senders {
                        let _ = sender.send(Ok(payload.clone())).await;
                    }
                }
                ProviderEvent::Failure(message) => {
                    warn!("provider failure: {message}");
                    let error = translate_failure(&message);
                    let senders = inner.registry.lock().await.senders();
                    for sender in senders {
                        let _ = sender.send(Err(error.clone())).await;
                    }
                }
                // Authorization changes belong to the permission
                // negotiation, which holds its own receiver.
                ProviderEvent::AuthorizationChanged(_) => (),
            }
        }
    })
}

/// A live observation of the location.
///
/// Yields `Ok` fixes and `Err` provider failures; errors do not end the
/// subscription. Cancelling (or dropping) the handle removes the
/// registration and triggers a reconciliation, which stops the provider
/// once the last subscription is gone.
pub struct LocationSubscription {
    id: u64,
    engine: GeolocationEngine,
    receiver: mpsc::Receiver<Delivery>,
    cancelled: bool,
}

impl LocationSubscription {
    /// Waits for the next fix or failure. `None` once the subscription has
    /// been cancelled.
    pub async fn next_event(&mut self) -> Option<Delivery> {
        self.receiver.recv().await
    }

    /// Stops observing: removes the registration and reconciles the
    /// provider configuration before returning.
    pub async fn cancel(mut self) {
        self.cancelled = true;
        let engine = self.engine.clone();
        engine.remove(self.id).await;
    }
}

impl futures::Stream for LocationSubscription {
    type Item = Delivery;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for LocationSubscription {
    /// Removal must also happen when a consumer just drops the handle, the
    /// cleanup is scheduled onto the runtime since reconciliation suspends.
    fn drop(&mut self) {
        if self.cancelled {
            return;
        }
        let engine = self.engine.clone();
        let id = self.id;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move { engine.remove(id).await });
        }
    }
}

#[cfg(test)]
mod tests;
