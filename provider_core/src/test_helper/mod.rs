//! Scripted provider for tests of engine and consumer crates.

use crate::{
    AuthorizationSnapshot, AuthorizationStatus, LocationProvider, ProviderConfig, ProviderEvent,
    ProviderFix,
};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

struct FakeProviderState {
    snapshot: AuthorizationSnapshot,
    configs: Vec<ProviderConfig>,
    prompts: Vec<bool>,
    prompt_response: Option<AuthorizationStatus>,
    settings_opened: usize,
}

/// A [`LocationProvider`] whose behavior is scripted by the test.
///
/// Every applied configuration and every issued authorization prompt is
/// recorded for later assertions. Fixes, failures and authorization changes
/// are emitted on demand through the `emit_*` functions. When a prompt
/// response is scripted via [`respond_to_prompts_with`](FakeProvider::respond_to_prompts_with),
/// each prompt immediately updates the authorization level and publishes the
/// matching [`ProviderEvent::AuthorizationChanged`] event.
pub struct FakeProvider {
    events: broadcast::Sender<ProviderEvent>,
    state: RwLock<FakeProviderState>,
}

impl FakeProvider {
    /// Creates a provider reporting the given authorization level and
    /// declared background modes.
    pub fn new(authorization: AuthorizationStatus, background_modes: &[&str]) -> Self {
        let (events, _) = broadcast::channel(16);
        FakeProvider {
            events,
            state: RwLock::new(FakeProviderState {
                snapshot: AuthorizationSnapshot {
                    authorization,
                    background_modes: background_modes.iter().map(|m| m.to_string()).collect(),
                },
                configs: Vec::new(),
                prompts: Vec::new(),
                prompt_response: None,
                settings_opened: 0,
            }),
        }
    }

    /// Changes the reported authorization level without emitting an event.
    pub fn set_authorization(&self, authorization: AuthorizationStatus) {
        self.state.write().unwrap().snapshot.authorization = authorization;
    }

    /// Scripts the outcome of every subsequent authorization prompt.
    pub fn respond_to_prompts_with(&self, authorization: AuthorizationStatus) {
        self.state.write().unwrap().prompt_response = Some(authorization);
    }

    /// All configurations applied so far, in order.
    pub fn applied_configs(&self) -> Vec<ProviderConfig> {
        self.state.read().unwrap().configs.clone()
    }

    /// All `always` flags of issued prompts, in order.
    pub fn prompts(&self) -> Vec<bool> {
        self.state.read().unwrap().prompts.clone()
    }

    /// How often the settings screen was requested.
    pub fn settings_opened(&self) -> usize {
        self.state.read().unwrap().settings_opened
    }

    /// Publishes a fix event to all subscribed receivers.
    pub fn emit_fix(&self, fix: ProviderFix) {
        let _ = self.events.send(ProviderEvent::Fix(fix));
    }

    /// Publishes a failure event to all subscribed receivers.
    pub fn emit_failure(&self, message: &str) {
        let _ = self.events.send(ProviderEvent::Failure(message.to_string()));
    }

    /// Updates the authorization level and publishes the change event.
    pub fn emit_authorization_change(&self, authorization: AuthorizationStatus) {
        self.set_authorization(authorization);
        let _ = self
            .events
            .send(ProviderEvent::AuthorizationChanged(authorization));
    }
}

#[async_trait::async_trait]
impl LocationProvider for FakeProvider {
    fn set_config(&self, config: &ProviderConfig) {
        debug!("FakeProvider received config {config:?}");
        self.state.write().unwrap().configs.push(config.clone());
    }

    async fn authorization_status(&self) -> AuthorizationSnapshot {
        self.state.read().unwrap().snapshot.clone()
    }

    fn request_authorization(&self, always: bool) {
        let response = {
            let mut state = self.state.write().unwrap();
            state.prompts.push(always);
            state.prompt_response
        };
        if let Some(authorization) = response {
            self.emit_authorization_change(authorization);
        }
    }

    fn events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }

    fn open_settings(&self) {
        self.state.write().unwrap().settings_opened += 1;
    }
}

/// A sample fix used across tests.
pub fn sample_fix() -> ProviderFix {
    ProviderFix {
        timestamp_ms: 1_700_000_000_000,
        latitude: 52.026649,
        longitude: 11.282535,
        accuracy: 3.5,
        altitude: 112.0,
        vertical_accuracy: 6.0,
        speed_mps: 2.8,
        bearing_deg: 270.0,
    }
}
