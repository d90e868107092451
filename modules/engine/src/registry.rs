// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{GeolocationError, LocationOptions, LocationResult};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// What a subscriber receives on its channel: a shared fix or an error.
/// Errors never close the channel, only unsubscribing does.
pub type Delivery = Result<Arc<LocationResult>, GeolocationError>;

struct Entry {
    id: u64,
    options: LocationOptions,
    sender: Sender<Delivery>,
}

/// The live set of consumer subscriptions.
///
/// A plain ordered collection, owned by the engine behind its locks. Every
/// mutation is followed by exactly one reconciliation, triggered by the
/// engine that performed it.
pub(crate) struct ObserverRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        ObserverRegistry {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Adds a subscription and returns its handle.
    pub fn add(&mut self, options: LocationOptions, sender: Sender<Delivery>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            options,
            sender,
        });
        id
    }

    /// Removes the subscription with the given handle. Removing an unknown
    /// handle is a no-op, cancellation paths may race with each other.
    pub fn remove(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// The options of every live subscription, in registration order.
    pub fn options(&self) -> Vec<LocationOptions> {
        self.entries.iter().map(|entry| entry.options).collect()
    }

    /// The delivery channels of every live subscription, in registration
    /// order.
    pub fn senders(&self) -> Vec<Sender<Delivery>> {
        self.entries
            .iter()
            .map(|entry| entry.sender.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
