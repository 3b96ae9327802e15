// Opsdeck
// Copyright (C) 2025 Opsdeck

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! In-process data-invalidation bus and navigation notifier
//!
//! Strictly an in-page signal: a component that mutates shared server
//! state publishes the touched domains, and every mounted component
//! subscribed to an intersecting domain re-fetches. Delivery is
//! synchronous to the listeners registered at publish time; there is no
//! queueing, persistence, cross-tab delivery, or retry. Dispatch
//! iterates a snapshot of the listener list, so handlers may subscribe
//! or unsubscribe during delivery without listeners being skipped or
//! invoked twice.

use chrono::Utc;
use opsdeck_common::{DataDomain, InvalidationEvent, NavigationEvent};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

type InvalidationHandler = Arc<dyn Fn(&InvalidationEvent) + Send + Sync>;
type NavigationHandler = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

struct InvalidationListener {
    id: Uuid,
    interests: HashSet<DataDomain>,
    handler: InvalidationHandler,
}

/// Handle for a registered listener.
///
/// Unsubscribes on drop; calling [`unsubscribe`](Self::unsubscribe)
/// explicitly is idempotent and safe during unmount.
pub struct Subscription {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    fn new(cancel: impl Fn() + Send + Sync + 'static) -> Self {
        Self { cancel: Box::new(cancel) }
    }

    /// Remove the listener. Idempotent.
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        (self.cancel)();
    }
}

/// Publish/subscribe bus keyed by coarse data domains
#[derive(Clone, Default)]
pub struct InvalidationBus {
    listeners: Arc<RwLock<Vec<InvalidationListener>>>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a set of domains. The handler is invoked
    /// once per event whose domain set intersects the subscribed set,
    /// and receives the full event, not a filtered view.
    pub fn subscribe(&self, domains: &[DataDomain], handler: impl Fn(&InvalidationEvent) + Send + Sync + 'static) -> Subscription {
        let id = Uuid::new_v4();
        self.listeners.write().push(InvalidationListener {
            id,
            interests: domains.iter().copied().collect(),
            handler: Arc::new(handler),
        });

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.write().retain(|listener| listener.id != id);
            }
        })
    }

    /// Broadcast an invalidation for the given domains.
    ///
    /// Domains are de-duplicated within the call; an empty set after
    /// de-duplication publishes nothing. Delivery is synchronous, to
    /// the listeners registered at publish time.
    pub fn publish(&self, domains: &[DataDomain]) {
        let mut seen = HashSet::new();
        let deduped: Vec<DataDomain> = domains.iter().copied().filter(|domain| seen.insert(*domain)).collect();
        if deduped.is_empty() {
            return;
        }

        let event = InvalidationEvent { domains: deduped, at: Utc::now() };
        debug!(domains = ?event.domains, "publishing invalidation");

        // snapshot, then release the lock so handlers can
        // subscribe/unsubscribe during dispatch
        let snapshot: Vec<(HashSet<DataDomain>, InvalidationHandler)> = self
            .listeners
            .read()
            .iter()
            .map(|listener| (listener.interests.clone(), listener.handler.clone()))
            .collect();

        for (interests, handler) in snapshot {
            if event.domains.iter().any(|domain| interests.contains(domain)) {
                handler(&event);
            }
        }
    }
}

/// Broadcasts path and query on every route change, for components that
/// react to navigation without importing the router
#[derive(Clone, Default)]
pub struct NavigationNotifier {
    listeners: Arc<RwLock<Vec<(Uuid, NavigationHandler)>>>,
}

impl NavigationNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a navigation listener
    pub fn on_navigation(&self, handler: impl Fn(&NavigationEvent) + Send + Sync + 'static) -> Subscription {
        let id = Uuid::new_v4();
        self.listeners.write().push((id, Arc::new(handler)));

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.write().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Broadcast a route change
    pub fn notify_navigation(&self, path: &str, query: Option<&str>) {
        let event = NavigationEvent {
            path: path.to_string(),
            query: query.map(String::from),
            at: Utc::now(),
        };

        let snapshot: Vec<NavigationHandler> = self.listeners.read().iter().map(|(_, handler)| handler.clone()).collect();
        for handler in snapshot {
            handler(&event);
        }
    }
}
