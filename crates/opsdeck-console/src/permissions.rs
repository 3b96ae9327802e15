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

//! Permission store for the current principal
//!
//! The resolved permission set is process-wide, read-many state: only
//! the store's own reload routine writes it, and it is always replaced
//! whole, never partially mutated. Before the first successful load
//! every membership test reports "not ready" rather than "denied", so
//! guards render a loading state instead of flashing denied content.

use crate::error::ConsoleResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborator that resolves the permission token set for a principal.
///
/// Backed by the backend service's permission query; must distinguish
/// "not yet loaded" (the store's concern) from "loaded but empty" (a
/// legitimate result).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Fetch the full permission token set for the given principal
    async fn fetch_permissions(&self, principal_id: &str) -> ConsoleResult<Vec<String>>;
}

/// Outcome of a membership test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionCheck {
    /// The set has not loaded yet; treat as a loading state, not a denial
    NotReady,

    /// The principal holds at least one of the requested tokens
    Granted,

    /// The set is loaded and holds none of the requested tokens
    Denied,
}

impl PermissionCheck {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionCheck::Granted)
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self, PermissionCheck::NotReady)
    }
}

/// Holds the resolved permission set and exposes a synchronous O(1)
/// membership predicate. The raw set is never exposed, so callers
/// cannot mutate it.
#[derive(Clone)]
pub struct PermissionStore {
    source: Arc<dyn PermissionSource>,
    // None until the first successful load
    tokens: Arc<RwLock<Option<HashSet<String>>>>,
}

impl PermissionStore {
    /// Create a store in the not-ready state
    pub fn new(source: Arc<dyn PermissionSource>) -> Self {
        Self {
            source,
            tokens: Arc::new(RwLock::new(None)),
        }
    }

    /// Whether the set has been loaded at least once
    pub fn ready(&self) -> bool {
        self.tokens.read().is_some()
    }

    /// Membership test for a single token
    pub fn has(&self, token: &str) -> PermissionCheck {
        match self.tokens.read().as_ref() {
            None => PermissionCheck::NotReady,
            Some(set) if set.contains(token) => PermissionCheck::Granted,
            Some(_) => PermissionCheck::Denied,
        }
    }

    /// Membership test with OR semantics: granted when the principal
    /// holds any one of the requested tokens
    pub fn has_any(&self, tokens: &[&str]) -> PermissionCheck {
        match self.tokens.read().as_ref() {
            None => PermissionCheck::NotReady,
            Some(set) if tokens.iter().any(|token| set.contains(*token)) => PermissionCheck::Granted,
            Some(_) => PermissionCheck::Denied,
        }
    }

    /// Reload the full set from the source, replacing it atomically.
    ///
    /// A failed fetch keeps the previous set (or the not-ready state if
    /// nothing was ever loaded) and is logged, not propagated: a stale
    /// set is preferable to flashing denied content.
    pub async fn reload(&self, principal_id: &str) {
        match self.source.fetch_permissions(principal_id).await {
            Ok(fetched) => {
                let count = fetched.len();
                *self.tokens.write() = Some(fetched.into_iter().collect());
                debug!(principal = principal_id, count, "permission set reloaded");
            }
            Err(error) => {
                warn!(principal = principal_id, %error, "permission reload failed, keeping previous set");
            }
        }
    }

    /// Drop back to the not-ready state. Called on sign-out so the next
    /// principal never sees the previous principal's tokens.
    pub fn reset(&self) {
        *self.tokens.write() = None;
        debug!("permission set reset");
    }
}
