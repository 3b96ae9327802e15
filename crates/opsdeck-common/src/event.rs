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

//! Event types: auth-change classification, invalidation and navigation events

use crate::domain::DataDomain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of an auth-state-change event from the backend
/// session service.
///
/// Hard transitions change who is signed in and always force a full
/// re-validation. Soft transitions merely refresh credentials or
/// metadata for the same identity and are coalesced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    /// Any event the console does not react to
    Other,
}

impl AuthChangeEvent {
    /// Classify the event label emitted by the auth service
    pub fn from_label(label: &str) -> Self {
        match label {
            "SIGNED_IN" => AuthChangeEvent::SignedIn,
            "SIGNED_OUT" => AuthChangeEvent::SignedOut,
            "TOKEN_REFRESHED" => AuthChangeEvent::TokenRefreshed,
            "USER_UPDATED" => AuthChangeEvent::UserUpdated,
            _ => AuthChangeEvent::Other,
        }
    }

    /// Sign-in and sign-out change the identity itself
    pub fn is_hard(&self) -> bool {
        matches!(self, AuthChangeEvent::SignedIn | AuthChangeEvent::SignedOut)
    }

    /// Token refreshes and metadata updates keep the same identity
    pub fn is_soft(&self) -> bool {
        matches!(self, AuthChangeEvent::TokenRefreshed | AuthChangeEvent::UserUpdated)
    }
}

/// A signal that one or more data domains may be stale.
///
/// Ephemeral: published and immediately consumed, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationEvent {
    /// Domains touched by the mutation, de-duplicated within the event
    pub domains: Vec<DataDomain>,

    /// When the event was published
    pub at: DateTime<Utc>,
}

impl InvalidationEvent {
    /// Check whether this event touches the given domain
    pub fn touches(&self, domain: DataDomain) -> bool {
        self.domains.contains(&domain)
    }
}

/// A route transition, one per path change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    /// Path navigated to
    pub path: String,

    /// Query string, without the leading `?`
    pub query: Option<String>,

    /// When the navigation happened
    pub at: DateTime<Utc>,
}
