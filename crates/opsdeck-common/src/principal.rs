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

//! The authenticated principal for the current session

use serde::{Deserialize, Serialize};

/// Authentication state of the current principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    /// The initial session check has not resolved yet
    Pending,

    /// A session exists and the identity has been confirmed
    Authenticated,

    /// No session, or the session failed identity confirmation
    Anonymous,
}

/// The authenticated identity for the current session.
///
/// Exactly one live principal exists per process. It is created on
/// successful sign-in and replaced by an anonymous principal on
/// sign-out or session invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque identifier assigned by the backend auth service
    pub id: Option<String>,

    /// Current authentication state
    pub state: AuthState,
}

impl Principal {
    /// Principal before the first session check has resolved
    pub fn pending() -> Self {
        Self { id: None, state: AuthState::Pending }
    }

    /// Principal with no session
    pub fn anonymous() -> Self {
        Self { id: None, state: AuthState::Anonymous }
    }

    /// Principal with a confirmed identity
    pub fn authenticated(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            state: AuthState::Authenticated,
        }
    }

    /// Check whether the identity has been confirmed
    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::pending()
    }
}
