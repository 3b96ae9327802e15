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

//! Configuration management for the console core
//!
//! The backend endpoint and public API key are required: missing values
//! fail fast at startup rather than surfacing as a runtime screen error.

use crate::error::{ConsoleError, ConsoleResult};
use std::env;
use std::time::Duration;

/// Default coalescing window for soft session-refresh events
pub const DEFAULT_SESSION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for the console core
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend service endpoint
    pub backend_url: String,

    /// Public (anonymous) API key for the backend service
    pub backend_anon_key: String,

    /// Whether per-user preferences sync remotely instead of staying
    /// local-only
    pub remote_prefs: bool,

    /// Coalescing window for soft session-refresh events
    pub session_debounce: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> ConsoleResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConsoleResult<Self> {
        let backend_url = lookup("OPSDECK_BACKEND_URL").ok_or_else(|| ConsoleError::Config {
            message: "OPSDECK_BACKEND_URL is required".to_string(),
        })?;

        let backend_anon_key = lookup("OPSDECK_BACKEND_ANON_KEY").ok_or_else(|| ConsoleError::Config {
            message: "OPSDECK_BACKEND_ANON_KEY is required".to_string(),
        })?;

        let remote_prefs = lookup("OPSDECK_REMOTE_PREFS").map(|v| v.parse().unwrap_or(false)).unwrap_or(false);

        let session_debounce = lookup("OPSDECK_SESSION_DEBOUNCE_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SESSION_DEBOUNCE);

        Ok(Self {
            backend_url,
            backend_anon_key,
            remote_prefs,
            session_debounce,
        })
    }
}
