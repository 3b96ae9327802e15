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

//! Error handling for the console core
//!
//! Guard-level failures never propagate past the guard: they are logged
//! and resolved to a definite render/redirect decision. The error type
//! exists for the collaborator seams (auth service, permission source,
//! preference backend) and for fail-fast configuration at startup.

use thiserror::Error;

/// Console error types
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// A persisted session exists but the identity could not be
    /// confirmed against the auth service
    #[error("session invalid: {message}")]
    SessionInvalid { message: String },

    /// Authenticated but holding none of the required permission tokens
    #[error("forbidden: requires one of {required:?}")]
    Forbidden { required: Vec<String> },

    /// Transient network failure on a data fetch; the previous UI state
    /// is preserved and the failure is surfaced as a notification
    #[error("transient failure: {message}")]
    Transient { message: String },

    /// Missing or malformed startup configuration
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Stable identifier for log labels and notification routing
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleError::SessionInvalid { .. } => "session_invalid",
            ConsoleError::Forbidden { .. } => "forbidden",
            ConsoleError::Transient { .. } => "transient",
            ConsoleError::Config { .. } => "config",
            ConsoleError::Serialization(_) => "serialization",
        }
    }

    /// Transient failures keep the previous UI state and may be retried
    /// by the user; everything else resolves to a redirect or a restart
    pub fn is_transient(&self) -> bool {
        matches!(self, ConsoleError::Transient { .. })
    }
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = ConsoleError::SessionInvalid {
            message: "identity unconfirmed".to_string(),
        };
        assert_eq!(err.kind(), "session_invalid");
        assert!(!err.is_transient());

        let err = ConsoleError::Transient {
            message: "fetch failed".to_string(),
        };
        assert!(err.is_transient());
    }
}
