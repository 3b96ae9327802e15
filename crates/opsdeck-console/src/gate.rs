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

//! Access gate: render-or-redirect decisions per navigation
//!
//! The gate is a pure decision function over the session state, the
//! permission store and the resolved route. It never throws: every
//! evaluation resolves to loading, render, or a redirect. Per
//! navigation the progression is
//! `Init -> Loading -> {AuthenticatedAuthorized | AuthenticatedForbidden | Unauthenticated}`;
//! a denied state persists until the session or permission set changes,
//! at which point the caller re-evaluates. Loading always takes
//! precedence over redirect decisions so denied content never flashes.

use crate::permissions::{PermissionCheck, PermissionStore};
use crate::routes::{RouteDescriptor, RouteTable};
use crate::session::SessionState;

/// Terminal decision for a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session or permission data is still loading; render the neutral
    /// loading indicator
    Loading,

    /// Render the route's view inside the application shell
    Render,

    /// Not authenticated; `from` carries the attempted path so login
    /// can return the user afterward
    RedirectToLogin { from: String },

    /// Authenticated but holding none of the required tokens
    RedirectToForbidden,

    /// No route matched; fall back to the home route
    RedirectHome,
}

impl AccessDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, AccessDecision::Render)
    }
}

/// Authentication-only guard: no permission requirement, only a
/// confirmed session.
pub fn evaluate_authentication(session: SessionState, path: &str) -> AccessDecision {
    if session.loading {
        AccessDecision::Loading
    } else if session.authenticated {
        AccessDecision::Render
    } else {
        AccessDecision::RedirectToLogin { from: path.to_string() }
    }
}

/// Permission guard for a resolved route.
///
/// Loading wins over everything: while the session is loading or the
/// permission set is not ready the outcome is `Loading` regardless of
/// what the final authentication or permission outcome would be.
pub fn evaluate_access(session: SessionState, permissions: &PermissionStore, route: &RouteDescriptor, path: &str) -> AccessDecision {
    if route.required.is_empty() {
        return evaluate_authentication(session, path);
    }

    let check = permissions.has_any(route.required);

    if session.loading || !check.is_ready() {
        return AccessDecision::Loading;
    }

    if !session.authenticated {
        return AccessDecision::RedirectToLogin { from: path.to_string() };
    }

    match check {
        PermissionCheck::Granted => AccessDecision::Render,
        _ => AccessDecision::RedirectToForbidden,
    }
}

/// Resolve a path against the table and gate the result. A resolver
/// miss is the catch-all redirect to home.
pub fn decide(session: SessionState, permissions: &PermissionStore, table: &RouteTable, path: &str) -> AccessDecision {
    match table.resolve(path) {
        Some(route) => evaluate_access(session, permissions, route, path),
        None => AccessDecision::RedirectHome,
    }
}
