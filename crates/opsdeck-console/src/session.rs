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

//! Session guard: authenticated vs. unauthenticated vs. loading
//!
//! The guard performs one blocking identity check at startup and then
//! classifies auth-change events. Hard transitions (sign-in, sign-out)
//! re-validate immediately, re-entering the loading state. Soft
//! transitions (token refresh, metadata update) re-validate in the
//! background, coalesced through a fixed debounce window so rapid
//! successive refreshes cause exactly one check; soft transitions that
//! arrive while the tab is hidden are dropped outright, not queued.
//!
//! A failed check never leaves `loading` stuck: every validation
//! resolves to a definite authenticated/unauthenticated state, and a
//! session whose identity cannot be confirmed is cleared via the auth
//! service before the guard reports anonymous.

use crate::error::ConsoleResult;
use async_trait::async_trait;
use opsdeck_common::{AuthChangeEvent, Principal};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Persisted session as reported by the auth service
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
}

/// Confirmed identity as reported by the auth service
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Auth/session collaborator.
///
/// `get_session` reads the persisted session; `get_user` confirms the
/// identity against the service. A present session whose user cannot be
/// confirmed is invalid and gets cleared through `sign_out`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_session(&self) -> ConsoleResult<Option<AuthSession>>;
    async fn get_user(&self) -> ConsoleResult<Option<AuthUser>>;
    async fn sign_out(&self) -> ConsoleResult<()>;
}

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// A validation is in flight and protected content must not render
    pub loading: bool,

    /// The identity was confirmed by the last completed validation
    pub authenticated: bool,
}

/// Whether the tab is currently visible to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabVisibility {
    Visible,
    Hidden,
}

/// Session guard over an [`AuthProvider`].
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionGuard {
    provider: Arc<dyn AuthProvider>,
    state: Arc<RwLock<SessionState>>,
    principal: Arc<RwLock<Principal>>,
    hidden: Arc<AtomicBool>,
    // at most one pending soft re-validation at a time
    soft_pending: Arc<AtomicBool>,
    debounce: Duration,
}

impl SessionGuard {
    /// Create a guard in the loading state. Call [`hydrate`](Self::hydrate)
    /// once before consulting [`state`](Self::state).
    pub fn new(provider: Arc<dyn AuthProvider>, debounce: Duration) -> Self {
        Self {
            provider,
            state: Arc::new(RwLock::new(SessionState {
                loading: true,
                authenticated: false,
            })),
            principal: Arc::new(RwLock::new(Principal::pending())),
            hidden: Arc::new(AtomicBool::new(false)),
            soft_pending: Arc::new(AtomicBool::new(false)),
            debounce,
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Current principal
    pub fn principal(&self) -> Principal {
        self.principal.read().clone()
    }

    /// Record tab visibility; soft transitions arriving while hidden
    /// are dropped
    pub fn set_visibility(&self, visibility: TabVisibility) {
        self.hidden.store(visibility == TabVisibility::Hidden, Ordering::Relaxed);
    }

    /// The single blocking startup check. `loading` stays true until it
    /// resolves, so protected content never renders before the first
    /// verification completes.
    pub async fn hydrate(&self) {
        self.validate().await;
    }

    /// React to a classified auth-change event
    pub async fn handle_auth_event(&self, event: AuthChangeEvent) {
        if event.is_hard() {
            debug!(?event, "hard session transition, re-validating");
            self.state.write().loading = true;
            self.validate().await;
        } else if event.is_soft() {
            if self.hidden.load(Ordering::Relaxed) {
                debug!(?event, "soft session transition dropped while hidden");
                return;
            }
            // coalesce: only the first event in the window schedules
            if self.soft_pending.swap(true, Ordering::SeqCst) {
                debug!(?event, "soft session transition coalesced");
                return;
            }
            let guard = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(guard.debounce).await;
                guard.soft_pending.store(false, Ordering::SeqCst);
                guard.validate().await;
            });
        }
    }

    /// Sign out through the auth service and drop to anonymous
    pub async fn sign_out(&self) {
        if let Err(error) = self.provider.sign_out().await {
            warn!(%error, "sign-out call failed, dropping session locally anyway");
        }
        *self.principal.write() = Principal::anonymous();
        *self.state.write() = SessionState {
            loading: false,
            authenticated: false,
        };
    }

    /// Run one validation and settle into a definite state. Errors are
    /// logged, never propagated; `loading` always ends false.
    async fn validate(&self) {
        let outcome = self.check_identity().await;

        let principal = match outcome {
            Ok(Some(user_id)) => Principal::authenticated(user_id),
            Ok(None) => Principal::anonymous(),
            Err(error) => {
                error!(%error, "session validation failed, treating as anonymous");
                Principal::anonymous()
            }
        };

        let authenticated = principal.is_authenticated();
        *self.principal.write() = principal;
        *self.state.write() = SessionState { loading: false, authenticated };
    }

    /// Confirm the persisted session against the auth service.
    ///
    /// Present session + unconfirmable identity means the session is
    /// invalid: the backing store is cleared and the result is
    /// anonymous, not an error.
    async fn check_identity(&self) -> ConsoleResult<Option<String>> {
        let Some(session) = self.provider.get_session().await? else {
            return Ok(None);
        };

        match self.provider.get_user().await {
            Ok(Some(user)) => Ok(Some(user.id)),
            Ok(None) => {
                warn!(user_id = %session.user_id, "persisted session has no confirmable identity, clearing");
                self.clear_invalid_session().await;
                Ok(None)
            }
            Err(error) => {
                warn!(user_id = %session.user_id, %error, "identity confirmation failed, clearing session");
                self.clear_invalid_session().await;
                Ok(None)
            }
        }
    }

    async fn clear_invalid_session(&self) {
        if let Err(error) = self.provider.sign_out().await {
            warn!(%error, "failed to clear invalid session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use std::sync::atomic::AtomicUsize;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    /// Provider that counts validations (one `get_session` call each)
    struct CountingProvider {
        validations: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AuthProvider for CountingProvider {
        async fn get_session(&self) -> ConsoleResult<Option<AuthSession>> {
            self.validations.fetch_add(1, Ordering::SeqCst);
            Ok(Some(AuthSession {
                user_id: "user-1".to_string(),
                access_token: "token".to_string(),
            }))
        }

        async fn get_user(&self) -> ConsoleResult<Option<AuthUser>> {
            Ok(Some(AuthUser {
                id: "user-1".to_string(),
                email: None,
            }))
        }

        async fn sign_out(&self) -> ConsoleResult<()> {
            Ok(())
        }
    }

    fn counting_guard() -> (SessionGuard, Arc<AtomicUsize>) {
        let validations = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(CountingProvider {
            validations: validations.clone(),
        });
        (SessionGuard::new(provider, DEBOUNCE), validations)
    }

    #[tokio::test]
    async fn test_hydrate_resolves_loading() {
        let (guard, _) = counting_guard();

        assert!(guard.state().loading);
        guard.hydrate().await;

        let state = guard.state();
        assert!(!state.loading);
        assert!(state.authenticated);
        assert_eq!(guard.principal().id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_no_session_is_anonymous() {
        let mut provider = MockAuthProvider::new();
        provider.expect_get_session().returning(|| Ok(None));
        let guard = SessionGuard::new(Arc::new(provider), DEBOUNCE);

        guard.hydrate().await;

        let state = guard.state();
        assert!(!state.loading);
        assert!(!state.authenticated);
        assert!(!guard.principal().is_authenticated());
    }

    #[tokio::test]
    async fn test_unconfirmable_identity_clears_session() {
        let mut provider = MockAuthProvider::new();
        provider.expect_get_session().returning(|| {
            Ok(Some(AuthSession {
                user_id: "user-1".to_string(),
                access_token: "stale".to_string(),
            }))
        });
        provider.expect_get_user().returning(|| Ok(None));
        provider.expect_sign_out().times(1).returning(|| Ok(()));
        let guard = SessionGuard::new(Arc::new(provider), DEBOUNCE);

        guard.hydrate().await;

        let state = guard.state();
        assert!(!state.loading);
        assert!(!state.authenticated);
    }

    #[tokio::test]
    async fn test_validation_error_never_leaves_loading_stuck() {
        let mut provider = MockAuthProvider::new();
        provider.expect_get_session().returning(|| {
            Err(ConsoleError::Transient {
                message: "network down".to_string(),
            })
        });
        let guard = SessionGuard::new(Arc::new(provider), DEBOUNCE);

        guard.hydrate().await;

        let state = guard.state();
        assert!(!state.loading);
        assert!(!state.authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_events_within_window_coalesce_to_one() {
        let (guard, validations) = counting_guard();
        guard.hydrate().await;
        assert_eq!(validations.load(Ordering::SeqCst), 1);

        guard.handle_auth_event(AuthChangeEvent::TokenRefreshed).await;
        guard.handle_auth_event(AuthChangeEvent::TokenRefreshed).await;
        guard.handle_auth_event(AuthChangeEvent::UserUpdated).await;

        tokio::time::sleep(DEBOUNCE * 2).await;
        assert_eq!(validations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_events_spread_apart_each_validate() {
        let (guard, validations) = counting_guard();
        guard.hydrate().await;

        guard.handle_auth_event(AuthChangeEvent::TokenRefreshed).await;
        tokio::time::sleep(DEBOUNCE * 2).await;

        guard.handle_auth_event(AuthChangeEvent::TokenRefreshed).await;
        tokio::time::sleep(DEBOUNCE * 2).await;

        assert_eq!(validations.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_event_while_hidden_is_dropped_forever() {
        let (guard, validations) = counting_guard();
        guard.hydrate().await;

        guard.set_visibility(TabVisibility::Hidden);
        guard.handle_auth_event(AuthChangeEvent::TokenRefreshed).await;

        tokio::time::sleep(DEBOUNCE * 10).await;
        assert_eq!(validations.load(Ordering::SeqCst), 1);

        // regaining visibility does not replay the dropped event
        guard.set_visibility(TabVisibility::Visible);
        tokio::time::sleep(DEBOUNCE * 10).await;
        assert_eq!(validations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hard_transition_validates_even_after_hidden_drop() {
        let (guard, validations) = counting_guard();
        guard.hydrate().await;

        guard.set_visibility(TabVisibility::Hidden);
        guard.handle_auth_event(AuthChangeEvent::TokenRefreshed).await;
        guard.handle_auth_event(AuthChangeEvent::SignedIn).await;

        assert_eq!(validations.load(Ordering::SeqCst), 2);
        assert!(!guard.state().loading);
    }

    #[tokio::test]
    async fn test_other_events_are_ignored() {
        let (guard, validations) = counting_guard();
        guard.hydrate().await;

        guard.handle_auth_event(AuthChangeEvent::Other).await;
        assert_eq!(validations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sign_out_drops_to_anonymous() {
        let (guard, _) = counting_guard();
        guard.hydrate().await;
        assert!(guard.state().authenticated);

        guard.sign_out().await;

        let state = guard.state();
        assert!(!state.loading);
        assert!(!state.authenticated);
        assert!(!guard.principal().is_authenticated());
    }
}
