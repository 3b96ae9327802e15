//! Stale-response guard for keyed fetches
//!
//! A component whose fetch key changes (ticket id, search filter) may
//! see a later request resolve before an earlier one. Each fetch takes
//! a ticket from the guard before starting; a completion is applied
//! only while its ticket is still current. Retiring the guard on
//! unmount invalidates every outstanding ticket, so in-flight responses
//! never act on unmounted state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter shared by all fetches for one component
#[derive(Clone, Default)]
pub struct FetchGuard {
    generation: Arc<AtomicU64>,
}

/// Proof that a fetch belongs to a specific generation
pub struct FetchTicket {
    generation: u64,
    guard: FetchGuard,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding every outstanding ticket
    pub fn begin(&self) -> FetchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            generation,
            guard: self.clone(),
        }
    }

    /// Invalidate all outstanding tickets without starting a new fetch.
    /// Called on unmount.
    pub fn retire(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl FetchTicket {
    /// Whether this ticket's fetch is still the latest
    pub fn is_current(&self) -> bool {
        self.guard.generation.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let guard = FetchGuard::new();

        let first = guard.begin();
        let second = guard.begin();

        // the earlier request resolving late must not be applied
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_retire_invalidates_outstanding_tickets() {
        let guard = FetchGuard::new();
        let ticket = guard.begin();

        guard.retire();
        assert!(!ticket.is_current());
    }

    #[test]
    fn test_out_of_order_completion() {
        let guard = FetchGuard::new();

        // fetch A for ticket 881, user navigates, fetch B for ticket 882
        let fetch_a = guard.begin();
        let fetch_b = guard.begin();

        // B resolves first and is applied
        assert!(fetch_b.is_current());
        // A resolves second and is discarded
        assert!(!fetch_a.is_current());
    }
}
