//! Per-user update locks
//!
//! A user may run only one snapshot update at a time. The registry hands
//! out scoped guards keyed by user id; dropping the guard releases the
//! slot, so an update that fails or panics can never leave its user stuck.
//! The registry is in-memory and process-lifetime only.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Registry of users with an update currently in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyRegistry {
    inner: Arc<Mutex<HashSet<i64>>>,
}

impl BusyRegistry {
    /// Create a new BusyRegistry instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to mark the user busy. `None` when an update is already running
    /// for that user.
    pub fn acquire(&self, user_id: i64) -> Option<BusyGuard> {
        let mut busy = self.inner.lock().unwrap();

        if !busy.insert(user_id) {
            debug!(user_id = user_id, "Update already in progress for user");
            return None;
        }

        Some(BusyGuard {
            registry: self.clone(),
            user_id,
        })
    }

    /// Whether the user currently holds an update slot.
    pub fn is_busy(&self, user_id: i64) -> bool {
        self.inner.lock().unwrap().contains(&user_id)
    }

    fn release(&self, user_id: i64) {
        self.inner.lock().unwrap().remove(&user_id);
    }
}

/// Scoped busy marker; releases the user's slot on drop.
#[must_use = "dropping the guard immediately releases the busy slot"]
pub struct BusyGuard {
    registry: BusyRegistry,
    user_id: i64,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.registry.release(self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_second_acquire_fails_until_released() {
        let registry = BusyRegistry::new();

        let guard = registry.acquire(1).expect("first acquire must succeed");
        assert!(registry.is_busy(1));
        assert!(registry.acquire(1).is_none());

        // a different user is unaffected
        assert!(registry.acquire(2).is_some());

        drop(guard);
        assert!(!registry.is_busy(1));
        assert!(registry.acquire(1).is_some());
    }

    #[test]
    fn test_guard_releases_on_panic() {
        let registry = BusyRegistry::new();

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = registry.acquire(7).expect("acquire must succeed");
            panic!("update blew up");
        }));

        assert!(result.is_err());
        assert!(!registry.is_busy(7));
    }
}
