//! Per-customer serialization of read-modify-write sequences.
//!
//! Two concurrent appends for one customer would otherwise both read the same
//! snapshot and the later write would drop the earlier event. Holding the
//! owner's lock across read and write closes that window inside this process.
//! Writers in other processes are not coordinated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use spa_relay_core::CustomerId;
use tokio::sync::OwnedMutexGuard;

type LockMap = HashMap<CustomerId, Arc<tokio::sync::Mutex<()>>>;

/// Optional per-owner async mutexes.
///
/// Cloning shares the same lock table.
#[derive(Clone, Default)]
pub struct OwnerLocks {
    table: Option<Arc<Mutex<LockMap>>>,
}

/// Held while an owner's fields are being rewritten. `None` when disabled.
pub type OwnerGuard = Option<OwnedMutexGuard<()>>;

impl OwnerLocks {
    /// Create the lock table. When `enabled` is false, [`acquire`](Self::acquire)
    /// never blocks.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            table: enabled.then(|| Arc::new(Mutex::new(HashMap::new()))),
        }
    }

    /// Whether writes are serialized.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.table.is_some()
    }

    /// Wait for exclusive access to `owner`'s fields.
    pub async fn acquire(&self, owner: CustomerId) -> OwnerGuard {
        let table = self.table.as_ref()?;

        let lock = {
            let mut map = table.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries referenced only by the table are idle
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(owner).or_default())
        };

        Some(lock.lock_owned().await)
    }

    /// Number of owners with a held or awaited lock.
    #[must_use]
    pub fn active(&self) -> usize {
        self.table.as_ref().map_or(0, |table| {
            table
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .filter(|lock| Arc::strong_count(lock) > 1)
                .count()
        })
    }
}

impl std::fmt::Debug for OwnerLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerLocks")
            .field("enabled", &self.is_enabled())
            .field("active", &self.active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_disabled_locks_never_block() {
        let locks = OwnerLocks::new(false);
        let first = locks.acquire(CustomerId::new(1)).await;
        let second = locks.acquire(CustomerId::new(1)).await;
        assert!(first.is_none() && second.is_none());
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_same_owner_waits() {
        let locks = OwnerLocks::new(true);
        let guard = locks.acquire(CustomerId::new(1)).await;
        assert!(guard.is_some());

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire(CustomerId::new(1)).await.is_some() })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        assert!(contender.await.unwrap_or(false));
    }

    #[tokio::test]
    async fn test_different_owners_do_not_contend() {
        let locks = OwnerLocks::new(true);
        let _a = locks.acquire(CustomerId::new(1)).await;
        let b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(CustomerId::new(2)),
        )
        .await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = OwnerLocks::new(true);
        drop(locks.acquire(CustomerId::new(1)).await);
        drop(locks.acquire(CustomerId::new(2)).await);
        let _held = locks.acquire(CustomerId::new(3)).await;
        assert_eq!(locks.active(), 1);
    }
}
