//! Per-spot serialization of read-then-write sequences.
//!
//! Booking and status changes both read a spot's sessions and then write.
//! Holding the spot's guard across that sequence means exactly one of several
//! concurrent overlapping bookings can win.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub type SharedSpotLocks = Arc<SpotLocks>;

#[derive(Debug, Default)]
pub struct SpotLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl SpotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSpotLocks {
        Arc::new(Self::new())
    }

    /// Wait for exclusive access to `spot_id`.
    pub async fn acquire(&self, spot_id: i32) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard lock is released before awaiting.
        let lock = self
            .locks
            .entry(spot_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the lock entry of a deleted spot once nobody holds or awaits it.
    ///
    /// Waiters keep their own handle to the mutex, so an entry they still
    /// reference is left in place; removing it would let a newcomer get a
    /// fresh mutex and run alongside them.
    pub fn forget(&self, spot_id: i32) {
        self.locks
            .remove_if(&spot_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_spot_is_exclusive() {
        let locks = SpotLocks::shared();
        let guard = locks.acquire(1).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(1).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_millis(200), contender)
            .await
            .expect("Timeout")
            .expect("task panicked");
    }

    #[tokio::test]
    async fn different_spots_do_not_block() {
        let locks = SpotLocks::new();
        let _a = locks.acquire(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2))
            .await
            .expect("Timeout");
        assert_eq!(locks.len(), 2);

        locks.forget(2);
        assert_eq!(locks.len(), 2);

        drop(b);
        locks.forget(2);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn forget_keeps_a_lock_that_has_waiters() {
        let locks = SpotLocks::shared();
        let guard = locks.acquire(1).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(1).await;
                tokio::time::sleep(Duration::from_millis(50)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        locks.forget(1);
        assert_eq!(locks.len(), 1);

        // The waiter now owns the only mutex for spot 1; a newcomer queues behind it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let newcomer = tokio::time::timeout(Duration::from_millis(10), locks.acquire(1)).await;
        assert!(newcomer.is_err());

        waiter.await.expect("task panicked");
        locks.forget(1);
        assert!(locks.is_empty());
    }
}
