//! Per-user turn serialization.
//!
//! Each user id maps to an async mutex. A turn holds its user's mutex from
//! before FETCHING_CONTEXT until PERSISTING finishes, so turn N's writes
//! are visible to turn N+1. Tokio mutexes are fair, so waiting turns run
//! in arrival order. Different users never contend.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A user's mutex and the number of turns holding or awaiting it.
struct LockSlot {
    mutex: Arc<Mutex<()>>,
    holders: usize,
}

/// Registry of per-user turn locks.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<String, LockSlot>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the user's lock. Released when the guard drops.
    ///
    /// The slot is registered before waiting, so a wait that is abandoned
    /// (the future dropped) still releases its claim.
    pub async fn acquire(&self, user_id: &str) -> UserTurnGuard<'_> {
        // The DashMap shard lock is released at the end of this statement,
        // before the await below.
        let mutex = {
            let mut slot = self
                .locks
                .entry(user_id.to_string())
                .or_insert_with(|| LockSlot {
                    mutex: Arc::new(Mutex::new(())),
                    holders: 0,
                });
            slot.holders += 1;
            slot.mutex.clone()
        };

        let mut turn = UserTurnGuard {
            registry: self,
            user_id: user_id.to_string(),
            guard: None,
        };
        turn.guard = Some(mutex.lock_owned().await);
        turn
    }

    /// Number of users with a held or awaited lock.
    pub fn active_users(&self) -> usize {
        self.locks.len()
    }
}

/// Held for the duration of one turn.
pub struct UserTurnGuard<'a> {
    registry: &'a UserLocks,
    user_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserTurnGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Entry::Occupied(mut slot) = self.registry.locks.entry(self.user_id.clone()) {
            slot.get_mut().holders -= 1;
            if slot.get().holders == 0 {
                slot.remove();
            }
        }
    }
}
