//! Per-room serialization of mutating operations.
//!
//! One logical lock per room, held for the full span of a single lifecycle
//! operation *including* event publication. That makes the per-room event
//! order identical to the mutation order. Operations on different rooms do
//! not contend.
//!
//! Uses the dashmap-of-per-key-mutexes pattern; the optimistic lock_version
//! on the rooms table remains as a backstop for writers outside this
//! process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct RoomLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the mutation lock for one room.
    ///
    /// The returned guard is owned, so it can be held across the whole
    /// transaction + publish sequence.
    pub async fn acquire(&self, room_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the registry entry for a room that reached Cancelled.
    ///
    /// In-flight holders keep their Arc; a straggler simply re-creates the
    /// entry, which is harmless for an already-cancelled room.
    pub fn release(&self, room_id: i64) {
        self.locks.remove(&room_id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }
}
