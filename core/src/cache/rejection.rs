use std::sync::Arc;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::entity::EntityId;

/// How long a rejection short-circuits classification
pub const REJECTION_TTL: Duration = Duration::from_secs(1);

/// Entity id -> last rejection time
///
/// Stale records are dropped by the reader; there is no sweeper. Keyed by id
/// rather than path because entities sharing a path are rejected independently.
pub struct RejectionCache {
    entries: Mutex<HashMap<EntityId, Instant>>,
    clock: Arc<dyn Clock>,
}

impl RejectionCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn mark_rejected(&self, id: EntityId) {
        let now = self.clock.now();
        self.entries.lock().insert(id, now);
    }

    pub fn is_rejected_recently(&self, id: EntityId) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        match entries.get(&id) {
            Some(at) if now.saturating_duration_since(*at) <= REJECTION_TTL => true,
            Some(_) => {
                entries.remove(&id);
                false
            }
            None => false,
        }
    }

    /// Drop every stale record, returning how many were removed
    ///
    /// Covers entities that vanished from the world and are never read again.
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, at| now.saturating_duration_since(*at) <= REJECTION_TTL);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for RejectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RejectionCache")
            .field("len", &self.len())
            .finish()
    }
}
