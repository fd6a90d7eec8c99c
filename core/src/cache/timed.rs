use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::clock::Clock;
use crate::entity::{EntityId, EntitySnapshot};

pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(2);
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_millis(100);

/// Max records removed per write-lock acquisition during a sweep
const SWEEP_BATCH: usize = 256;

#[derive(Debug, Clone)]
struct Record {
    entity: Arc<EntitySnapshot>,
    seen_at: Instant,
}

struct Shared {
    records: RwLock<HashMap<EntityId, Record>>,
    expiration: Duration,
    clock: Arc<dyn Clock>,
}

impl Shared {
    fn is_expired(&self, record: &Record, now: Instant) -> bool {
        now.saturating_duration_since(record.seen_at) > self.expiration
    }

    /// Remove every expired record, a batch at a time
    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let expired: Vec<EntityId> = self
            .records
            .read()
            .iter()
            .filter(|(_, record)| self.is_expired(record, now))
            .map(|(id, _)| *id)
            .collect();

        let mut removed = 0;
        for batch in expired.chunks(SWEEP_BATCH) {
            let mut records = self.records.write();
            for id in batch {
                // Re-check: the producer may have refreshed it since the scan
                if records.get(id).is_some_and(|r| self.is_expired(r, now)) {
                    records.remove(id);
                    removed += 1;
                }
            }
        }
        removed
    }
}

/// Entities seen within the last `expiration`, keyed by id
///
/// Expired records are never returned. They are removed when a `get` trips
/// over them and by a background thread that sweeps every `sweep_period`,
/// so memory stays bounded even when nothing reads the cache.
///
/// The sweeper stops on [`shutdown`](Self::shutdown) or drop.
pub struct TimedEntityCache {
    shared: Arc<Shared>,
    stop_tx: Option<Sender<()>>,
    sweeper: Option<JoinHandle<()>>,
}

impl TimedEntityCache {
    pub fn new(
        expiration: Duration,
        sweep_period: Duration,
        clock: Arc<dyn Clock>,
    ) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            records: RwLock::new(HashMap::new()),
            expiration,
            clock,
        });

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let sweep_shared = Arc::clone(&shared);
        let sweeper = thread::Builder::new()
            .name("entity-cache-sweep".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(sweep_period) {
                        Err(RecvTimeoutError::Timeout) => {
                            let removed = sweep_shared.sweep();
                            if removed > 0 {
                                tracing::trace!(removed, "Swept expired entities");
                            }
                        }
                        // Stop requested or cache dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("Entity cache sweeper stopped");
            })?;

        Ok(Self {
            shared,
            stop_tx: Some(stop_tx),
            sweeper: Some(sweeper),
        })
    }

    /// 2 second window, swept every 100ms
    pub fn with_defaults(clock: Arc<dyn Clock>) -> std::io::Result<Self> {
        Self::new(DEFAULT_EXPIRATION, DEFAULT_SWEEP_PERIOD, clock)
    }

    pub fn expiration(&self) -> Duration {
        self.shared.expiration
    }

    /// Insert, or refresh the timestamp and snapshot of an existing id
    pub fn add(&self, entity: EntitySnapshot) {
        let record = Record {
            entity: Arc::new(entity),
            seen_at: self.shared.clock.now(),
        };
        self.shared.records.write().insert(record.entity.id, record);
    }

    pub fn get(&self, id: EntityId) -> Option<Arc<EntitySnapshot>> {
        let now = self.shared.clock.now();
        {
            let records = self.shared.records.read();
            match records.get(&id) {
                None => return None,
                Some(record) if !self.shared.is_expired(record, now) => {
                    return Some(Arc::clone(&record.entity));
                }
                Some(_) => {}
            }
        }

        let mut records = self.shared.records.write();
        if records.get(&id).is_some_and(|r| self.shared.is_expired(r, now)) {
            records.remove(&id);
        }
        None
    }

    /// Every non-expired entity as of now
    pub fn all_alive(&self) -> Vec<Arc<EntitySnapshot>> {
        let now = self.shared.clock.now();
        self.shared
            .records
            .read()
            .values()
            .filter(|record| !self.shared.is_expired(record, now))
            .map(|record| Arc::clone(&record.entity))
            .collect()
    }

    /// Run one sweep immediately, returning the number of removed records
    pub fn sweep_now(&self) -> usize {
        self.shared.sweep()
    }

    /// Stored records, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.shared.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.records.read().is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.sweeper.is_some()
    }

    /// Stop the background sweeper and wait for it to exit
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.sweeper.take()
            && handle.join().is_err()
        {
            tracing::error!("Entity cache sweeper panicked");
        }
    }
}

impl Drop for TimedEntityCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TimedEntityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedEntityCache")
            .field("expiration", &self.shared.expiration)
            .field("len", &self.len())
            .field("running", &self.is_running())
            .finish()
    }
}
