use std::time::{Duration, Instant};

use hashbrown::HashMap;

use crate::entity::EntityId;

/// Minimum time between two alert sounds, across all groups
pub const ALERT_COOLDOWN: Duration = Duration::from_secs(5);

/// How long an entity stays in the already-alerted set
pub const ALERT_MEMORY: Duration = Duration::from_secs(60);

/// Shared cooldown plus per-entity dedup for alert sounds
///
/// An entity alerts at most once while it is remembered. Remembered ids are
/// aged out whenever the cooldown resets, so the set stays bounded by how
/// many alerts can fire within `memory`.
#[derive(Debug)]
pub struct AlertGate {
    cooldown: Duration,
    memory: Duration,
    last_fired: Option<Instant>,
    alerted: HashMap<EntityId, Instant>,
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(ALERT_COOLDOWN, ALERT_MEMORY)
    }
}

impl AlertGate {
    pub fn new(cooldown: Duration, memory: Duration) -> Self {
        Self {
            cooldown,
            memory,
            last_fired: None,
            alerted: HashMap::new(),
        }
    }

    /// Returns true (and consumes the cooldown) if an alert for `id` may play now
    pub fn try_fire(&mut self, id: EntityId, now: Instant) -> bool {
        let cooled_down = self
            .last_fired
            .is_none_or(|at| now.saturating_duration_since(at) > self.cooldown);
        if !cooled_down || self.alerted.contains_key(&id) {
            return false;
        }

        self.last_fired = Some(now);
        let memory = self.memory;
        self.alerted
            .retain(|_, at| now.saturating_duration_since(*at) <= memory);
        self.alerted.insert(id, now);
        true
    }

    pub fn remembered(&self) -> usize {
        self.alerted.len()
    }
}
