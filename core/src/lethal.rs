//! Lethal zone tracking
//!
//! While the player is alive every evaluated entity is kept in a rolling
//! two-second cache. On the frame the player is first seen dead, the cache
//! is scanned once for entities whose own radius covers the death position,
//! and their paths are recorded as lethal.
//!
//! The radius here comes only from the entity's data (ground effect size,
//! else animation size). Group overrides and multipliers are not applied,
//! since a historical snapshot has no group context.

use std::sync::Arc;

use crate::cache::TimedEntityCache;
use crate::catalog::PathCatalog;
use crate::clock::Clock;
use crate::entity::{EntitySnapshot, ReferencePoint, Vec2, WORLD_TO_GRID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    /// No frame observed yet
    Unknown,
    Alive,
    Dead,
}

#[derive(Debug)]
pub struct LethalZoneTracker {
    recent: TimedEntityCache,
    liveness: Liveness,
}

impl LethalZoneTracker {
    pub fn new(clock: Arc<dyn Clock>) -> std::io::Result<Self> {
        Ok(Self::with_cache(TimedEntityCache::with_defaults(clock)?))
    }

    pub fn with_cache(recent: TimedEntityCache) -> Self {
        Self {
            recent,
            liveness: Liveness::Unknown,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.liveness != Liveness::Dead
    }

    pub fn recent(&self) -> &TimedEntityCache {
        &self.recent
    }

    /// Update liveness from this frame's reference point
    ///
    /// Returns the newly recorded lethal paths when this frame is the
    /// alive -> dead transition, otherwise an empty list.
    pub fn observe_reference(
        &mut self,
        reference: &ReferencePoint,
        catalog: &PathCatalog,
    ) -> Vec<String> {
        let previous = self.liveness;
        self.liveness = if reference.is_alive {
            Liveness::Alive
        } else {
            Liveness::Dead
        };

        if previous == Liveness::Alive && self.liveness == Liveness::Dead {
            tracing::debug!(
                x = reference.grid_pos.x,
                y = reference.grid_pos.y,
                "Player died, scanning recent effects"
            );
            return self.scan(reference.grid_pos, catalog);
        }
        Vec::new()
    }

    /// Remember an evaluated entity while the player is alive
    pub fn record(&self, entity: &EntitySnapshot) {
        if self.is_alive() {
            self.recent.add(entity.clone());
        }
    }

    /// Record every recent entity whose radius contains `position`
    ///
    /// Returns paths that were not already in the lethal collection, so
    /// repeated scans never add duplicates.
    pub fn scan(&self, position: Vec2, catalog: &PathCatalog) -> Vec<String> {
        let mut added = Vec::new();
        for entity in self.recent.all_alive() {
            if !covers(&entity, position) {
                continue;
            }
            let Some(path) = entity.path() else {
                continue;
            };
            if catalog.record_lethal(path) {
                tracing::info!(path, "Effect present at death");
                added.push(path.to_string());
            }
        }
        added
    }

    pub fn shutdown(&mut self) {
        self.recent.shutdown();
    }
}

/// True if `position` (grid units) lies within the entity's native radius
fn covers(entity: &EntitySnapshot, position: Vec2) -> bool {
    let Some(size) = entity.native_size() else {
        return false;
    };
    entity.grid_pos.distance(position) <= size * WORLD_TO_GRID
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn tracker(clock: Arc<ManualClock>) -> LethalZoneTracker {
        let cache = TimedEntityCache::new(
            Duration::from_secs(2),
            Duration::from_secs(3600),
            clock,
        )
        .unwrap();
        LethalZoneTracker::with_cache(cache)
    }

    fn effect(id: u32, path: &str, at: Vec2, size: f32) -> EntitySnapshot {
        EntitySnapshot {
            id,
            base_path: Some(path.to_string()),
            grid_pos: at,
            ground_effect_size: Some(size),
            ..Default::default()
        }
    }

    fn reference(at: Vec2, is_alive: bool) -> ReferencePoint {
        ReferencePoint {
            grid_pos: at,
            is_alive,
            ..Default::default()
        }
    }

    #[test]
    fn test_death_inside_radius_records_path_once() {
        let clock = Arc::new(ManualClock::new());
        let mut tracker = tracker(clock);
        let catalog = PathCatalog::new();
        let origin = Vec2::new(0.0, 0.0);

        tracker.observe_reference(&reference(origin, true), &catalog);
        // 250 world units -> 23 grid units
        tracker.record(&effect(1, "fire", Vec2::new(10.0, 0.0), 250.0));

        let added = tracker.observe_reference(&reference(origin, false), &catalog);
        assert_eq!(added, vec!["fire"]);

        // Scanning again, or staying dead, never duplicates
        assert!(tracker.scan(origin, &catalog).is_empty());
        assert!(tracker.observe_reference(&reference(origin, false), &catalog).is_empty());
        assert_eq!(catalog.lethal(), vec!["fire"]);
    }

    #[test]
    fn test_death_outside_radius_records_nothing() {
        let clock = Arc::new(ManualClock::new());
        let mut tracker = tracker(clock);
        let catalog = PathCatalog::new();

        tracker.observe_reference(&reference(Vec2::default(), true), &catalog);
        tracker.record(&effect(1, "fire", Vec2::new(30.0, 0.0), 250.0));
        tracker.observe_reference(&reference(Vec2::default(), false), &catalog);

        assert!(catalog.lethal().is_empty());
    }

    #[test]
    fn test_expired_entities_are_not_lethal() {
        let clock = Arc::new(ManualClock::new());
        let mut tracker = tracker(clock.clone());
        let catalog = PathCatalog::new();

        tracker.observe_reference(&reference(Vec2::default(), true), &catalog);
        tracker.record(&effect(1, "old_fire", Vec2::default(), 250.0));
        clock.advance(Duration::from_millis(2500));
        tracker.observe_reference(&reference(Vec2::default(), false), &catalog);

        assert!(catalog.lethal().is_empty());
    }

    #[test]
    fn test_no_recording_while_dead() {
        let clock = Arc::new(ManualClock::new());
        let mut tracker = tracker(clock);
        let catalog = PathCatalog::new();

        tracker.observe_reference(&reference(Vec2::default(), true), &catalog);
        tracker.observe_reference(&reference(Vec2::default(), false), &catalog);
        tracker.record(&effect(1, "fire", Vec2::default(), 250.0));
        assert!(tracker.recent().is_empty());

        // Revive, then die again: a second transition scans again
        tracker.observe_reference(&reference(Vec2::default(), true), &catalog);
        tracker.record(&effect(1, "fire", Vec2::default(), 250.0));
        let added = tracker.observe_reference(&reference(Vec2::default(), false), &catalog);
        assert_eq!(added, vec!["fire"]);
    }

    #[test]
    fn test_first_frame_dead_does_not_scan() {
        let clock = Arc::new(ManualClock::new());
        let mut tracker = tracker(clock);
        let catalog = PathCatalog::new();
        let added = tracker.observe_reference(&reference(Vec2::default(), false), &catalog);
        assert!(added.is_empty());
        assert!(!tracker.is_alive());
    }

    #[test]
    fn test_radius_ignores_missing_size() {
        let entity = EntitySnapshot {
            id: 1,
            base_path: Some("x".into()),
            ..Default::default()
        };
        assert!(!covers(&entity, Vec2::default()));

        let entity = EntitySnapshot {
            animation_size: Some(100.0),
            grid_pos: Vec2::new(9.0, 0.0),
            ..entity
        };
        // 100 * 23 / 250 = 9.2
        assert!(covers(&entity, Vec2::default()));
    }
}
