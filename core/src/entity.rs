//! Per-tick input snapshots.
//!
//! The host world is read elsewhere; the engine only ever sees these plain
//! copies. Nothing here is mutated by the core.

use serde::{Deserialize, Serialize};

/// Stable id of an entity for as long as it exists in the observed world
pub type EntityId = u32;

pub const TILE_TO_GRID: f32 = 23.0;
pub const TILE_TO_WORLD: f32 = 250.0;
/// Converts world-distance units (effect sizes) to grid units (positions)
pub const WORLD_TO_GRID: f32 = TILE_TO_GRID / TILE_TO_WORLD;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One observed effect/terrain/monster-mod entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySnapshot {
    pub id: EntityId,

    /// Path of the base animated object; absent when the entity has no
    /// animation metadata
    pub base_path: Option<String>,

    pub world_pos: Vec3,
    pub grid_pos: Vec2,

    /// Distance to the player, in grid units
    pub distance: f32,

    pub scale: Option<f32>,

    /// Size from the ground effect description, preferred over `animation_size`
    pub ground_effect_size: Option<f32>,

    /// Size from the animation metadata
    pub animation_size: Option<f32>,
}

impl EntitySnapshot {
    /// The path used for matching, if it is usable at all
    pub fn path(&self) -> Option<&str> {
        self.base_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Radius derived from the entity's own data (world units)
    pub fn native_size(&self) -> Option<f32> {
        self.ground_effect_size.or(self.animation_size)
    }

    /// Last `/` segment of the path, for short labels
    pub fn short_name(&self) -> Option<&str> {
        self.path().and_then(|p| p.rsplit('/').next())
    }
}

/// The tracked player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePoint {
    pub grid_pos: Vec2,
    pub world_pos: Vec3,
    pub is_alive: bool,
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self {
            grid_pos: Vec2::default(),
            world_pos: Vec3::default(),
            is_alive: true,
        }
    }
}

/// Visibility of UI panels that hide the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelState {
    pub fullscreen_open: bool,
    pub large_open: bool,
}

/// Everything the engine consumes for one tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    /// Milliseconds since the start of a recording (used by replays)
    pub elapsed_ms: u64,
    pub panels: PanelState,
    pub reference: ReferencePoint,
    /// `None` marks an empty slot in the host entity list
    pub entities: Vec<Option<EntitySnapshot>>,
}
