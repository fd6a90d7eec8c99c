//! Shared configuration types for zonewatch.
//!
//! These are plain serde types so the same definitions can be read from the
//! settings file, edited by an external UI, and consumed by the core engine.

mod settings;

pub use settings::{
    ALERT_SOUND, DEFAULT_LOOKUP_RANGE, EntityGroup, Rgba, ZoneSettings,
};
