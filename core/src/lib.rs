pub mod cache;
pub mod catalog;
pub mod classify;
pub mod clock;
pub mod config;
pub mod entity;
pub mod lethal;
pub mod matcher;

// Re-exports for convenience
pub use cache::{RejectionCache, TimedEntityCache};
pub use catalog::PathCatalog;
pub use classify::{AlertRequest, DebugText, DrawCommand, TickOutput, Verdict, ZoneClassifier};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::*;
pub use lethal::LethalZoneTracker;
pub use matcher::{MatcherCache, MatcherError, PathMatcher};
pub use zonewatch_types::{EntityGroup, Rgba, ZoneSettings};
