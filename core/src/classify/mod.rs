//! Effect zone classification
//!
//! ```text
//! Frame (host snapshot)
//!     │
//!     ▼
//! ZoneClassifier::tick ──► RejectionCache (skip recent failures)
//!     │                 ──► MatcherCache   (blacklist, then groups)
//!     │                 ──► PathCatalog    (unknown paths)
//!     │                 ──► LethalZoneTracker (recent entities, death scan)
//!     ▼
//! TickOutput: draws, alert requests, debug labels, new lethal paths
//! ```

mod alert;
mod output;
mod pipeline;


pub use alert::{ALERT_COOLDOWN, ALERT_MEMORY, AlertGate};
pub use output::{AlertRequest, DebugText, DrawCommand, TickOutput};
pub use pipeline::{Verdict, ZoneClassifier};
