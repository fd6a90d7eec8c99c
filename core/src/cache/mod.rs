//! Time-aware entity caches
//!
//! - [`TimedEntityCache`]: recently seen entities, swept in the background
//! - [`RejectionCache`]: entities that recently failed classification

mod rejection;
mod timed;

pub use rejection::{REJECTION_TTL, RejectionCache};
pub use timed::{DEFAULT_EXPIRATION, DEFAULT_SWEEP_PERIOD, TimedEntityCache};
