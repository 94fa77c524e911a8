//! Rate aggregation engine.
//!
//! - Sources: traits for the primary (shop) and secondary (ground saver) quote sources
//! - Raw: carrier rating response structures
//! - Normalize: raw carrier records to normalized quotes
//! - Aggregator: merges and orders quotes from both sources

mod aggregator;
pub mod normalize;
pub mod raw;
mod sources;

pub use aggregator::*;
pub use sources::*;
