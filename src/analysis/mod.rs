//! Analysis modules.
//!
//! Score aggregation lives here; loading and rendering are handled
//! by the `input` and `report` modules.

pub mod aggregator;

pub use aggregator::*;
