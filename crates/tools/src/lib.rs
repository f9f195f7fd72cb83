//! Developer tooling: read-only inspection of a running simulation.
//!
//! # Invariants
//! - Inspectors never mutate the simulation.

mod inspector;

pub use inspector::{ObjectInfo, PacingSummary, SimInspector, SimSummary};

pub fn crate_info() -> &'static str {
    "tileworld-tools v0.1.0"
}
