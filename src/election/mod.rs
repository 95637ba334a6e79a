//! Reference election
//!
//! Per regulatory group, elects the canonical reference product with a
//! label-parsing fallback, so every group resolves to a usable name.

mod engine;
mod types;

pub use engine::{validate_election, ElectionEngine, ElectionResult};
pub use types::{ElectionMethod, ElectionStats, ReferenceElection, SecondaryReference};
