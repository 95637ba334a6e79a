//! Orphan integration
//!
//! Final phase: attaches ungrouped products to clusters, promotes the rest,
//! and assembles persistence-ready cluster metadata.

mod engine;
mod types;

pub use engine::{validate_integration, IntegrationEngine, IntegrationResult};
pub use types::{FinalCluster, IntegrationStats};
