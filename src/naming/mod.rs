//! Naming consensus
//!
//! Derives each super-cluster's display name from its elected reference
//! names, with brand extraction as the guaranteed fallback.

mod consensus;
mod types;

pub use consensus::{find_common_token_run, validate_naming, NamingEngine, NamingResult};
pub use types::{NamedCluster, NamingMethod, NamingStats};
