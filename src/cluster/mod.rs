//! Graph clustering
//!
//! Disjoint-set merge of regulatory groups over three independent linking
//! signals, materialized into super-clusters with content-derived ids.

mod dsu;
mod engine;
mod types;

pub use dsu::DisjointSet;
pub use engine::{validate_clustering, ClusteringEngine, ClusteringResult};
pub(crate) use engine::cluster_id;
pub use types::{ClusteringStats, SuperCluster};
