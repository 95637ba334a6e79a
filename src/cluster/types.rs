//! Types for graph clustering

use serde::{Deserialize, Serialize};

use crate::records::{GroupId, ProductCode};

/// A maximal set of regulatory groups sharing one treatment concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperCluster {
    /// Content-derived id, stable across runs: xxh3 of the sorted member
    /// product-code set.
    pub id: String,
    /// Member groups in first-seen input order.
    pub group_ids: Vec<GroupId>,
    /// Sorted, deduplicated member product codes.
    pub product_codes: Vec<ProductCode>,
    /// Majority chemical signature across member products; empty when no
    /// member has one.
    pub signature: String,
    /// Every distinct per-group majority signature absorbed, sorted.
    pub signatures: Vec<String>,
}

/// Counters emitted by the clustering phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusteringStats {
    pub groups_total: usize,
    pub clusters: usize,
    /// Groups with no derivable signature, kept as singletons.
    pub unsignatured_groups: usize,
    pub unions_by_majority_signature: usize,
    pub unions_by_code_set: usize,
    pub unions_by_text_signature: usize,
}
