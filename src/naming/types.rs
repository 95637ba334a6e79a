//! Types for naming consensus

use serde::{Deserialize, Serialize};

use crate::cluster::SuperCluster;

/// How a cluster's display name was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamingMethod {
    /// Longest token window shared by every elected reference name.
    LcsConsensus,
    /// Only one reference name existed; used verbatim.
    SingleSource,
    /// Consensus failed or was spurious; first brand token of the first
    /// name, or a label synthesized from the chemical signature.
    BrandExtractionFallback,
}

/// A super-cluster with its resolved display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedCluster {
    pub cluster: SuperCluster,
    /// Never empty, never pure digits.
    pub display_name: String,
    pub method: NamingMethod,
    /// Up to five source names the consensus was computed from.
    pub sample_names: Vec<String>,
}

/// Counters emitted by the naming phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamingStats {
    pub clusters: usize,
    pub consensus: usize,
    pub single_source: usize,
    pub fallbacks: usize,
}
