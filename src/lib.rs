//! remede-core: deterministic entity resolution for a medication catalog
//!
//! This crate turns a regulator-published catalog of pharmaceutical products
//! into treatment-concept clusters: groups of products sharing the same
//! active substances regardless of brand, dosage, form, or spelling, each
//! with one canonical display name.
//!
//! Phases, strictly sequential:
//! - Normalize: rule-driven substance/label normalization and screening
//! - Profile: per-product chemical signatures from raw composition rows
//! - Election: canonical reference product per regulatory group
//! - Cluster: union-find merge of groups over three independent signals
//! - Naming: consensus display name per cluster
//! - Integrate: orphan attachment and promotion, search-text assembly
//!
//! Ingestion, persistence, and search indexing are external collaborators:
//! this crate consumes already-validated records and hands back plain data.

pub mod records;
pub mod report;
pub mod normalize;
pub mod profile;
pub mod election;
pub mod cluster;
pub mod naming;
pub mod integrate;
pub mod pipeline;

// Re-exports for convenience
pub use records::{
    CatalogSnapshot, CompositionRow, GroupId, GroupMembershipRow, MemberType,
    Nature, ProductCode, ProductRecord, RecordError,
};
pub use report::{ValidationLimits, ValidationReport};
pub use normalize::{
    canonical_substance, clustering_key, is_homeopathic, normalize,
    NormalizeOptions,
};
pub use profile::{
    ChemicalProfile, ChemicalProfiler, NameStrategy, ProfilingResult,
    Substance, SubstanceEntry,
};
pub use election::{
    ElectionEngine, ElectionMethod, ElectionResult, ReferenceElection,
    SecondaryReference,
};
pub use cluster::{ClusteringEngine, ClusteringResult, DisjointSet, SuperCluster};
pub use naming::{NamedCluster, NamingEngine, NamingMethod, NamingResult};
pub use integrate::{FinalCluster, IntegrationEngine, IntegrationResult};
pub use pipeline::{Pipeline, PipelineOptions, PipelineResult};
