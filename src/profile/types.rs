//! Types for chemical profiling

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::records::ProductCode;

/// One active substance of a product, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substance {
    /// Regulator substance code; may be empty on dirty rows.
    pub code: String,
    /// Canonical display name resolved through the substance dictionary.
    pub name: String,
    /// Free-text dosage as declared.
    pub dosage: String,
}

/// Deterministic chemical signature of one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemicalProfile {
    pub product: ProductCode,
    /// Sorted, joined substance tokens; empty when no row was usable.
    pub chemical_id: String,
    /// Ordered, deduplicated substances; most products carry one or two.
    pub substances: SmallVec<[Substance; 2]>,
}

impl ChemicalProfile {
    /// A profile with no derivable signature still exists for display but
    /// never drives clustering.
    pub fn has_signature(&self) -> bool {
        !self.chemical_id.is_empty()
    }
}

/// How a substance code's canonical display name was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameStrategy {
    /// Only one spelling observed.
    Unique,
    /// Shortest spelling carrying a parenthesised salt hint.
    Parenthesis,
    /// Shortest spelling overall.
    Shortest,
}

/// Canonical display entry for one substance code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstanceEntry {
    pub code: String,
    pub canonical_name: String,
    pub strategy: NameStrategy,
    /// Every observed spelling, sorted.
    pub variations: Vec<String>,
}

/// Counters emitted by the profiling phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilingStats {
    pub products_profiled: usize,
    pub distinct_chemical_ids: usize,
    /// Link groups where the active-fraction row displaced a pure-substance
    /// row.
    pub link_conflicts_resolved: usize,
    /// Rows with neither a usable code nor a usable name.
    pub rows_dropped: usize,
}
