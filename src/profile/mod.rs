//! Chemical profiling
//!
//! Converts per-product raw composition rows into a deterministic chemical
//! signature and a catalog-wide substance display dictionary.

mod profiler;
mod types;

pub use profiler::{validate_profiling, ChemicalProfiler, ProfilingResult};
pub use types::{ChemicalProfile, NameStrategy, ProfilingStats, Substance, SubstanceEntry};
