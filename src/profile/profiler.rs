//! Chemical profiler
//!
//! Turns raw composition rows into one deterministic chemical signature per
//! product. The same physical ingredient usually appears twice (active
//! fraction and pure substance, tied by link id); exactly one row wins and
//! fixes both the substance name and its dosage.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::normalize::canonical_substance;
use crate::records::{is_valid_substance_code, CompositionRow, Nature, ProductCode};
use crate::report::{ValidationLimits, ValidationReport};

use super::types::*;

/// Output of the profiling phase.
#[derive(Debug, Clone, Default)]
pub struct ProfilingResult {
    pub profiles: FxHashMap<ProductCode, ChemicalProfile>,
    pub dictionary: FxHashMap<String, SubstanceEntry>,
    pub stats: ProfilingStats,
}

impl ProfilingResult {
    pub fn profile(&self, product: &ProductCode) -> Option<&ChemicalProfile> {
        self.profiles.get(product)
    }
}

/// Builds chemical profiles from composition rows.
pub struct ChemicalProfiler;

impl ChemicalProfiler {
    pub fn new() -> Self {
        Self
    }

    /// Profiles every product present in `rows`.
    ///
    /// Rows must already be restricted to included products; the profiler
    /// never consults product records.
    pub fn profile(&self, rows: &[CompositionRow]) -> ProfilingResult {
        let mut by_product: FxHashMap<ProductCode, Vec<&CompositionRow>> = FxHashMap::default();
        let mut order: Vec<ProductCode> = Vec::new();
        let mut variations: FxHashMap<String, Vec<String>> = FxHashMap::default();

        for row in rows {
            by_product
                .entry(row.product.clone())
                .or_insert_with(|| {
                    order.push(row.product.clone());
                    Vec::new()
                })
                .push(row);

            if is_valid_substance_code(&row.substance_code) {
                let name = crate::normalize::squeeze(&crate::normalize::strip_diacritics(
                    row.substance_name.trim(),
                ))
                .to_uppercase();
                if !name.is_empty() {
                    let entry = variations.entry(row.substance_code.trim().to_string()).or_default();
                    if !entry.contains(&name) {
                        entry.push(name);
                    }
                }
            }
        }

        let dictionary = build_dictionary(variations);

        let mut profiles: FxHashMap<ProductCode, ChemicalProfile> = FxHashMap::default();
        let mut stats = ProfilingStats::default();

        for product in order {
            let product_rows = &by_product[&product];
            let winners = select_link_winners(product_rows, &mut stats.link_conflicts_resolved);
            let consolidated = consolidate_variants(winners);

            let mut substances: SmallVec<[Substance; 2]> = SmallVec::new();
            let mut tokens: Vec<String> = Vec::new();

            for row in consolidated {
                let code = row.substance_code.trim().to_string();
                let display_name = dictionary
                    .get(&code)
                    .map(|entry| entry.canonical_name.clone())
                    .unwrap_or_else(|| row.substance_name.trim().to_string());

                let token = if is_valid_substance_code(&code) {
                    Some(code.clone())
                } else {
                    let canonical = canonical_substance(&row.substance_name);
                    (!canonical.is_empty()).then_some(canonical)
                };
                match token {
                    Some(token) => {
                        if !tokens.contains(&token) {
                            tokens.push(token);
                        }
                    }
                    None => stats.rows_dropped += 1,
                }

                // Dropped rows keep their display entry when a name exists.
                if !display_name.is_empty() {
                    let substance = Substance {
                        code,
                        name: display_name,
                        dosage: row.dosage.trim().to_string(),
                    };
                    if !substances.contains(&substance) {
                        substances.push(substance);
                    }
                }
            }

            tokens.sort_unstable();
            let chemical_id = tokens.join("+");

            profiles.insert(
                product.clone(),
                ChemicalProfile {
                    product,
                    chemical_id,
                    substances,
                },
            );
        }

        stats.products_profiled = profiles.len();
        let mut distinct: Vec<&str> = profiles
            .values()
            .filter(|p| p.has_signature())
            .map(|p| p.chemical_id.as_str())
            .collect();
        distinct.sort_unstable();
        distinct.dedup();
        stats.distinct_chemical_ids = distinct.len();

        tracing::info!(
            products = stats.products_profiled,
            chemical_ids = stats.distinct_chemical_ids,
            conflicts = stats.link_conflicts_resolved,
            "chemical profiling done"
        );

        ProfilingResult {
            profiles,
            dictionary,
            stats,
        }
    }
}

impl Default for ChemicalProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Advisory checks on profiling output.
pub fn validate_profiling(result: &ProfilingResult, limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport::new("PROFILING");

    if result.stats.distinct_chemical_ids < limits.min_chemical_ids {
        report.push(format!(
            "too few chemical signatures: {}",
            result.stats.distinct_chemical_ids
        ));
    }
    if result.stats.distinct_chemical_ids > limits.max_chemical_ids {
        report.push(format!(
            "chemical signature explosion: {}",
            result.stats.distinct_chemical_ids
        ));
    }
    if result.stats.link_conflicts_resolved < limits.min_link_conflicts
        || result.stats.link_conflicts_resolved > limits.max_link_conflicts
    {
        report.push(format!(
            "link conflict count anomaly: {}",
            result.stats.link_conflicts_resolved
        ));
    }

    report
}

/// Within each link-id group exactly one row wins: the first active-fraction
/// row, else the first pure-substance row, else the first row present. The
/// winner fixes both name and dosage; forms are never mixed.
fn select_link_winners<'a>(
    rows: &[&'a CompositionRow],
    conflicts: &mut usize,
) -> Vec<&'a CompositionRow> {
    let mut standalone: Vec<&CompositionRow> = Vec::new();
    let mut by_link: Vec<(String, Vec<&CompositionRow>)> = Vec::new();

    for row in rows {
        let link = row.link_id.trim();
        if link.is_empty() || link == "0" {
            standalone.push(row);
            continue;
        }
        match by_link.iter_mut().find(|(id, _)| id == link) {
            Some((_, group)) => group.push(row),
            None => by_link.push((link.to_string(), vec![row])),
        }
    }

    let mut winners = standalone;
    for (_, group) in by_link {
        let winner = group
            .iter()
            .find(|r| r.nature == Nature::ActiveFraction)
            .or_else(|| group.iter().find(|r| r.nature == Nature::PureSubstance))
            .copied()
            .unwrap_or(group[0]);
        if group.len() > 1 && winner.nature == Nature::ActiveFraction {
            *conflicts += 1;
        }
        winners.push(winner);
    }
    winners
}

/// Merges rows whose names differ only by hydration state or salt suffix,
/// preferring whichever variant already carries a populated dosage.
fn consolidate_variants<'a>(winners: Vec<&'a CompositionRow>) -> Vec<&'a CompositionRow> {
    let mut kept: Vec<(String, &CompositionRow)> = Vec::new();
    for row in winners {
        let base = canonical_substance(&row.substance_name);
        let key = if base.is_empty() {
            row.substance_code.trim().to_string()
        } else {
            base
        };
        match kept.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                if existing.dosage.trim().is_empty() && !row.dosage.trim().is_empty() {
                    *existing = row;
                }
            }
            None => kept.push((key, row)),
        }
    }
    let mut rows: Vec<&CompositionRow> = kept.into_iter().map(|(_, r)| r).collect();
    rows.sort_by(|a, b| {
        a.substance_code
            .trim()
            .cmp(b.substance_code.trim())
            .then_with(|| a.substance_name.cmp(&b.substance_name))
    });
    rows
}

/// Elects the canonical display spelling per substance code.
fn build_dictionary(variations: FxHashMap<String, Vec<String>>) -> FxHashMap<String, SubstanceEntry> {
    let mut dictionary = FxHashMap::default();
    for (code, mut vars) in variations {
        vars.sort_unstable();
        let (canonical_name, strategy) = elect_name(&vars);
        dictionary.insert(
            code.clone(),
            SubstanceEntry {
                code,
                canonical_name,
                strategy,
                variations: vars,
            },
        );
    }
    dictionary
}

fn elect_name(vars: &[String]) -> (String, NameStrategy) {
    if vars.len() == 1 {
        return (vars[0].clone(), NameStrategy::Unique);
    }

    let shortest = |candidates: &[&String]| -> String {
        candidates
            .iter()
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    let with_parens: Vec<&String> = vars
        .iter()
        .filter(|v| {
            v.contains('(') && v.contains(')') && v.find('(').map(|i| i > 0).unwrap_or(false)
        })
        .collect();
    if !with_parens.is_empty() {
        return (shortest(&with_parens), NameStrategy::Parenthesis);
    }

    let all: Vec<&String> = vars.iter().collect();
    (shortest(&all), NameStrategy::Shortest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Nature;

    fn row(
        product: &str,
        code: &str,
        name: &str,
        dosage: &str,
        nature: Nature,
        link: &str,
    ) -> CompositionRow {
        CompositionRow {
            product: ProductCode::parse(product).unwrap(),
            element: "comprimé".to_string(),
            substance_code: code.to_string(),
            substance_name: name.to_string(),
            dosage: dosage.to_string(),
            nature,
            link_id: link.to_string(),
        }
    }

    #[test]
    fn test_active_fraction_wins_link_group() {
        let rows = vec![
            row("60000001", "42215", "MEMANTINE (CHLORHYDRATE DE)", "10 mg", Nature::PureSubstance, "1"),
            row("60000001", "42964", "MEMANTINE", "8,31 mg", Nature::ActiveFraction, "1"),
        ];
        let result = ChemicalProfiler::new().profile(&rows);
        let profile = result
            .profile(&ProductCode::parse("60000001").unwrap())
            .unwrap();
        // The winning row fixes name and dosage together.
        assert_eq!(profile.substances.len(), 1);
        assert_eq!(profile.substances[0].dosage, "8,31 mg");
        assert_eq!(profile.chemical_id, "42964");
        assert_eq!(result.stats.link_conflicts_resolved, 1);
    }

    #[test]
    fn test_signature_sorted_by_code() {
        let rows = vec![
            row("60000002", "9000", "HYDROCHLOROTHIAZIDE", "12,5 mg", Nature::PureSubstance, "0"),
            row("60000002", "1000", "CAPTOPRIL", "25 mg", Nature::PureSubstance, "0"),
        ];
        let result = ChemicalProfiler::new().profile(&rows);
        let profile = result
            .profile(&ProductCode::parse("60000002").unwrap())
            .unwrap();
        assert_eq!(profile.chemical_id, "1000+9000");
    }

    #[test]
    fn test_hydrate_variants_consolidated() {
        let rows = vec![
            row("60000003", "779", "AMOXICILLINE TRIHYDRATE", "", Nature::PureSubstance, "0"),
            row("60000003", "779", "AMOXICILLINE", "500 mg", Nature::PureSubstance, "0"),
        ];
        let result = ChemicalProfiler::new().profile(&rows);
        let profile = result
            .profile(&ProductCode::parse("60000003").unwrap())
            .unwrap();
        assert_eq!(profile.substances.len(), 1);
        assert_eq!(profile.substances[0].dosage, "500 mg");
        assert_eq!(profile.chemical_id, "779");
    }

    #[test]
    fn test_invalid_code_falls_back_to_name() {
        let rows = vec![row(
            "60000004",
            "0",
            "CHLORHYDRATE DE NEFOPAM",
            "20 mg",
            Nature::PureSubstance,
            "0",
        )];
        let result = ChemicalProfiler::new().profile(&rows);
        let profile = result
            .profile(&ProductCode::parse("60000004").unwrap())
            .unwrap();
        assert_eq!(profile.chemical_id, "NEFOPAM");
    }

    #[test]
    fn test_unusable_row_dropped_from_signature() {
        let rows = vec![
            row("60000005", "", "", "", Nature::PureSubstance, "0"),
            row("60000005", "123", "DOXORUBICINE", "50 mg", Nature::PureSubstance, "0"),
        ];
        let result = ChemicalProfiler::new().profile(&rows);
        let profile = result
            .profile(&ProductCode::parse("60000005").unwrap())
            .unwrap();
        assert_eq!(profile.chemical_id, "123");
        assert_eq!(result.stats.rows_dropped, 1);
    }

    #[test]
    fn test_dictionary_prefers_parenthesised_spelling() {
        let rows = vec![
            row("60000006", "555", "MEMANTINE (CHLORHYDRATE DE)", "10 mg", Nature::PureSubstance, "0"),
            row("60000007", "555", "CHLORHYDRATE DE MEMANTINE ANHYDRE SOLVATE", "10 mg", Nature::PureSubstance, "0"),
        ];
        let result = ChemicalProfiler::new().profile(&rows);
        let entry = result.dictionary.get("555").unwrap();
        assert_eq!(entry.strategy, NameStrategy::Parenthesis);
        assert_eq!(entry.canonical_name, "MEMANTINE (CHLORHYDRATE DE)");
    }

    #[test]
    fn test_signature_order_independent() {
        let forward = vec![
            row("60000008", "2000", "A", "1 mg", Nature::PureSubstance, "0"),
            row("60000008", "3000", "B", "2 mg", Nature::PureSubstance, "0"),
        ];
        let reversed = vec![
            row("60000009", "3000", "B", "2 mg", Nature::PureSubstance, "0"),
            row("60000009", "2000", "A", "1 mg", Nature::PureSubstance, "0"),
        ];
        let fwd = ChemicalProfiler::new().profile(&forward);
        let rev = ChemicalProfiler::new().profile(&reversed);
        let a = fwd.profile(&ProductCode::parse("60000008").unwrap()).unwrap();
        let b = rev.profile(&ProductCode::parse("60000009").unwrap()).unwrap();
        assert_eq!(a.chemical_id, b.chemical_id);
    }
}
