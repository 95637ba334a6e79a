//! Pipeline orchestrator
//!
//! Runs the phases strictly in sequence — screening, profiling, election,
//! clustering, naming, integration — each consuming only the outputs of the
//! phases before it. Re-running over identical input reproduces identical
//! cluster ids, names, and assignments.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cluster::{validate_clustering, ClusteringEngine, ClusteringStats};
use crate::election::{validate_election, ElectionEngine, ElectionStats};
use crate::integrate::{validate_integration, FinalCluster, IntegrationEngine, IntegrationStats};
use crate::naming::{validate_naming, NamingEngine, NamingStats};
use crate::normalize::is_homeopathic;
use crate::profile::{validate_profiling, ChemicalProfiler, ProfilingStats};
use crate::records::{CatalogSnapshot, ProductCode};
use crate::report::{ValidationLimits, ValidationReport};

/// Pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub validation: ValidationLimits,
}

/// Counters from every phase of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub products_total: usize,
    pub products_excluded: usize,
    pub profiling: ProfilingStats,
    pub election: ElectionStats,
    pub clustering: ClusteringStats,
    pub naming: NamingStats,
    pub integration: IntegrationStats,
}

/// Everything the persistence and indexing collaborators consume.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Final clusters with display names and search text.
    pub clusters: Vec<FinalCluster>,
    /// Product code to cluster id; covers every included product once.
    pub assignments: BTreeMap<ProductCode, String>,
    /// Advisory per-phase reports; never block execution.
    pub reports: Vec<ValidationReport>,
    pub stats: PipelineStats,
}

impl PipelineResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The full entity-resolution pipeline.
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Runs all phases over one immutable snapshot.
    pub fn run(&self, snapshot: &CatalogSnapshot) -> PipelineResult {
        let limits = &self.options.validation;
        let mut reports: Vec<ValidationReport> = Vec::new();

        // Screening: homeopathic preparations carry no usable profile.
        let mut dosage_text: FxHashMap<&ProductCode, String> = FxHashMap::default();
        for row in &snapshot.compositions {
            let entry = dosage_text.entry(&row.product).or_default();
            if !row.dosage.trim().is_empty() {
                if !entry.is_empty() {
                    entry.push(' ');
                }
                entry.push_str(row.dosage.trim());
            }
        }
        let excluded: FxHashSet<ProductCode> = snapshot
            .products
            .iter()
            .filter(|p| {
                let dosage = dosage_text
                    .get(&p.code)
                    .map(String::as_str)
                    .unwrap_or_default();
                is_homeopathic(&p.label, dosage)
            })
            .map(|p| p.code.clone())
            .collect();

        let products: Vec<_> = snapshot
            .products
            .iter()
            .filter(|p| !excluded.contains(&p.code))
            .cloned()
            .collect();
        let included: FxHashSet<&ProductCode> = products.iter().map(|p| &p.code).collect();
        let memberships: Vec<_> = snapshot
            .memberships
            .iter()
            .filter(|m| included.contains(&m.product))
            .cloned()
            .collect();
        let compositions: Vec<_> = snapshot
            .compositions
            .iter()
            .filter(|c| included.contains(&c.product))
            .cloned()
            .collect();

        tracing::info!(
            products = products.len(),
            excluded = excluded.len(),
            "screening done"
        );

        let profiling = ChemicalProfiler::new().profile(&compositions);
        reports.push(validate_profiling(&profiling, limits));

        let elections = ElectionEngine::new().elect(&products, &memberships);
        reports.push(validate_election(&elections, limits));

        let clustering = ClusteringEngine::new().cluster(&memberships, &profiling);
        reports.push(validate_clustering(&clustering, limits));
        let clustering_stats = clustering.stats.clone();

        let naming = NamingEngine::new().name(clustering.clusters, &elections);
        reports.push(validate_naming(&naming, limits));
        let naming_stats = naming.stats.clone();

        let integration =
            IntegrationEngine::new().integrate(naming.named, &products, &profiling, &elections);
        reports.push(validate_integration(&integration, limits));

        let mut assignments: BTreeMap<ProductCode, String> = BTreeMap::new();
        for cluster in &integration.clusters {
            for code in cluster.all_products() {
                assignments.insert(code.clone(), cluster.id.clone());
            }
        }

        let stats = PipelineStats {
            products_total: snapshot.products.len(),
            products_excluded: excluded.len(),
            profiling: profiling.stats,
            election: elections.stats,
            clustering: clustering_stats,
            naming: naming_stats,
            integration: integration.stats,
        };

        PipelineResult {
            clusters: integration.clusters,
            assignments,
            reports,
            stats,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{
        CompositionRow, GroupId, GroupMembershipRow, MemberType, Nature, ProductRecord,
    };

    fn product(code: &str, label: &str) -> ProductRecord {
        ProductRecord {
            code: ProductCode::parse(code).unwrap(),
            label: label.to_string(),
            authorization_active: true,
            marketed: true,
            seniority: 1,
        }
    }

    fn membership(group: &str, label: &str, code: &str, member_type: MemberType) -> GroupMembershipRow {
        GroupMembershipRow {
            group_id: GroupId::parse(group).unwrap(),
            group_label: label.to_string(),
            product: ProductCode::parse(code).unwrap(),
            member_type,
            seniority: 1,
        }
    }

    fn compo(product: &str, code: &str, name: &str, dosage: &str) -> CompositionRow {
        CompositionRow {
            product: ProductCode::parse(product).unwrap(),
            element: "comprimé".to_string(),
            substance_code: code.to_string(),
            substance_name: name.to_string(),
            dosage: dosage.to_string(),
            nature: Nature::PureSubstance,
            link_id: "0".to_string(),
        }
    }

    fn run(snapshot: &CatalogSnapshot) -> PipelineResult {
        Pipeline::default().run(snapshot)
    }

    #[test]
    fn test_salt_variants_share_one_cluster() {
        // A reference and a generic of the same molecule, declared under
        // different salt spellings, must land in one cluster.
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "AXURA 10 mg, comprimé pelliculé"),
                product("60000002", "EBIXA 10 mg, comprimé pelliculé"),
            ],
            memberships: vec![
                membership("G1", "MEMANTINE 10 MG - AXURA", "60000001", MemberType::Reference),
                membership("G2", "MEMANTINE 10 MG - EBIXA", "60000002", MemberType::Reference),
            ],
            compositions: vec![
                compo("60000001", "42964", "MEMANTINE (CHLORHYDRATE DE)", "10 mg"),
                compo("60000002", "42964", "CHLORHYDRATE DE MEMANTINE", "10 mg"),
            ],
        };

        let result = run(&snapshot);
        assert_eq!(result.clusters.len(), 1);
        let a = &result.assignments[&ProductCode::parse("60000001").unwrap()];
        let b = &result.assignments[&ProductCode::parse("60000002").unwrap()];
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_molecules_get_distinct_clusters() {
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "ACUPAN 20 mg, comprimé"),
                product("60000002", "ADRIBLASTINE 50 mg, poudre"),
            ],
            memberships: vec![
                membership("G1", "NEFOPAM - ACUPAN", "60000001", MemberType::Reference),
                membership("G2", "DOXORUBICINE - ADRIBLASTINE", "60000002", MemberType::Reference),
            ],
            compositions: vec![
                compo("60000001", "1111", "NEFOPAM (CHLORHYDRATE DE)", "20 mg"),
                compo("60000002", "2222", "DOXORUBICINE", "50 mg"),
            ],
        };

        let result = run(&snapshot);
        assert_eq!(result.clusters.len(), 2);
        let a = &result.assignments[&ProductCode::parse("60000001").unwrap()];
        let b = &result.assignments[&ProductCode::parse("60000002").unwrap()];
        assert_ne!(a, b);
    }

    #[test]
    fn test_equivalent_expression_merges() {
        // Dirty rows without codes: the "equivalent to" tail and the salt
        // parenthetical must canonicalize away.
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "ZIAGEN 300 mg, comprimé"),
                product("60000002", "ABACAVIR MYLAN 300 mg, comprimé"),
            ],
            memberships: vec![
                membership("G1", "ABACAVIR - ZIAGEN", "60000001", MemberType::Reference),
                membership("G2", "ABACAVIR - ABACAVIR MYLAN", "60000002", MemberType::Reference),
            ],
            compositions: vec![
                compo("60000001", "0", "ABACAVIR", "300 mg"),
                compo(
                    "60000002",
                    "0",
                    "ABACAVIR (SULFATE) EQUIVALENT A ABACAVIR",
                    "300 mg",
                ),
            ],
        };

        let result = run(&snapshot);
        assert_eq!(result.clusters.len(), 1);
    }

    #[test]
    fn test_combination_stays_apart_from_single() {
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "LOPRIL 25 mg, comprimé"),
                product("60000002", "CAPTEA 25 mg/12,5 mg, comprimé"),
            ],
            memberships: vec![
                membership("G1", "CAPTOPRIL - LOPRIL", "60000001", MemberType::Reference),
                membership(
                    "G2",
                    "CAPTOPRIL/HYDROCHLOROTHIAZIDE - CAPTEA",
                    "60000002",
                    MemberType::Reference,
                ),
            ],
            compositions: vec![
                compo("60000001", "1000", "CAPTOPRIL", "25 mg"),
                compo("60000002", "1000", "CAPTOPRIL", "25 mg"),
                compo("60000002", "9000", "HYDROCHLOROTHIAZIDE", "12,5 mg"),
            ],
        };

        let result = run(&snapshot);
        assert_eq!(result.clusters.len(), 2);
    }

    #[test]
    fn test_partition_covers_every_included_product_once() {
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "EBIXA 10 mg, comprimé"),
                product("60000002", "MEMANTINE MYLAN 10 mg, comprimé"),
                product("60000003", "SPASFON 80 mg, comprimé"),
                product("60000004", "HUILE DE VASELINE, gel oral"),
                product("60000005", "ARNICA MONTANA BOIRON, granules"),
            ],
            memberships: vec![membership(
                "G1",
                "MEMANTINE - EBIXA",
                "60000001",
                MemberType::Reference,
            )],
            compositions: vec![
                compo("60000001", "42964", "MEMANTINE", "10 mg"),
                compo("60000002", "42964", "MEMANTINE", "10 mg"),
                compo("60000003", "5555", "PHLOROGLUCINOL", "80 mg"),
            ],
        };

        let result = run(&snapshot);

        // The homeopathic product is excluded, everything else is covered.
        assert_eq!(result.stats.products_excluded, 1);
        assert_eq!(result.assignments.len(), 4);
        assert!(!result
            .assignments
            .contains_key(&ProductCode::parse("60000005").unwrap()));

        // No product appears in two clusters.
        let mut seen = std::collections::BTreeSet::new();
        for cluster in &result.clusters {
            for code in cluster.all_products() {
                assert!(seen.insert(code.clone()), "duplicate assignment for {code}");
            }
        }
        assert_eq!(seen.len(), result.assignments.len());
    }

    #[test]
    fn test_display_names_never_empty_or_numeric() {
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "EBIXA 10 mg, comprimé"),
                product("60000002", "123456 20 mg, comprimé"),
            ],
            memberships: vec![membership(
                "G1",
                "MEMANTINE - EBIXA",
                "60000001",
                MemberType::Reference,
            )],
            compositions: vec![
                compo("60000001", "42964", "MEMANTINE", "10 mg"),
                compo("60000002", "7788", "NEFOPAM", "20 mg"),
            ],
        };

        let result = run(&snapshot);
        for cluster in &result.clusters {
            assert!(!cluster.display_name.is_empty());
            assert!(!cluster.display_name.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "EBIXA 10 mg, comprimé"),
                product("60000002", "MEMANTINE MYLAN 10 mg, comprimé"),
                product("60000003", "SPASFON 80 mg, comprimé"),
            ],
            memberships: vec![
                membership("G1", "MEMANTINE - EBIXA", "60000001", MemberType::Reference),
                membership("G1", "MEMANTINE - EBIXA", "60000002", MemberType::Generic),
            ],
            compositions: vec![
                compo("60000001", "42964", "MEMANTINE", "10 mg"),
                compo("60000002", "42964", "MEMANTINE", "10 mg"),
                compo("60000003", "5555", "PHLOROGLUCINOL", "80 mg"),
            ],
        };

        let first = run(&snapshot);
        let second = run(&snapshot);
        assert_eq!(first.assignments, second.assignments);
        let first_ids: Vec<_> = first.clusters.iter().map(|c| &c.id).collect();
        let second_ids: Vec<_> = second.clusters.iter().map(|c| &c.id).collect();
        assert_eq!(first_ids, second_ids);
        let first_names: Vec<_> = first.clusters.iter().map(|c| &c.display_name).collect();
        let second_names: Vec<_> = second.clusters.iter().map(|c| &c.display_name).collect();
        assert_eq!(first_names, second_names);
    }

    #[test]
    fn test_reports_are_advisory_only() {
        // An empty snapshot trips every absolute floor, yet still runs.
        let result = run(&CatalogSnapshot::default());
        assert!(result.clusters.is_empty());
        assert!(result.reports.iter().any(|r| !r.is_clean()));
    }

    #[test]
    fn test_orphan_attachment_end_to_end() {
        let snapshot = CatalogSnapshot {
            products: vec![
                product("60000001", "EBIXA 10 mg, comprimé"),
                product("60000002", "MEMANTINE MYLAN 10 mg, comprimé"),
            ],
            memberships: vec![membership(
                "G1",
                "MEMANTINE - EBIXA",
                "60000001",
                MemberType::Reference,
            )],
            compositions: vec![
                compo("60000001", "42964", "MEMANTINE", "10 mg"),
                compo("60000002", "42964", "MEMANTINE", "10 mg"),
            ],
        };

        let result = run(&snapshot);
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.stats.integration.orphans_attached, 1);
        assert_eq!(result.clusters[0].display_name, "EBIXA");
        assert_eq!(result.clusters[0].reference_name, "EBIXA");
    }
}
