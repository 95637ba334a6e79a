//! Orphan integration engine
//!
//! Attaches ungrouped products to existing clusters by chemical signature,
//! promotes the rest into new clusters, and isolates signature-less
//! products as singletons, so every included product ends in exactly one
//! final cluster.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cluster::cluster_id;
use crate::election::ElectionResult;
use crate::naming::{find_common_token_run, NamedCluster, NamingMethod};
use crate::normalize::{canonical_substance, clean_product_label, squeeze, strip_diacritics};
use crate::profile::ProfilingResult;
use crate::records::{ProductCode, ProductRecord};
use crate::report::{ValidationLimits, ValidationReport};

use super::types::*;

/// Output of the integration phase.
#[derive(Debug, Clone, Default)]
pub struct IntegrationResult {
    pub clusters: Vec<FinalCluster>,
    pub stats: IntegrationStats,
}

/// Integrates orphan products and finalizes cluster metadata.
pub struct IntegrationEngine;

impl IntegrationEngine {
    pub fn new() -> Self {
        Self
    }

    /// `products` must already be restricted to included (non-excluded)
    /// records; `named` is consumed and extended with orphan clusters.
    pub fn integrate(
        &self,
        named: Vec<NamedCluster>,
        products: &[ProductRecord],
        profiling: &ProfilingResult,
        elections: &ElectionResult,
    ) -> IntegrationResult {
        let product_index: FxHashMap<&ProductCode, &ProductRecord> =
            products.iter().map(|p| (&p.code, p)).collect();

        let grouped: FxHashSet<&ProductCode> = named
            .iter()
            .flat_map(|c| c.cluster.product_codes.iter())
            .collect();
        let orphans: Vec<&ProductRecord> = products
            .iter()
            .filter(|p| !grouped.contains(&p.code))
            .collect();

        // Signature index over existing clusters; the smallest cluster id
        // wins a collision so repeated runs agree.
        let mut signature_index: FxHashMap<&str, &str> = FxHashMap::default();
        for cluster in &named {
            let mut signatures: Vec<&str> = cluster
                .cluster
                .signatures
                .iter()
                .map(String::as_str)
                .collect();
            if !cluster.cluster.signature.is_empty() {
                signatures.push(cluster.cluster.signature.as_str());
            }
            for signature in signatures {
                match signature_index.get_mut(signature) {
                    Some(existing) => {
                        if cluster.cluster.id.as_str() < *existing {
                            *existing = cluster.cluster.id.as_str();
                        }
                    }
                    None => {
                        signature_index.insert(signature, cluster.cluster.id.as_str());
                    }
                }
            }
        }

        let mut stats = IntegrationStats::default();
        let mut attachments: FxHashMap<String, Vec<ProductCode>> = FxHashMap::default();
        let mut promoted_groups: Vec<(String, Vec<&ProductRecord>)> = Vec::new();
        let mut isolated: Vec<&ProductRecord> = Vec::new();

        for &orphan in &orphans {
            let signature = profiling
                .profile(&orphan.code)
                .filter(|p| p.has_signature())
                .map(|p| p.chemical_id.clone());

            match signature {
                Some(signature) => {
                    if let Some(&cluster) = signature_index.get(signature.as_str()) {
                        attachments
                            .entry(cluster.to_string())
                            .or_default()
                            .push(orphan.code.clone());
                        stats.orphans_attached += 1;
                    } else {
                        match promoted_groups.iter_mut().find(|(s, _)| *s == signature) {
                            Some((_, group)) => group.push(orphan),
                            None => promoted_groups.push((signature, vec![orphan])),
                        }
                        stats.orphans_promoted += 1;
                    }
                }
                None => {
                    isolated.push(orphan);
                    stats.orphans_isolated += 1;
                }
            }
        }

        let mut clusters: Vec<FinalCluster> = Vec::with_capacity(
            named.len() + promoted_groups.len() + isolated.len(),
        );

        for cluster in named {
            let orphan_codes = attachments
                .remove(cluster.cluster.id.as_str())
                .unwrap_or_default();
            clusters.push(finalize_cluster(
                cluster,
                orphan_codes,
                &product_index,
                profiling,
                elections,
            ));
        }

        for (signature, group) in promoted_groups {
            clusters.push(promote_cluster(&signature, &group, profiling));
        }
        for orphan in isolated {
            clusters.push(promote_cluster("", &[orphan], profiling));
        }

        stats.clusters = clusters.len();
        stats.total_products = clusters
            .iter()
            .map(|c| c.member_count + c.orphan_count)
            .sum();

        tracing::info!(
            clusters = stats.clusters,
            attached = stats.orphans_attached,
            promoted = stats.orphans_promoted,
            isolated = stats.orphans_isolated,
            "orphan integration done"
        );

        IntegrationResult { clusters, stats }
    }
}

impl Default for IntegrationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn finalize_cluster(
    named: NamedCluster,
    mut orphan_codes: Vec<ProductCode>,
    product_index: &FxHashMap<&ProductCode, &ProductRecord>,
    profiling: &ProfilingResult,
    elections: &ElectionResult,
) -> FinalCluster {
    orphan_codes.sort_unstable();

    // Secondary reference names across member groups, deduplicated then
    // consolidated so dosage variants of one brand surface once.
    let mut secondaries: Vec<String> = Vec::new();
    for group in &named.cluster.group_ids {
        if let Some(election) = elections.election(group) {
            for secondary in &election.secondaries {
                if !secondaries.contains(&secondary.name) {
                    secondaries.push(secondary.name.clone());
                }
            }
        }
    }
    let secondaries = consolidate_names(secondaries);

    let reference_name = named
        .cluster
        .group_ids
        .first()
        .and_then(|g| elections.election(g))
        .map(|e| e.elected_name.clone())
        .unwrap_or_else(|| named.display_name.clone());

    // Substance terms from the first profiled member, sorted order.
    let substance_terms = named
        .cluster
        .product_codes
        .iter()
        .filter_map(|code| profiling.profile(code))
        .find(|p| !p.substances.is_empty())
        .map(|p| {
            p.substances
                .iter()
                .map(|s| s.name.clone())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let raw_names: Vec<String> = named
        .cluster
        .product_codes
        .iter()
        .take(5)
        .filter_map(|code| product_index.get(code))
        .filter_map(|p| p.label.split(',').next().map(str::trim).map(str::to_string))
        .filter(|n| !n.is_empty())
        .collect();

    let search_text = build_search_text(
        &named.display_name,
        &secondaries,
        &substance_terms,
        &raw_names,
    );

    FinalCluster {
        id: named.cluster.id,
        display_name: named.display_name,
        naming_method: named.method,
        reference_name,
        secondary_references: secondaries,
        signature: named.cluster.signature,
        group_ids: named.cluster.group_ids,
        member_count: named.cluster.product_codes.len(),
        orphan_count: orphan_codes.len(),
        product_codes: named.cluster.product_codes,
        orphan_codes,
        search_text,
    }
}

/// Builds a new cluster from orphans sharing one signature, or a singleton
/// for a signature-less product.
fn promote_cluster(
    signature: &str,
    orphans: &[&ProductRecord],
    profiling: &ProfilingResult,
) -> FinalCluster {
    let mut codes: Vec<ProductCode> = orphans.iter().map(|o| o.code.clone()).collect();
    codes.sort_unstable();

    let leader = orphans[0];
    let display_name = promoted_name(leader);

    let substance_terms = profiling
        .profile(&leader.code)
        .map(|p| {
            p.substances
                .iter()
                .map(|s| s.name.clone())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let search_text = build_search_text(&display_name, &[], &substance_terms, &[]);

    FinalCluster {
        id: cluster_id("ORPH", &codes),
        reference_name: display_name.clone(),
        display_name,
        naming_method: NamingMethod::SingleSource,
        secondary_references: Vec::new(),
        signature: signature.to_string(),
        group_ids: Vec::new(),
        product_codes: Vec::new(),
        member_count: 0,
        orphan_count: codes.len(),
        orphan_codes: codes,
        search_text,
    }
}

/// Dosage-stripped, canonicalized form of the orphan's original label.
fn promoted_name(product: &ProductRecord) -> String {
    let cleaned = clean_product_label(&product.label);
    let canonical = canonical_substance(&cleaned);
    if !canonical.is_empty() {
        return canonical;
    }
    if !cleaned.is_empty() {
        return cleaned;
    }
    let raw = squeeze(&strip_diacritics(&product.label.to_uppercase()));
    if raw.is_empty() {
        "UNKNOWN".to_string()
    } else {
        raw
    }
}

/// Groups names by leading token and collapses each group through the
/// consensus scan.
fn consolidate_names(names: Vec<String>) -> Vec<String> {
    let mut by_prefix: Vec<(String, Vec<String>)> = Vec::new();
    for name in names {
        let prefix = name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        match by_prefix.iter_mut().find(|(p, _)| *p == prefix) {
            Some((_, group)) => group.push(name),
            None => by_prefix.push((prefix, vec![name])),
        }
    }

    let mut consolidated = Vec::with_capacity(by_prefix.len());
    for (_, group) in by_prefix {
        if group.len() == 1 {
            consolidated.push(group.into_iter().next().unwrap());
            continue;
        }
        let shared = find_common_token_run(&group);
        if shared.len() >= 3 {
            consolidated.push(shared);
        } else {
            consolidated.push(group.into_iter().next().unwrap());
        }
    }
    consolidated
}

fn build_search_text(
    display_name: &str,
    secondaries: &[String],
    substance_terms: &str,
    raw_names: &[String],
) -> String {
    let mut parts: Vec<&str> = vec![display_name];
    parts.extend(secondaries.iter().map(String::as_str));
    if !substance_terms.is_empty() {
        parts.push(substance_terms);
    }
    parts.extend(raw_names.iter().map(String::as_str));
    squeeze(&parts.join(" ")).to_uppercase()
}

/// Advisory checks on integration output.
pub fn validate_integration(
    result: &IntegrationResult,
    limits: &ValidationLimits,
) -> ValidationReport {
    let mut report = ValidationReport::new("INTEGRATION");

    if result.stats.orphans_attached < limits.min_orphans_attached {
        report.push(format!(
            "low orphan attachment: {}",
            result.stats.orphans_attached
        ));
    }
    if result.stats.total_products < limits.min_total_products {
        report.push(format!(
            "low product coverage: {}",
            result.stats.total_products
        ));
    }

    report
}
