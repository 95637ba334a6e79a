//! Graph clustering engine
//!
//! Merges regulatory groups into super-clusters with a disjoint-set driven
//! by three independent signals: majority chemical signature, exact
//! substance-code set, and normalized substance text. Groups with no
//! derivable signature stay singleton clusters; they are counted, never
//! dropped.

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::normalize::clustering_key;
use crate::profile::ProfilingResult;
use crate::records::{GroupId, GroupMembershipRow, ProductCode};
use crate::report::{ValidationLimits, ValidationReport};

use super::dsu::DisjointSet;
use super::types::*;

/// Output of the clustering phase.
#[derive(Debug, Clone, Default)]
pub struct ClusteringResult {
    pub clusters: Vec<SuperCluster>,
    pub stats: ClusteringStats,
}

/// Merges regulatory groups sharing a treatment concept.
pub struct ClusteringEngine;

impl ClusteringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn cluster(
        &self,
        memberships: &[GroupMembershipRow],
        profiling: &ProfilingResult,
    ) -> ClusteringResult {
        // Side table: external group ids to dense indices, first-seen order.
        let mut group_ids: Vec<GroupId> = Vec::new();
        let mut group_index: FxHashMap<GroupId, u32> = FxHashMap::default();
        let mut members: Vec<Vec<ProductCode>> = Vec::new();

        for row in memberships {
            let index = *group_index.entry(row.group_id.clone()).or_insert_with(|| {
                group_ids.push(row.group_id.clone());
                members.push(Vec::new());
                (group_ids.len() - 1) as u32
            });
            let list = &mut members[index as usize];
            if !list.contains(&row.product) {
                list.push(row.product.clone());
            }
        }

        let mut dsu = DisjointSet::new(group_ids.len());
        let mut stats = ClusteringStats {
            groups_total: group_ids.len(),
            ..Default::default()
        };

        // Per-group signals.
        let mut majority: Vec<Option<String>> = Vec::with_capacity(group_ids.len());
        let mut code_sets: Vec<Option<String>> = Vec::with_capacity(group_ids.len());
        let mut text_sigs: Vec<Option<String>> = Vec::with_capacity(group_ids.len());

        for group_members in &members {
            majority.push(majority_signature(group_members, profiling));
            code_sets.push(code_set_signature(group_members, profiling));
            text_sigs.push(text_signature(group_members, profiling));
        }

        stats.unsignatured_groups = (0..group_ids.len())
            .filter(|&i| majority[i].is_none() && code_sets[i].is_none() && text_sigs[i].is_none())
            .count();

        stats.unions_by_majority_signature = apply_signal(&mut dsu, &majority);
        stats.unions_by_code_set = apply_signal(&mut dsu, &code_sets);
        stats.unions_by_text_signature = apply_signal(&mut dsu, &text_sigs);

        // Materialize clusters under their resolved roots, first-seen order.
        let mut by_root: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        let mut root_order: Vec<u32> = Vec::new();
        for index in 0..group_ids.len() as u32 {
            let root = dsu.find(index);
            by_root
                .entry(root)
                .or_insert_with(|| {
                    root_order.push(root);
                    Vec::new()
                })
                .push(index);
        }

        let mut clusters = Vec::with_capacity(root_order.len());
        for root in root_order {
            let indices = &by_root[&root];

            let cluster_groups: Vec<GroupId> = indices
                .iter()
                .map(|&i| group_ids[i as usize].clone())
                .collect();

            let mut product_codes: Vec<ProductCode> = indices
                .iter()
                .flat_map(|&i| members[i as usize].iter().cloned())
                .collect();
            product_codes.sort_unstable();
            product_codes.dedup();

            let mut signatures: Vec<String> = indices
                .iter()
                .filter_map(|&i| majority[i as usize].clone())
                .collect();
            signatures.sort_unstable();
            signatures.dedup();

            let signature = cluster_majority(&product_codes, profiling);

            clusters.push(SuperCluster {
                id: cluster_id("SCL", &product_codes),
                group_ids: cluster_groups,
                product_codes,
                signature,
                signatures,
            });
        }

        stats.clusters = clusters.len();
        tracing::info!(
            groups = stats.groups_total,
            clusters = stats.clusters,
            unsignatured = stats.unsignatured_groups,
            "graph clustering done"
        );

        ClusteringResult { clusters, stats }
    }
}

impl Default for ClusteringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Content-derived cluster id: one uniform rule for every construction
/// path. Hash input is the sorted member product-code set.
pub(crate) fn cluster_id(prefix: &str, product_codes: &[ProductCode]) -> String {
    let joined = product_codes
        .iter()
        .map(ProductCode::as_str)
        .collect::<Vec<_>>()
        .join("|");
    format!("{prefix}_{:016X}", xxh3_64(joined.as_bytes()))
}

/// Unions all groups sharing a signal value; returns union count.
fn apply_signal(dsu: &mut DisjointSet, signals: &[Option<String>]) -> usize {
    let mut first_seen: FxHashMap<&str, u32> = FxHashMap::default();
    let mut unions = 0;
    for (index, signal) in signals.iter().enumerate() {
        let Some(value) = signal.as_deref() else {
            continue;
        };
        match first_seen.get(value) {
            Some(&anchor) => {
                if dsu.union(anchor, index as u32) {
                    unions += 1;
                }
            }
            None => {
                first_seen.insert(value, index as u32);
            }
        }
    }
    unions
}

/// The chemical signature shared by the most member products, first-seen
/// tiebreak. `None` when no member has a signature.
fn majority_signature(members: &[ProductCode], profiling: &ProfilingResult) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for code in members {
        let Some(profile) = profiling.profile(code) else {
            continue;
        };
        if !profile.has_signature() {
            continue;
        }
        match counts.iter_mut().find(|(sig, _)| *sig == profile.chemical_id) {
            Some((_, n)) => *n += 1,
            None => counts.push((&profile.chemical_id, 1)),
        }
    }
    // First-seen wins ties: only a strictly higher count displaces.
    let mut best: Option<(&str, usize)> = None;
    for (sig, n) in &counts {
        if best.map_or(true, |(_, bn)| *n > bn) {
            best = Some((sig, *n));
        }
    }
    best.map(|(sig, _)| sig.to_string())
}

/// The exact sorted set of regulator substance codes across member
/// products; sorting guards against combination products listed in
/// different orders.
fn code_set_signature(members: &[ProductCode], profiling: &ProfilingResult) -> Option<String> {
    let mut codes: Vec<&str> = Vec::new();
    for code in members {
        let Some(profile) = profiling.profile(code) else {
            continue;
        };
        for substance in &profile.substances {
            if crate::records::is_valid_substance_code(&substance.code) {
                codes.push(&substance.code);
            }
        }
    }
    if codes.is_empty() {
        return None;
    }
    codes.sort_unstable();
    codes.dedup();
    Some(codes.join("+"))
}

/// Salt- and dosage-stripped substance text, sorted; catches free-text
/// spelling divergence the code signal misses.
fn text_signature(members: &[ProductCode], profiling: &ProfilingResult) -> Option<String> {
    let mut keys: Vec<String> = Vec::new();
    for code in members {
        let Some(profile) = profiling.profile(code) else {
            continue;
        };
        for substance in &profile.substances {
            let key = clustering_key(&substance.name);
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    if keys.is_empty() {
        return None;
    }
    keys.sort_unstable();
    Some(keys.join("+"))
}

/// Majority signature over a cluster's full member set, ties resolved to
/// the lexicographically smallest signature.
fn cluster_majority(members: &[ProductCode], profiling: &ProfilingResult) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for code in members {
        let Some(profile) = profiling.profile(code) else {
            continue;
        };
        if !profile.has_signature() {
            continue;
        }
        match counts.iter_mut().find(|(sig, _)| *sig == profile.chemical_id) {
            Some((_, n)) => *n += 1,
            None => counts.push((&profile.chemical_id, 1)),
        }
    }
    counts.sort_by(|(sa, na), (sb, nb)| nb.cmp(na).then_with(|| sa.cmp(sb)));
    counts
        .first()
        .map(|(sig, _)| sig.to_string())
        .unwrap_or_default()
}

/// Advisory checks on clustering output.
pub fn validate_clustering(
    result: &ClusteringResult,
    limits: &ValidationLimits,
) -> ValidationReport {
    let mut report = ValidationReport::new("CLUSTERING");

    if result.stats.clusters < limits.min_cluster_count {
        report.push(format!("too few clusters: {}", result.stats.clusters));
    }
    if result.stats.clusters > limits.max_cluster_count {
        report.push(format!("cluster explosion: {}", result.stats.clusters));
    }
    if result.stats.groups_total > 1
        && !result.clusters.iter().any(|c| c.group_ids.len() > 1)
    {
        report.push("no multi-group cluster detected; dosage-agnostic merge may have failed".to_string());
    }

    report
}
