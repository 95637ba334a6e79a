//! Reference election engine
//!
//! Per regulatory group, elects the canonical reference product in two
//! tiers: active reference members sorted by seniority, else a name parsed
//! from the group label. Every group resolves to a usable name.

use rustc_hash::FxHashMap;

use crate::normalize::{clean_product_label, fallback_reference_name};
use crate::records::{GroupId, GroupMembershipRow, ProductCode, ProductRecord};
use crate::report::{ValidationLimits, ValidationReport};

use super::types::*;

/// Output of the election phase.
#[derive(Debug, Clone, Default)]
pub struct ElectionResult {
    pub elections: FxHashMap<GroupId, ReferenceElection>,
    pub stats: ElectionStats,
}

impl ElectionResult {
    pub fn election(&self, group: &GroupId) -> Option<&ReferenceElection> {
        self.elections.get(group)
    }
}

/// Elects reference products across all regulatory groups.
pub struct ElectionEngine;

impl ElectionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn elect(
        &self,
        products: &[ProductRecord],
        memberships: &[GroupMembershipRow],
    ) -> ElectionResult {
        let product_index: FxHashMap<&ProductCode, &ProductRecord> =
            products.iter().map(|p| (&p.code, p)).collect();

        let mut groups: Vec<(GroupId, Vec<&GroupMembershipRow>)> = Vec::new();
        let mut group_index: FxHashMap<GroupId, usize> = FxHashMap::default();
        for row in memberships {
            match group_index.get(&row.group_id) {
                Some(&i) => groups[i].1.push(row),
                None => {
                    group_index.insert(row.group_id.clone(), groups.len());
                    groups.push((row.group_id.clone(), vec![row]));
                }
            }
        }

        let mut elections = FxHashMap::default();
        let mut stats = ElectionStats::default();

        for (group_id, members) in groups {
            let election = elect_group(&group_id, &members, &product_index);
            match election.method {
                ElectionMethod::ActiveReference => stats.active_elections += 1,
                ElectionMethod::FallbackLabel => stats.label_fallbacks += 1,
            }
            elections.insert(group_id, election);
        }
        stats.groups = elections.len();

        tracing::info!(
            groups = stats.groups,
            active = stats.active_elections,
            fallback = stats.label_fallbacks,
            "reference election done"
        );

        ElectionResult { elections, stats }
    }
}

impl Default for ElectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn elect_group(
    group_id: &GroupId,
    members: &[&GroupMembershipRow],
    product_index: &FxHashMap<&ProductCode, &ProductRecord>,
) -> ReferenceElection {
    let reference_members: Vec<&&GroupMembershipRow> = members
        .iter()
        .filter(|m| m.member_type.is_reference())
        .collect();

    let mut survivors: Vec<(&GroupMembershipRow, &ProductRecord)> = reference_members
        .iter()
        .filter_map(|m| product_index.get(&m.product).map(|p| (**m, *p)))
        .filter(|(_, product)| product.is_active())
        .collect();

    // Seniority decides; the regulator's within-group index first, then the
    // catalog index, then the code so repeated runs agree.
    survivors.sort_by(|(ma, pa), (mb, pb)| {
        ma.seniority
            .cmp(&mb.seniority)
            .then_with(|| pa.seniority.cmp(&pb.seniority))
            .then_with(|| ma.product.cmp(&mb.product))
    });

    if let Some((winner_row, winner)) = survivors.first() {
        let elected_name = display_name(winner);
        let secondaries = survivors[1..]
            .iter()
            .map(|(row, product)| SecondaryReference {
                product: row.product.clone(),
                name: display_name(product),
            })
            .collect();
        return ReferenceElection {
            group_id: group_id.clone(),
            elected_product: Some(winner_row.product.clone()),
            elected_name,
            method: ElectionMethod::ActiveReference,
            secondaries,
            candidate_count: reference_members.len(),
        };
    }

    // No active reference: synthesize a name from the group label.
    let label = members
        .first()
        .map(|m| m.group_label.as_str())
        .unwrap_or_default();
    ReferenceElection {
        group_id: group_id.clone(),
        elected_product: None,
        elected_name: fallback_reference_name(label),
        method: ElectionMethod::FallbackLabel,
        secondaries: Vec::new(),
        candidate_count: reference_members.len(),
    }
}

fn display_name(product: &ProductRecord) -> String {
    let cleaned = clean_product_label(&product.label);
    if cleaned.is_empty() {
        crate::normalize::squeeze(&product.label).to_uppercase()
    } else {
        cleaned
    }
}

/// Advisory checks on election output.
pub fn validate_election(result: &ElectionResult, limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport::new("ELECTION");
    if result.stats.groups == 0 {
        return report;
    }

    let total = result.stats.groups as f64;
    let active_rate = result.stats.active_elections as f64 / total;
    let fallback_rate = result.stats.label_fallbacks as f64 / total;

    if active_rate < limits.min_active_election_rate {
        report.push(format!("low active reference rate: {:.1}%", active_rate * 100.0));
    }
    if fallback_rate > limits.max_fallback_rate {
        report.push(format!("high label fallback rate: {:.1}%", fallback_rate * 100.0));
    }

    report
}
