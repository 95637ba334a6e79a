//! Naming consensus engine
//!
//! Derives each cluster's display name from its elected reference names.
//! The longest-to-shortest window scan guarantees the richest shared name
//! is never missed in favor of a shorter spurious one (a shared dosage
//! digit, a packaging word).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cluster::SuperCluster;
use crate::election::ElectionResult;
use crate::normalize::rules::NAMING_STOP_WORDS;
use crate::normalize::{squeeze, strip_diacritics, DOSAGE_PATTERN, NUMBER_PATTERN};
use crate::report::{ValidationLimits, ValidationReport};

use super::types::*;

/// Decimal numbers are masked before tokenization so "12,5" survives as one
/// token instead of splitting into a spurious shared "5".
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)[.,](\d)").unwrap());

/// Output of the naming phase.
#[derive(Debug, Clone, Default)]
pub struct NamingResult {
    pub named: Vec<NamedCluster>,
    pub stats: NamingStats,
}

/// Names super-clusters from their elected reference names.
pub struct NamingEngine;

impl NamingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self, clusters: Vec<SuperCluster>, elections: &ElectionResult) -> NamingResult {
        let mut named = Vec::with_capacity(clusters.len());
        let mut stats = NamingStats::default();

        for cluster in clusters {
            let names: Vec<String> = cluster
                .group_ids
                .iter()
                .filter_map(|g| elections.election(g))
                .map(|e| e.elected_name.clone())
                .filter(|n| !n.is_empty())
                .collect();

            let (display_name, method) = resolve_name(&names, &cluster);
            match method {
                NamingMethod::LcsConsensus => stats.consensus += 1,
                NamingMethod::SingleSource => stats.single_source += 1,
                NamingMethod::BrandExtractionFallback => stats.fallbacks += 1,
            }

            named.push(NamedCluster {
                sample_names: names.into_iter().take(5).collect(),
                cluster,
                display_name,
                method,
            });
        }

        stats.clusters = named.len();
        tracing::info!(
            clusters = stats.clusters,
            consensus = stats.consensus,
            fallbacks = stats.fallbacks,
            "naming done"
        );

        NamingResult { named, stats }
    }
}

impl Default for NamingEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_name(names: &[String], cluster: &SuperCluster) -> (String, NamingMethod) {
    match names {
        [] => (
            synthesize_from_signature(cluster),
            NamingMethod::BrandExtractionFallback,
        ),
        [single] => (single.clone(), NamingMethod::SingleSource),
        _ => {
            let consensus = find_common_token_run(names);
            // A consensus with no letters is a token-boundary false
            // positive: a shared dosage digit or unit, never a brand.
            if consensus.len() >= 3 && consensus.chars().any(|c| c.is_ascii_alphabetic()) {
                (consensus, NamingMethod::LcsConsensus)
            } else {
                (extract_brand_token(&names[0]), NamingMethod::BrandExtractionFallback)
            }
        }
    }
}

/// Longest contiguous token window shared by every input name, scanned
/// longest-first over the shortest tokenization.
pub fn find_common_token_run(names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    if names.len() == 1 {
        return names[0].clone();
    }

    let tokenized: Vec<Vec<String>> = names.iter().map(|n| tokenize_masked(n)).collect();
    let shortest = tokenized
        .iter()
        .min_by_key(|t| t.len())
        .expect("at least one name");
    if shortest.is_empty() {
        return String::new();
    }

    for window_len in (1..=shortest.len()).rev() {
        for start in 0..=shortest.len() - window_len {
            let candidate = &shortest[start..start + window_len];
            if tokenized.iter().all(|tokens| contains_window(tokens, candidate)) {
                return candidate.join(" ");
            }
        }
    }

    String::new()
}

fn tokenize_masked(name: &str) -> Vec<String> {
    let folded = squeeze(&strip_diacritics(&name.to_uppercase()));
    let masked = DECIMAL_RE.replace_all(&folded, "${1}\u{1}${2}");
    masked
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | ',' | '.' | '(' | ')'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{1}', ","))
        .collect()
}

fn contains_window(tokens: &[String], candidate: &[String]) -> bool {
    if candidate.len() > tokens.len() {
        return false;
    }
    tokens.windows(candidate.len()).any(|w| w == candidate)
}

fn is_pure_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// First non-stop-word brand token of a name, dosages removed.
fn extract_brand_token(name: &str) -> String {
    let folded = squeeze(&strip_diacritics(&name.to_uppercase()));
    let without_dosage = DOSAGE_PATTERN.replace_all(&folded, " ");
    let without_numbers = NUMBER_PATTERN.replace_all(&without_dosage, " ");

    without_numbers
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .find(|w| !NAMING_STOP_WORDS.contains(w))
        .map(str::to_string)
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Label for a cluster with no elected name at all: the chemical
/// signature's leading token, prefixed when it would read as a bare code.
fn synthesize_from_signature(cluster: &SuperCluster) -> String {
    let leading = cluster
        .signature
        .split('+')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    if leading.is_empty() || is_pure_numeric(&leading) {
        let tail: String = cluster.id.chars().rev().take(8).collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if leading.is_empty() {
            format!("CLUSTER_{tail}")
        } else {
            format!("CLUSTER_{leading}")
        }
    } else {
        leading
    }
}

/// Advisory checks on naming output.
pub fn validate_naming(result: &NamingResult, limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport::new("NAMING");

    let numeric = result
        .named
        .iter()
        .filter(|c| is_pure_numeric(&c.display_name))
        .count();
    if numeric > limits.max_numeric_names {
        report.push(format!("numeric display names detected: {numeric}"));
    }

    let short = result
        .named
        .iter()
        .filter(|c| c.display_name.len() < 3)
        .count();
    if short > limits.max_short_names {
        report.push(format!("too many short display names: {short}"));
    }

    report
}
