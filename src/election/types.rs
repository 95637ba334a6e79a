//! Types for reference election

use serde::{Deserialize, Serialize};

use crate::records::{GroupId, ProductCode};

/// How a group's reference name was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionMethod {
    /// An active, marketed reference member won the election.
    ActiveReference,
    /// No active reference existed; the name was parsed from the group label.
    FallbackLabel,
}

/// A reference member that lost the election but stays marketed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryReference {
    pub product: ProductCode,
    pub name: String,
}

/// Election outcome for one regulatory group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceElection {
    pub group_id: GroupId,
    /// Elected product; `None` when the name was synthesized from the label.
    pub elected_product: Option<ProductCode>,
    /// Never empty.
    pub elected_name: String,
    pub method: ElectionMethod,
    pub secondaries: Vec<SecondaryReference>,
    /// Reference-tagged members seen, active or not.
    pub candidate_count: usize,
}

/// Counters emitted by the election phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionStats {
    pub groups: usize,
    pub active_elections: usize,
    pub label_fallbacks: usize,
}
