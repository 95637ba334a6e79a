//! Types for orphan integration

use serde::{Deserialize, Serialize};

use crate::naming::NamingMethod;
use crate::records::{GroupId, ProductCode};

/// A fully integrated treatment-concept cluster, ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalCluster {
    pub id: String,
    /// Never empty, never pure digits.
    pub display_name: String,
    pub naming_method: NamingMethod,
    /// Elected reference name of the leading member group; equals the
    /// display name on promoted orphan clusters.
    pub reference_name: String,
    /// Consolidated secondary reference names.
    pub secondary_references: Vec<String>,
    /// Majority chemical signature; may be empty on isolated singletons.
    pub signature: String,
    pub group_ids: Vec<GroupId>,
    /// Sorted member product codes from regulatory groups.
    pub product_codes: Vec<ProductCode>,
    /// Orphan product codes attached or promoted into this cluster.
    pub orphan_codes: Vec<ProductCode>,
    pub member_count: usize,
    pub orphan_count: usize,
    /// Upper-cased concatenation of all known names and substance terms.
    pub search_text: String,
}

impl FinalCluster {
    /// Every product the cluster covers, groups and orphans combined.
    pub fn all_products(&self) -> impl Iterator<Item = &ProductCode> {
        self.product_codes.iter().chain(self.orphan_codes.iter())
    }
}

/// Counters emitted by the integration phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationStats {
    pub clusters: usize,
    pub orphans_attached: usize,
    pub orphans_promoted: usize,
    /// Orphans without a usable signature, kept as singleton clusters.
    pub orphans_isolated: usize,
    pub total_products: usize,
}
