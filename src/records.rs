//! Typed input records
//!
//! The ingestion layer hands the pipeline ordered sequences of
//! already-validated records. Id newtypes still enforce their shape at the
//! boundary so a malformed code can never silently fragment a cluster.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing typed identifiers from raw text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("product code must be 8 alphanumeric characters, got {0:?}")]
    InvalidProductCode(String),
    #[error("group id must be non-empty")]
    EmptyGroupId,
}

/// Administrative code uniquely identifying a product (8 characters).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let trimmed = raw.trim();
        if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RecordError::InvalidProductCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Regulator-assigned id of a generic-equivalence group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RecordError::EmptyGroupId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a composition row expresses its ingredient.
///
/// The same physical ingredient is often declared twice: once as the active
/// fraction ("FT"/"ST") and once as the pure substance ("SA"). Rows sharing
/// a link id describe the same ingredient in both forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nature {
    /// Active-fraction expression (wire codes FT and ST).
    ActiveFraction,
    /// Pure-substance expression (wire code SA).
    PureSubstance,
    /// Anything else; retained for display, never drives selection.
    Other,
}

impl Nature {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "FT" | "ST" => Nature::ActiveFraction,
            "SA" => Nature::PureSubstance,
            _ => Nature::Other,
        }
    }
}

/// Member role inside a regulatory group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    /// The original reference product (wire type 0).
    Reference,
    /// An approved generic (wire type 1).
    Generic,
    /// Generic by posology complement (wire type 2).
    Complementary,
    /// Substitutable variant (wire type 4).
    Substitutable,
    /// Unrecognized type code.
    Unknown,
}

impl MemberType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => MemberType::Reference,
            1 => MemberType::Generic,
            2 => MemberType::Complementary,
            4 => MemberType::Substitutable,
            _ => MemberType::Unknown,
        }
    }

    pub fn is_reference(self) -> bool {
        matches!(self, MemberType::Reference)
    }
}

/// One product of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: ProductCode,
    /// Raw display label, e.g. "CLAMOXYL 500 mg, gélule".
    pub label: String,
    /// Marketing authorization currently active.
    pub authorization_active: bool,
    /// At least one presentation currently marketed.
    pub marketed: bool,
    /// Catalog-wide seniority index (lower is older).
    pub seniority: u32,
}

impl ProductRecord {
    /// A product is electable as reference only while active or marketed.
    pub fn is_active(&self) -> bool {
        self.authorization_active || self.marketed
    }
}

/// One membership row of a regulatory group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembershipRow {
    pub group_id: GroupId,
    /// Raw group label, e.g. "AMOXICILLINE 500 mg - CLAMOXYL".
    pub group_label: String,
    pub product: ProductCode,
    pub member_type: MemberType,
    /// Within-group seniority index (lower elects first).
    pub seniority: u32,
}

/// One raw composition row: a single active-ingredient entry for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionRow {
    pub product: ProductCode,
    /// Dose element the ingredient belongs to (tablet, solvent, ...).
    pub element: String,
    /// Regulator substance code; may be empty or a placeholder.
    pub substance_code: String,
    pub substance_name: String,
    /// Free-text dosage, e.g. "10 mg".
    pub dosage: String,
    pub nature: Nature,
    /// Groups rows describing the same physical ingredient; "0" or empty
    /// means the row stands alone.
    pub link_id: String,
}

/// One fully-loaded, immutable catalog snapshot.
///
/// Constructed once by the ingestion collaborator; every pipeline phase only
/// reads from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<ProductRecord>,
    pub memberships: Vec<GroupMembershipRow>,
    pub compositions: Vec<CompositionRow>,
}

/// Validates a regulator substance code, rejecting placeholder values that
/// would otherwise fuse unrelated products into one signature.
pub fn is_valid_substance_code(code: &str) -> bool {
    let trimmed = code.trim();
    if trimmed.is_empty() || trimmed.len() < 2 || trimmed.len() > 8 {
        return false;
    }
    if matches!(trimmed, "00" | "000" | "99" | "999" | "9999") {
        return false;
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    // Repeated single digit ("111", "7777") is a data-entry placeholder.
    let mut chars = trimmed.chars();
    let first = chars.next().unwrap();
    if first.is_ascii_digit() && chars.all(|c| c == first) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_code_shape() {
        assert!(ProductCode::parse("60234100").is_ok());
        assert!(ProductCode::parse(" 60234100 ").is_ok());
        assert!(ProductCode::parse("1234").is_err());
        assert!(ProductCode::parse("6023410!").is_err());
    }

    #[test]
    fn test_nature_codes() {
        assert_eq!(Nature::from_code("FT"), Nature::ActiveFraction);
        assert_eq!(Nature::from_code("ST"), Nature::ActiveFraction);
        assert_eq!(Nature::from_code("SA"), Nature::PureSubstance);
        assert_eq!(Nature::from_code("XX"), Nature::Other);
    }

    #[test]
    fn test_substance_code_validation() {
        assert!(is_valid_substance_code("04034"));
        assert!(is_valid_substance_code("A123"));
        assert!(!is_valid_substance_code(""));
        assert!(!is_valid_substance_code("0"));
        assert!(!is_valid_substance_code("9999"));
        assert!(!is_valid_substance_code("7777"));
        assert!(!is_valid_substance_code("123456789"));
        assert!(!is_valid_substance_code("12 34"));
    }

    #[test]
    fn test_member_type_codes() {
        assert!(MemberType::from_code(0).is_reference());
        assert!(!MemberType::from_code(1).is_reference());
        assert_eq!(MemberType::from_code(9), MemberType::Unknown);
    }
}
