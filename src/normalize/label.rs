//! Product and group label utilities
//!
//! Labels mix brand, dosage, form, and packaging in one free-text string:
//! "CLAMOXYL 500 mg, gélule". These helpers recover the brand surface and
//! parse regulator group labels of the shape "MOLECULE - BRAND".

use super::rules::{FORM_WORDS, NOISE_WORDS, SHAPE_KEYWORDS, TARGET_POPULATION_TOKENS};
use super::text::{
    fold_text, remove_phrases, squeeze, DOSAGE_RE, NUMBER_RE, TRAILING_DOSAGE_RE,
};

/// Cleans a raw product label down to its brand surface.
///
/// "CLAMOXYL 1 g, poudre pour solution buvable" -> "CLAMOXYL".
/// Returns an empty string when nothing brand-like survives; callers fall
/// back to the raw label.
pub fn clean_product_label(label: &str) -> String {
    let folded = fold_text(label);
    let head = folded.split(',').next().unwrap_or("").trim();
    if head.is_empty() {
        return String::new();
    }

    let mut working = head.replace('%', " ");
    working = remove_phrases(&working, &["POUR CENT", "POURCENT", "POUR MILLE"]);
    working = DOSAGE_RE.replace_all(&working, " ").into_owned();
    working = NUMBER_RE.replace_all(&working, " ").into_owned();
    working = remove_phrases(&working, TARGET_POPULATION_TOKENS);
    working = remove_phrases(&working, FORM_WORDS);
    working = remove_phrases(&working, NOISE_WORDS);
    working = working.replace(['-', '\'', '’', '/'], " ");
    squeeze(&working)
}

/// Splits a group label on its final " - ", tolerating glued dashes.
///
/// The last delimiter wins so intra-token hyphens ("L-CARNITINE") survive on
/// the left side. Returns the whole label and `None` when no dash exists.
pub fn split_label_last(label: &str) -> (String, Option<String>) {
    let folded = squeeze(&fold_text(label));
    if folded.is_empty() {
        return (String::new(), None);
    }
    if let Some(idx) = folded.rfind(" - ") {
        let left = folded[..idx].trim().to_string();
        let right = folded[idx + 3..].trim().to_string();
        return (left, (!right.is_empty()).then_some(right));
    }
    if let Some(idx) = folded.rfind('-') {
        let left = folded[..idx].trim().to_string();
        let right = folded[idx + 1..].trim().to_string();
        if !left.is_empty() && !right.is_empty() {
            return (left, Some(right));
        }
    }
    (folded, None)
}

/// Synthesizes a reference name from a group label when no active reference
/// product exists.
///
/// Takes the trailing " - " segment, truncates at the first comma or
/// trailing form keyword, then strips trailing punctuation and dosage
/// remnants. Never returns an empty string.
pub fn fallback_reference_name(group_label: &str) -> String {
    let (left, right) = split_label_last(group_label);
    let mut working = right.unwrap_or_else(|| left.clone());

    if let Some(idx) = working.find(',') {
        working.truncate(idx);
    }

    for shape in SHAPE_KEYWORDS {
        if let Some(idx) = working.rfind(shape) {
            working.truncate(idx);
            break;
        }
    }

    loop {
        let stripped = TRAILING_DOSAGE_RE.replace(&working, "").into_owned();
        let stripped = stripped
            .trim_end_matches([' ', '.', ',', ';', ':', '-'])
            .to_string();
        if stripped == working {
            break;
        }
        working = stripped;
    }

    let cleaned = squeeze(&working);
    if !cleaned.is_empty() {
        return cleaned;
    }
    let raw = squeeze(&fold_text(group_label));
    if raw.is_empty() {
        "UNKNOWN".to_string()
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_product_label() {
        assert_eq!(clean_product_label("CLAMOXYL 1 g, poudre pour solution"), "CLAMOXYL");
        assert_eq!(clean_product_label("DOLIPRANE 1000 mg, comprimé"), "DOLIPRANE");
        assert_eq!(
            clean_product_label("FUCIDINE 2 %, crème"),
            "FUCIDINE"
        );
    }

    #[test]
    fn test_clean_label_can_be_empty() {
        assert_eq!(clean_product_label("500 mg, comprimé"), "");
    }

    #[test]
    fn test_split_label_last_dash() {
        let (left, right) = split_label_last("AMOXICILLINE 500 MG - CLAMOXYL");
        assert_eq!(left, "AMOXICILLINE 500 MG");
        assert_eq!(right.as_deref(), Some("CLAMOXYL"));
    }

    #[test]
    fn test_split_label_keeps_intra_token_hyphen() {
        let (left, right) = split_label_last("L-CARNITINE 100 MG - CARNITENE");
        assert_eq!(left, "L-CARNITINE 100 MG");
        assert_eq!(right.as_deref(), Some("CARNITENE"));
    }

    #[test]
    fn test_split_label_no_dash() {
        let (left, right) = split_label_last("PARACETAMOL");
        assert_eq!(left, "PARACETAMOL");
        assert!(right.is_none());
    }

    #[test]
    fn test_fallback_reference_name() {
        assert_eq!(
            fallback_reference_name("MEMANTINE 10 MG - EBIXA 10 mg, comprimé"),
            "EBIXA"
        );
        assert_eq!(
            fallback_reference_name("AMOXICILLINE - CLAMOXYL 500 MG"),
            "CLAMOXYL"
        );
    }

    #[test]
    fn test_fallback_never_empty() {
        assert!(!fallback_reference_name("").is_empty());
        assert!(!fallback_reference_name(" - ").is_empty());
    }
}
