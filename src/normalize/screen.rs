//! Homeopathic screening
//!
//! Homeopathic preparations have no exploitable chemical profile: dilution
//! notation replaces dosage and the substance list is decorative. They are
//! excluded before profiling and counted, never clustered.

use super::rules::{HOMEOPATHIC_LABS, HOMEOPATHIC_TERMS};
use super::text::{fold_text, DILUTION_RANGE_RE, DILUTION_RE};

/// Detects a homeopathic product from its label and dosage text.
///
/// Laboratory names and explicit label terms decide outright; bare dilution
/// notation ("9CH") only counts alongside supporting context, so a plain
/// "90 X" batch marking cannot exclude a real product.
pub fn is_homeopathic(label: &str, dosage: &str) -> bool {
    let combined = fold_text(&format!("{label} {dosage}"));

    if HOMEOPATHIC_LABS.iter().any(|lab| combined.contains(lab)) {
        return true;
    }
    if HOMEOPATHIC_TERMS.iter().any(|term| combined.contains(term)) {
        return true;
    }
    if DILUTION_RANGE_RE.is_match(&combined) {
        return true;
    }
    if DILUTION_RE.is_match(&combined) {
        let contextual = combined.contains("DEGRE DE DILUTION")
            || combined.contains("DILUTION COMPRISE ENTRE")
            || combined.contains("SOLUTION BUVABLE EN GOUTTES")
            || (combined.contains("GOUTTES") && combined.len() > 80);
        if contextual {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laboratory_names_excluded() {
        assert!(is_homeopathic("ARNICA MONTANA BOIRON", ""));
        assert!(is_homeopathic("POUMON HISTAMINE LEHNING 15 CH", ""));
    }

    #[test]
    fn test_explicit_terms_excluded() {
        assert!(is_homeopathic("MEDICAMENT HOMEOPATHIQUE, granules", ""));
        assert!(is_homeopathic("TEINTURE MÈRE DE CALENDULA", ""));
    }

    #[test]
    fn test_dilution_range_excluded() {
        assert!(is_homeopathic("ARNICA, degré de dilution 2CH à 30CH", ""));
    }

    #[test]
    fn test_bare_dilution_needs_context() {
        // "90 X" alone could be a batch marking, not a dilution.
        assert!(!is_homeopathic("VITAMINE 90 X", ""));
        assert!(is_homeopathic(
            "SOUFRE, degré de dilution 9 CH",
            ""
        ));
    }

    #[test]
    fn test_regular_products_pass() {
        assert!(!is_homeopathic("DOLIPRANE 1000 mg, comprimé", "1000 mg"));
        assert!(!is_homeopathic("CLAMOXYL 500 mg, gélule", "500 mg"));
    }
}
