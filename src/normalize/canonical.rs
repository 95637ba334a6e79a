//! Canonical substance form
//!
//! Reduces a raw substance declaration to its salt-insensitive base
//! molecule: "CHLORHYDRATE DE MEMANTINE", "MEMANTINE (CHLORHYDRATE DE)" and
//! "MÉMANTINE" all collapse to "MEMANTINE". Pure inorganic salts are
//! preserved whole so electrolytes never degrade to a bare metal name.

use super::rules::{
    INORGANIC_CORES, INORGANIC_MODIFIERS, MAX_SUFFIX_PASSES, MINERAL_TOKENS, SALT_PREFIXES,
    SALT_SUFFIXES,
};
use super::{normalize, NormalizeOptions};

/// Canonical, salt-insensitive form of a substance name.
///
/// Idempotent: `canonical_substance(canonical_substance(x))` equals
/// `canonical_substance(x)`.
pub fn canonical_substance(name: &str) -> String {
    normalize(name, &NormalizeOptions::canonical())
}

/// Detects pure electrolytes and mineral salts ("CHLORURE DE SODIUM",
/// "PHOSPHATE MONOPOTASSIQUE", "MAGNESIUM") that must survive salt
/// stripping untouched.
pub fn is_pure_inorganic(name: &str) -> bool {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [single] => MINERAL_TOKENS.contains(single),
        [core, modifier] => {
            INORGANIC_CORES.contains(core) && INORGANIC_MODIFIERS.contains(modifier)
        }
        [core, de, mineral] => {
            INORGANIC_CORES.contains(core)
                && matches!(*de, "DE" | "D'" | "D")
                && MINERAL_TOKENS.contains(mineral)
        }
        _ => false,
    }
}

/// Strips one salt prefix and then salt suffixes to a bounded fixed point.
///
/// Expects upper-cased, diacritic-free, squeezed input; called by the
/// normalization driver.
pub(super) fn strip_salts(input: &str) -> String {
    if is_pure_inorganic(input) {
        return input.to_string();
    }

    let mut working = strip_one_prefix(input);

    for _ in 0..MAX_SUFFIX_PASSES {
        if is_pure_inorganic(&working) {
            break;
        }
        let mut changed = false;
        for suffix in SALT_SUFFIXES {
            let trailing = format!(" {suffix}");
            if let Some(stripped) = working.strip_suffix(&trailing) {
                if !stripped.trim().is_empty() {
                    working = stripped.trim_end().to_string();
                    changed = true;
                }
            } else {
                let inner = format!(" {suffix} ");
                if working.contains(&inner) {
                    working = working.replacen(&inner, " ", 1);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    working.trim().to_string()
}

/// One salt prefix at most; the table is ordered longest-first so compound
/// prefixes win over their own substrings.
fn strip_one_prefix(input: &str) -> String {
    for prefix in SALT_PREFIXES {
        if let Some(rest) = input.strip_prefix(prefix) {
            let rest = if prefix.ends_with('\'') {
                rest
            } else if rest.is_empty() || rest.starts_with(' ') {
                rest
            } else {
                continue;
            };
            let trimmed = rest.trim_start();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_prefix_stripped() {
        assert_eq!(canonical_substance("CHLORHYDRATE DE MEMANTINE"), "MEMANTINE");
        assert_eq!(canonical_substance("SULFATE D'ABACAVIR"), "ABACAVIR");
    }

    #[test]
    fn test_salt_suffix_fixed_point() {
        assert_eq!(canonical_substance("MEMANTINE CHLORHYDRATE"), "MEMANTINE");
        assert_eq!(
            canonical_substance("VALSARTAN DISODIQUE MONOHYDRATE"),
            "VALSARTAN"
        );
        assert_eq!(canonical_substance("PERINDOPRIL ARGININE"), "PERINDOPRIL");
    }

    #[test]
    fn test_acid_qualifier_and_accents() {
        assert_eq!(canonical_substance("ACIDE CLAVULANIQUE"), "CLAVULANIQUE");
        assert_eq!(canonical_substance("Mémantine (chlorhydrate de)"), "MEMANTINE");
    }

    #[test]
    fn test_equivalent_tail_dropped() {
        assert_eq!(
            canonical_substance("ABACAVIR (SULFATE) EQUIVALENT A ABACAVIR 300 mg"),
            "ABACAVIR"
        );
    }

    #[test]
    fn test_electrolytes_preserved() {
        assert_eq!(canonical_substance("CHLORURE DE SODIUM"), "CHLORURE DE SODIUM");
        assert_eq!(
            canonical_substance("PHOSPHATE MONOPOTASSIQUE"),
            "PHOSPHATE MONOPOTASSIQUE"
        );
        assert_eq!(canonical_substance("MAGNESIUM"), "MAGNESIUM");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "CHLORHYDRATE DE MEMANTINE",
            "ABACAVIR (SULFATE) EQUIVALENT A ABACAVIR 300 mg",
            "CHLORURE DE SODIUM",
            "ACIDE ACETYLSALICYLIQUE",
            "VALSARTAN DISODIQUE MONOHYDRATE",
            "Doxorubicine",
            "",
        ];
        for input in inputs {
            let once = canonical_substance(input);
            assert_eq!(canonical_substance(&once), once, "not idempotent for {input:?}");
        }
    }
}
