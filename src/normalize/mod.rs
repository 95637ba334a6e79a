//! Normalization pipeline
//!
//! One parameterized driver backs every normalized view of a name, so the
//! canonical substance form, the clustering key, and the label utilities can
//! never drift apart. Rule lists live in `rules` as plain data.

pub mod rules;
mod text;
mod canonical;
mod key;
mod label;
mod screen;

pub use canonical::{canonical_substance, is_pure_inorganic};
pub use key::clustering_key;
pub use label::{clean_product_label, fallback_reference_name, split_label_last};
pub use screen::is_homeopathic;
pub use text::{collapse_duplicate_tokens, sort_tokens, squeeze, strip_diacritics};
pub(crate) use text::{DOSAGE_RE as DOSAGE_PATTERN, NUMBER_RE as NUMBER_PATTERN};

use text::{
    flatten_punctuation, fold_text, remove_phrases, strip_leading_phrase, DOSAGE_RE,
    EQUIVALENT_RE, NUMBER_RE, PAREN_RE, UNIT_TOKEN_RE,
};

/// Named switches of the normalization driver.
///
/// The two presets cover the crate's needs; callers with a different mix
/// (e.g. a search indexer) can assemble their own.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    /// Strip salt prefixes/suffixes down to the base molecule.
    pub strip_salts: bool,
    /// Strip dosage expressions, bare numbers, and unit tokens.
    pub strip_dosage: bool,
    /// Strip oral-form and population tokens.
    pub strip_forms: bool,
    /// Strip marketing/packaging noise words.
    pub strip_noise: bool,
    /// Re-append administration-form hints found in the input.
    pub inject_form_hints: bool,
    /// Replace separator punctuation with spaces.
    pub flatten_punctuation: bool,
    /// Sort the final tokens alphabetically (combination order-invariance).
    pub sort_tokens: bool,
}

impl NormalizeOptions {
    /// Canonical substance form: salt-insensitive, order-preserving.
    pub fn canonical() -> Self {
        Self {
            strip_salts: true,
            strip_dosage: false,
            strip_forms: false,
            strip_noise: false,
            inject_form_hints: false,
            flatten_punctuation: false,
            sort_tokens: false,
        }
    }

    /// Soft-link clustering key: everything stripped, tokens sorted.
    pub fn clustering() -> Self {
        Self {
            strip_salts: true,
            strip_dosage: true,
            strip_forms: true,
            strip_noise: true,
            inject_form_hints: true,
            flatten_punctuation: true,
            sort_tokens: true,
        }
    }
}

/// Applies the configured normalization stages to one name.
///
/// Output is upper-cased, diacritic-free, and whitespace-squeezed. Stages
/// run in a fixed order; every stage is a no-op on its own output, which is
/// what makes the canonical preset idempotent.
pub fn normalize(input: &str, opts: &NormalizeOptions) -> String {
    let mut working = fold_text(input);
    if working.trim().is_empty() {
        return String::new();
    }
    working = working.replace('%', " ");

    // Keep the base molecule, drop the "equivalent to ..." tail. Combination
    // strings keep their tail: the "+" side lists further substances. Runs
    // before noise stripping, which would otherwise consume the marker.
    if !working.contains('+') {
        let cut = EQUIVALENT_RE.find(&working).map(|m| m.start());
        if let Some(cut) = cut {
            working.truncate(cut);
        }
    }

    working = PAREN_RE.replace_all(&working, " ").into_owned();

    if opts.strip_noise {
        working = strip_leading_phrase(&working, rules::PREFIX_STOP_WORDS);
        working = remove_phrases(&working, rules::NOISE_WORDS);
        working = remove_phrases(&working, rules::TARGET_POPULATION_TOKENS);
    }

    // Collect form hints before any form token is stripped away.
    let hints: Vec<&str> = if opts.inject_form_hints {
        rules::FORM_HINTS
            .iter()
            .filter(|h| contains_phrase(&working, h))
            .copied()
            .collect()
    } else {
        Vec::new()
    };

    working = working
        .strip_prefix("ACIDE ")
        .map(str::to_string)
        .unwrap_or(working);

    working = squeeze(&working);

    if opts.strip_salts {
        working = canonical::strip_salts(&working);
    }

    if opts.strip_forms {
        working = remove_phrases(&working, rules::ORAL_FORM_TOKENS);
        working = remove_phrases(&working, rules::TARGET_POPULATION_TOKENS);
    }

    if opts.strip_dosage {
        working = DOSAGE_RE.replace_all(&working, " ").into_owned();
        working = NUMBER_RE.replace_all(&working, " ").into_owned();
        working = UNIT_TOKEN_RE.replace_all(&working, " ").into_owned();
        working = working.replace('+', " ");
    }

    if opts.flatten_punctuation {
        working = flatten_punctuation(&working);
    }

    working = collapse_duplicate_tokens(&squeeze(&working));

    if !hints.is_empty() {
        let mut appended = working;
        for hint in hints {
            if !contains_phrase(&appended, hint) {
                appended.push(' ');
                appended.push_str(hint);
            }
        }
        working = appended;
    }

    if opts.sort_tokens {
        working = collapse_duplicate_tokens(&sort_tokens(&working));
    }

    squeeze(&working)
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let tokens: Vec<&str> = haystack.split_whitespace().collect();
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens.windows(needle.len()).any(|w| w == needle)
}
