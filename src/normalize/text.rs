//! Shared text helpers
//!
//! Token-level primitives and the compiled patterns shared by the
//! normalization drivers. Everything operates on upper-cased,
//! diacritic-stripped text.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Dosage expression with unit, including compound forms ("5 mg/5 ml").
pub(crate) static DOSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d+(?:[.,]\d+)?\s*(?:(?:MCG|UG|µG|MG|G|ML|CL|L|MUI|UI|IU|MILLIGRAMMES?|MICROGRAMMES?|GRAMMES?|MICROLITRES?)\b|%)(?:\s*/\s*\d*(?:[.,]\d+)?\s*(?:MCG|UG|µG|MG|G|ML|L|MUI|UI|IU)\b)?",
    )
    .unwrap()
});

/// Standalone numeric token, decimal comma or point.
pub(crate) static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:[.,]\d+)?\b").unwrap());

/// Standalone unit token left behind by aggressive splits.
pub(crate) static UNIT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:MCG|UG|µG|MG|G|ML|CL|L|MUI|UI|IU|M)\b").unwrap());

/// Parenthetical segment, salt hints included.
pub(crate) static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// "EQUIVALENT A ..." tail marker (both historical spellings).
pub(crate) static EQUIVALENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bEQUIVAL[EA]NT\s+A\b").unwrap());

/// Trailing dosage remnant on a label-parsed name.
pub(crate) static TRAILING_DOSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+\d+(?:[.,]\d+)?\s*(?:MCG|UG|µG|MG|G|ML|L|MUI|UI|IU|%)?\s*$").unwrap()
});

/// Homeopathic dilution notation ("4CH", "15 DH", "6 K").
pub(crate) static DILUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\s?(?:CH|DH|LM|CK|K|Q|X)\b").unwrap());

/// Dilution range ("2CH A 30CH"), the strongest homeopathic marker.
pub(crate) static DILUTION_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+\s?(?:CH|DH|K)\s*(?:A|ET|OU)\s*\d+\s?(?:CH|DH|K)\b").unwrap()
});

/// Removes diacritics by NFD decomposition and combining-mark filtering.
pub fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Collapses all whitespace runs to single spaces and trims.
pub fn squeeze(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases, strips diacritics, and replaces exotic whitespace/dashes.
pub fn fold_text(input: &str) -> String {
    let upper = input.replace('\u{00A0}', " ").to_uppercase();
    strip_diacritics(&upper).replace(['–', '—'], "-")
}

/// Removes every whole-word occurrence of the given phrases.
///
/// Phrases may span several tokens; matching is greedy in table order, so
/// longer phrases must precede their own substrings.
pub fn remove_phrases(input: &str, phrases: &[&str]) -> String {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let phrase_tokens: Vec<Vec<&str>> = phrases
        .iter()
        .map(|p| p.split_whitespace().collect())
        .collect();

    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    'outer: while i < tokens.len() {
        for phrase in &phrase_tokens {
            if phrase.is_empty() || i + phrase.len() > tokens.len() {
                continue;
            }
            if tokens[i..i + phrase.len()] == phrase[..] {
                i += phrase.len();
                continue 'outer;
            }
        }
        kept.push(tokens[i]);
        i += 1;
    }
    kept.join(" ")
}

/// Removes a single leading phrase from the ordered list, if present.
pub fn strip_leading_phrase(input: &str, phrases: &[&str]) -> String {
    for phrase in phrases {
        if let Some(rest) = input.strip_prefix(phrase) {
            if rest.is_empty() || rest.starts_with(' ') {
                return rest.trim_start().to_string();
            }
        }
    }
    input.to_string()
}

/// Collapses adjacent duplicate tokens ("BISOPROLOL BISOPROLOL 5").
pub fn collapse_duplicate_tokens(input: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for token in input.split_whitespace() {
        if kept.last() != Some(&token) {
            kept.push(token);
        }
    }
    kept.join(" ")
}

/// Sorts tokens alphabetically so combination order never matters.
pub fn sort_tokens(input: &str) -> String {
    let mut tokens: Vec<&str> = input.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Replaces separator punctuation with spaces.
pub fn flatten_punctuation(input: &str) -> String {
    input.replace(['-', '\'', '’', '"', ',', ':', '.', '/', '+'], " ")
}
