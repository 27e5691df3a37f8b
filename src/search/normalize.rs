// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Text canonicalization shared by matching and cache addressing.
//!
//! Queries and knowledge-entry fields must go through exactly the same
//! [`normalize`] so that term comparison and cache keys stay deterministic.

use std::collections::HashSet;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Function words (Portuguese and English) that never carry clinical meaning.
/// Words of two characters or fewer are already dropped by length.
const STOP_WORDS: &[&str] = &[
    // Portuguese
    "para", "com", "uma", "umas", "uns", "que", "dos", "das", "nos", "nas", "por", "pelo", "pela",
    "pelos", "pelas", "sem", "mais", "menos", "como", "quando", "qual", "quais", "onde", "entre",
    "sobre", "sob", "ate", "apos", "seu", "sua", "seus", "suas", "este", "esta", "estes", "estas",
    "esse", "essa", "isso", "isto", "aquele", "aquela", "ser", "sao", "foi", "tem", "ter", "muito",
    "tambem", "nao", "sim", "pois", "porque", "mas", "ele", "ela", "eles", "elas",
    // English
    "the", "and", "for", "with", "what", "which", "how", "when", "where", "who", "why", "are",
    "was", "were", "has", "have", "had", "this", "that", "these", "those", "from", "into", "about",
    "can", "does", "not", "but", "you", "your", "its",
];

/// Canonicalize text for comparison.
///
/// Lower-cases, decomposes (NFD), strips combining marks, replaces every
/// character that is not alphanumeric or `_` with a space, collapses
/// whitespace and trims. Idempotent.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a normalized token is in the stop-word set
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Extract meaningful terms from text.
///
/// Normalizes, splits on whitespace, drops tokens of two characters or fewer
/// and stop words, then deduplicates keeping first-seen order.
pub fn extract_terms(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut seen = HashSet::new();

    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .filter(|token| !is_stop_word(token))
        .filter(|token| seen.insert(token.to_string()))
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics_and_punctuation() {
        assert_eq!(normalize("Dor Lombar Crônica!"), "dor lombar cronica");
        assert_eq!(normalize("  Reabilitação,   pós-cirúrgica  "), "reabilitacao pos cirurgica");
    }

    #[test]
    fn test_normalize_keeps_digits_and_underscores() {
        assert_eq!(normalize("L4-L5 disc_herniation"), "l4 l5 disc_herniation");
    }

    #[test]
    fn test_normalize_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!???..."), "");
    }

    #[test]
    fn test_extract_terms_drops_short_and_stop_words() {
        let terms = extract_terms("Exercícios para dor no joelho com artrose");
        assert_eq!(terms, vec!["exercicios", "dor", "joelho", "artrose"]);
    }

    #[test]
    fn test_extract_terms_deduplicates_in_order() {
        let terms = extract_terms("Ombro ombro OMBRO dor ombro");
        assert_eq!(terms, vec!["ombro", "dor"]);
    }

    #[test]
    fn test_extract_terms_empty() {
        assert!(extract_terms("").is_empty());
        assert!(extract_terms("a de o").is_empty());
    }
}
