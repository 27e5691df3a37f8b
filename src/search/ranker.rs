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

//! Relevance ranking over knowledge entries
//!
//! The general [`RelevanceRanker::search`] scores every candidate field by field
//! with weighted exact, substring and fuzzy term matching. The specialized
//! entry points (symptoms, diagnosis, techniques, fuzzy) are independent of it
//! and each filter with their own threshold.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use super::normalize::{extract_terms, normalize};
use super::similarity::{fuzzy_match, similarity};
use super::types::{KnowledgeEntry, MatchedField, SearchQuery, SearchResult};
use crate::config::SearchConfig;
use crate::constants::{
    CONTENT_WEIGHT, DIAGNOSIS_WEIGHT, EXACT_MATCH_FACTOR, FUZZY_CONTENT_WEIGHT, FUZZY_MATCH_FACTOR,
    FUZZY_TAG_WEIGHT, SCORE_NORMALIZATION_PER_TERM, SUBSTRING_MATCH_FACTOR, SYMPTOMS_WEIGHT,
    TAGS_WEIGHT, TECHNIQUES_WEIGHT, TITLE_WEIGHT,
};

/// One entry field prepared for term scoring
struct ScoredField {
    kind: MatchedField,
    weight: f64,
    normalized: String,
    terms: HashSet<String>,
}

impl ScoredField {
    fn new(kind: MatchedField, weight: f64, text: &str) -> Self {
        Self {
            kind,
            weight,
            normalized: normalize(text),
            terms: extract_terms(text).into_iter().collect(),
        }
    }
}

/// Deterministic text-relevance scorer
#[derive(Debug, Clone, Default)]
pub struct RelevanceRanker {
    config: SearchConfig,
}

impl RelevanceRanker {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Rank candidates against a free-text query.
    ///
    /// Returns results scoring above the generic-search threshold, sorted by
    /// descending score (ties keep candidate order), truncated to `query.limit`.
    pub fn search<'a>(
        &self,
        query: &SearchQuery,
        candidates: &'a [KnowledgeEntry],
    ) -> Vec<SearchResult<'a>> {
        let terms = extract_terms(&query.text);
        if terms.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult<'a>> = candidates
            .iter()
            .map(|entry| self.score_entry(&terms, query, entry))
            .filter(|result| result.score > self.config.generic_threshold)
            .collect();

        sort_by_score(&mut results);
        results.truncate(query.limit);
        results
    }

    pub(crate) fn score_entry<'a>(
        &self,
        terms: &[String],
        query: &SearchQuery,
        entry: &'a KnowledgeEntry,
    ) -> SearchResult<'a> {
        let fields = Self::weighted_fields(entry);

        let mut raw_score = 0.0;
        let mut matched_terms = 0usize;
        let mut matched_fields = BTreeSet::new();

        for term in terms {
            let mut term_matched = false;
            for field in &fields {
                if let Some(contribution) = self.score_term(term, field) {
                    raw_score += contribution;
                    matched_fields.insert(field.kind);
                    term_matched = true;
                }
            }
            if term_matched {
                matched_terms += 1;
            }
        }

        let term_count = terms.len() as f64;
        let normalized = raw_score / (term_count * SCORE_NORMALIZATION_PER_TERM);
        let mut score = normalized * entry.clamped_confidence();

        if same_label(&query.category, &entry.category) {
            score *= self.config.category_boost;
        }
        if same_label(&query.specialty, &entry.specialty) {
            score *= self.config.specialty_boost;
        }

        let match_ratio = matched_terms as f64 / term_count;
        if match_ratio < self.config.sparse_match_threshold {
            score *= match_ratio;
        }

        SearchResult {
            entry,
            score: clamp_score(score),
            highlights: self.extract_highlights(terms, entry),
            matched_fields,
        }
    }

    fn weighted_fields(entry: &KnowledgeEntry) -> Vec<ScoredField> {
        let diagnosis = entry.diagnosis.as_deref().unwrap_or_default();
        let fields = [
            (MatchedField::Title, TITLE_WEIGHT, entry.title.clone()),
            (MatchedField::Diagnosis, DIAGNOSIS_WEIGHT, diagnosis.to_string()),
            (MatchedField::Symptoms, SYMPTOMS_WEIGHT, entry.symptoms.join(" ")),
            (MatchedField::Techniques, TECHNIQUES_WEIGHT, entry.techniques.join(" ")),
            (MatchedField::Tags, TAGS_WEIGHT, entry.tags.join(" ")),
            (MatchedField::Content, CONTENT_WEIGHT, entry.content.clone()),
        ];

        fields
            .into_iter()
            .filter(|(_, _, text)| !text.trim().is_empty())
            .map(|(kind, weight, text)| ScoredField::new(kind, weight, &text))
            .collect()
    }

    /// Contribution of the single best match method for one term in one field
    fn score_term(&self, term: &str, field: &ScoredField) -> Option<f64> {
        if field.terms.contains(term) {
            return Some(field.weight * EXACT_MATCH_FACTOR);
        }

        let substring = field.normalized.contains(term)
            || field.terms.iter().any(|field_term| term.contains(field_term.as_str()));
        if substring {
            return Some(field.weight * SUBSTRING_MATCH_FACTOR);
        }

        let best = field
            .terms
            .iter()
            .map(|field_term| similarity(term, field_term))
            .fold(0.0f64, f64::max);

        (best > self.config.term_fuzzy_threshold).then(|| field.weight * best * FUZZY_MATCH_FACTOR)
    }

    /// Snippets around the first occurrence of each term in title and content
    fn extract_highlights(&self, terms: &[String], entry: &KnowledgeEntry) -> Vec<String> {
        let mut highlights = Vec::new();

        for term in terms {
            for text in [&entry.title, &entry.content] {
                if highlights.len() >= self.config.max_highlights {
                    return highlights;
                }
                if let Some(snippet) = self.snippet_around(text, term) {
                    if !highlights.contains(&snippet) {
                        highlights.push(snippet);
                    }
                }
            }
        }

        highlights
    }

    fn snippet_around(&self, text: &str, term: &str) -> Option<String> {
        let needle: Vec<char> = term.chars().collect();
        if needle.is_empty() {
            return None;
        }

        let original: Vec<char> = text.chars().collect();
        let lowered: Vec<char> = text.to_lowercase().chars().collect();

        // Prefer the original casing when lower-casing kept char positions aligned
        let (chars, position) = match find_chars(&lowered, &needle) {
            Some(position) if lowered.len() == original.len() => (original, position),
            Some(position) => (lowered, position),
            None => {
                let normalized: Vec<char> = normalize(text).chars().collect();
                let position = find_chars(&normalized, &needle)?;
                (normalized, position)
            }
        };

        let context = self.config.highlight_context_chars;
        let start = position.saturating_sub(context);
        let end = (position + needle.len() + context).min(chars.len());

        let mut snippet = String::new();
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.extend(&chars[start..end]);
        if end < chars.len() {
            snippet.push_str("...");
        }

        Some(snippet)
    }

    /// Rank by the share of requested symptoms found among each entry's symptoms
    pub fn search_by_symptoms<'a>(
        &self,
        symptoms: &[String],
        candidates: &'a [KnowledgeEntry],
    ) -> Vec<SearchResult<'a>> {
        let wanted: Vec<String> = symptoms
            .iter()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect();
        if wanted.is_empty() {
            return Vec::new();
        }

        let threshold = self.config.symptom_match_threshold;
        let mut results = Vec::new();

        for entry in candidates {
            let entry_symptoms: Vec<(String, &String)> =
                entry.symptoms.iter().map(|s| (normalize(s), s)).collect();

            let mut matched = 0usize;
            let mut highlights = Vec::new();
            for symptom in &wanted {
                let hit = entry_symptoms
                    .iter()
                    .find(|(normalized, _)| fuzzy_match(symptom, normalized, threshold));
                if let Some((_, original)) = hit {
                    matched += 1;
                    if highlights.len() < self.config.max_highlights {
                        highlights.push((*original).clone());
                    }
                }
            }

            if matched == 0 {
                continue;
            }

            let score = matched as f64 / symptoms.len() as f64 * entry.clamped_confidence();
            results.push(SearchResult {
                entry,
                score: clamp_score(score),
                highlights,
                matched_fields: BTreeSet::from([MatchedField::Symptoms]),
            });
        }

        sort_by_score(&mut results);
        results
    }

    /// Rank by similarity between the text and each entry's diagnosis
    pub fn search_by_diagnosis<'a>(
        &self,
        text: &str,
        candidates: &'a [KnowledgeEntry],
    ) -> Vec<SearchResult<'a>> {
        let wanted = normalize(text);
        if wanted.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult<'a>> = candidates
            .iter()
            .filter_map(|entry| {
                let diagnosis = entry.diagnosis.as_ref()?;
                let sim = similarity(&wanted, &normalize(diagnosis));
                (sim > self.config.diagnosis_match_threshold).then(|| SearchResult {
                    entry,
                    score: clamp_score(sim * entry.clamped_confidence()),
                    highlights: vec![diagnosis.clone()],
                    matched_fields: BTreeSet::from([MatchedField::Diagnosis]),
                })
            })
            .collect();

        sort_by_score(&mut results);
        results
    }

    /// Rank by the share of each entry's techniques that resemble the text
    pub fn search_by_techniques<'a>(
        &self,
        text: &str,
        candidates: &'a [KnowledgeEntry],
    ) -> Vec<SearchResult<'a>> {
        let wanted = normalize(text);
        if wanted.is_empty() {
            return Vec::new();
        }

        let threshold = self.config.technique_match_threshold;
        let mut results = Vec::new();

        for entry in candidates.iter().filter(|e| !e.techniques.is_empty()) {
            let matched: Vec<&String> = entry
                .techniques
                .iter()
                .filter(|technique| fuzzy_match(&wanted, &normalize(technique), threshold))
                .collect();

            if matched.is_empty() {
                continue;
            }

            let ratio = matched.len() as f64 / entry.techniques.len() as f64;
            results.push(SearchResult {
                entry,
                score: clamp_score(ratio * entry.clamped_confidence()),
                highlights: matched
                    .into_iter()
                    .take(self.config.max_highlights)
                    .cloned()
                    .collect(),
                matched_fields: BTreeSet::from([MatchedField::Techniques]),
            });
        }

        sort_by_score(&mut results);
        results
    }

    /// Whole-field fuzzy matching against title, content and tags.
    ///
    /// Title counts when its similarity exceeds `threshold`; content is held to
    /// `threshold * fuzzy_content_factor` and weighted down; any tag passing
    /// `threshold` adds a flat weight. The best field wins.
    pub fn fuzzy_search<'a>(
        &self,
        text: &str,
        candidates: &'a [KnowledgeEntry],
        threshold: Option<f64>,
    ) -> Vec<SearchResult<'a>> {
        let wanted = normalize(text);
        if wanted.is_empty() {
            return Vec::new();
        }

        let threshold = threshold.unwrap_or(self.config.fuzzy_search_threshold);
        let content_threshold = threshold * self.config.fuzzy_content_factor;
        let mut results = Vec::new();

        for entry in candidates {
            let mut best = 0.0f64;
            let mut matched_fields = BTreeSet::new();

            let title_sim = similarity(&wanted, &normalize(&entry.title));
            if title_sim > threshold {
                best = best.max(title_sim);
                matched_fields.insert(MatchedField::Title);
            }

            let content_sim = similarity(&wanted, &normalize(&entry.content));
            if content_sim > content_threshold {
                best = best.max(content_sim * FUZZY_CONTENT_WEIGHT);
                matched_fields.insert(MatchedField::Content);
            }

            let tag_hit = entry
                .tags
                .iter()
                .any(|tag| similarity(&wanted, &normalize(tag)) > threshold);
            if tag_hit {
                best = best.max(FUZZY_TAG_WEIGHT);
                matched_fields.insert(MatchedField::Tags);
            }

            let score = clamp_score(best * entry.clamped_confidence());
            if score > 0.0 {
                results.push(SearchResult {
                    entry,
                    score,
                    highlights: Vec::new(),
                    matched_fields,
                });
            }
        }

        sort_by_score(&mut results);
        results
    }
}

fn same_label(wanted: &Option<String>, actual: &Option<String>) -> bool {
    matches!((wanted, actual), (Some(w), Some(a)) if w == a)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Stable descending sort; equal scores keep their original order
fn sort_by_score(results: &mut [SearchResult<'_>]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
