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

//! Tunable scoring and routing constants.
//!
//! These values are the defaults of the matching fields in [`crate::config`];
//! override them in `config.toml`.

// ===== Relevance ranking =====

/// Minimum score for a result to be returned by the general ranker
pub const GENERIC_SEARCH_THRESHOLD: f64 = 0.1;

/// Results matching fewer than this share of query terms are penalized
pub const SPARSE_MATCH_THRESHOLD: f64 = 0.3;

/// Default number of results returned by a search
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Per-term fuzzy similarity required before a fuzzy contribution counts
pub const TERM_FUZZY_THRESHOLD: f64 = 0.8;

pub const CATEGORY_BOOST: f64 = 1.3;
pub const SPECIALTY_BOOST: f64 = 1.2;

/// Divisor applied per query term when normalizing raw field scores
pub const SCORE_NORMALIZATION_PER_TERM: f64 = 10.0;

// Field weights
pub const TITLE_WEIGHT: f64 = 3.0;
pub const DIAGNOSIS_WEIGHT: f64 = 2.5;
pub const SYMPTOMS_WEIGHT: f64 = 2.0;
pub const TECHNIQUES_WEIGHT: f64 = 1.8;
pub const TAGS_WEIGHT: f64 = 1.5;
pub const CONTENT_WEIGHT: f64 = 1.0;

// Match method multipliers
pub const EXACT_MATCH_FACTOR: f64 = 1.0;
pub const SUBSTRING_MATCH_FACTOR: f64 = 0.7;
pub const FUZZY_MATCH_FACTOR: f64 = 0.5;

// ===== Specialized searches =====

pub const SYMPTOM_MATCH_THRESHOLD: f64 = 0.8;
pub const DIAGNOSIS_MATCH_THRESHOLD: f64 = 0.6;
pub const TECHNIQUE_MATCH_THRESHOLD: f64 = 0.7;

pub const FUZZY_SEARCH_THRESHOLD: f64 = 0.6;
/// Content is held to a lower bar than title: `threshold * FUZZY_CONTENT_FACTOR`
pub const FUZZY_CONTENT_FACTOR: f64 = 0.8;
pub const FUZZY_CONTENT_WEIGHT: f64 = 0.9;
/// Flat weight given when any tag passes the fuzzy threshold
pub const FUZZY_TAG_WEIGHT: f64 = 0.8;

// ===== Highlights =====

pub const MAX_HIGHLIGHTS: usize = 5;
pub const HIGHLIGHT_CONTEXT_CHARS: usize = 20;

// ===== Resolution pipeline =====

/// Minimum ranker score at which the knowledge base answers without paid resolution
pub const KNOWLEDGE_TRUST_THRESHOLD: f64 = 0.7;

/// Candidates ranked during the knowledge-base tier
pub const KNOWLEDGE_CANDIDATE_LIMIT: usize = 5;

/// Confidence reported when every tier missed and no account was available
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Confidence reported for the generic error response
pub const ERROR_CONFIDENCE: f64 = 0.0;

/// Namespace prefix of every cache key
pub const CACHE_KEY_PREFIX: &str = "ai_query";

pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;
