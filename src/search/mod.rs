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

//! Local knowledge-base relevance engine
//!
//! Leaf to root: [`normalize`] canonicalizes text, [`similarity`] scores string
//! pairs with Jaro-Winkler and [`ranker`] combines both into weighted,
//! field-aware ranking of [`KnowledgeEntry`] candidates.

pub mod normalize;
pub mod ranker;
pub mod similarity;
pub mod types;

#[cfg(test)]
mod ranker_tests;

pub use normalize::{extract_terms, normalize};
pub use ranker::RelevanceRanker;
pub use similarity::{fuzzy_match, similarity};
pub use types::{KnowledgeEntry, MatchedField, SearchQuery, SearchResult};
