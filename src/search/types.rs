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

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::DEFAULT_SEARCH_LIMIT;

/// A locally stored clinical fact record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
    /// Contraindications and care notes rendered with knowledge-base answers
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    /// Curator confidence in this entry (0.0 to 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl KnowledgeEntry {
    /// Create an entry with only the required fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            diagnosis: None,
            symptoms: Vec::new(),
            techniques: Vec::new(),
            precautions: Vec::new(),
            tags: Vec::new(),
            category: None,
            specialty: None,
            confidence: default_confidence(),
        }
    }

    /// Confidence clamped to [0, 1]; stored data is not trusted to be in range
    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_nan() {
            return 0.0;
        }
        self.confidence.clamp(0.0, 1.0)
    }

    /// Get text covering every scored field, for prefiltering
    pub fn get_searchable_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.title,
            self.content,
            self.diagnosis.as_deref().unwrap_or_default(),
            self.symptoms.join(" "),
            self.techniques.join(" "),
            self.tags.join(" ")
        )
    }
}

/// Ranker query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub category: Option<String>,
    pub specialty: Option<String>,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
            specialty: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Entry fields that can contribute to a match.
///
/// Declaration order is the reporting order of [`SearchResult::matched_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedField {
    Title,
    Content,
    Diagnosis,
    Symptoms,
    Techniques,
    Tags,
}

impl std::fmt::Display for MatchedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchedField::Title => write!(f, "title"),
            MatchedField::Content => write!(f, "content"),
            MatchedField::Diagnosis => write!(f, "diagnosis"),
            MatchedField::Symptoms => write!(f, "symptoms"),
            MatchedField::Techniques => write!(f, "techniques"),
            MatchedField::Tags => write!(f, "tags"),
        }
    }
}

/// Ranked reference to a knowledge entry
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub entry: &'a KnowledgeEntry,
    /// Relevance in [0, 1]
    pub score: f64,
    /// At most five text snippets around matched terms
    pub highlights: Vec<String>,
    pub matched_fields: BTreeSet<MatchedField>,
}
