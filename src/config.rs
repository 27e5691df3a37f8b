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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::*;
use crate::resolution::provider::ProviderId;
use crate::resolution::types::QueryType;

/// Relevance ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub generic_threshold: f64,
    pub sparse_match_threshold: f64,
    pub default_limit: usize,
    pub term_fuzzy_threshold: f64,
    pub category_boost: f64,
    pub specialty_boost: f64,
    pub symptom_match_threshold: f64,
    pub diagnosis_match_threshold: f64,
    pub technique_match_threshold: f64,
    pub fuzzy_search_threshold: f64,
    pub fuzzy_content_factor: f64,
    pub max_highlights: usize,
    pub highlight_context_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            generic_threshold: GENERIC_SEARCH_THRESHOLD,
            sparse_match_threshold: SPARSE_MATCH_THRESHOLD,
            default_limit: DEFAULT_SEARCH_LIMIT,
            term_fuzzy_threshold: TERM_FUZZY_THRESHOLD,
            category_boost: CATEGORY_BOOST,
            specialty_boost: SPECIALTY_BOOST,
            symptom_match_threshold: SYMPTOM_MATCH_THRESHOLD,
            diagnosis_match_threshold: DIAGNOSIS_MATCH_THRESHOLD,
            technique_match_threshold: TECHNIQUE_MATCH_THRESHOLD,
            fuzzy_search_threshold: FUZZY_SEARCH_THRESHOLD,
            fuzzy_content_factor: FUZZY_CONTENT_FACTOR,
            max_highlights: MAX_HIGHLIGHTS,
            highlight_context_chars: HIGHLIGHT_CONTEXT_CHARS,
        }
    }
}

/// Tiered resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Minimum knowledge-base score that skips cache and paid tiers
    pub knowledge_trust_threshold: f64,
    pub knowledge_candidate_limit: usize,
    pub fallback_confidence: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            knowledge_trust_threshold: KNOWLEDGE_TRUST_THRESHOLD,
            knowledge_candidate_limit: KNOWLEDGE_CANDIDATE_LIMIT,
            fallback_confidence: FALLBACK_CONFIDENCE,
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub default_ttl_hours: u64,
    /// Per query type overrides, keyed by type label (e.g. `research = 168`)
    pub ttl_hours: HashMap<String, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            ttl_hours: HashMap::new(),
        }
    }
}

impl CacheConfig {
    pub fn ttl_for(&self, query_type: QueryType) -> u64 {
        self.ttl_hours
            .get(query_type.as_str())
            .copied()
            .unwrap_or(self.default_ttl_hours)
    }
}

/// Local knowledge base configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// JSON file of knowledge entries; defaults to `knowledge.json` in the storage dir
    pub path: Option<PathBuf>,
}

/// Paid provider account with a monthly call quota
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub id: String,
    pub provider: ProviderId,
    pub monthly_quota: u32,
    #[serde(default)]
    pub cost_per_call: f64,
}

/// Feedback sink configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// JSON-lines file; defaults to `feedback.jsonl` in the storage dir
    pub path: Option<PathBuf>,
}

/// Main configuration for clinresolve
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub resolution: ResolutionConfig,
    pub cache: CacheConfig,
    pub knowledge: KnowledgeConfig,
    pub accounts: Vec<AccountConfig>,
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Load configuration from config.toml file
    /// First tries to load from system config directory, falls back to embedded template
    pub fn load() -> Result<Self> {
        let config_path = crate::storage::get_system_config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Config doesn't exist, create from template
            let template_content = include_str!("../config-templates/default.toml");
            let config: Self = toml::from_str(template_content)?;

            if let Some(parent) = config_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&config_path, template_content)?;

            Ok(config)
        }
    }

    pub fn knowledge_path(&self) -> Result<PathBuf> {
        match &self.knowledge.path {
            Some(path) => Ok(path.clone()),
            None => crate::storage::get_knowledge_path(),
        }
    }

    pub fn feedback_path(&self) -> Result<PathBuf> {
        match &self.feedback.path {
            Some(path) => Ok(path.clone()),
            None => crate::storage::get_feedback_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template_parses() {
        let template = include_str!("../config-templates/default.toml");
        let config: Config = toml::from_str(template).unwrap();

        assert_eq!(config.resolution.knowledge_trust_threshold, 0.7);
        assert_eq!(config.search.generic_threshold, 0.1);
        assert_eq!(config.search.sparse_match_threshold, 0.3);
        assert!(!config.accounts.is_empty());
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("[search]\ndefault_limit = 3\n").unwrap();

        assert_eq!(config.search.default_limit, 3);
        assert_eq!(config.search.fuzzy_search_threshold, 0.6);
        assert_eq!(config.resolution.knowledge_candidate_limit, 5);
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn test_cache_ttl_override() {
        let mut cache = CacheConfig::default();
        cache.ttl_hours.insert("research".to_string(), 168);

        assert_eq!(cache.ttl_for(QueryType::Research), 168);
        assert_eq!(cache.ttl_for(QueryType::Protocol), 24);
    }
}
