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

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::resolution::KnowledgeBase;
use crate::search::{extract_terms, normalize, KnowledgeEntry};

/// Leading characters of a term compared during prefiltering
const STEM_CHARS: usize = 4;

/// Knowledge base backed by a JSON array of entries loaded into memory
pub struct JsonKnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl JsonKnowledgeBase {
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from a JSON file. A missing file yields an empty knowledge base.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            warn!(
                path = %path.display(),
                "Knowledge file not found, starting with an empty knowledge base"
            );
            return Ok(Self::from_entries(Vec::new()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read knowledge file {}", path.display()))?;
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid knowledge file {}", path.display()))?;

        info!(path = %path.display(), entries = entries.len(), "Knowledge base loaded");
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose searchable text shares a term stem with the query.
    /// A superset is fine, the ranker does the scoring.
    pub fn prefilter(&self, text: &str) -> Vec<KnowledgeEntry> {
        let stems: Vec<String> = extract_terms(text)
            .iter()
            .map(|term| term.chars().take(STEM_CHARS).collect())
            .collect();

        if stems.is_empty() {
            return self.entries.clone();
        }

        let matched: Vec<KnowledgeEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                let searchable = normalize(&entry.get_searchable_text());
                stems.iter().any(|stem| searchable.contains(stem.as_str()))
            })
            .cloned()
            .collect();

        debug!(
            stems = ?stems,
            candidates = matched.len(),
            total = self.entries.len(),
            "Knowledge prefilter"
        );
        matched
    }
}

#[async_trait]
impl KnowledgeBase for JsonKnowledgeBase {
    async fn search_entries(&self, text: &str) -> Result<Vec<KnowledgeEntry>> {
        Ok(self.prefilter(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str, content: &str) -> KnowledgeEntry {
        KnowledgeEntry::new(id, title, content)
    }

    fn knowledge() -> JsonKnowledgeBase {
        let mut shoulder = entry("kb-2", "Tendinopatia do ombro", "Fortalecimento do manguito");
        shoulder.tags = vec!["ombro".to_string()];
        JsonKnowledgeBase::from_entries(vec![
            entry("kb-1", "Dor Lombar Cronica", "Exercicios de estabilizacao"),
            shoulder,
            entry("kb-3", "Entorse de tornozelo", "Protocolo PRICE"),
        ])
    }

    #[test]
    fn test_prefilter_by_stem() {
        let kb = knowledge();

        // "lombares" shares the "lomb" stem with "lombar"
        let ids: Vec<String> = kb.prefilter("Dores lombares").into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["kb-1"]);

        let ids: Vec<String> = kb.prefilter("ombro").into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["kb-2"]);
    }

    #[test]
    fn test_prefilter_without_terms_returns_everything() {
        let kb = knowledge();

        assert_eq!(kb.prefilter("").len(), 3);
        assert_eq!(kb.prefilter("de o a").len(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!("clinresolve-missing-{}.json", uuid::Uuid::new_v4()));

        let kb = JsonKnowledgeBase::load(&path).await.unwrap();
        assert!(kb.is_empty());
    }

    #[tokio::test]
    async fn test_load_entries_with_defaults() {
        let path = std::env::temp_dir().join(format!("clinresolve-kb-{}.json", uuid::Uuid::new_v4()));
        let json = r#"[
            {"id": "kb-1", "title": "Dor lombar", "content": "Programa", "category": "protocol"},
            {"id": "kb-2", "title": "Ombro", "content": "Manguito", "confidence": 0.6, "tags": ["ombro"]}
        ]"#;
        tokio::fs::write(&path, json).await.unwrap();

        let kb = JsonKnowledgeBase::load(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(kb.len(), 2);
        assert_eq!(kb.entries()[0].confidence, 1.0);
        assert_eq!(kb.entries()[0].category.as_deref(), Some("protocol"));
        assert_eq!(kb.entries()[1].confidence, 0.6);
        assert!(kb.entries()[1].precautions.is_empty());

        let candidates = kb.search_entries("manguito rotador").await.unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_file() {
        let path = std::env::temp_dir().join(format!("clinresolve-bad-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = JsonKnowledgeBase::load(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert!(result.is_err());
    }
}
