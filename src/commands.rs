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
use std::sync::Arc;
use tracing::debug;

use crate::cli::{Commands, OutputFormat, SearchMode};
use crate::config::Config;
use crate::formatting::{format_response, format_search_results, format_usage};
use crate::local::{
    JsonKnowledgeBase, JsonlFeedbackSink, MemoryCache, OfflineProviderClient, QuotaAccountManager,
};
use crate::resolution::{cache_key, AiQuery, Collaborators, QueryResolver};
use crate::search::{RelevanceRanker, SearchQuery, SearchResult};
use crate::server::ResolutionServer;

pub async fn execute(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Query {
            text,
            query_type,
            context,
            user,
            format,
            rating,
            comment,
        } => {
            let resolver = build_resolver(config).await?;

            let mut query = AiQuery::new(text, query_type);
            query.context = context;
            query.user_id = user;

            let response = resolver.process_query(&query).await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
                OutputFormat::Text => print!("{}", format_response(&response)),
            }

            if let Some(rating) = rating {
                resolver.record_feedback(&query, &response, rating, comment).await;
            }
        }

        Commands::Search {
            text,
            category,
            specialty,
            limit,
            mode,
            threshold,
            format,
        } => {
            let knowledge = JsonKnowledgeBase::load(&config.knowledge_path()?).await?;
            let ranker = RelevanceRanker::new(config.search.clone());

            let mut query = SearchQuery::new(text.as_str());
            query.category = category;
            query.specialty = specialty;
            query.limit = limit.unwrap_or(config.search.default_limit);

            let results = run_search(&ranker, &query, mode, threshold, knowledge.entries());
            debug!(mode = ?mode, results = results.len(), "Search finished");

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                OutputFormat::Text => print!("{}", format_search_results(&results)),
            }
        }

        Commands::CacheKey { text, query_type } => {
            println!("{}", cache_key(&text, query_type));
        }

        Commands::Accounts { format } => {
            // Quotas live in memory, so this reports the configured accounts fresh
            let resolver = build_resolver(config).await?;
            let stats = resolver.usage_stats().await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Text => print!("{}", format_usage(&stats)),
            }
        }

        Commands::Serve { .. } => {
            let resolver = build_resolver(config).await?;
            ResolutionServer::new(resolver).run().await?;
        }
    }

    Ok(())
}

/// Wire the local collaborators described by `config` into a resolver
pub async fn build_resolver(config: &Config) -> Result<QueryResolver> {
    let knowledge = JsonKnowledgeBase::load(&config.knowledge_path()?).await?;

    let collaborators = Collaborators {
        knowledge: Arc::new(knowledge),
        cache: Arc::new(MemoryCache::new(config.cache.clone())),
        accounts: Arc::new(QuotaAccountManager::new(config.accounts.clone())),
        provider: Arc::new(OfflineProviderClient::new(&config.accounts)),
        feedback: Some(Arc::new(JsonlFeedbackSink::new(config.feedback_path()?))),
    };

    Ok(QueryResolver::new(
        collaborators,
        config.search.clone(),
        config.resolution.clone(),
    ))
}

fn run_search<'a>(
    ranker: &RelevanceRanker,
    query: &SearchQuery,
    mode: SearchMode,
    threshold: Option<f64>,
    entries: &'a [crate::search::KnowledgeEntry],
) -> Vec<SearchResult<'a>> {
    let mut results = match mode {
        SearchMode::General => return ranker.search(query, entries),
        SearchMode::Symptoms => {
            let symptoms: Vec<String> = query
                .text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            ranker.search_by_symptoms(&symptoms, entries)
        }
        SearchMode::Diagnosis => ranker.search_by_diagnosis(&query.text, entries),
        SearchMode::Techniques => ranker.search_by_techniques(&query.text, entries),
        SearchMode::Fuzzy => ranker.fuzzy_search(&query.text, entries, threshold),
    };

    results.truncate(query.limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::KnowledgeEntry;

    fn entries() -> Vec<KnowledgeEntry> {
        let mut lumbar = KnowledgeEntry::new("kb-1", "Dor lombar", "Estabilizacao");
        lumbar.symptoms = vec!["dor lombar".to_string(), "rigidez".to_string()];
        let mut neck = KnowledgeEntry::new("kb-2", "Cervicalgia", "Mobilidade");
        neck.symptoms = vec!["rigidez".to_string()];
        vec![lumbar, neck]
    }

    #[test]
    fn test_symptom_mode_splits_on_commas() {
        let ranker = RelevanceRanker::default();
        let entries = entries();
        let query = SearchQuery::new(" dor lombar , rigidez ,");

        let results = run_search(&ranker, &query, SearchMode::Symptoms, None, &entries);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.id, "kb-1");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].score, 0.5);
    }

    #[test]
    fn test_specialized_modes_respect_limit() {
        let ranker = RelevanceRanker::default();
        let entries = entries();
        let query = SearchQuery::new("rigidez").with_limit(1);

        let results = run_search(&ranker, &query, SearchMode::Symptoms, None, &entries);

        assert_eq!(results.len(), 1);
    }
}
