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

//! Tiered query resolution.
//!
//! A query is tried against the local knowledge base, then the response
//! cache, then a paid provider. Tiers run strictly one after another so a paid
//! call is only made once every cheap tier has missed. A failure inside a tier
//! is a miss for that tier; only a blank query is reported to the caller.
//! A provider call that errors or panics yields the fallback response, and a
//! failed write-through never discards a paid reply. Anything else that
//! escapes the tiers becomes a generic error response.

use anyhow::Result;
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::cache_key::cache_key;
use super::collaborators::{AccountManager, FeedbackSink, KnowledgeBase, ProviderClient, ResponseCache};
use super::errors::ResolutionError;
use super::formatting::{format_knowledge_answer, knowledge_references, ERROR_MESSAGE, FALLBACK_MESSAGE};
use super::provider::ProviderSelector;
use super::types::{AiQuery, AiResponse, FeedbackEntry, ResponseSource, UsageStats};
use crate::config::{ResolutionConfig, SearchConfig};
use crate::constants::ERROR_CONFIDENCE;
use crate::search::{KnowledgeEntry, RelevanceRanker, SearchQuery};

const KNOWLEDGE_TIER: &str = "knowledge_base";
const CACHE_TIER: &str = "cache";
const PREMIUM_TIER: &str = "premium";

/// External systems sequenced by the resolver
#[derive(Clone)]
pub struct Collaborators {
    pub knowledge: Arc<dyn KnowledgeBase>,
    pub cache: Arc<dyn ResponseCache>,
    pub accounts: Arc<dyn AccountManager>,
    pub provider: Arc<dyn ProviderClient>,
    pub feedback: Option<Arc<dyn FeedbackSink>>,
}

/// Economic query resolution pipeline
pub struct QueryResolver {
    collaborators: Collaborators,
    ranker: RelevanceRanker,
    config: ResolutionConfig,
}

impl QueryResolver {
    pub fn new(
        collaborators: Collaborators,
        search_config: SearchConfig,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            collaborators,
            ranker: RelevanceRanker::new(search_config),
            config,
        }
    }

    pub fn ranker(&self) -> &RelevanceRanker {
        &self.ranker
    }

    /// Resolve a query through the knowledge-base, cache and premium tiers.
    ///
    /// Never fails for non-blank text: collaborator errors and panics become a
    /// fallback or generic error response carrying its provenance and confidence.
    pub async fn process_query(&self, query: &AiQuery) -> Result<AiResponse, ResolutionError> {
        if query.text.trim().is_empty() {
            return Err(ResolutionError::blank_query());
        }

        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.resolve(query))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ResolutionError::TopLevel {
                    reason: format!("panicked: {}", panic_message(&*panic)),
                })
            });

        let mut response = match outcome {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, query_type = %query.query_type, "Query resolution failed");
                self.error_response()
            }
        };

        response.response_time_ms = started.elapsed().as_millis() as u64;
        Ok(response)
    }

    async fn resolve(&self, query: &AiQuery) -> Result<AiResponse, ResolutionError> {
        match guarded(KNOWLEDGE_TIER, self.knowledge_lookup(query)).await {
            Ok(Some(response)) => return Ok(response),
            Ok(None) => debug!(tier = KNOWLEDGE_TIER, outcome = "miss", "Tier missed"),
            Err(e) => warn!(tier = KNOWLEDGE_TIER, outcome = "error", error = %e, "Tier failed"),
        }

        let key = cache_key(&query.text, query.query_type);

        match guarded(CACHE_TIER, self.cache_lookup(query, &key)).await {
            Ok(Some(response)) => return Ok(response),
            Ok(None) => debug!(tier = CACHE_TIER, outcome = "miss", key = %key, "Tier missed"),
            Err(e) => warn!(tier = CACHE_TIER, outcome = "error", error = %e, "Tier failed"),
        }

        match self.premium_lookup(query, &key).await {
            Ok(response) => Ok(response),
            Err(
                e @ (ResolutionError::ProviderUnavailable { .. }
                | ResolutionError::ProviderCall { .. }),
            ) => {
                warn!(tier = PREMIUM_TIER, outcome = "fallback", error = %e, "Serving fallback response");
                Ok(self.fallback_response())
            }
            Err(e) => Err(e),
        }
    }

    async fn knowledge_lookup(&self, query: &AiQuery) -> Result<Option<AiResponse>, ResolutionError> {
        let candidates = self
            .collaborators
            .knowledge
            .search_entries(&query.text)
            .await
            .map_err(|e| ResolutionError::tier_miss(KNOWLEDGE_TIER, e))?;

        if candidates.is_empty() {
            return Ok(None);
        }

        let search = SearchQuery::new(query.text.as_str())
            .with_category(query.query_type.as_str())
            .with_limit(self.config.knowledge_candidate_limit);
        let results = self.ranker.search(&search, &candidates);

        let Some(top) = results.first() else {
            return Ok(None);
        };

        if top.score < self.config.knowledge_trust_threshold {
            debug!(
                tier = KNOWLEDGE_TIER,
                score = top.score,
                threshold = self.config.knowledge_trust_threshold,
                "Best match below trust threshold"
            );
            return Ok(None);
        }

        info!(
            tier = KNOWLEDGE_TIER,
            outcome = "hit",
            entry_id = %top.entry.id,
            score = top.score,
            "Resolved from knowledge base"
        );

        let mut response = AiResponse::new(
            format_knowledge_answer(top),
            ResponseSource::KnowledgeBase,
            top.score,
        );
        response.references = knowledge_references(top);
        Ok(Some(response))
    }

    async fn cache_lookup(
        &self,
        query: &AiQuery,
        key: &str,
    ) -> Result<Option<AiResponse>, ResolutionError> {
        let cached = self
            .collaborators
            .cache
            .get(key, query.query_type)
            .await
            .map_err(|e| ResolutionError::tier_miss(CACHE_TIER, e))?;

        Ok(cached.map(|mut response| {
            info!(tier = CACHE_TIER, outcome = "hit", key = %key, "Resolved from cache");
            response.source = ResponseSource::Cache;
            response
        }))
    }

    async fn premium_lookup(&self, query: &AiQuery, key: &str) -> Result<AiResponse, ResolutionError> {
        let provider = ProviderSelector::select(query.query_type);

        let account = match self.collaborators.accounts.select_best_account(provider).await {
            Ok(Some(account)) => account,
            Ok(None) => return Err(ResolutionError::ProviderUnavailable { provider }),
            Err(e) => {
                warn!(tier = PREMIUM_TIER, provider = %provider, error = %e, "Account selection failed");
                return Err(ResolutionError::ProviderUnavailable { provider });
            }
        };

        let reply = caught(self.collaborators.provider.call(&account, &query.text))
            .await
            .map_err(|reason| ResolutionError::ProviderCall { provider, reason })?;

        let mut response = AiResponse::new(reply.text, ResponseSource::PremiumAi, reply.confidence);
        response.cost = Some(reply.cost);
        response.provider = Some(account.provider.to_string());

        // Write-through, keyed exactly like the lookup. The reply is already paid for.
        if let Err(reason) = caught(self.collaborators.cache.set(key, &response, query.query_type)).await {
            warn!(tier = CACHE_TIER, key = %key, error = %reason, "Cache write-through failed");
        }

        info!(
            tier = PREMIUM_TIER,
            outcome = "hit",
            provider = %provider,
            account_id = %account.id,
            cost = reply.cost,
            "Resolved from premium provider"
        );

        Ok(response)
    }

    fn fallback_response(&self) -> AiResponse {
        AiResponse::new(
            FALLBACK_MESSAGE,
            ResponseSource::KnowledgeBase,
            self.config.fallback_confidence,
        )
    }

    fn error_response(&self) -> AiResponse {
        AiResponse::new(ERROR_MESSAGE, ResponseSource::KnowledgeBase, ERROR_CONFIDENCE)
    }

    /// Prefiltered knowledge entries for ad-hoc searches outside the pipeline
    pub async fn candidates(&self, text: &str) -> Result<Vec<KnowledgeEntry>> {
        self.collaborators.knowledge.search_entries(text).await
    }

    pub async fn usage_stats(&self) -> Result<UsageStats> {
        self.collaborators.accounts.usage_stats().await
    }

    /// Submit a rating for a delivered response. Sink failures are logged only.
    pub async fn record_feedback(
        &self,
        query: &AiQuery,
        response: &AiResponse,
        rating: u8,
        comment: Option<String>,
    ) {
        let Some(sink) = &self.collaborators.feedback else {
            debug!("No feedback sink configured, dropping feedback");
            return;
        };

        let entry = FeedbackEntry {
            id: uuid::Uuid::new_v4().to_string(),
            query_text: query.text.clone(),
            query_type: query.query_type,
            user_id: query.user_id.clone(),
            source: response.source,
            confidence: response.confidence,
            rating: rating.clamp(1, 5),
            comment,
            created_at: Utc::now(),
        };

        if let Err(e) = sink.submit_feedback(entry).await {
            warn!(error = %e, "Failed to submit feedback");
        }
    }
}

/// Run one cheap tier, turning a panic inside it into a miss for that tier
async fn guarded<T, F>(tier: &'static str, lookup: F) -> Result<T, ResolutionError>
where
    F: Future<Output = Result<T, ResolutionError>>,
{
    AssertUnwindSafe(lookup)
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            Err(ResolutionError::tier_miss(
                tier,
                format!("panicked: {}", panic_message(&*panic)),
            ))
        })
}

/// Await a collaborator call, folding both its error and a panic into a message
async fn caught<T, F>(call: F) -> Result<T, String>
where
    F: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(panic) => Err(format!("panicked: {}", panic_message(&*panic))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
