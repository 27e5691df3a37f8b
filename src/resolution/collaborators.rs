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

//! Boundaries between the resolution core and the systems it sequences.
//!
//! Implementations own storage, eviction, quota bookkeeping and vendor I/O.
//! The core only calls them, one tier at a time.

use anyhow::Result;
use async_trait::async_trait;

use super::provider::ProviderId;
use super::types::{Account, AiResponse, FeedbackEntry, ProviderReply, QueryType, UsageStats};
use crate::search::KnowledgeEntry;

/// Source of candidate knowledge entries
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Prefilter entries for a query. No ranking obligation; a superset is fine.
    async fn search_entries(&self, text: &str) -> Result<Vec<KnowledgeEntry>>;
}

/// Response cache keyed by [`crate::resolution::cache_key`]
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str, query_type: QueryType) -> Result<Option<AiResponse>>;

    async fn set(&self, key: &str, value: &AiResponse, query_type: QueryType) -> Result<()>;
}

/// Paid provider accounts and their quotas
#[async_trait]
pub trait AccountManager: Send + Sync {
    /// Reserve an account for one call.
    ///
    /// Reservation must be atomic: concurrent callers must never over-allocate
    /// a quota-limited account.
    async fn select_best_account(&self, provider: ProviderId) -> Result<Option<Account>>;

    async fn usage_stats(&self) -> Result<UsageStats>;
}

/// Paid AI backend invocation
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn call(&self, account: &Account, query_text: &str) -> Result<ProviderReply>;
}

/// Sink for user feedback on delivered responses
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn submit_feedback(&self, entry: FeedbackEntry) -> Result<()>;
}
