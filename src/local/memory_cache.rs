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
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::CacheConfig;
use crate::resolution::{AiResponse, QueryType, ResponseCache};

/// Upper bound on configured TTLs, roughly a century
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

struct CachedResponse {
    response: AiResponse,
    expires_at: DateTime<Utc>,
}

/// In-process response cache with per query type TTL.
///
/// Expired entries read as misses. They are dropped on the next lookup of
/// their key or swept out by the next write.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
    config: CacheConfig,
}

impl MemoryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn ttl(&self, query_type: QueryType) -> Duration {
        let hours = self.config.ttl_for(query_type).min(MAX_TTL_HOURS);
        Duration::hours(hours as i64)
    }

    async fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<AiResponse> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(cached) if cached.expires_at > now => return Some(cached.response.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock, a concurrent set may have refreshed it
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|cached| cached.expires_at <= now) {
            entries.remove(key);
            debug!(key = %key, "Evicted expired cache entry");
        }
        None
    }

    async fn set_at(&self, key: &str, value: &AiResponse, query_type: QueryType, now: DateTime<Utc>) {
        let expires_at = now
            .checked_add_signed(self.ttl(query_type))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, cached| cached.expires_at > now);
        let swept = before - entries.len();
        if swept > 0 {
            debug!(swept, "Swept expired cache entries");
        }

        entries.insert(
            key.to_string(),
            CachedResponse {
                response: value.clone(),
                expires_at,
            },
        );
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str, _query_type: QueryType) -> Result<Option<AiResponse>> {
        Ok(self.get_at(key, Utc::now()).await)
    }

    async fn set(&self, key: &str, value: &AiResponse, query_type: QueryType) -> Result<()> {
        self.set_at(key, value, query_type, Utc::now()).await;
        Ok(())
    }
}
