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
use std::collections::HashMap;
use tracing::debug;

use crate::config::AccountConfig;
use crate::resolution::{Account, ProviderClient, ProviderReply};

const OFFLINE_CONFIDENCE: f64 = 0.75;

/// Provider client that answers locally with a fixed template.
///
/// Stands in for vendor SDKs: calls are billed at the account's configured
/// cost so quota and spend accounting behave as with a live provider.
pub struct OfflineProviderClient {
    cost_per_call: HashMap<String, f64>,
}

impl OfflineProviderClient {
    pub fn new(accounts: &[AccountConfig]) -> Self {
        Self {
            cost_per_call: accounts
                .iter()
                .map(|account| (account.id.clone(), account.cost_per_call))
                .collect(),
        }
    }
}

#[async_trait]
impl ProviderClient for OfflineProviderClient {
    async fn call(&self, account: &Account, query_text: &str) -> Result<ProviderReply> {
        let cost = self.cost_per_call.get(&account.id).copied().unwrap_or(0.0);
        debug!(provider = %account.provider, account_id = %account.id, cost, "Offline provider call");

        Ok(ProviderReply {
            text: format!(
                "[{}] Offline answer\n\nQuestion: {}\n\nNo live provider is connected. \
                 Configure a provider client to receive a generated clinical answer.",
                account.provider,
                query_text.trim()
            ),
            confidence: OFFLINE_CONFIDENCE,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::ProviderId;

    #[tokio::test]
    async fn test_offline_reply_is_deterministic_and_billed() {
        let client = OfflineProviderClient::new(&[AccountConfig {
            id: "primary-b".to_string(),
            provider: ProviderId::ProviderB,
            monthly_quota: 10,
            cost_per_call: 0.03,
        }]);
        let account = Account {
            id: "primary-b".to_string(),
            provider: ProviderId::ProviderB,
            remaining_quota: 9,
        };

        let first = client.call(&account, " hernia de disco ").await.unwrap();
        let second = client.call(&account, " hernia de disco ").await.unwrap();

        assert_eq!(first, second);
        assert!(first.text.starts_with("[provider_b] Offline answer"));
        assert!(first.text.contains("Question: hernia de disco\n"));
        assert_eq!(first.cost, 0.03);
        assert_eq!(first.confidence, 0.75);
    }

    #[tokio::test]
    async fn test_unknown_account_is_free() {
        let client = OfflineProviderClient::new(&[]);
        let account = Account {
            id: "ad-hoc".to_string(),
            provider: ProviderId::ProviderC,
            remaining_quota: 1,
        };

        let reply = client.call(&account, "ombro").await.unwrap();
        assert_eq!(reply.cost, 0.0);
    }
}
