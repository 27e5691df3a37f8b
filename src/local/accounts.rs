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
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::AccountConfig;
use crate::resolution::{Account, AccountManager, AccountUsage, ProviderId, UsageStats};

#[derive(Debug, Clone)]
struct AccountState {
    config: AccountConfig,
    used: u32,
}

impl AccountState {
    fn remaining(&self) -> u32 {
        self.config.monthly_quota.saturating_sub(self.used)
    }
}

/// Quota bookkeeping for configured provider accounts.
///
/// All reservations go through one mutex so concurrent callers can never push
/// an account past its monthly quota.
pub struct QuotaAccountManager {
    accounts: Mutex<Vec<AccountState>>,
}

impl QuotaAccountManager {
    pub fn new(accounts: Vec<AccountConfig>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|config| AccountState { config, used: 0 })
            .collect();

        Self {
            accounts: Mutex::new(accounts),
        }
    }
}

#[async_trait]
impl AccountManager for QuotaAccountManager {
    async fn select_best_account(&self, provider: ProviderId) -> Result<Option<Account>> {
        let mut accounts = self.accounts.lock().await;

        // Most remaining quota wins; earlier config order breaks ties
        let best = accounts
            .iter_mut()
            .filter(|state| state.config.provider == provider && state.remaining() > 0)
            .reduce(|best, candidate| {
                if candidate.remaining() > best.remaining() {
                    candidate
                } else {
                    best
                }
            });

        let Some(state) = best else {
            warn!(provider = %provider, "No account with remaining quota");
            return Ok(None);
        };

        state.used += 1;
        debug!(
            provider = %provider,
            account_id = %state.config.id,
            remaining = state.remaining(),
            "Reserved provider call"
        );

        Ok(Some(Account {
            id: state.config.id.clone(),
            provider,
            remaining_quota: state.remaining(),
        }))
    }

    async fn usage_stats(&self) -> Result<UsageStats> {
        let accounts = self.accounts.lock().await;

        let usage: Vec<AccountUsage> = accounts
            .iter()
            .map(|state| AccountUsage {
                id: state.config.id.clone(),
                provider: state.config.provider,
                used: state.used,
                monthly_quota: state.config.monthly_quota,
                spent: f64::from(state.used) * state.config.cost_per_call,
            })
            .collect();

        Ok(UsageStats {
            total_calls: usage.iter().map(|a| a.used).sum(),
            total_spent: usage.iter().map(|a| a.spent).sum(),
            accounts: usage,
        })
    }
}
