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

use super::provider::ProviderId;

/// Resolution pipeline errors.
///
/// Only [`ResolutionError::InvalidInput`] ever reaches a caller of
/// `process_query`; the other variants are recovered inside the pipeline and
/// exist so that tier outcomes can be logged and matched on.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("invalid query: {reason}")]
    InvalidInput { reason: String },

    #[error("{tier} tier missed: {reason}")]
    TierMiss { tier: &'static str, reason: String },

    #[error("no account available for {provider}")]
    ProviderUnavailable { provider: ProviderId },

    #[error("{provider} call failed: {reason}")]
    ProviderCall { provider: ProviderId, reason: String },

    #[error("resolution failed: {reason}")]
    TopLevel { reason: String },
}

impl ResolutionError {
    pub fn blank_query() -> Self {
        Self::InvalidInput {
            reason: "query text must not be blank".to_string(),
        }
    }

    pub fn tier_miss(tier: &'static str, err: impl std::fmt::Display) -> Self {
        Self::TierMiss {
            tier,
            reason: err.to_string(),
        }
    }
}
