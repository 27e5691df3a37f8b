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

use super::types::QueryType;

/// Logical paid AI backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    ProviderA,
    ProviderB,
    ProviderC,
    ProviderD,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::ProviderA => "provider_a",
            ProviderId::ProviderB => "provider_b",
            ProviderId::ProviderC => "provider_c",
            ProviderId::ProviderD => "provider_d",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Routing table from query type to provider
pub struct ProviderSelector;

impl ProviderSelector {
    /// Provider used when a label does not name a known query type
    pub const DEFAULT: ProviderId = ProviderId::ProviderC;

    pub fn select(query_type: QueryType) -> ProviderId {
        match query_type {
            QueryType::Protocol | QueryType::Treatment => ProviderId::ProviderA,
            QueryType::Diagnosis => ProviderId::ProviderB,
            QueryType::Exercise | QueryType::General => ProviderId::ProviderC,
            QueryType::Research => ProviderId::ProviderD,
        }
    }

    /// Route a free-form type label, defaulting for unmapped labels
    pub fn select_for_label(label: &str) -> ProviderId {
        label
            .parse::<QueryType>()
            .map(Self::select)
            .unwrap_or(Self::DEFAULT)
    }
}
