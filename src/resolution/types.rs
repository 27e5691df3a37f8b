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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::provider::ProviderId;

/// Kind of clinical question, used for routing and cache namespacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Protocol,
    Diagnosis,
    Exercise,
    General,
    Research,
    Treatment,
}

impl QueryType {
    pub const ALL: [QueryType; 6] = [
        QueryType::Protocol,
        QueryType::Diagnosis,
        QueryType::Exercise,
        QueryType::General,
        QueryType::Research,
        QueryType::Treatment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Protocol => "protocol",
            QueryType::Diagnosis => "diagnosis",
            QueryType::Exercise => "exercise",
            QueryType::General => "general",
            QueryType::Research => "research",
            QueryType::Treatment => "treatment",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        QueryType::ALL
            .into_iter()
            .find(|t| t.as_str() == label)
            .ok_or_else(|| {
                format!(
                    "Unknown query type '{}', expected one of: protocol, diagnosis, exercise, general, research, treatment",
                    s
                )
            })
    }
}

/// Natural-language clinical question submitted to the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiQuery {
    pub text: String,
    #[serde(rename = "type")]
    pub query_type: QueryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl AiQuery {
    pub fn new(text: impl Into<String>, query_type: QueryType) -> Self {
        Self {
            text: text.into(),
            query_type,
            context: None,
            user_id: None,
            priority: None,
        }
    }
}

/// Tier that produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    KnowledgeBase,
    Cache,
    PremiumAi,
}

impl std::fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseSource::KnowledgeBase => write!(f, "knowledge_base"),
            ResponseSource::Cache => write!(f, "cache"),
            ResponseSource::PremiumAi => write!(f, "premium_ai"),
        }
    }
}

/// Structured answer returned by the resolution pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub source: ResponseSource,
    /// Confidence in [0, 1]
    pub confidence: f64,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Wall time of the whole pipeline in milliseconds
    #[serde(default)]
    pub response_time_ms: u64,
}

impl AiResponse {
    pub fn new(text: impl Into<String>, source: ResponseSource, confidence: f64) -> Self {
        Self {
            text: text.into(),
            source,
            confidence: clamp_unit(confidence),
            references: Vec::new(),
            cost: None,
            provider: None,
            response_time_ms: 0,
        }
    }
}

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Paid provider account reserved for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub provider: ProviderId,
    pub remaining_quota: u32,
}

/// Raw answer from a provider client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderReply {
    pub text: String,
    pub confidence: f64,
    pub cost: f64,
}

/// Usage of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUsage {
    pub id: String,
    pub provider: ProviderId,
    pub used: u32,
    pub monthly_quota: u32,
    pub spent: f64,
}

/// Usage across all accounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub accounts: Vec<AccountUsage>,
    pub total_calls: u32,
    pub total_spent: f64,
}

/// User rating of a delivered response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: String,
    pub query_text: String,
    pub query_type: QueryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub source: ResponseSource,
    pub confidence: f64,
    /// 1 (useless) to 5 (excellent)
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
