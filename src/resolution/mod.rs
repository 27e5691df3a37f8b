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

//! Economic query resolution: knowledge base, then cache, then paid provider

pub mod cache_key;
pub mod collaborators;
pub mod errors;
pub mod formatting;
pub mod orchestrator;
pub mod provider;
pub mod types;


pub use cache_key::cache_key;
pub use collaborators::{AccountManager, FeedbackSink, KnowledgeBase, ProviderClient, ResponseCache};
pub use errors::ResolutionError;
pub use orchestrator::{Collaborators, QueryResolver};
pub use provider::{ProviderId, ProviderSelector};
pub use types::{
    Account, AccountUsage, AiQuery, AiResponse, FeedbackEntry, ProviderReply, QueryType,
    ResponseSource, UsageStats,
};
