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

//! In-process collaborators backing the CLI and stdio server

pub mod accounts;
pub mod feedback;
pub mod knowledge_store;
pub mod memory_cache;
pub mod offline_provider;

pub use accounts::QuotaAccountManager;
pub use feedback::JsonlFeedbackSink;
pub use knowledge_store::JsonKnowledgeBase;
pub use memory_cache::MemoryCache;
pub use offline_provider::OfflineProviderClient;
