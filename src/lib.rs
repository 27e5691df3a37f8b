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

//! Cost-aware resolution of clinical questions.
//!
//! Queries are answered from the local knowledge base when a trusted match
//! exists, then from the response cache, and only then from a paid AI provider
//! selected by query type. See [`resolution::QueryResolver`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod formatting;
pub mod local;
pub mod logging;
pub mod resolution;
pub mod search;
pub mod server;
pub mod storage;
