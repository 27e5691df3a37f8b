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

use clap::{Parser, Subcommand, ValueEnum};

use crate::resolution::QueryType;

#[derive(Parser, Debug)]
#[command(name = "clinresolve")]
#[command(version, author = "Muvon Un Limited <opensource@muvon.io>")]
#[command(about = "Cost-aware clinical query resolution: local knowledge first, cache second, paid AI last", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a clinical question through knowledge base, cache and premium tiers
    ///
    /// The response cache lives in memory for a single invocation, so a one-shot
    /// query never hits it. Use `serve` to reuse cached premium answers.
    Query {
        /// The question to resolve
        text: String,

        /// Query type: protocol, diagnosis, exercise, general, research or treatment
        #[arg(short = 't', long = "type", default_value = "general", value_parser = parse_query_type)]
        query_type: QueryType,

        /// Free-form context passed along with the query
        #[arg(short, long)]
        context: Option<String>,

        /// Requesting user, recorded with feedback
        #[arg(short, long)]
        user: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Rate the answer from 1 to 5 and record it as feedback
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Comment stored with the rating
        #[arg(long, requires = "rating")]
        comment: Option<String>,
    },

    /// Search the local knowledge base without touching cache or paid tiers
    Search {
        /// Search text (symptoms are comma-separated in symptoms mode)
        text: String,

        /// Boost entries in this category
        #[arg(long)]
        category: Option<String>,

        /// Boost entries in this specialty
        #[arg(long)]
        specialty: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Search strategy
        #[arg(short, long, value_enum, default_value = "general")]
        mode: SearchMode,

        /// Similarity threshold for fuzzy mode (0.0-1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the cache key a query resolves to
    CacheKey {
        /// Query text
        text: String,

        /// Query type
        #[arg(short = 't', long = "type", default_value = "general", value_parser = parse_query_type)]
        query_type: QueryType,
    },

    /// Show provider account usage
    Accounts {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Start a JSON-RPC server on stdio
    Serve {
        /// Enable debug logging for clinresolve modules
        #[arg(long)]
        debug: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    General,
    Symptoms,
    Diagnosis,
    Techniques,
    Fuzzy,
}

fn parse_query_type(value: &str) -> Result<QueryType, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::try_parse_from([
            "clinresolve", "query", "dor lombar", "--type", "protocol", "--rating", "4",
            "--comment", "useful",
        ])
        .unwrap();

        match cli.command {
            Commands::Query {
                text,
                query_type,
                rating,
                comment,
                format,
                ..
            } => {
                assert_eq!(text, "dor lombar");
                assert_eq!(query_type, QueryType::Protocol);
                assert_eq!(rating, Some(4));
                assert_eq!(comment.as_deref(), Some("useful"));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_type_and_bad_rating() {
        assert!(Cli::try_parse_from(["clinresolve", "query", "x", "--type", "billing"]).is_err());
        assert!(Cli::try_parse_from(["clinresolve", "query", "x", "--rating", "6"]).is_err());
    }

    #[test]
    fn test_parse_search_mode() {
        let cli = Cli::try_parse_from([
            "clinresolve", "search", "dor,rigidez", "--mode", "symptoms", "--limit", "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Search { mode, limit, .. } => {
                assert_eq!(mode, SearchMode::Symptoms);
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
