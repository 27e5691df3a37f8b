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

use colored::Colorize;

use crate::resolution::{AiResponse, ResponseSource, UsageStats};
use crate::search::SearchResult;

pub fn format_response(response: &AiResponse) -> String {
    let mut output = String::new();

    let source = match response.source {
        ResponseSource::KnowledgeBase => "knowledge base".green(),
        ResponseSource::Cache => "cache".cyan(),
        ResponseSource::PremiumAi => "premium AI".yellow(),
    };
    output.push_str(&format!("{} {}", "Source:".bold(), source));
    if let Some(provider) = &response.provider {
        output.push_str(&format!(" ({})", provider).bright_black().to_string());
    }
    output.push('\n');

    output.push_str(&format!(
        "{} {}%",
        "Confidence:".bold(),
        (response.confidence * 100.0).round() as u32
    ));
    if let Some(cost) = response.cost {
        output.push_str(&format!("  {} ${:.4}", "Cost:".bold(), cost));
    }
    output.push_str(&format!("  {} {}ms", "Time:".bold(), response.response_time_ms));
    output.push('\n');

    output.push_str(&"━".repeat(60));
    output.push('\n');
    output.push_str(response.text.trim_end());
    output.push('\n');

    if !response.references.is_empty() {
        output.push('\n');
        output.push_str(&"References".bold().to_string());
        output.push('\n');
        for reference in &response.references {
            output.push_str(&format!("  {}\n", reference.bright_black()));
        }
    }

    output
}

pub fn format_search_results(results: &[SearchResult<'_>]) -> String {
    if results.is_empty() {
        return "No matching knowledge entries".to_string();
    }

    let mut output = String::new();

    for result in results {
        output.push_str(&"━".repeat(60));
        output.push('\n');

        output.push_str(&result.entry.title.blue().bold().to_string());
        output.push_str(&format!("  [{}]", result.entry.id).bright_black().to_string());
        output.push('\n');

        let labels: Vec<&str> = [&result.entry.category, &result.entry.specialty]
            .into_iter()
            .filter_map(|label| label.as_deref())
            .collect();
        if !labels.is_empty() {
            output.push_str(&labels.join(" > ").cyan().to_string());
            output.push('\n');
        }

        for highlight in &result.highlights {
            output.push_str(&format!("  {}\n", highlight));
        }

        if !result.matched_fields.is_empty() {
            let fields: Vec<String> = result.matched_fields.iter().map(|f| f.to_string()).collect();
            output.push_str(&format!("Matched: {}", fields.join(", ")).bright_black().to_string());
            output.push('\n');
        }

        let score_pct = (result.score * 100.0) as u32;
        output.push_str(&format!("{}% relevant", score_pct).green().to_string());
        output.push_str("\n\n");
    }

    output
}

pub fn format_usage(stats: &UsageStats) -> String {
    let mut output = String::new();

    output.push_str(&"Provider Account Usage".bold().to_string());
    output.push('\n');

    if stats.accounts.is_empty() {
        output.push_str("No accounts configured\n");
        return output;
    }

    output.push_str(
        &format!("{:<24} {:<12} {:>12} {:>10}\n", "Account", "Provider", "Used/Quota", "Spent")
            .bold()
            .to_string(),
    );
    output.push_str(&"─".repeat(62));
    output.push('\n');

    for account in &stats.accounts {
        let usage = format!("{}/{}", account.used, account.monthly_quota);
        let usage = if account.used >= account.monthly_quota {
            usage.red().to_string()
        } else {
            usage
        };
        output.push_str(&format!(
            "{:<24} {:<12} {:>12} {:>10}\n",
            truncate_chars(&account.id, 24),
            account.provider.as_str(),
            usage,
            format!("${:.2}", account.spent)
        ));
    }

    output.push_str(&format!(
        "Total: {} calls, ${:.2}\n",
        stats.total_calls, stats.total_spent
    ));

    output
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::{AccountUsage, ProviderId};
    use crate::search::{KnowledgeEntry, MatchedField};
    use std::collections::BTreeSet;

    #[test]
    fn test_format_response_lists_references() {
        let mut response = AiResponse::new("# Dor lombar\n\nPrograma", ResponseSource::KnowledgeBase, 0.85);
        response.references = vec!["kb:kb-1 Dor lombar".to_string()];

        let output = format_response(&response);

        assert!(output.contains("85%"));
        assert!(output.contains("kb:kb-1 Dor lombar"));
        assert!(!output.contains("Cost:"));
    }

    #[test]
    fn test_format_search_results() {
        let mut entry = KnowledgeEntry::new("kb-1", "Dor Lombar", "Programa");
        entry.category = Some("protocol".to_string());
        let results = vec![SearchResult {
            entry: &entry,
            score: 0.42,
            highlights: vec!["...dor lombar...".to_string()],
            matched_fields: BTreeSet::from([MatchedField::Title]),
        }];

        let output = format_search_results(&results);

        assert!(output.contains("kb-1"));
        assert!(output.contains("protocol"));
        assert!(output.contains("...dor lombar..."));
        assert!(output.contains("42% relevant"));
        assert_eq!(format_search_results(&[]), "No matching knowledge entries");
    }

    #[test]
    fn test_format_usage_totals() {
        let stats = UsageStats {
            accounts: vec![AccountUsage {
                id: "primary-a".to_string(),
                provider: ProviderId::ProviderA,
                used: 2,
                monthly_quota: 500,
                spent: 0.04,
            }],
            total_calls: 2,
            total_spent: 0.04,
        };

        let output = format_usage(&stats);

        assert!(output.contains("primary-a"));
        assert!(output.contains("provider_a"));
        assert!(output.contains("Total: 2 calls, $0.04"));
    }
}
