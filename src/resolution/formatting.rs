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

use crate::search::SearchResult;

pub const FALLBACK_MESSAGE: &str = "The premium AI service is temporarily unavailable and no \
trusted local answer was found for this question. Please refine the query or consult the \
clinical protocols directly.";

pub const ERROR_MESSAGE: &str =
    "An error occurred while processing your query. Please try again later.";

/// Render a knowledge-base hit as the answer text
pub fn format_knowledge_answer(result: &SearchResult<'_>) -> String {
    let entry = result.entry;
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", entry.title));
    output.push_str(entry.content.trim());
    output.push_str("\n\n");

    if !entry.techniques.is_empty() {
        output.push_str("## Techniques\n");
        for technique in &entry.techniques {
            output.push_str(&format!("- {}\n", technique));
        }
        output.push('\n');
    }

    if !entry.precautions.is_empty() {
        output.push_str("## Precautions\n");
        for precaution in &entry.precautions {
            output.push_str(&format!("- {}\n", precaution));
        }
        output.push('\n');
    }

    let relevance_pct = (result.score * 100.0).round() as u32;
    output.push_str(&format!(
        "---\nSource: local knowledge base (entry {}, {}% relevance)",
        entry.id, relevance_pct
    ));

    output
}

/// References cited by a knowledge-base answer
pub fn knowledge_references(result: &SearchResult<'_>) -> Vec<String> {
    vec![format!("kb:{} {}", result.entry.id, result.entry.title)]
}
