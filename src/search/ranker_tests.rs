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

#[cfg(test)]
mod tests {
    use super::super::normalize::extract_terms;
    use super::super::ranker::RelevanceRanker;
    use super::super::types::{KnowledgeEntry, MatchedField, SearchQuery};
    use proptest::prelude::*;

    fn entry(id: &str, title: &str, content: &str, confidence: f64) -> KnowledgeEntry {
        let mut entry = KnowledgeEntry::new(id, title, content);
        entry.confidence = confidence;
        entry
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "Expected ~{}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_exact_two_term_title_match() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry(
            "kb-1",
            "Dor Lombar Cronica",
            "Orientacoes gerais de cuidado",
            0.9,
        )];

        let results = ranker.search(&SearchQuery::new("dor lombar"), &candidates);

        assert_eq!(results.len(), 1);
        // raw 6.0 / (2 terms * 10) = 0.3, times confidence 0.9
        approx(results[0].score, 0.27);
        assert_eq!(
            results[0].matched_fields.iter().copied().collect::<Vec<_>>(),
            vec![MatchedField::Title]
        );
    }

    #[test]
    fn test_category_boost() {
        let ranker = RelevanceRanker::default();
        let mut kb = entry("kb-1", "Dor Lombar Cronica", "Orientacoes gerais de cuidado", 0.9);
        kb.category = Some("protocol".to_string());
        let candidates = vec![kb];

        let boosted = ranker.search(
            &SearchQuery::new("dor lombar").with_category("protocol"),
            &candidates,
        );
        approx(boosted[0].score, 0.27 * 1.3);

        let other = ranker.search(
            &SearchQuery::new("dor lombar").with_category("exercise"),
            &candidates,
        );
        approx(other[0].score, 0.27);
    }

    #[test]
    fn test_category_then_specialty_boost() {
        let ranker = RelevanceRanker::default();
        let mut kb = entry("kb-1", "Dor Lombar Cronica", "Orientacoes gerais de cuidado", 0.9);
        kb.category = Some("protocol".to_string());
        kb.specialty = Some("ortopedia".to_string());
        let candidates = vec![kb];

        let query = SearchQuery::new("dor lombar")
            .with_category("protocol")
            .with_specialty("ortopedia");
        let results = ranker.search(&query, &candidates);

        approx(results[0].score, 0.27 * 1.3 * 1.2);
    }

    #[test]
    fn test_sparse_match_penalty() {
        let ranker = RelevanceRanker::default();
        let kb = entry("kb-1", "Dor Lombar Cronica", "Tratamento conservador", 1.0);
        let terms = extract_terms("lombar joelho tornozelo punho");
        let query = SearchQuery::new("lombar joelho tornozelo punho");

        let result = ranker.score_entry(&terms, &query, &kb);

        // 1 of 4 terms matched: 3.0 / 40 = 0.075, penalized by 0.25
        approx(result.score, 0.075 * 0.25);

        // Below the generic threshold, so search drops it
        assert!(ranker.search(&query, std::slice::from_ref(&kb)).is_empty());
    }

    #[test]
    fn test_substring_match_scores_below_exact() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry("kb-1", "Dores lombares", "x", 1.0)];

        let results = ranker.search(&SearchQuery::new("lombar"), &candidates);

        // "lombares" contains "lombar": 3.0 * 0.7 / 10
        approx(results[0].score, 0.21);
    }

    #[test]
    fn test_fuzzy_term_match() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry("kb-1", "Alongamento", "x", 1.0)];

        let results = ranker.search(&SearchQuery::new("alongamnto"), &candidates);

        assert_eq!(results.len(), 1);
        // 3.0 * similarity * 0.5 / 10 with similarity ~0.98
        assert!(results[0].score > 0.14 && results[0].score < 0.15);
    }

    #[test]
    fn test_results_sorted_and_filtered() {
        let ranker = RelevanceRanker::default();
        let mut stabilization = entry(
            "kb-1",
            "Dor Lombar Cronica",
            "Exercicios de estabilizacao lombar para dor",
            1.0,
        );
        stabilization.techniques = vec!["Estabilizacao segmentar".to_string()];
        let candidates = vec![
            entry("kb-0", "Entorse de tornozelo", "Gelo e repouso", 1.0),
            entry("kb-2", "Lombalgia aguda", "Dor lombar aguda apos esforco", 0.8),
            stabilization,
        ];

        let results = ranker.search(&SearchQuery::new("dor lombar"), &candidates);

        let ids: Vec<&str> = results.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["kb-1", "kb-2"]);
        approx(results[0].score, 0.4);
        assert!(results[1].score > 0.13 && results[1].score < 0.14);
        assert_eq!(
            results[0].matched_fields.iter().copied().collect::<Vec<_>>(),
            vec![MatchedField::Title, MatchedField::Content]
        );
    }

    #[test]
    fn test_ties_keep_candidate_order_and_limit_truncates() {
        let ranker = RelevanceRanker::default();
        let candidates: Vec<KnowledgeEntry> = (0..4)
            .map(|i| entry(&format!("kb-{}", i), "Dor Lombar", "x", 1.0))
            .collect();

        let results = ranker.search(&SearchQuery::new("dor lombar").with_limit(3), &candidates);

        let ids: Vec<&str> = results.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["kb-0", "kb-1", "kb-2"]);
    }

    #[test]
    fn test_score_clamped_to_one() {
        let ranker = RelevanceRanker::default();
        let mut kb = entry("kb-1", "Dor lombar cronica", "dor lombar", 1.0);
        kb.diagnosis = Some("Dor lombar cronica".to_string());
        kb.symptoms = vec!["dor lombar".to_string(), "rigidez lombar".to_string()];
        kb.techniques = vec!["alongamento lombar".to_string()];
        kb.tags = vec!["dor".to_string(), "lombar".to_string()];
        let candidates = vec![kb];

        let results = ranker.search(&SearchQuery::new("dor lombar"), &candidates);

        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].matched_fields.len(), 6);
    }

    #[test]
    fn test_empty_query_or_candidates() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry("kb-1", "Dor Lombar", "x", 1.0)];

        assert!(ranker.search(&SearchQuery::new(""), &candidates).is_empty());
        assert!(ranker.search(&SearchQuery::new("de o a"), &candidates).is_empty());
        assert!(ranker.search(&SearchQuery::new("dor lombar"), &[]).is_empty());
    }

    #[test]
    fn test_highlights_extracted_around_terms() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry(
            "kb-1",
            "Dor Lombar Cronica",
            "Programa de exercicios para dor lombar cronica com foco em estabilizacao do tronco.",
            1.0,
        )];

        let results = ranker.search(&SearchQuery::new("dor lombar"), &candidates);

        assert_eq!(
            results[0].highlights,
            vec![
                "Dor Lombar Cronica".to_string(),
                "... de exercicios para dor lombar cronica com ...".to_string(),
                "...exercicios para dor lombar cronica com foco em...".to_string(),
            ]
        );
    }

    #[test]
    fn test_highlights_capped_at_five() {
        let ranker = RelevanceRanker::default();
        let text = "ombro joelho quadril punho cotovelo tornozelo";
        let candidates = vec![entry("kb-1", text, &format!("{} reabilitacao", text), 1.0)];

        let results = ranker.search(&SearchQuery::new(text), &candidates);

        assert_eq!(results[0].highlights.len(), 5);
    }

    #[test]
    fn test_highlights_match_accented_text() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry("kb-1", "Lombalgia crônica", "x", 1.0)];

        let results = ranker.search(&SearchQuery::new("lombalgia cronica"), &candidates);

        assert_eq!(results[0].highlights[0], "Lombalgia crônica");
        assert!(results[0].highlights.contains(&"lombalgia cronica".to_string()));
    }

    #[test]
    fn test_search_by_symptoms() {
        let ranker = RelevanceRanker::default();
        let mut lumbar = entry("kb-1", "Lombalgia", "x", 1.0);
        lumbar.symptoms = vec!["Dor lombar".to_string(), "Rigidez matinal".to_string()];
        let mut knee = entry("kb-2", "Gonalgia", "x", 1.0);
        knee.symptoms = vec!["Dor no joelho".to_string()];
        let candidates = vec![knee, lumbar];

        let wanted = vec!["dor lombar".to_string(), "formigamentos".to_string()];
        let results = ranker.search_by_symptoms(&wanted, &candidates);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id, "kb-1");
        approx(results[0].score, 0.5);
        assert_eq!(results[0].highlights, vec!["Dor lombar".to_string()]);
    }

    #[test]
    fn test_search_by_symptoms_empty() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry("kb-1", "Lombalgia", "x", 1.0)];

        assert!(ranker.search_by_symptoms(&[], &candidates).is_empty());
        assert!(ranker
            .search_by_symptoms(&["  ".to_string()], &candidates)
            .is_empty());
    }

    #[test]
    fn test_search_by_diagnosis() {
        let ranker = RelevanceRanker::default();
        let mut hernia = entry("kb-1", "Hernia", "x", 0.8);
        hernia.diagnosis = Some("Hérnia de disco lombar".to_string());
        let mut tendon = entry("kb-2", "Tendinite", "x", 1.0);
        tendon.diagnosis = Some("Tendinite".to_string());
        let no_diagnosis = entry("kb-3", "Sem diagnostico", "x", 1.0);
        let candidates = vec![tendon, no_diagnosis, hernia];

        let results = ranker.search_by_diagnosis("hernia de disco lombar", &candidates);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id, "kb-1");
        approx(results[0].score, 0.8);
    }

    #[test]
    fn test_search_by_techniques() {
        let ranker = RelevanceRanker::default();
        let mut kb = entry("kb-1", "Isquiotibiais", "x", 0.9);
        kb.techniques = vec![
            "Alongamento isquiotibiais".to_string(),
            "Mobilizacao neural".to_string(),
        ];
        let mut other = entry("kb-2", "Fascia", "x", 1.0);
        other.techniques = vec!["Liberacao miofascial".to_string()];
        let candidates = vec![other, kb];

        let results = ranker.search_by_techniques("alongamento", &candidates);

        assert_eq!(results.len(), 1);
        approx(results[0].score, 0.45);
        assert_eq!(
            results[0].highlights,
            vec!["Alongamento isquiotibiais".to_string()]
        );
    }

    #[test]
    fn test_fuzzy_search_takes_best_field() {
        let ranker = RelevanceRanker::default();
        let mut chronic = entry("kb-1", "Lombalgia cronica", "Exercicios de estabilizacao", 1.0);
        chronic.tags = vec!["lombar".to_string()];
        let weak = entry("kb-2", "Dor lombar cronica", "x", 1.0);
        let unrelated = entry("kb-3", "Entorse de tornozelo", "Gelo e repouso", 1.0);
        let candidates = vec![unrelated, weak, chronic];

        let results = ranker.fuzzy_search("lombalgia", &candidates, None);

        let ids: Vec<&str> = results.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["kb-1", "kb-2"]);
        // Title similarity beats the flat tag weight
        assert!(results[0].score > 0.9);
        assert!(results[0].matched_fields.contains(&MatchedField::Tags));
        assert!(results[1].score > 0.6 && results[1].score < 0.62);
    }

    #[test]
    fn test_fuzzy_search_custom_threshold() {
        let ranker = RelevanceRanker::default();
        let candidates = vec![entry("kb-1", "Dor lombar cronica", "x", 1.0)];

        assert_eq!(ranker.fuzzy_search("lombalgia", &candidates, None).len(), 1);
        assert!(ranker
            .fuzzy_search("lombalgia", &candidates, Some(0.7))
            .is_empty());
    }

    proptest! {
        #[test]
        fn prop_search_scores_bounded_and_sorted(
            query in "[a-z ]{0,30}",
            titles in proptest::collection::vec("[a-z ]{0,30}", 0..8),
            confidences in proptest::collection::vec(0.0f64..=1.0, 8),
        ) {
            let ranker = RelevanceRanker::default();
            let candidates: Vec<KnowledgeEntry> = titles
                .iter()
                .enumerate()
                .map(|(i, title)| entry(&format!("kb-{}", i), title, title, confidences[i]))
                .collect();

            let results = ranker.search(&SearchQuery::new(query), &candidates);

            for result in &results {
                prop_assert!((0.0..=1.0).contains(&result.score));
                prop_assert!(result.highlights.len() <= 5);
            }
            for pair in results.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
