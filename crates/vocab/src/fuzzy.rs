//! Approximate name search for manual lookup.
//!
//! Results only assist the annotator; nothing here ever resolves an id on its
//! own. Scores are in `0.0..=1.0`:
//!
//! 1. Case-insensitive equality (1.0)
//! 2. Containment of the whole query (0.85-0.95, longer coverage scores higher)
//! 3. Best of Jaro-Winkler and token-sorted normalized Levenshtein
//!
//! Ties keep vocabulary order, so identical inputs give identical output.

use crate::index::VocabularyIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub name: String,
    pub score: f64,
}

impl VocabularyIndex {
    /// Top `top_n` names for `query`, best first, scores at or above `min_score`.
    pub fn fuzzy_match(&self, query: &str, top_n: usize, min_score: f64) -> Vec<FuzzyMatch> {
        let query = normalize(query);
        if query.is_empty() || top_n == 0 {
            return Vec::new();
        }
        let query_sorted = token_sort(&query);

        let mut scored: Vec<(usize, f64)> = self
            .names()
            .iter()
            .enumerate()
            .map(|(pos, name)| (pos, score(&query, &query_sorted, name)))
            .filter(|(_, s)| *s >= min_score)
            .collect();

        // Stable sort: equal scores stay in vocabulary order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        scored
            .into_iter()
            .map(|(pos, score)| FuzzyMatch { name: self.names()[pos].clone(), score })
            .collect()
    }
}

fn score(query: &str, query_sorted: &str, name: &str) -> f64 {
    let name = normalize(name);
    if name == query {
        return 1.0;
    }

    let mut best = strsim::jaro_winkler(query, &name)
        .max(strsim::normalized_levenshtein(query_sorted, &token_sort(&name)));

    if name.contains(query) {
        let coverage = query.chars().count() as f64 / name.chars().count().max(1) as f64;
        best = best.max(0.85 + 0.1 * coverage);
    }

    best.min(1.0)
}

fn token_sort(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Lowercase and collapse whitespace runs.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_core::VocabularyTerm;

    fn idx(names: &[&str]) -> VocabularyIndex {
        VocabularyIndex::build(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| VocabularyTerm::new(*n, format!("HP:{i:07}"))),
        )
    }

    #[test]
    fn typo_ranks_intended_term_first() {
        let v = idx(&["Seizure", "Fever", "Headache"]);
        let hits = v.fuzzy_match("fevr", 3, 0.0);
        assert_eq!(hits[0].name, "Fever");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn case_insensitive_equality_scores_one() {
        let v = idx(&["Seizure", "Fever"]);
        let hits = v.fuzzy_match("  FEVER ", 1, 0.0);
        assert_eq!(hits, vec![FuzzyMatch { name: "Fever".into(), score: 1.0 }]);
    }

    #[test]
    fn containment_beats_unrelated() {
        let v = idx(&["Headache", "Recurrent fever", "Seizure"]);
        let hits = v.fuzzy_match("fever", 3, 0.0);
        assert_eq!(hits[0].name, "Recurrent fever");
        assert!(hits[0].score >= 0.85);
    }

    #[test]
    fn ties_keep_vocabulary_order() {
        let forward = idx(&["abx", "aby"]);
        let hits = forward.fuzzy_match("ab", 2, 0.0);
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].name, "abx");
        assert_eq!(hits[1].name, "aby");

        let reversed = idx(&["aby", "abx"]);
        let hits = reversed.fuzzy_match("ab", 2, 0.0);
        assert_eq!(hits[0].name, "aby");
        assert_eq!(hits[1].name, "abx");
    }

    #[test]
    fn repeated_queries_are_identical() {
        let v = idx(&["Seizure", "Febrile seizure", "Fever", "Focal seizure", "Headache"]);
        let a = v.fuzzy_match("seizur", 5, 0.0);
        let b = v.fuzzy_match("seizur", 5, 0.0);
        assert_eq!(a, b);
    }

    #[test]
    fn top_n_and_min_score_limit_results() {
        let v = idx(&["Seizure", "Fever", "Headache"]);
        assert_eq!(v.fuzzy_match("fever", 1, 0.0).len(), 1);
        assert!(v.fuzzy_match("fever", 0, 0.0).is_empty());
        let strict = v.fuzzy_match("fever", 3, 0.99);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].name, "Fever");
    }

    #[test]
    fn empty_query_or_index_yields_nothing() {
        let v = idx(&["Seizure"]);
        assert!(v.fuzzy_match("   ", 5, 0.0).is_empty());
        assert!(VocabularyIndex::empty().fuzzy_match("seizure", 5, 0.0).is_empty());
    }
}
