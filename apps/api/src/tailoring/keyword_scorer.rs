//! Keyword scorer: pluggable, trait-based scorer for a single text unit (a bullet, a skill
//! category) against a job's weighted keyword set.
//!
//! Default: `KeywordScorer` (pure, deterministic, substring presence only).
//!
//! `AppState` holds an `Arc<dyn RelevanceScorer>`. Any backend may add bonus signals,
//! but must never return less than `keyword_floor` for the same input.

use crate::models::{JobAnalysis, WeightedKeyword};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait RelevanceScorer: Send + Sync {
    fn score(&self, text: &str, job: &JobAnalysis) -> u32;

    /// Label surfaced in reports, e.g. "keyword".
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. Lowercase the text once
/// 2. For every keyword in the three lists, add the tier's points if the keyword
///    occurs as a substring (must-have=10, preferred=5, nice-to-have=2)
/// 3. Repeated occurrences of one keyword in the same text count once
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

impl RelevanceScorer for KeywordScorer {
    fn score(&self, text: &str, job: &JobAnalysis) -> u32 {
        keyword_floor(text, &job.weighted_keywords())
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Sum of tier points for every keyword literally present in `text`.
///
/// This is the lower bound every `RelevanceScorer` must respect.
pub fn keyword_floor(text: &str, keywords: &[WeightedKeyword]) -> u32 {
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| kw.is_in(&text_lower))
        .map(|kw| kw.tier.points())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_job(must: &[&str], preferred: &[&str], nice: &[&str]) -> JobAnalysis {
        JobAnalysis {
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            must_have_keywords: must.iter().map(|s| s.to_string()).collect(),
            preferred_keywords: preferred.iter().map(|s| s.to_string()).collect(),
            nice_to_have_keywords: nice.iter().map(|s| s.to_string()).collect(),
            language_requirement: None,
        }
    }

    #[test]
    fn test_must_have_and_preferred_hits_sum_to_15() {
        let job = make_job(&["Python"], &["Docker"], &["Go"]);
        let score = KeywordScorer.score("Built Python microservices with Docker", &job);
        assert_eq!(score, 15);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let job = make_job(&["postgresql"], &[], &[]);
        assert_eq!(KeywordScorer.score("Tuned POSTGRESQL indexes", &job), 10);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let job = make_job(&["rust"], &[], &[]);
        assert_eq!(KeywordScorer.score("Rust, rust and more Rust", &job), 10);
    }

    #[test]
    fn test_nice_to_have_adds_2() {
        let job = make_job(&[], &[], &["terraform"]);
        assert_eq!(KeywordScorer.score("Provisioned infra with Terraform", &job), 2);
    }

    #[test]
    fn test_keyword_in_two_lists_counts_in_both() {
        let job = make_job(&["sql"], &["sql"], &[]);
        assert_eq!(KeywordScorer.score("Wrote SQL reports", &job), 15);
    }

    #[test]
    fn test_empty_keyword_set_scores_zero() {
        let job = make_job(&[], &[], &[]);
        assert_eq!(KeywordScorer.score("Anything at all", &job), 0);
    }

    #[test]
    fn test_blank_keyword_never_matches() {
        let job = make_job(&[""], &["  "], &[]);
        assert_eq!(KeywordScorer.score("Anything at all", &job), 0);
    }

    #[test]
    fn test_backend_label_is_keyword() {
        assert_eq!(KeywordScorer.backend(), "keyword");
    }

    proptest! {
        #[test]
        fn property_score_is_deterministic(
            text in ".{0,80}",
            must in proptest::collection::vec("[a-zA-Z]{1,6}", 0..4),
            nice in proptest::collection::vec("[a-zA-Z]{1,6}", 0..4),
        ) {
            let job = JobAnalysis {
                must_have_keywords: must,
                nice_to_have_keywords: nice,
                ..Default::default()
            };
            prop_assert_eq!(KeywordScorer.score(&text, &job), KeywordScorer.score(&text, &job));
        }

        #[test]
        fn property_score_never_below_literal_hits(
            words in proptest::collection::vec("[a-z]{2,8}", 1..8),
            picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..4),
        ) {
            let text = words.join(" ");
            let must: Vec<String> = picks.iter().map(|i| i.get(&words).clone()).collect();
            let job = JobAnalysis { must_have_keywords: must.clone(), ..Default::default() };
            let hits = must.len() as u32 * 10;
            prop_assert!(KeywordScorer.score(&text, &job) >= hits);
        }
    }
}
