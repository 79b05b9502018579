//! Match score: share of job keywords found anywhere in the candidate's visible profile text.
//!
//! The integer `match_score` is what the tailored view carries. `match_report` exposes the
//! same computation with matched/missing keywords and a tier-weighted coverage figure.

use serde::{Deserialize, Serialize};

use crate::models::{JobAnalysis, KeywordTier, UserProfile};

/// A keyword together with the tier it was listed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordHit {
    pub keyword: String,
    pub tier: KeywordTier,
}

/// Full match report returned to callers of `/api/v1/match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub match_score: u32,             // 0-100, unweighted
    pub weighted_coverage: u32,       // 0-100, weights 3/2/1
    pub total_keywords: usize,
    pub matched: Vec<KeywordHit>,
    pub missing: Vec<KeywordHit>,
    pub recommendation: String,
}

/// Integer percentage of listed keywords present in the profile corpus.
///
/// Returns exactly 0 when the job lists no (non-blank) keywords.
pub fn match_score(profile: &UserProfile, job: &JobAnalysis) -> u32 {
    let corpus = build_corpus(profile);
    let keywords = job.weighted_keywords();
    let hits = keywords.iter().filter(|kw| kw.is_in(&corpus)).count();
    percentage(hits as u64, keywords.len() as u64)
}

pub fn match_report(profile: &UserProfile, job: &JobAnalysis) -> MatchReport {
    let corpus = build_corpus(profile);
    let keywords = job.weighted_keywords();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut matched_weight = 0u64;
    let mut total_weight = 0u64;

    for kw in &keywords {
        total_weight += u64::from(kw.weight);
        let hit = KeywordHit {
            keyword: kw.keyword.clone(),
            tier: kw.tier,
        };
        if kw.is_in(&corpus) {
            matched_weight += u64::from(kw.weight);
            matched.push(hit);
        } else {
            missing.push(hit);
        }
    }

    let match_score = percentage(matched.len() as u64, keywords.len() as u64);
    let weighted_coverage = percentage(matched_weight, total_weight);
    let recommendation = build_recommendation(match_score, &missing);

    MatchReport {
        match_score,
        weighted_coverage,
        total_keywords: keywords.len(),
        matched,
        missing,
        recommendation,
    }
}

/// Lowercased concatenation of every visible section except the contact header.
pub fn build_corpus(profile: &UserProfile) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(summary) = profile.summary.as_deref() {
        parts.push(summary);
    }

    for exp in &profile.experience {
        parts.push(&exp.job_title);
        parts.push(&exp.company);
        if let Some(location) = exp.location.as_deref() {
            parts.push(location);
        }
        for bullet in &exp.bullets {
            parts.push(&bullet.category_label);
            parts.push(&bullet.description);
        }
    }

    for edu in &profile.education {
        parts.push(&edu.degree);
        parts.push(&edu.institution);
        parts.extend(edu.field_of_study.as_deref());
        parts.extend(edu.description.as_deref());
    }

    let skills_text: Vec<String> = profile.skills.iter().map(|c| c.scoring_text()).collect();
    parts.extend(skills_text.iter().map(String::as_str));

    for lang in &profile.languages {
        parts.push(&lang.language);
        parts.extend(lang.proficiency.as_deref());
    }

    parts.join(" ").to_lowercase()
}

/// Rounded integer percentage; 0 when `total` is 0. Integer math keeps it reproducible.
fn percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 100 + total / 2) / total).min(100) as u32
}

fn build_recommendation(score: u32, missing: &[KeywordHit]) -> String {
    if score == 0 && missing.is_empty() {
        return "No keywords in the job analysis. Cannot score match.".to_string();
    }

    // Surface must-have gaps first.
    let mut gaps: Vec<&KeywordHit> = missing.iter().collect();
    gaps.sort_by_key(|g| g.tier);
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if score >= 80 {
        "Strong match. The profile covers the key job requirements.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate match ({score}/100). Consider adding: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low match ({score}/100). Missing: {}. Add matching experience or skills before applying.",
            top_gaps.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{
        CategorizedBullet, Education, Experience, LanguageSkill, ProfileHeader, Skill,
        SkillCategory,
    };
    use proptest::prelude::*;

    fn make_profile() -> UserProfile {
        UserProfile {
            header: ProfileHeader {
                full_name: "Kubernetes Smith".to_string(),
                ..Default::default()
            },
            summary: Some("Backend engineer focused on Python services".to_string()),
            experience: vec![Experience {
                id: "e1".to_string(),
                job_title: "Software Engineer".to_string(),
                company: "Acme".to_string(),
                bullets: vec![CategorizedBullet {
                    id: "b1".to_string(),
                    category_label: "Infrastructure".to_string(),
                    description: "Containerised workloads with Docker".to_string(),
                    score: None,
                }],
                ..Default::default()
            }],
            education: vec![Education {
                id: "ed1".to_string(),
                degree: "BSc".to_string(),
                institution: "TU Delft".to_string(),
                field_of_study: Some("Computer Science".to_string()),
                ..Default::default()
            }],
            skills: vec![SkillCategory {
                id: "c1".to_string(),
                name: "Data".to_string(),
                skills: vec![Skill {
                    id: "s1".to_string(),
                    name: "PostgreSQL".to_string(),
                    ..Default::default()
                }],
                relevance_score: None,
            }],
            languages: vec![LanguageSkill {
                language: "Dutch".to_string(),
                proficiency: Some("native".to_string()),
            }],
            references: vec![],
        }
    }

    fn make_job(must: &[&str], preferred: &[&str], nice: &[&str]) -> JobAnalysis {
        JobAnalysis {
            must_have_keywords: must.iter().map(|s| s.to_string()).collect(),
            preferred_keywords: preferred.iter().map(|s| s.to_string()).collect(),
            nice_to_have_keywords: nice.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_keyword_lists_score_zero() {
        assert_eq!(match_score(&make_profile(), &JobAnalysis::default()), 0);
    }

    #[test]
    fn test_all_keywords_found_scores_100() {
        let job = make_job(&["python"], &["docker"], &["postgresql", "dutch"]);
        assert_eq!(match_score(&make_profile(), &job), 100);
    }

    #[test]
    fn test_half_found_scores_50() {
        let job = make_job(&["python", "java"], &[], &[]);
        assert_eq!(match_score(&make_profile(), &job), 50);
    }

    #[test]
    fn test_one_of_three_rounds_to_33() {
        let job = make_job(&["python"], &["java"], &["scala"]);
        assert_eq!(match_score(&make_profile(), &job), 33);
    }

    #[test]
    fn test_header_is_not_part_of_corpus() {
        let job = make_job(&["kubernetes"], &[], &[]);
        assert_eq!(match_score(&make_profile(), &job), 0);
    }

    #[test]
    fn test_education_and_languages_are_searched() {
        let job = make_job(&["computer science"], &["native"], &[]);
        assert_eq!(match_score(&make_profile(), &job), 100);
    }

    #[test]
    fn test_duplicate_keywords_count_per_occurrence() {
        // "java" listed twice and missing, "python" once and found → 1 of 3
        let job = make_job(&["java", "python"], &["java"], &[]);
        assert_eq!(match_score(&make_profile(), &job), 33);
    }

    #[test]
    fn test_report_weighted_coverage_uses_tier_weights() {
        // must-have python (3) found, nice-to-have scala (1) missing → 3/4 = 75
        let job = make_job(&["python"], &[], &["scala"]);
        let report = match_report(&make_profile(), &job);
        assert_eq!(report.match_score, 50);
        assert_eq!(report.weighted_coverage, 75);
        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.missing[0].keyword, "scala");
    }

    #[test]
    fn test_report_agrees_with_match_score() {
        let job = make_job(&["python", "go"], &["docker"], &["rust"]);
        let profile = make_profile();
        assert_eq!(match_report(&profile, &job).match_score, match_score(&profile, &job));
    }

    #[test]
    fn test_recommendation_lists_must_have_gaps_first() {
        let missing = vec![
            KeywordHit {
                keyword: "scala".to_string(),
                tier: KeywordTier::NiceToHave,
            },
            KeywordHit {
                keyword: "java".to_string(),
                tier: KeywordTier::MustHave,
            },
        ];
        let rec = build_recommendation(20, &missing);
        assert!(rec.starts_with("Low match (20/100). Missing: java, scala"));
    }

    #[test]
    fn test_recommendation_strong() {
        assert!(build_recommendation(90, &[]).contains("Strong match"));
    }

    proptest! {
        #[test]
        fn property_match_score_bounded_and_idempotent(
            must in proptest::collection::vec("[a-z]{1,8}", 0..6),
            nice in proptest::collection::vec("[a-z ]{0,8}", 0..6),
        ) {
            let job = JobAnalysis {
                must_have_keywords: must,
                nice_to_have_keywords: nice,
                ..Default::default()
            };
            let profile = make_profile();
            let first = match_score(&profile, &job);
            prop_assert!(first <= 100);
            prop_assert_eq!(first, match_score(&profile, &job));
        }
    }
}
