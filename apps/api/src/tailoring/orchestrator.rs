//! Tailoring orchestrator. Ranks and trims profile content for one job.
//!
//! Never mutates the source profile and never fails: absent optional fields and empty
//! keyword lists simply produce zero scores.

use tracing::debug;

use crate::models::{
    CategorizedBullet, Experience, JobAnalysis, SkillCategory, TailoredContent,
    TailoredExperience, UserProfile,
};
use crate::tailoring::keyword_scorer::RelevanceScorer;
use crate::tailoring::match_score::match_score;

/// Per-experience bullet cap.
pub const MAX_BULLETS_PER_EXPERIENCE: usize = 4;
/// Cap for the cross-experience highlight list.
pub const TOP_BULLETS_LIMIT: usize = 5;

/// Builds the tailored view of `profile` for `job`.
///
/// Steps:
/// 1. Copy header, summary, education, languages, references unchanged
/// 2. Score, rank and cap each experience's bullets
/// 3. Score and reorder skill categories (membership untouched)
/// 4. Compute the match score
pub fn tailor(
    profile: &UserProfile,
    job: &JobAnalysis,
    scorer: &dyn RelevanceScorer,
) -> TailoredContent {
    let experience: Vec<TailoredExperience> = profile
        .experience
        .iter()
        .map(|exp| tailor_experience(exp, job, scorer))
        .collect();

    let top_bullets = select_top_bullets(&experience);
    let reordered_skills = reorder_skills(&profile.skills, job, scorer);
    let match_score = match_score(profile, job);

    debug!(
        experiences = experience.len(),
        skill_categories = reordered_skills.len(),
        match_score,
        backend = scorer.backend(),
        "Tailored profile for '{}'",
        job.job_title
    );

    TailoredContent {
        header: profile.header.clone(),
        summary: profile.summary.clone(),
        experience,
        top_bullets,
        education: profile.education.clone(),
        reordered_skills,
        languages: profile.languages.clone(),
        references: profile.references.clone(),
        match_score,
    }
}

/// Scores every bullet, sorts descending (stable, so ties keep source order) and keeps
/// at most `MAX_BULLETS_PER_EXPERIENCE`.
pub fn rank_bullets(
    bullets: &[CategorizedBullet],
    job: &JobAnalysis,
    scorer: &dyn RelevanceScorer,
) -> Vec<CategorizedBullet> {
    let mut scored: Vec<CategorizedBullet> = bullets
        .iter()
        .map(|bullet| CategorizedBullet {
            score: Some(scorer.score(&bullet.scoring_text(), job)),
            ..bullet.clone()
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(MAX_BULLETS_PER_EXPERIENCE);
    scored
}

/// Annotates each category with `relevance_score` and sorts descending, stable on ties.
/// Skills inside a category are neither added, removed nor reordered.
pub fn reorder_skills(
    categories: &[SkillCategory],
    job: &JobAnalysis,
    scorer: &dyn RelevanceScorer,
) -> Vec<SkillCategory> {
    let mut scored: Vec<SkillCategory> = categories
        .iter()
        .map(|category| SkillCategory {
            relevance_score: Some(scorer.score(&category.scoring_text(), job)),
            ..category.clone()
        })
        .collect();

    scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    scored
}

fn tailor_experience(
    exp: &Experience,
    job: &JobAnalysis,
    scorer: &dyn RelevanceScorer,
) -> TailoredExperience {
    TailoredExperience {
        id: exp.id.clone(),
        job_title: exp.job_title.clone(),
        company: exp.company.clone(),
        location: exp.location.clone(),
        start_date: exp.start_date.clone(),
        end_date: exp.end_date.clone(),
        bullets: rank_bullets(&exp.bullets, job, scorer),
    }
}

/// Highest-scoring bullets across all experiences. Input order is experience order, then
/// ranked order, so the stable sort resolves ties by position in the profile.
fn select_top_bullets(experience: &[TailoredExperience]) -> Vec<CategorizedBullet> {
    let mut all: Vec<CategorizedBullet> = experience
        .iter()
        .flat_map(|exp| exp.bullets.iter().cloned())
        .collect();
    all.sort_by(|a, b| b.score.cmp(&a.score));
    all.truncate(TOP_BULLETS_LIMIT);
    all
}
