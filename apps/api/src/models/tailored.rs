use serde::{Deserialize, Serialize};

use crate::models::profile::{
    CategorizedBullet, Education, LanguageSkill, ProfileHeader, Reference, SkillCategory,
};

/// Experience entry after bullet selection. Wrapper fields are copied verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredExperience {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Ranked by score, at most four, every `id` taken from the source entry.
    pub bullets: Vec<CategorizedBullet>,
}

/// The bounded, deterministic view handed to the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredContent {
    pub header: ProfileHeader,
    pub summary: Option<String>,
    pub experience: Vec<TailoredExperience>,
    pub top_bullets: Vec<CategorizedBullet>,
    pub education: Vec<Education>,
    pub reordered_skills: Vec<SkillCategory>,
    pub languages: Vec<LanguageSkill>,
    pub references: Vec<Reference>,
    pub match_score: u32,
}
