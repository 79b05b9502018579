use serde::{Deserialize, Serialize};

/// Immutable candidate record. Tailoring derives a new view and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub header: ProfileHeader,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

/// Contact block printed at the top of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHeader {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub bullets: Vec<CategorizedBullet>,
}

/// One achievement line. `id` is opaque and must survive tailoring unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedBullet {
    pub id: String,
    #[serde(default)]
    pub category_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl CategorizedBullet {
    /// Text the scorer sees: label followed by description.
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.category_label, self.description)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Absent until the category has been scored against a job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<u32>,
}

impl SkillCategory {
    /// Category name plus every skill's name, description and keywords.
    pub fn scoring_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        for skill in &self.skills {
            parts.push(&skill.name);
            if let Some(desc) = skill.description.as_deref() {
                parts.push(desc);
            }
            parts.extend(skill.keywords.iter().map(String::as_str));
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSkill {
    pub language: String,
    #[serde(default)]
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_deserializes_with_defaults() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.summary.is_none());
        assert!(profile.experience.is_empty());
        assert_eq!(profile.header, ProfileHeader::default());
    }

    #[test]
    fn test_bullet_score_omitted_until_scored() {
        let bullet = CategorizedBullet {
            id: "b1".to_string(),
            category_label: "Backend".to_string(),
            description: "Built APIs".to_string(),
            score: None,
        };
        let json = serde_json::to_value(&bullet).unwrap();
        assert!(json.get("score").is_none());
        assert_eq!(json["categoryLabel"], "Backend");
    }

    #[test]
    fn test_skill_category_scoring_text_includes_every_skill_field() {
        let category = SkillCategory {
            id: "c1".to_string(),
            name: "Cloud".to_string(),
            skills: vec![Skill {
                id: "s1".to_string(),
                name: "Kubernetes".to_string(),
                description: Some("cluster operations".to_string()),
                keywords: vec!["helm".to_string()],
            }],
            relevance_score: None,
        };
        let text = category.scoring_text();
        assert!(text.contains("Cloud"));
        assert!(text.contains("Kubernetes"));
        assert!(text.contains("cluster operations"));
        assert!(text.contains("helm"));
    }
}
