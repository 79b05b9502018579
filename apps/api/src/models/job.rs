use serde::{Deserialize, Serialize};

/// Keyword requirements for a single job posting, as produced by the upstream
/// job-description analysis. Lists are ordered and may contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub must_have_keywords: Vec<String>,
    #[serde(default)]
    pub preferred_keywords: Vec<String>,
    #[serde(default)]
    pub nice_to_have_keywords: Vec<String>,
    #[serde(default)]
    pub language_requirement: Option<String>,
}

/// Which list a keyword came from. Weights and points are fixed per tier and
/// never depend on list length or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordTier {
    MustHave,
    Preferred,
    NiceToHave,
}

impl KeywordTier {
    pub const ALL: [KeywordTier; 3] = [
        KeywordTier::MustHave,
        KeywordTier::Preferred,
        KeywordTier::NiceToHave,
    ];

    /// Relative importance: must-have=3, preferred=2, nice-to-have=1.
    pub fn weight(self) -> u32 {
        match self {
            KeywordTier::MustHave => 3,
            KeywordTier::Preferred => 2,
            KeywordTier::NiceToHave => 1,
        }
    }

    /// Points a text unit earns for containing a keyword of this tier.
    pub fn points(self) -> u32 {
        match self {
            KeywordTier::MustHave => 10,
            KeywordTier::Preferred => 5,
            KeywordTier::NiceToHave => 2,
        }
    }
}

/// A keyword tagged with its tier. `keyword` is lowercased and otherwise kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedKeyword {
    pub keyword: String,
    pub tier: KeywordTier,
    pub weight: u32,
}

impl WeightedKeyword {
    /// Returns `None` for blank keywords, which would otherwise match every text.
    pub fn new(raw: &str, tier: KeywordTier) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self {
            keyword: raw.to_lowercase(),
            tier,
            weight: tier.weight(),
        })
    }

    /// Case-insensitive substring test against already-lowercased text.
    pub fn is_in(&self, text_lower: &str) -> bool {
        text_lower.contains(&self.keyword)
    }
}

impl JobAnalysis {
    pub fn keywords(&self, tier: KeywordTier) -> &[String] {
        match tier {
            KeywordTier::MustHave => &self.must_have_keywords,
            KeywordTier::Preferred => &self.preferred_keywords,
            KeywordTier::NiceToHave => &self.nice_to_have_keywords,
        }
    }

    /// Flattens the three lists in tier order, keeping list order and duplicates.
    pub fn weighted_keywords(&self) -> Vec<WeightedKeyword> {
        KeywordTier::ALL
            .iter()
            .flat_map(|&tier| {
                self.keywords(tier)
                    .iter()
                    .filter_map(move |raw| WeightedKeyword::new(raw, tier))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_weights_are_fixed() {
        assert_eq!(KeywordTier::MustHave.weight(), 3);
        assert_eq!(KeywordTier::Preferred.weight(), 2);
        assert_eq!(KeywordTier::NiceToHave.weight(), 1);
    }

    #[test]
    fn test_tier_points_are_fixed() {
        assert_eq!(KeywordTier::MustHave.points(), 10);
        assert_eq!(KeywordTier::Preferred.points(), 5);
        assert_eq!(KeywordTier::NiceToHave.points(), 2);
    }

    #[test]
    fn test_weighted_keywords_flattens_in_tier_order() {
        let job = JobAnalysis {
            must_have_keywords: vec!["Rust".to_string()],
            preferred_keywords: vec!["Docker".to_string(), "Kafka".to_string()],
            nice_to_have_keywords: vec!["Go".to_string()],
            ..Default::default()
        };
        let kws = job.weighted_keywords();
        let names: Vec<&str> = kws.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(names, vec!["rust", "docker", "kafka", "go"]);
        assert_eq!(kws[0].weight, 3);
        assert_eq!(kws[3].tier, KeywordTier::NiceToHave);
    }

    #[test]
    fn test_blank_keywords_are_dropped() {
        let job = JobAnalysis {
            must_have_keywords: vec!["".to_string(), "   ".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let kws = job.weighted_keywords();
        assert_eq!(kws.len(), 1);
        assert_eq!(kws[0].keyword, "sql");
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_the_keyword() {
        let kw = WeightedKeyword::new("Go ", KeywordTier::MustHave).unwrap();
        assert_eq!(kw.keyword, "go ");
        assert!(!kw.is_in("google cloud"));
        assert!(kw.is_in("go and rust"));
    }

    #[test]
    fn test_job_analysis_deserializes_camel_case_with_missing_lists() {
        let json = r#"{
            "jobTitle": "Backend Engineer",
            "companyName": "Acme",
            "mustHaveKeywords": ["Python"],
            "languageRequirement": "en"
        }"#;
        let job: JobAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(job.job_title, "Backend Engineer");
        assert_eq!(job.must_have_keywords, vec!["Python"]);
        assert!(job.preferred_keywords.is_empty());
        assert_eq!(job.language_requirement.as_deref(), Some("en"));
    }
}
