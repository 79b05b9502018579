//! ATS-safe font policy: the fixed family/size/color table used when building render
//! instructions, and the predicate that checks font metadata a renderer actually used.
//!
//! Family and color violations are blocking (`error`). Size outside the allowed range is
//! advisory (`warning`) and does not change `is_compliant`.
//!
//! The policy is a plain value constructed at startup and passed in; nothing here is global.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ats::issues::{passes, IssueType, ValidationIssue};

/// The only accepted text color. Compared by exact string equality.
pub const PURE_BLACK: &str = "#000000";

/// Families every mainstream ATS parser maps to a standard PDF base font.
pub const ATS_SAFE_FAMILIES: [&str; 3] = ["Helvetica", "Times-Roman", "Courier"];

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 20.0;

// ────────────────────────────────────────────────────────────────────────────
// Font variants and configs
// ────────────────────────────────────────────────────────────────────────────

/// Text roles a renderer asks fonts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontVariant {
    /// Name line and section titles.
    Heading,
    /// Bullets, summary, skill lists.
    Body,
    /// Dates, locations, secondary labels.
    Minor,
    /// Contact block under the name.
    Contact,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Heading,
        FontVariant::Body,
        FontVariant::Minor,
        FontVariant::Contact,
    ];
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontVariant::Heading => "heading",
            FontVariant::Body => "body",
            FontVariant::Minor => "minor",
            FontVariant::Contact => "contact",
        };
        f.write_str(name)
    }
}

impl FromStr for FontVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heading" => Ok(FontVariant::Heading),
            "body" => Ok(FontVariant::Body),
            "minor" => Ok(FontVariant::Minor),
            "contact" => Ok(FontVariant::Contact),
            other => Err(format!("Unknown font variant '{other}'")),
        }
    }
}

/// Font instruction for one text role. Built from the policy table, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    pub family: String,
    pub size: f32,
    pub color: String,
}

impl FontConfig {
    fn new(family: &str, size: f32) -> Self {
        Self {
            family: family.to_string(),
            size,
            color: PURE_BLACK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontValidation {
    pub is_compliant: bool,
    pub issues: Vec<ValidationIssue>,
}

// ────────────────────────────────────────────────────────────────────────────
// Policy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPolicy {
    pub allowed_families: Vec<String>,
    pub required_color: String,
    pub min_size: f32,
    pub max_size: f32,
    pub heading: FontConfig,
    pub body: FontConfig,
    pub minor: FontConfig,
    pub contact: FontConfig,
}

impl Default for FontPolicy {
    /// Helvetica throughout: 16pt headings, 11pt body, 10pt minor and contact text.
    fn default() -> Self {
        Self {
            allowed_families: ATS_SAFE_FAMILIES.iter().map(|f| f.to_string()).collect(),
            required_color: PURE_BLACK.to_string(),
            min_size: MIN_FONT_SIZE,
            max_size: MAX_FONT_SIZE,
            heading: FontConfig::new("Helvetica", 16.0),
            body: FontConfig::new("Helvetica", 11.0),
            minor: FontConfig::new("Helvetica", 10.0),
            contact: FontConfig::new("Helvetica", 10.0),
        }
    }
}

impl FontPolicy {
    pub fn get_font(&self, variant: FontVariant) -> FontConfig {
        match variant {
            FontVariant::Heading => self.heading.clone(),
            FontVariant::Body => self.body.clone(),
            FontVariant::Minor => self.minor.clone(),
            FontVariant::Contact => self.contact.clone(),
        }
    }

    pub fn is_compliant(&self, config: &FontConfig) -> bool {
        self.validate(config).is_compliant
    }

    /// Applies each rule independently; every failing rule contributes one issue.
    pub fn validate(&self, config: &FontConfig) -> FontValidation {
        let mut issues = Vec::new();

        if !self.allowed_families.iter().any(|f| f == &config.family) {
            issues.push(ValidationIssue::error(
                IssueType::Font,
                format!("Font family '{}' is not ATS-safe", config.family),
                format!("Use one of: {}", self.allowed_families.join(", ")),
            ));
        }

        if config.color != self.required_color {
            issues.push(ValidationIssue::error(
                IssueType::Color,
                format!("Text color '{}' is not pure black", config.color),
                format!(
                    "Set the text color to exactly '{}'. Grey or colored text can be dropped by ATS parsers.",
                    self.required_color
                ),
            ));
        }

        // NaN fails the range check too.
        if !(self.min_size..=self.max_size).contains(&config.size) {
            issues.push(ValidationIssue::warning(
                IssueType::Font,
                format!(
                    "Font size {}pt is outside {}-{}pt",
                    config.size, self.min_size, self.max_size
                ),
                format!(
                    "Use a size between {}pt and {}pt so text stays readable after parsing",
                    self.min_size, self.max_size
                ),
            ));
        }

        FontValidation {
            is_compliant: passes(&issues),
            issues,
        }
    }
}
