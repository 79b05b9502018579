pub mod job;
pub mod profile;
pub mod tailored;

pub use job::{JobAnalysis, KeywordTier, WeightedKeyword};
pub use profile::{CategorizedBullet, Experience, SkillCategory, UserProfile};
pub use tailored::{TailoredContent, TailoredExperience};
