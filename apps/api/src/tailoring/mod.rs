// Tailoring Engine: keyword scoring, bullet/skill ranking, match score.
// Scoring and ranking are pure; nothing here performs I/O.

pub mod handlers;
pub mod keyword_scorer;
pub mod match_score;
pub mod orchestrator;
