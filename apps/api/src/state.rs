use std::sync::Arc;

use crate::ats::font_policy::FontPolicy;
use crate::ats::validator::{DocumentValidator, ValidationThresholds};
use crate::config::Config;
use crate::tailoring::keyword_scorer::{KeywordScorer, RelevanceScorer};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable relevance scorer. Default: KeywordScorer.
    pub scorer: Arc<dyn RelevanceScorer>,
    pub font_policy: Arc<FontPolicy>,
    pub validator: DocumentValidator,
}

impl AppState {
    /// Default ATS policy: keyword scoring, the standard font table and pdf/docx extractors.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scorer: Arc::new(KeywordScorer),
            font_policy: Arc::new(FontPolicy::default()),
            validator: DocumentValidator::with_default_extractors(ValidationThresholds::default()),
        }
    }
}
