//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::models::{JobAnalysis, TailoredContent, UserProfile};
use crate::state::AppState;
use crate::tailoring::match_score::{match_report, MatchReport};
use crate::tailoring::orchestrator::tailor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub profile: UserProfile,
    pub job_analysis: JobAnalysis,
}

/// POST /api/v1/tailor
///
/// Returns the ranked, capped view of the profile for the renderer.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Json<TailoredContent> {
    Json(tailor(
        &request.profile,
        &request.job_analysis,
        state.scorer.as_ref(),
    ))
}

/// POST /api/v1/match
///
/// Keyword coverage with matched and missing keywords, before tailoring.
pub async fn handle_match(Json(request): Json<TailorRequest>) -> Json<MatchReport> {
    Json(match_report(&request.profile, &request.job_analysis))
}
