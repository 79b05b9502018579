pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers as ats;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring API
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/match", post(tailoring::handle_match))
        // Font policy API
        .route("/api/v1/fonts", get(ats::handle_list_fonts))
        .route("/api/v1/fonts/validate", post(ats::handle_validate_font))
        .route("/api/v1/fonts/:variant", get(ats::handle_get_font))
        // Document validation API
        .route("/api/v1/validate", post(ats::handle_validate_document))
        .route("/api/v1/validate/batch", post(ats::handle_validate_batch))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
