use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::analysis::handlers::handle_analyze_text;
use crate::assets::handle_static;
use crate::state::AppState;
use crate::upload::handle_upload_pdf;


/// Two API routes, everything else goes to the static resolver. Other
/// methods on the API paths fall through to static serving as well.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route(
            "/upload-pdf",
            post(handle_upload_pdf).fallback(handle_static),
        )
        .route(
            "/analyze-text",
            post(handle_analyze_text).fallback(handle_static),
        )
        .fallback(handle_static)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
