//! Axum route handler for contract analysis.

use axum::{extract::State, Json};
use bytes::Bytes;

use crate::analysis::analyzer::{analyze_contract, AnalysisError, AnalyzeRequest};
use crate::analysis::models::ContractAnalysis;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze-text
///
/// Body `{ "text": "..." }`, decoded whatever the `Content-Type` says.
/// Responds with the validated clause array. Every failure, including an
/// unreadable body, is a 500.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ContractAnalysis>, AppError> {
    let request: AnalyzeRequest = serde_json::from_slice(&body)
        .map_err(|e| AnalysisError::InvalidRequest(e.to_string()))?;
    let backend = state
        .llm
        .as_deref()
        .ok_or(AnalysisError::MissingCredential)?;

    let clauses = analyze_contract(&request.text, backend).await?;
    Ok(Json(clauses))
}
