//! Contract analysis: prompt the model, then validate the clauses it returns.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::analysis::models::{parse_analysis, ContractAnalysis, SchemaError};
use crate::analysis::prompts::{build_analysis_prompt, contract_analysis_schema};
use crate::llm_client::{CompletionBackend, LlmError};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    #[error("GOOGLE_KEY is not configured")]
    MissingCredential,

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Runs one analysis: a single completion call, then a strict shape check.
/// A schema violation fails the whole request.
pub async fn analyze_contract(
    text: &str,
    backend: &dyn CompletionBackend,
) -> Result<ContractAnalysis, AnalysisError> {
    let prompt = build_analysis_prompt(text);
    let raw = backend
        .generate_json(&prompt, &contract_analysis_schema())
        .await?;

    let clauses = parse_analysis(&raw)?;
    info!(
        "Contract analysis produced {} clause(s) from {} chars of text",
        clauses.len(),
        text.len()
    );
    Ok(clauses)
}
