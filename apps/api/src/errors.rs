use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::analysis::analyzer::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Response bodies are fixed plain-text messages. The underlying cause is
/// only ever written to the server log.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client sent an unusable upload. The message is fixed by the caller
    /// and safe to echo.
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    #[error("PDF parse error: {0}")]
    PdfParse(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PdfParse(_) | AppError::Analysis(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected upload: {msg}");
                *msg
            }
            AppError::PdfParse(e) => {
                tracing::error!("PDF parse error: {e}");
                "Error parsing PDF file"
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                "Error analyzing text"
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                "Internal Server Error"
            }
        };

        (self.status(), message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest("No file uploaded").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PdfParse("bad xref".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Analysis(AnalysisError::MissingCredential).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Io(std::io::Error::other("disk")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_never_leaks_cause() {
        let response = AppError::PdfParse("secret internal detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Error parsing PDF file");
    }
}
