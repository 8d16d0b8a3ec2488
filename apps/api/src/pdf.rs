//! PDF text extraction: hands an uploaded buffer to `pdf-extract`.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Extracts plain text from raw PDF bytes.
///
/// Parsing is CPU-bound and runs on the blocking pool. `pdf-extract` can
/// panic on malformed input; a panic surfaces as `PdfParse` like any other
/// parse failure.
pub async fn extract_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::PdfParse(format!("PDF extraction task failed: {e}")))?
        .map_err(|e| AppError::PdfParse(e.to_string()))?;

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text)
}
