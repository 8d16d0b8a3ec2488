//! Upload ingestion: pulls the `pdf` file field out of a multipart body and
//! hands it to the PDF extractor.

use std::path::Path;

use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    http::header,
    response::IntoResponse,
};
use bytes::Bytes;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::pdf;

/// Form field carrying the uploaded document.
pub const PDF_FIELD: &str = "pdf";

const PARSE_FAILED: &str = "Error parsing the file";
const NO_FILE: &str = "No file uploaded";

/// A file part spooled to disk for the duration of one request.
///
/// The backing temp file is removed when this value drops, so every exit
/// path of the handler cleans up.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub size: u64,
    spool: NamedTempFile,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.spool.path()
    }

    pub async fn read_bytes(&self) -> std::io::Result<Bytes> {
        tokio::fs::read(self.path()).await.map(Bytes::from)
    }
}

/// Streams the first file part named `pdf` into a temp file.
///
/// Other parts are skipped. A `pdf` part with no filename is a plain form
/// value, not a file, and is skipped too. An empty part with an empty
/// filename is what browsers send when nothing was chosen.
pub async fn ingest_pdf_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        warn!("Multipart parse failed: {e}");
        AppError::BadRequest(PARSE_FAILED)
    })? {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let spool = NamedTempFile::new()?;
        let mut out = tokio::fs::File::from_std(spool.reopen()?);
        let mut size = 0u64;
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            warn!("Multipart body read failed: {e}");
            AppError::BadRequest(PARSE_FAILED)
        })? {
            out.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        out.flush().await?;

        if size == 0 && file_name.is_empty() {
            return Err(AppError::BadRequest(NO_FILE));
        }

        return Ok(UploadedFile {
            file_name: (!file_name.is_empty()).then_some(file_name),
            size,
            spool,
        });
    }

    Err(AppError::BadRequest(NO_FILE))
}

/// POST /upload-pdf
///
/// Multipart body with the document under `pdf`. Responds with the extracted
/// plain text.
pub async fn handle_upload_pdf(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let multipart = multipart.map_err(|e| {
        warn!("Upload rejected before parsing: {}", e.body_text());
        AppError::BadRequest(PARSE_FAILED)
    })?;

    let upload = ingest_pdf_field(multipart).await?;
    info!(
        "Received PDF upload {:?} ({} bytes)",
        upload.file_name.as_deref().unwrap_or("<unnamed>"),
        upload.size
    );

    let text = pdf::extract_text(upload.read_bytes().await?).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}
