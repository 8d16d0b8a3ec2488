//! Static file resolution: maps request paths onto files under `STATIC_DIR`.

use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

pub const ROOT_DOCUMENT: &str = "index.html";
pub const NOT_FOUND_DOCUMENT: &str = "404.html";

const HTML: &str = "text/html";

/// A request path mapped to a file on disk and the type it is served as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub content_type: &'static str,
}

impl ResolvedAsset {
    /// Images go out as raw bytes; everything else is decoded as UTF-8 text,
    /// with invalid sequences replaced.
    pub fn is_binary(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Content type by file extension (without the dot). Unknown or missing
/// extensions are served as HTML.
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        _ => HTML,
    }
}

/// Maps a request path onto `root`.
///
/// `/` is the root document and extensionless paths get `.html` appended.
/// Returns `None` for paths that would leave `root` (`..`, `.`), which the
/// caller treats as a miss.
pub fn resolve(root: &Path, request_path: &str) -> Option<ResolvedAsset> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        return Some(ResolvedAsset {
            path: root.join(ROOT_DOCUMENT),
            content_type: HTML,
        });
    }

    let mut path = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return None,
        }
    }

    let extension = relative.extension().and_then(|e| e.to_str());
    if extension.is_none() {
        path.as_mut_os_string().push(".html");
    }

    Some(ResolvedAsset {
        path,
        content_type: content_type_for(extension),
    })
}

pub fn not_found_asset(root: &Path) -> ResolvedAsset {
    ResolvedAsset {
        path: root.join(NOT_FOUND_DOCUMENT),
        content_type: HTML,
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn serve_file(asset: &ResolvedAsset, status: StatusCode) -> Result<Response, AppError> {
    let headers = [(header::CONTENT_TYPE, asset.content_type)];
    let data = tokio::fs::read(&asset.path).await?;
    let response = if asset.is_binary() {
        (status, headers, data).into_response()
    } else {
        let text = String::from_utf8_lossy(&data).into_owned();
        (status, headers, text).into_response()
    };
    Ok(response)
}

/// Fallback for every request not claimed by an API route.
pub async fn handle_static(State(state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    let root = &state.config.static_dir;

    if let Some(asset) = resolve(root, uri.path()) {
        if is_file(&asset.path).await {
            return serve_file(&asset, StatusCode::OK).await;
        }
    }

    debug!("No static asset for {}", uri.path());
    serve_file(&not_found_asset(root), StatusCode::NOT_FOUND).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_table() {
        let cases = [
            (Some("css"), "text/css"),
            (Some("js"), "text/javascript"),
            (Some("png"), "image/png"),
            (Some("jpg"), "image/jpeg"),
            (Some("gif"), "image/gif"),
            (Some("txt"), "text/plain"),
            (Some("html"), "text/html"),
            (Some("svg"), "text/html"),
            (None, "text/html"),
        ];
        for (extension, expected) in cases {
            assert_eq!(content_type_for(extension), expected, "{extension:?}");
        }
    }

    #[test]
    fn test_root_maps_to_index() {
        let asset = resolve(Path::new("/srv"), "/").unwrap();
        assert_eq!(asset.path, PathBuf::from("/srv/index.html"));
        assert_eq!(asset.content_type, "text/html");
    }

    #[test]
    fn test_extensionless_path_gets_html_suffix() {
        let asset = resolve(Path::new("/srv"), "/about").unwrap();
        assert_eq!(asset.path, PathBuf::from("/srv/about.html"));
        assert_eq!(asset.content_type, "text/html");

        let nested = resolve(Path::new("/srv"), "/docs/terms/").unwrap();
        assert_eq!(nested.path, PathBuf::from("/srv/docs/terms.html"));
    }

    #[test]
    fn test_extension_drives_type_and_path_is_kept() {
        let asset = resolve(Path::new("/srv"), "/img/logo.png").unwrap();
        assert_eq!(asset.path, PathBuf::from("/srv/img/logo.png"));
        assert!(asset.is_binary());

        let script = resolve(Path::new("/srv"), "/app.js").unwrap();
        assert_eq!(script.content_type, "text/javascript");
        assert!(!script.is_binary());
    }

    #[test]
    fn test_traversal_is_refused() {
        assert!(resolve(Path::new("/srv"), "/../etc/passwd").is_none());
        assert!(resolve(Path::new("/srv"), "/img/../../secret.txt").is_none());
        assert!(resolve(Path::new("/srv"), "/./index.html").is_none());
    }

    #[test]
    fn test_not_found_asset_is_html() {
        let asset = not_found_asset(Path::new("/srv"));
        assert_eq!(asset.path, PathBuf::from("/srv/404.html"));
        assert_eq!(asset.content_type, "text/html");
    }
}
