use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Completion backend for contract analysis. `None` when `GOOGLE_KEY` is
    /// unset; `/analyze-text` then fails per request instead of at startup.
    pub llm: Option<Arc<dyn CompletionBackend>>,
}

impl AppState {
    pub fn new(config: Config, llm: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self {
            config: Arc::new(config),
            llm,
        }
    }
}
