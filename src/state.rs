//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::repositories::UrlRepository;

/// State cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    /// Prefix of returned short URLs, without a trailing `/`.
    pub base_url: String,
}

impl AppState {
    pub fn new(repository: Arc<dyn UrlRepository>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            url_service: Arc::new(UrlService::new(repository)),
            base_url,
        }
    }
}
