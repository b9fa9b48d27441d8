use std::sync::Arc;

use crate::services::ocr::LabelExtractor;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn LabelExtractor>,
}

impl AppState {
    pub fn new(extractor: impl LabelExtractor + 'static) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}
