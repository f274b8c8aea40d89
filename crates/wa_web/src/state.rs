use std::sync::Arc;
use wa_analysis::{Analyzer, TemplateGenerator};
use wa_core::ArticleStorage;
use wa_harvest::{ContentFetcher, TaskQueue};

/// Everything a handler needs, constructed once by the binary.
pub struct AppState {
    pub storage: Arc<dyn ArticleStorage>,
    pub analyzer: Analyzer,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub queue: TaskQueue,
    pub templates: TemplateGenerator,
    pub version: String,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn ArticleStorage>,
        fetcher: Arc<dyn ContentFetcher>,
        queue: TaskQueue,
    ) -> Self {
        Self {
            storage,
            analyzer: Analyzer::new(),
            fetcher,
            queue,
            templates: TemplateGenerator::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
