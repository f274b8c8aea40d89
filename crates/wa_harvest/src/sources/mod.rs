use async_trait::async_trait;
use wa_core::{Article, Result};

pub mod synthetic;

pub use synthetic::SyntheticSource;

/// Where candidate articles come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Returns the name of the source
    fn name(&self) -> &str;

    /// Candidates for one keyword. Identity and category are assigned by the
    /// harvester afterwards.
    async fn search(&self, keyword: &str) -> Result<Vec<Article>>;
}
