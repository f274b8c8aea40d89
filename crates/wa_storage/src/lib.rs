use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use wa_core::{ArticleStorage, Error, Result};

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn new() -> Result<Self>
    where
        Self: Sized;
}

/// Opens the backend named by `kind`. `location` is backend specific; for
/// sqlite it is the database file path.
pub async fn create_storage(kind: &str, location: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => {
            info!("Using in-memory storage");
            Ok(Arc::new(<InMemoryStorage as StorageBackend>::new().await?))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let storage = match location {
                Some(path) => SQLiteStorage::new_with_path(std::path::Path::new(path)).await?,
                None => <SQLiteStorage as StorageBackend>::new().await?,
            };
            info!(path = %storage.get_db_path().display(), "Using SQLite storage");
            Ok(Arc::new(storage))
        }
        other => {
            let _ = location;
            Err(Error::Validation(format!("Unknown storage backend: {}", other)))
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}
