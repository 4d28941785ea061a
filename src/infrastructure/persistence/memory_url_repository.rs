//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::bimap::{BiMap, Conflict, Inserted};
use crate::domain::entities::ShortCode;
use crate::domain::repositories::{RepositoryError, UrlRepository};

/// Reference store keeping the code/URL bijection in process memory.
///
/// One [`RwLock`] guards a single [`BiMap`]: lookups share the read lock, and
/// each `save` runs its whole conflict check and insert under the write lock.
/// No call waits on anything but that lock, so none can hang.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    mappings: RwLock<BiMap>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn count(&self) -> usize {
        self.mappings.read().len()
    }

    /// Copies out every mapping, in no particular order.
    #[cfg(test)]
    fn snapshot(&self) -> Vec<crate::domain::entities::UrlMapping> {
        use crate::domain::entities::UrlMapping;

        self.mappings
            .read()
            .iter()
            .map(|(code, url)| UrlMapping::new(ShortCode::from_trusted(code.to_owned()), url))
            .collect()
    }

    /// Administrative wipe of every mapping.
    pub fn clear(&self) {
        self.mappings.write().clear();
        debug!("In-memory store cleared");
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<(), RepositoryError> {
        let outcome = self.mappings.write().try_insert(code.as_str(), original_url);

        match outcome {
            Ok(Inserted::New) => {
                debug!(code = %code, "Stored new mapping");
                Ok(())
            }
            Ok(Inserted::Existing) => Ok(()),
            Err(Conflict::CodeTaken(_)) => Err(RepositoryError::AlreadyExists {
                code: code.to_string(),
            }),
            Err(Conflict::UrlTaken(_)) => Err(RepositoryError::Duplicate {
                original_url: original_url.to_string(),
            }),
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<String, RepositoryError> {
        self.mappings
            .read()
            .get_by_code(code.as_str())
            .map(str::to_owned)
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_original(&self, original_url: &str) -> Result<ShortCode, RepositoryError> {
        self.mappings
            .read()
            .get_by_url(original_url)
            .map(|code| ShortCode::from_trusted(code.to_owned()))
            .ok_or(RepositoryError::NotFound)
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
