//! Repository trait for bidirectional URL mapping storage.

use crate::domain::entities::ShortCode;
use async_trait::async_trait;

/// Failures reported by a [`UrlRepository`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No mapping exists for the requested code or URL.
    #[error("URL not found")]
    NotFound,

    /// The code is already mapped to a different URL: two distinct URLs
    /// derived the same code.
    #[error("short code {code} already exists for a different URL")]
    AlreadyExists { code: String },

    /// The URL is already mapped to a different code, typically because a
    /// concurrent caller created it first.
    #[error("URL already shortened: {original_url}")]
    Duplicate { original_url: String },

    /// Backend connectivity, I/O or deadline failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Repository interface for the code/URL bijection.
///
/// # Save semantics
///
/// Every implementation resolves [`UrlRepository::save`] with the same
/// four rules, applied as if calls ran one at a time:
///
/// 1. `code` already maps to `original_url`: success, nothing written.
/// 2. `code` already maps to another URL: [`RepositoryError::AlreadyExists`].
/// 3. `original_url` already maps to another code: [`RepositoryError::Duplicate`].
/// 4. Otherwise both directions are inserted together.
///
/// Readers never observe one direction of a mapping without the other.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process reference store
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Stores the mapping `code <-> original_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::AlreadyExists`] or [`RepositoryError::Duplicate`]
    /// per the rules above, and [`RepositoryError::Storage`] on backend failures.
    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<(), RepositoryError>;

    /// Returns the original URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the code is unknown.
    async fn get(&self, code: &ShortCode) -> Result<String, RepositoryError>;

    /// Returns the short code already assigned to `original_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the URL was never shortened.
    async fn get_by_original(&self, original_url: &str) -> Result<ShortCode, RepositoryError>;

    /// Releases backend resources. Further calls may fail.
    async fn close(&self) -> Result<(), RepositoryError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
