//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Bidirectional short code / URL storage

pub mod url_repository;

pub use url_repository::{RepositoryError, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
