//! URL repository implementations.
//!
//! # Repositories
//!
//! - [`MemoryUrlRepository`] - In-process reference store (one lock, one [`bimap::BiMap`])
//! - [`PgUrlRepository`] - PostgreSQL storage with uniqueness constraints on both columns

pub mod bimap;
pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
