//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlRepository`] trait and
//! provide a small API for HTTP handlers and the admin tool.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation and resolution

pub mod services;
