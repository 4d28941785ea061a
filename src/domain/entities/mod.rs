//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortCode`] - A validated, fixed-length short code
//! - [`UrlMapping`] - A short code paired with its original URL
//!
//! A [`ShortCode`] can only be obtained by parsing (which validates) or by the
//! code generator, so repository operations never see a malformed code.

pub mod short_code;
pub mod url_mapping;

pub use short_code::{InvalidShortCode, ShortCode};
pub use url_mapping::UrlMapping;
