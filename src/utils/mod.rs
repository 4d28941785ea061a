//! Utility functions for code derivation and URL checking.
//!
//! - [`code_generator`] - Deterministic short code generation and validation
//! - [`url_validator`] - Acceptance rules for URLs submitted for shortening

pub mod code_generator;
pub mod url_validator;
