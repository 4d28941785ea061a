//! Deterministic short code derivation and validation.
//!
//! A short code is a pure function of the original URL: the URL bytes are
//! hashed with SHA-256, the digest is encoded as URL-safe base64 without
//! padding, `-` is folded into `_`, and the first [`CODE_LENGTH`] characters
//! are kept.
//!
//! Truncation means two different URLs can derive the same code. Such a
//! collision is detected and reported by the storage layer, never resolved here.

use crate::domain::entities::ShortCode;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Number of characters in every short code.
pub const CODE_LENGTH: usize = 10;

/// Symbols a short code may contain.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Derives the short code for `original_url`.
///
/// Identical input always yields the identical code. No randomness, counters
/// or storage access are involved.
///
/// # Examples
///
/// ```
/// use shorturl::utils::code_generator::{generate_code, CODE_LENGTH};
///
/// let code = generate_code("https://example.com/test");
/// assert_eq!(code.as_str().len(), CODE_LENGTH);
/// assert_eq!(code, generate_code("https://example.com/test"));
/// ```
pub fn generate_code(original_url: &str) -> ShortCode {
    let digest = Sha256::digest(original_url.as_bytes());

    let encoded: String = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(digest)
        .chars()
        .map(|c| if c == '-' { '_' } else { c })
        .take(CODE_LENGTH)
        .collect();

    ShortCode::from_trusted(encoded)
}

/// Returns `true` if `code` has exactly [`CODE_LENGTH`] characters, all of
/// them from [`ALPHABET`].
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(is_code_char)
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
