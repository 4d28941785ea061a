//! Validation of URLs submitted for shortening.
//!
//! URLs are checked, never rewritten: the string that passes validation is the
//! exact string that gets hashed and stored.

use url::Url;

/// Reasons a URL is rejected before it reaches the code generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedProtocol(String),

    #[error("URL must have a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http`/`https` URL with a non-empty host.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for an empty string,
/// [`UrlValidationError::InvalidFormat`] for unparseable or relative input and
/// for input with control characters or surrounding whitespace,
/// [`UrlValidationError::UnsupportedProtocol`] for any other scheme, and
/// [`UrlValidationError::MissingHost`] when the host is absent.
///
/// # Examples
///
/// ```
/// use shorturl::utils::url_validator::{validate_url, UrlValidationError};
///
/// assert!(validate_url("https://example.com/test").is_ok());
/// assert_eq!(validate_url(""), Err(UrlValidationError::Empty));
/// assert!(matches!(
///     validate_url("ftp://x"),
///     Err(UrlValidationError::UnsupportedProtocol(_))
/// ));
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // The WHATWG parser strips these silently; the stored string must be the parsed one.
    if input.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::InvalidFormat(
            "URL contains control characters".to_string(),
        ));
    }
    if input.trim() != input {
        return Err(UrlValidationError::InvalidFormat(
            "URL has leading or trailing whitespace".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedProtocol(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
