//! Validated short code identifier.

use crate::utils::code_generator::{CODE_LENGTH, is_valid_code};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when text is not a well-formed short code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid short code '{0}': expected {CODE_LENGTH} characters from [a-zA-Z0-9_]")]
pub struct InvalidShortCode(pub String);

/// A short code of exactly [`CODE_LENGTH`] characters over the code alphabet.
///
/// Every value of this type satisfies
/// [`is_valid_code`](crate::utils::code_generator::is_valid_code). Untrusted
/// text goes through [`ShortCode::parse`]; the generator builds codes directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortCode(String);

impl ShortCode {
    /// Parses and validates a short code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidShortCode`] on wrong length or any character outside
    /// the alphabet.
    pub fn parse(code: impl Into<String>) -> Result<Self, InvalidShortCode> {
        let code = code.into();
        if is_valid_code(&code) {
            Ok(Self(code))
        } else {
            Err(InvalidShortCode(code))
        }
    }

    /// Wraps generator output, which is valid by construction.
    pub(crate) fn from_trusted(code: String) -> Self {
        debug_assert!(is_valid_code(&code));
        Self(code)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the public short URL under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShortCode {
    type Err = InvalidShortCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = InvalidShortCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for ShortCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_code() {
        let code = ShortCode::parse("abcDEF_123").unwrap();
        assert_eq!(code.as_str(), "abcDEF_123");
        assert_eq!(code.to_string(), "abcDEF_123");
    }

    #[test]
    fn test_parse_rejects_short_code() {
        let err = ShortCode::parse("bad").unwrap_err();
        assert_eq!(err, InvalidShortCode("bad".to_string()));
    }

    #[test]
    fn test_parse_rejects_hyphen() {
        assert!(ShortCode::parse("abcde-ghij").is_err());
    }

    #[test]
    fn test_from_str_and_try_from() {
        let a: ShortCode = "0123456789".parse().unwrap();
        let b = ShortCode::try_from("0123456789".to_string()).unwrap();
        assert_eq!(a, b);
        assert!("short".parse::<ShortCode>().is_err());
    }

    #[test]
    fn test_to_url_trims_trailing_slash() {
        let code = ShortCode::parse("abcdefghij").unwrap();
        assert_eq!(
            code.to_url("http://localhost:8080"),
            "http://localhost:8080/abcdefghij"
        );
        assert_eq!(
            code.to_url("http://localhost:8080/"),
            "http://localhost:8080/abcdefghij"
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let code = ShortCode::parse("abcdefghij").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abcdefghij\"");
    }
}
