//! URL mapping entity: one side of the code/URL bijection.

use super::ShortCode;
use serde::Serialize;

/// An immutable pairing of a short code with the URL it was derived from.
///
/// Mappings are created once and never rewritten; across a store no two
/// mappings share a code and no two share a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlMapping {
    pub short_code: ShortCode,
    pub original_url: String,
}

impl UrlMapping {
    /// Creates a new mapping.
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        Self {
            short_code,
            original_url: original_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::code_generator::generate_code;

    #[test]
    fn test_mapping_creation() {
        let url = "https://example.com/test";
        let mapping = UrlMapping::new(generate_code(url), url);

        assert_eq!(mapping.original_url, url);
        assert_eq!(mapping.short_code, generate_code(url));
    }
}
