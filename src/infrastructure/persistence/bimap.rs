//! Owned bidirectional code/URL index.
//!
//! [`BiMap`] keeps the forward (`code -> url`) and reverse (`url -> code`)
//! directions in one value. Each string is allocated once as an `Arc<str>` and
//! shared by both maps. The only way to add an entry is [`BiMap::try_insert`],
//! which applies the repository save rules as a single step, so the two maps
//! cannot drift apart.

use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of a successful [`BiMap::try_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// A new pair was added to both directions.
    New,
    /// The exact pair was already present.
    Existing,
}

/// Reason a [`BiMap::try_insert`] was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The code is taken by the contained URL.
    CodeTaken(Arc<str>),
    /// The URL is already bound to the contained code.
    UrlTaken(Arc<str>),
}

#[derive(Debug, Default)]
pub struct BiMap {
    by_code: HashMap<Arc<str>, Arc<str>>,
    by_url: HashMap<Arc<str>, Arc<str>>,
}

impl BiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `code <-> url` unless either side is already bound elsewhere.
    ///
    /// A code conflict is reported before a URL conflict.
    pub fn try_insert(&mut self, code: &str, url: &str) -> Result<Inserted, Conflict> {
        if let Some(existing_url) = self.by_code.get(code) {
            if existing_url.as_ref() == url {
                return Ok(Inserted::Existing);
            }
            return Err(Conflict::CodeTaken(Arc::clone(existing_url)));
        }

        if let Some(existing_code) = self.by_url.get(url) {
            return Err(Conflict::UrlTaken(Arc::clone(existing_code)));
        }

        let code: Arc<str> = Arc::from(code);
        let url: Arc<str> = Arc::from(url);
        self.by_code.insert(Arc::clone(&code), Arc::clone(&url));
        self.by_url.insert(url, code);

        Ok(Inserted::New)
    }

    pub fn get_by_code(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(AsRef::as_ref)
    }

    pub fn get_by_url(&self, url: &str) -> Option<&str> {
        self.by_url.get(url).map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.by_code.len(), self.by_url.len());
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_code.iter().map(|(c, u)| (c.as_ref(), u.as_ref()))
    }

    pub fn clear(&mut self) {
        self.by_code.clear();
        self.by_url.clear();
    }
}
