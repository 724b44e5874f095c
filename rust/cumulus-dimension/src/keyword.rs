use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DimensionError;

/// A [`Keyword`] is an atomic tag, such as a region or a year. Keywords
/// compare, order and hash by their id; clones share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keyword(Arc<str>);

impl Keyword {
    /// Creates a free-standing keyword. Prefer [`Vocabulary::intern`] when
    /// building many dimensions from the same tags.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The id of this keyword.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Keyword {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Keyword {
    fn from(value: &str) -> Self {
        Keyword::new(value)
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Keyword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Keyword(Arc::from(id)))
    }
}

/// Interns keywords so that every distinct tag is allocated once and shared
/// by all dimensions that mention it.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    keywords: HashSet<Keyword>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared keyword for `id`, creating it on first use.
    pub fn intern(&mut self, id: &str) -> Result<Keyword, DimensionError> {
        if id.is_empty() {
            return Err(DimensionError::EmptyKeyword);
        }

        if let Some(keyword) = self.keywords.get(id) {
            return Ok(keyword.clone());
        }

        let keyword = Keyword::new(id);
        self.keywords.insert(keyword.clone());
        Ok(keyword)
    }

    /// Looks up an already interned keyword.
    pub fn get(&self, id: &str) -> Option<&Keyword> {
        self.keywords.get(id)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether no keyword has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn it_shares_interned_keywords() -> TestResult {
        let mut vocabulary = Vocabulary::new();
        let first = vocabulary.intern("FR")?;
        let second = vocabulary.intern("FR")?;

        assert!(Arc::ptr_eq(&first.0, &second.0));
        assert_eq!(vocabulary.len(), 1);
        Ok(())
    }

    #[test]
    fn it_rejects_empty_ids() {
        let mut vocabulary = Vocabulary::new();
        assert_eq!(vocabulary.intern(""), Err(DimensionError::EmptyKeyword));
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn it_orders_by_id() {
        let mut keywords = vec![Keyword::new("b"), Keyword::new("a"), Keyword::new("c")];
        keywords.sort();

        let ids: Vec<&str> = keywords.iter().map(Keyword::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
