use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Keyword;

/// A [`Dimension`] is a set of keywords. Inside a [`crate::DimensionSet`] it
/// describes one axis of variation; on its own it is also used as the
/// coordinate of a single element (one keyword per axis).
///
/// Dimensions have value semantics and cannot be changed after construction.
/// Use [`Dimension::with`] or a [`DimensionBuilder`] to derive new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimension(BTreeSet<Keyword>);

impl Dimension {
    /// A dimension without keywords.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A dimension holding exactly one keyword.
    pub fn singleton(keyword: Keyword) -> Self {
        Self(BTreeSet::from([keyword]))
    }

    /// Starts a builder for a new dimension.
    pub fn builder() -> DimensionBuilder {
        DimensionBuilder::default()
    }

    /// Keywords of this dimension in ascending order.
    pub fn keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.0.iter()
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this dimension has no keywords.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `keyword` is part of this dimension.
    pub fn contains(&self, keyword: &Keyword) -> bool {
        self.0.contains(keyword)
    }

    /// Whether the two keyword sets intersect.
    pub fn has_common_keywords(&self, other: &Dimension) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Keywords present in both dimensions.
    pub fn intersection(&self, other: &Dimension) -> Dimension {
        Dimension(self.0.intersection(&other.0).cloned().collect())
    }

    /// Keywords present in either dimension.
    pub fn union(&self, other: &Dimension) -> Dimension {
        Dimension(self.0.union(&other.0).cloned().collect())
    }

    /// Whether every keyword of this dimension is also in `other`.
    pub fn is_subset(&self, other: &Dimension) -> bool {
        self.0.is_subset(&other.0)
    }

    /// A new dimension with `keyword` added.
    pub fn with(&self, keyword: Keyword) -> Dimension {
        let mut keywords = self.0.clone();
        keywords.insert(keyword);
        Dimension(keywords)
    }
}

impl FromIterator<Keyword> for Dimension {
    fn from_iter<T: IntoIterator<Item = Keyword>>(iter: T) -> Self {
        Dimension(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a Keyword> for Dimension {
    fn from_iter<T: IntoIterator<Item = &'a Keyword>>(iter: T) -> Self {
        Dimension(iter.into_iter().cloned().collect())
    }
}

impl<'a> IntoIterator for &'a Dimension {
    type Item = &'a Keyword;
    type IntoIter = std::collections::btree_set::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, keyword) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{keyword}")?;
        }
        write!(f, "}}")
    }
}

/// Accumulates keywords and produces an immutable [`Dimension`].
#[derive(Debug, Clone, Default)]
pub struct DimensionBuilder {
    keywords: BTreeSet<Keyword>,
}

impl DimensionBuilder {
    /// Adds a keyword.
    pub fn keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    /// Adds several keywords.
    pub fn keywords(mut self, keywords: impl IntoIterator<Item = Keyword>) -> Self {
        self.keywords.extend(keywords);
        self
    }

    /// Finishes the dimension.
    pub fn build(self) -> Dimension {
        Dimension(self.keywords)
    }
}
