use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Dimension, DimensionError, Keyword};

/// A [`DimensionSet`] is the shape of a group: an unordered collection of
/// independent axes. It is also used to hold the expanded coordinates of a
/// group, one [`Dimension`] per element.
///
/// Sets built through [`DimensionSet::try_from_dimensions`] or
/// [`DimensionSet::insert`] never contain an empty dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DimensionSet(BTreeSet<Dimension>);

/// Outcome of [`DimensionSet::union`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union {
    /// The merged addressing scheme.
    pub dimensions: DimensionSet,
    /// How many dimensions of the left operand were narrowed.
    pub alpha: usize,
    /// Every keyword that caused a narrowing.
    pub common_keywords: Dimension,
}

impl DimensionSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set, rejecting empty dimensions.
    pub fn try_from_dimensions(
        dimensions: impl IntoIterator<Item = Dimension>,
    ) -> Result<Self, DimensionError> {
        let mut set = Self::new();
        for dimension in dimensions {
            set.insert(dimension)?;
        }
        Ok(set)
    }

    /// Adds a dimension. Returns whether it was not already present.
    pub fn insert(&mut self, dimension: Dimension) -> Result<bool, DimensionError> {
        if dimension.is_empty() {
            return Err(DimensionError::EmptyDimension);
        }
        Ok(self.0.insert(dimension))
    }

    /// Dimensions in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.0.iter()
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no dimensions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `dimension` is a member.
    pub fn contains(&self, dimension: &Dimension) -> bool {
        self.0.contains(dimension)
    }

    /// Every keyword mentioned by any dimension.
    pub fn keywords(&self) -> BTreeSet<&Keyword> {
        self.0.iter().flat_map(Dimension::keywords).collect()
    }

    /// This set plus one singleton dimension per keyword of `keywords`.
    pub fn with_singletons(&self, keywords: &Dimension) -> DimensionSet {
        let mut dimensions = self.0.clone();
        dimensions.extend(keywords.keywords().cloned().map(Dimension::singleton));
        DimensionSet(dimensions)
    }

    /// The Cartesian product of the dimensions: every coordinate picks one
    /// keyword from each dimension. An empty set has no coordinates.
    pub fn combinations(&self) -> DimensionSet {
        if self.0.is_empty() {
            return DimensionSet::new();
        }

        DimensionSet(
            self.0
                .iter()
                .map(|dimension| dimension.keywords().cloned().collect::<Vec<_>>())
                .multi_cartesian_product()
                .map(Dimension::from_iter)
                .collect(),
        )
    }

    /// Keywords that occur in some dimension of `self` and in some dimension
    /// of `other`.
    pub fn common_keywords(&self, other: &DimensionSet) -> Dimension {
        let theirs = other.keywords();
        self.keywords()
            .into_iter()
            .filter(|keyword| theirs.contains(keyword))
            .collect()
    }

    /// Number of dimensions of `self` that share a keyword with `other`.
    pub fn alpha(&self, other: &DimensionSet) -> usize {
        let theirs = other.keywords();
        self.0
            .iter()
            .filter(|dimension| dimension.keywords().any(|keyword| theirs.contains(&keyword)))
            .count()
    }

    /// Merges two shapes with partially overlapping vocabularies.
    ///
    /// Each dimension of `self` that shares keywords with `other` is narrowed
    /// to the shared keywords, and the dimensions of `other` it touched are
    /// consumed. Untouched dimensions of `self` are kept as they are and the
    /// unconsumed dimensions of `other` are appended.
    pub fn union(&self, other: &DimensionSet) -> Union {
        let theirs: Vec<&Dimension> = other.0.iter().collect();

        let mut index: HashMap<&Keyword, Vec<usize>> = HashMap::new();
        for (position, dimension) in theirs.iter().enumerate() {
            for keyword in dimension.keywords() {
                index.entry(keyword).or_default().push(position);
            }
        }

        let mut consumed = HashSet::new();
        let mut dimensions = BTreeSet::new();
        let mut common = BTreeSet::new();
        let mut alpha = 0;

        for dimension in &self.0 {
            let mut narrowed = BTreeSet::new();
            for keyword in dimension.keywords() {
                if let Some(positions) = index.get(keyword) {
                    narrowed.insert(keyword.clone());
                    consumed.extend(positions.iter().copied());
                }
            }

            if narrowed.is_empty() {
                dimensions.insert(dimension.clone());
            } else {
                alpha += 1;
                common.extend(narrowed.iter().cloned());
                dimensions.insert(Dimension::from_iter(narrowed));
            }
        }

        for (position, dimension) in theirs.into_iter().enumerate() {
            if !consumed.contains(&position) {
                dimensions.insert(dimension.clone());
            }
        }

        Union {
            dimensions: DimensionSet(dimensions),
            alpha,
            common_keywords: Dimension::from_iter(common),
        }
    }

    /// Two shapes are compatible when every dimension of one intersects at
    /// most one dimension of the other, in both directions. Matching
    /// incompatible shapes would be ambiguous.
    pub fn is_compatible(&self, other: &DimensionSet) -> bool {
        fn one_sided(left: &DimensionSet, right: &DimensionSet) -> bool {
            left.0.iter().all(|dimension| {
                right
                    .0
                    .iter()
                    .filter(|candidate| dimension.has_common_keywords(candidate))
                    .take(2)
                    .count()
                    <= 1
            })
        }

        one_sided(self, other) && one_sided(other, self)
    }
}

impl<'a> IntoIterator for &'a DimensionSet {
    type Item = &'a Dimension;
    type IntoIter = std::collections::btree_set::Iter<'a, Dimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for DimensionSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dimensions = Vec::<Dimension>::deserialize(deserializer)?;
        DimensionSet::try_from_dimensions(dimensions).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dimension) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dimension}")?;
        }
        write!(f, "]")
    }
}
