use std::fmt;

use crate::Dimension;

/// Rendering of [`HashKey::Empty`].
pub const EMPTY_HASH_KEY: &str = "#emptyHashKey#";

/// Rendering of [`HashKey::Null`].
pub const NULL_HASH_KEY: &str = "#nullHashKey#";

/// Join key of a coordinate against a set of shared keywords.
///
/// Two coordinates match during translation when they produce the same
/// non-null key: they agree on every shared axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    /// No axis is shared, so every coordinate matches every other one.
    Empty,
    /// The coordinate does not pin down exactly `alpha` shared keywords. It
    /// must never be matched.
    Null,
    /// The sorted, comma-joined shared keywords of the coordinate.
    Key(String),
}

impl HashKey {
    /// Computes the key of `coordinate` given the keywords shared between two
    /// shapes and the number `alpha` of shared axes.
    pub fn of(coordinate: &Dimension, common: &Dimension, alpha: usize) -> Self {
        if alpha == 0 {
            return HashKey::Empty;
        }

        let shared: Vec<&str> = coordinate
            .keywords()
            .filter(|keyword| common.contains(keyword))
            .map(|keyword| keyword.id())
            .collect();

        if shared.len() != alpha {
            return HashKey::Null;
        }

        HashKey::Key(shared.join(","))
    }

    /// Whether this key excludes the coordinate from matching.
    pub fn is_null(&self) -> bool {
        matches!(self, HashKey::Null)
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Empty => write!(f, "{EMPTY_HASH_KEY}"),
            HashKey::Null => write!(f, "{NULL_HASH_KEY}"),
            HashKey::Key(key) => write!(f, "{key}"),
        }
    }
}
