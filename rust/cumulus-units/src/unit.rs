use std::fmt;

use serde::{Deserialize, Serialize};

/// Symbol of the dimensionless unit.
pub const DIMENSIONLESS: &str = "1";

/// A [`Unit`] names a unit of measure by its symbol, e.g. `kg`, `MJ` or the
/// compound `kg.MJ^-1`. Interpreting the symbol is the job of a
/// [`crate::UnitService`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    /// Creates a unit from its symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The dimensionless unit `1`.
    pub fn dimensionless() -> Self {
        Self(DIMENSIONLESS.to_owned())
    }

    /// The symbol of this unit.
    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Unit {
    fn from(value: &str) -> Self {
        Unit::new(value)
    }
}

impl From<String> for Unit {
    fn from(value: String) -> Self {
        Unit(value)
    }
}

impl From<Unit> for String {
    fn from(value: Unit) -> Self {
        value.0
    }
}
