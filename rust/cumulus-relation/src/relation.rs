use std::fmt;
use std::sync::Arc;

use cumulus_dimension::{Dimension, Group};
use cumulus_model::{CoefficientId, ProcessId};
use cumulus_units::Unit;
use serde::{Deserialize, Serialize};

/// Whether a relation multiplies or divides by its coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Exponent {
    /// Multiply by the coefficient.
    #[default]
    Direct,
    /// Divide by the coefficient, for relations authored in the inverse
    /// direction.
    Inverse,
}

impl Exponent {
    /// `1` or `-1`.
    pub fn as_i32(self) -> i32 {
        match self {
            Exponent::Direct => 1,
            Exponent::Inverse => -1,
        }
    }
}

impl TryFrom<i32> for Exponent {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Exponent::Direct),
            -1 => Ok(Exponent::Inverse),
            other => Err(format!("Relation exponents are 1 or -1, got {other}")),
        }
    }
}

impl From<Exponent> for i32 {
    fn from(value: Exponent) -> Self {
        value.as_i32()
    }
}

/// Free-form label of a relation, kept on every relation derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationType(String);

impl RelationType {
    /// Creates a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RelationType {
    fn default() -> Self {
        Self::new("dependency")
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a group (or shape) plays in a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The source group.
    Source,
    /// The coefficient group.
    Coefficient,
    /// The destination group.
    Destination,
    /// The merged shape of the source and coefficient groups.
    SourceWithCoefficient,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Coefficient => write!(f, "coefficient"),
            Side::Destination => write!(f, "destination"),
            Side::SourceWithCoefficient => write!(f, "source ∪ coefficient"),
        }
    }
}

/// A relation authored between three groups. Every matching combination of
/// their elements forms one [`MicroRelation`].
#[derive(Debug, Clone, PartialEq)]
pub struct MacroRelation {
    /// Name used when reporting failures.
    pub name: String,
    /// Group of the processes the relation originates from.
    pub source: Arc<Group>,
    /// Group of the coefficients scaling the relation.
    pub coefficient: Arc<Group>,
    /// Group of the processes the relation points to.
    pub destination: Arc<Group>,
    /// Multiply or divide by the coefficient.
    pub exponent: Exponent,
    /// Label carried over to derived relations.
    pub relation_type: RelationType,
}

/// Units of the three sides of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationUnits {
    /// Unit of the source elements.
    pub source: Unit,
    /// Unit of the coefficient elements.
    pub coefficient: Unit,
    /// Unit of the destination elements.
    pub destination: Unit,
}

/// One matched triple of coordinates produced by translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MicroRelation {
    /// Coordinate of the source element.
    pub source: Dimension,
    /// Coordinate of the coefficient element.
    pub coefficient: Dimension,
    /// Coordinate of the destination element.
    pub destination: Dimension,
    /// Units of the three elements.
    pub units: RelationUnits,
    /// Multiply or divide by the coefficient.
    pub exponent: Exponent,
    /// Label of the macro relation this was derived from.
    pub relation_type: RelationType,
}

impl fmt::Display for MicroRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}^{}]-> {}",
            self.source,
            self.coefficient,
            self.exponent.as_i32(),
            self.destination
        )
    }
}

/// A micro relation resolved to concrete catalog elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivedRelation {
    /// Process the relation originates from.
    pub source: ProcessId,
    /// Coefficient scaling the relation.
    pub coefficient: CoefficientId,
    /// Process the relation points to.
    pub destination: ProcessId,
    /// Multiply or divide by the coefficient.
    pub exponent: Exponent,
    /// Label of the macro relation this was derived from.
    pub relation_type: RelationType,
}
