use cumulus_dimension::{Dimension, ElementKind};
use cumulus_units::Unit;
use thiserror::Error;

/// Errors raised while populating a [`crate::Catalog`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Flow type names are unique
    #[error("Elementary flow type \"{0}\" is already defined")]
    DuplicateFlowType(String),

    /// Impact type names are unique
    #[error("Impact type \"{0}\" is already defined")]
    DuplicateImpactType(String),

    /// A coefficient is identified by its coordinate and unit
    #[error("Coefficient {coordinate} ({unit}) is already defined")]
    DuplicateCoefficient {
        /// Coordinate of both coefficients.
        coordinate: Dimension,
        /// Unit of both coefficients.
        unit: Unit,
    },

    /// A flow type was referenced before being defined
    #[error("Unknown elementary flow type \"{0}\"")]
    UnknownFlowType(String),

    /// An element index does not belong to this catalog
    #[error("Unknown {kind} #{index}")]
    UnknownElement {
        /// Kind of the element.
        kind: ElementKind,
        /// Its index.
        index: usize,
    },

    /// Uncertainties are relative and cannot be negative
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors raised when a coordinate cannot be mapped to exactly one element
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// No element carries the requested coordinate and unit
    #[error("No {kind} found for {coordinate} ({unit})")]
    NoElementFound {
        /// Kind that was requested.
        kind: ElementKind,
        /// Requested coordinate.
        coordinate: Dimension,
        /// Requested unit.
        unit: Unit,
    },

    /// More than one element matches and the policy forbids picking one
    #[error("{candidates} elements of kind {kind} match {coordinate} ({unit})")]
    MultipleElementsFound {
        /// Kind that was requested.
        kind: ElementKind,
        /// Requested coordinate.
        coordinate: Dimension,
        /// Requested unit.
        unit: Unit,
        /// How many elements matched.
        candidates: usize,
    },

    /// A resolver answered with an element of the wrong kind
    #[error("Expected a {expected} but the resolver returned a {found}")]
    KindMismatch {
        /// Kind that was requested.
        expected: ElementKind,
        /// Kind of the returned element.
        found: ElementKind,
    },
}
