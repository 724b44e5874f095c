use cumulus_dimension::{DimensionSet, ElementKind};
use cumulus_units::Unit;
use thiserror::Error;

use crate::Side;

/// Reasons a macro relation cannot be translated. Each error only affects the
/// relation it was raised for.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Matching the two shapes would be ambiguous
    #[error("Incompatible dimension sets: {left} {left_shape} and {right} {right_shape}")]
    IncompatibleDimSet {
        /// Role of the first group.
        left: Side,
        /// Shape of the first group.
        left_shape: DimensionSet,
        /// Role of the second group.
        right: Side,
        /// Shape of the second group.
        right_shape: DimensionSet,
    },

    /// The source unit does not match destination × coefficient^exponent
    #[error(
        "Incompatible units: source is {source_unit}, destination {destination} × coefficient {coefficient}^{exponent} is not"
    )]
    IncompatibleUnits {
        /// Unit of the source group.
        source_unit: Unit,
        /// Unit of the destination group.
        destination: Unit,
        /// Unit of the coefficient group.
        coefficient: Unit,
        /// `1` or `-1`.
        exponent: i32,
    },

    /// A group plays a role its elements cannot fill
    #[error("Group \"{group}\" is a {found} group and cannot be used as {side}, which needs a {expected} group")]
    MisplacedGroup {
        /// Name of the group.
        group: String,
        /// Role it was given.
        side: Side,
        /// Kind the role needs.
        expected: ElementKind,
        /// Kind of the group's elements.
        found: ElementKind,
    },

    /// The relation names a group that is not defined
    #[error("Unknown group \"{0}\"")]
    UnknownGroup(String),
}
