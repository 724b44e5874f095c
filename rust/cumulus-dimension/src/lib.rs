#![warn(missing_docs)]

//! Group and dimension algebra.
//!
//! A [`Group`] describes a family of interchangeable elements: every element
//! is one coordinate of the Cartesian product of the group's
//! [`DimensionSet`], tagged additionally with the group's common keywords.
//! The operations in this crate ([`DimensionSet::union`],
//! [`DimensionSet::is_compatible`], [`HashKey`] and friends) are the building
//! blocks the relation translator uses to join groups of different shapes.

mod error;
pub use error::*;

mod keyword;
pub use keyword::*;

mod dimension;
pub use dimension::*;

mod dimension_set;
pub use dimension_set::*;

mod hash_key;
pub use hash_key::*;

mod group;
pub use group::*;
