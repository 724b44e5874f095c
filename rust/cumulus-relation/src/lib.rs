#![warn(missing_docs)]

//! Relation translation.
//!
//! Authors state relations between whole groups: "every electricity mix
//! depends on the production technologies of its country, weighted by their
//! share". A [`MacroRelation`] captures one such statement between a source,
//! a coefficient and a destination group. The [`Translator`] expands it into
//! the [`MicroRelation`]s between individual coordinates, and
//! [`resolve_all`] maps those onto concrete catalog elements as
//! [`DerivedRelation`]s for the calculation engine.
//!
//! The expansion is a hash join. Each coordinate is reduced to a
//! [`cumulus_dimension::HashKey`] over the keywords two shapes share, and
//! only coordinates with equal keys are paired. Depending on how the shapes
//! of the three groups overlap, the same join yields one-to-one matches,
//! aggregations, projections, restricted subsets or full cross products.

mod error;
pub use error::*;

mod relation;
pub use relation::*;

mod translator;
pub use translator::*;

mod resolution;
pub use resolution::*;
