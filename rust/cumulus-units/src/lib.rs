#![warn(missing_docs)]

//! Units for Cumulus.
//!
//! Relations between groups are only meaningful when their units line up, and
//! the calculation engine needs every coefficient expressed against a common
//! basis. Both concerns are served through the [`UnitService`] trait so that a
//! host can plug in whatever units database it already has. [`UnitRegistry`]
//! is a self-contained implementation that understands compound symbols such
//! as `kg.MJ^-1`.

mod error;
pub use error::*;

mod unit;
pub use unit::*;

mod service;
pub use service::*;

mod registry;
pub use registry::*;
