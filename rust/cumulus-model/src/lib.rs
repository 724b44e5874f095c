#![warn(missing_docs)]

//! The element-level model of Cumulus.
//!
//! [`Catalog`] is the context object of one calculation run. It owns the
//! concrete processes and coefficients, the elementary flow and impact
//! catalogs, and hands out the indices the calculation engine uses for its
//! matrix rows and columns. Quantities are carried as [`Value`]s, which pair
//! a number with its relative standard uncertainty.

mod error;
pub use error::*;

mod value;
pub use value::*;

mod flow;
pub use flow::*;

mod element;
pub use element::*;

mod catalog;
pub use catalog::*;

mod resolver;
pub use resolver::*;
