#![warn(missing_docs)]

//! Cumulative calculation.
//!
//! The [`CalculationEngine`] turns the derived relations of a
//! [`cumulus_model::Catalog`] into a dependency matrix, approximates its
//! transitive closure by summing matrix powers until they fade out, and
//! pushes the declared elementary flows of every process through the closure
//! and through the impact weights. The cumulative results are written back
//! onto the processes.
//!
//! Every matrix is an [`UncertainMatrix`], which keeps a relative
//! uncertainty next to each value and combines them with the same laws as
//! [`cumulus_model::Value`].

mod error;
pub use error::*;

mod settings;
pub use settings::*;

mod matrix;
pub use matrix::*;

mod closure;
pub use closure::*;

mod engine;
pub use engine::*;
