#![warn(missing_docs)]

//! Cumulus computes cumulative elementary flows and impact scores for
//! families of processes that are described at group level.
//!
//! A [`Document`] states groups of processes and coefficients, the
//! declared flows of individual processes and the relations between groups.
//! The [`Pipeline`] translates every group relation into relations between
//! individual elements, resolves those against the catalog, and runs the
//! calculation engine over the result:
//!
//! ```no_run
//! # fn example(json: &str) -> Result<(), cumulus::CumulusError> {
//! use cumulus::{Document, Pipeline, Settings};
//! use cumulus_units::UnitRegistry;
//!
//! let document = Document::from_json(json)?;
//! let outcome = Pipeline::new(Settings::default(), UnitRegistry::standard()).run(&document)?;
//!
//! for result in outcome.results() {
//!     println!("{} {:?}", result.coordinate, result.flows);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Relations that fail to translate or resolve are collected in the
//! [`Outcome`] reports and do not stop the run.

pub use cumulus_calculation as calculation;
pub use cumulus_dimension as dimension;
pub use cumulus_model as model;
pub use cumulus_relation as relation;
pub use cumulus_units as units;

mod error;
pub use error::*;

mod settings;
pub use settings::*;

mod document;
pub use document::*;

mod pipeline;
pub use pipeline::*;
