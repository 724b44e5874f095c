use cumulus_calculation::CalculationError;
use cumulus_dimension::DimensionError;
use cumulus_model::ModelError;
use cumulus_units::UnitError;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum CumulusError {
    /// A document or settings file could not be read
    #[error("Could not read {path}: {source}")]
    Io {
        /// The file.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A document or settings file is not valid JSON for its schema
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two groups share a name
    #[error("Group \"{0}\" is defined more than once")]
    DuplicateGroup(String),

    /// Invalid dimensions or keywords
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// Invalid unit definitions
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Invalid flows, impacts, coefficients or processes
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The calculation could not run
    #[error(transparent)]
    Calculation(#[from] CalculationError),
}
