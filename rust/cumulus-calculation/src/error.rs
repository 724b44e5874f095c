use cumulus_model::ModelError;
use thiserror::Error;

/// Errors that abort a calculation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    /// There is nothing to calculate
    #[error("The catalog has no processes")]
    NoProcesses,

    /// A relation points at an element the catalog does not hold
    #[error("Relation references an unknown element: {0}")]
    UnknownElement(#[from] ModelError),
}
