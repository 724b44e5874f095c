use thiserror::Error;

/// Errors raised while assembling dimensions, dimension sets and groups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    /// A dimension without keywords describes no axis at all
    #[error("Dimension sets cannot contain an empty dimension")]
    EmptyDimension,

    /// Keywords are identified by a non-empty id
    #[error("Keyword ids must not be empty")]
    EmptyKeyword,
}
