use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// A symbol (or one factor of a compound symbol) is not registered
    #[error("Unknown unit \"{0}\"")]
    UnknownUnit(String),

    /// A compound symbol could not be parsed
    #[error("Malformed unit symbol \"{0}\"")]
    MalformedUnit(String),

    /// A unit definition was rejected when registering it
    #[error("Invalid unit definition: {0}")]
    InvalidDefinition(String),
}
