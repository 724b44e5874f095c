use std::path::Path;

use cumulus_calculation::CalculationSettings;
use cumulus_model::AmbiguityPolicy;
use serde::{Deserialize, Serialize};

use crate::CumulusError;

/// Settings of a [`crate::Pipeline`]. Every field is optional in JSON.
///
/// ```json
/// {
///   "calculation": { "threshold": 0.01, "max_iterations": 500, "propagation": "full" },
///   "resolution": "first"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Closure threshold, iteration cap and uncertainty propagation.
    pub calculation: CalculationSettings,
    /// What to do when a coordinate matches several coefficients.
    pub resolution: AmbiguityPolicy,
}

impl Settings {
    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, CumulusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CumulusError> {
        Self::from_json(&crate::read_to_string(path.as_ref())?)
    }
}
