use serde::{Deserialize, Serialize};

/// Default bound on every entry of the last matrix power.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Default number of closure iterations before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// How uncertainty travels through the transitive closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationMode {
    /// Carry uncertainty through every matrix power.
    #[default]
    Full,
    /// Compute the closure on values alone. Flow and impact weight
    /// uncertainties are still applied afterwards.
    ValuesOnly,
}

/// Tuning of the [`crate::CalculationEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationSettings {
    /// The closure stops once every entry of the last matrix power is
    /// smaller than this in absolute value.
    pub threshold: f64,
    /// Hard cap on closure iterations. Hitting it is reported, not fatal.
    pub max_iterations: usize,
    /// See [`PropagationMode`].
    pub propagation: PropagationMode,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            propagation: PropagationMode::default(),
        }
    }
}
