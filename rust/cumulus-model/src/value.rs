use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// A quantity with its relative standard uncertainty (a fraction of
/// `value`, so `0.1` means ±10%).
///
/// Sums combine absolute uncertainties in quadrature; products combine
/// relative uncertainties in quadrature. Every matrix operation of the
/// calculation engine is built from these two laws.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Value {
    /// The central value.
    pub value: f64,
    /// Relative standard uncertainty.
    #[serde(default)]
    pub uncertainty: f64,
}

impl Value {
    /// Zero, known exactly.
    pub const ZERO: Value = Value {
        value: 0.0,
        uncertainty: 0.0,
    };

    /// A value with the given relative uncertainty.
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Self { value, uncertainty }
    }

    /// A value known exactly.
    pub fn exact(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// Uncertainty expressed in the unit of the value.
    pub fn absolute_uncertainty(&self) -> f64 {
        (self.value * self.uncertainty).abs()
    }

    /// Whether the central value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Multiplies by an exact constant. The relative uncertainty is kept.
    pub fn scale(self, factor: f64) -> Value {
        Value::new(self.value * factor, self.uncertainty)
    }

    /// `1 / value`, keeping the relative uncertainty. `None` for zero.
    pub fn reciprocal(self) -> Option<Value> {
        if self.is_zero() {
            return None;
        }
        Some(Value::new(1.0 / self.value, self.uncertainty))
    }
}

/// Combines the relative uncertainties of two factors of a product.
pub fn product_uncertainty(first: f64, second: f64) -> f64 {
    if first == 0.0 && second == 0.0 {
        return 0.0;
    }
    first.hypot(second)
}

/// Relative uncertainty of a sum, given its total and the absolute
/// uncertainties of its terms combined in quadrature.
pub fn sum_uncertainty(total: f64, absolute: f64) -> f64 {
    if total.abs() == 0.0 {
        return 0.0;
    }
    absolute / total.abs()
}

impl Add for Value {
    type Output = Value;

    fn add(self, other: Value) -> Value {
        let total = self.value + other.value;
        let absolute = self
            .absolute_uncertainty()
            .hypot(other.absolute_uncertainty());
        Value::new(total, sum_uncertainty(total, absolute))
    }
}

impl AddAssign for Value {
    fn add_assign(&mut self, other: Value) {
        *self = *self + other;
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, other: Value) -> Value {
        Value::new(
            self.value * other.value,
            product_uncertainty(self.uncertainty, other.uncertainty),
        )
    }
}

impl Sum for Value {
    fn sum<I: Iterator<Item = Value>>(iter: I) -> Value {
        // Same as folding with `+`, but partial sums that cancel to zero do
        // not drop the uncertainty of the terms before them.
        let (total, squares) = iter.fold((0.0, 0.0), |(total, squares), term| {
            (
                total + term.value,
                squares + term.absolute_uncertainty().powi(2),
            )
        });
        Value::new(total, sum_uncertainty(total, squares.sqrt()))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::exact(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}%", self.value, self.uncertainty * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn it_adds_absolute_uncertainties_in_quadrature() {
        let sum = Value::new(3.0, 0.1) + Value::new(2.0, 0.2);

        assert_eq!(sum.value, 5.0);
        assert!(close(
            sum.uncertainty,
            ((3.0f64 * 0.1).powi(2) + (2.0f64 * 0.2).powi(2)).sqrt() / 5.0
        ));
    }

    #[test]
    fn it_has_no_uncertainty_when_the_sum_cancels_out() {
        let sum = Value::new(3.0, 0.1) + Value::new(-3.0, 0.1);
        assert_eq!(sum, Value::ZERO);
    }

    #[test]
    fn it_multiplies_relative_uncertainties_in_quadrature() {
        let product = Value::new(2.0, 0.3) * Value::new(4.0, 0.4);

        assert_eq!(product.value, 8.0);
        assert!(close(product.uncertainty, 0.5));
        assert_eq!((Value::exact(2.0) * Value::exact(3.0)).uncertainty, 0.0);
    }

    #[test]
    fn it_sums_like_repeated_addition() {
        let terms = [Value::new(1.0, 0.1), Value::new(2.0, 0.2), Value::new(3.0, 0.0)];
        let summed: Value = terms.iter().copied().sum();
        let folded = terms[0] + terms[1] + terms[2];

        assert!(close(summed.value, folded.value));
        assert!(close(summed.uncertainty, folded.uncertainty));
    }

    #[test]
    fn it_keeps_relative_uncertainty_for_scaling_and_reciprocals() {
        assert_eq!(Value::new(2.0, 0.1).scale(10.0), Value::new(20.0, 0.1));
        assert_eq!(Value::new(4.0, 0.1).reciprocal(), Some(Value::new(0.25, 0.1)));
        assert_eq!(Value::ZERO.reciprocal(), None);
    }
}
