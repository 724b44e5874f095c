use cumulus_model::{Value, sum_uncertainty};
use ndarray::{Array2, Zip};

/// A dense matrix of [`Value`]s, stored as one array of central values and
/// one array of relative uncertainties of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertainMatrix {
    values: Array2<f64>,
    uncertainties: Array2<f64>,
}

impl UncertainMatrix {
    /// A `rows × columns` matrix of exact zeros.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self {
            values: Array2::zeros((rows, columns)),
            uncertainties: Array2::zeros((rows, columns)),
        }
    }

    /// The exact `size × size` identity.
    pub fn identity(size: usize) -> Self {
        Self {
            values: Array2::eye(size),
            uncertainties: Array2::zeros((size, size)),
        }
    }

    /// `(rows, columns)`.
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Central values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Relative uncertainties.
    pub fn uncertainties(&self) -> &Array2<f64> {
        &self.uncertainties
    }

    /// The entry at `(row, column)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<Value> {
        let value = self.values.get((row, column))?;
        let uncertainty = self.uncertainties.get((row, column))?;
        Some(Value::new(*value, *uncertainty))
    }

    /// Overwrites the entry at `(row, column)`. Returns `false` when out of
    /// bounds.
    pub fn set(&mut self, row: usize, column: usize, value: Value) -> bool {
        match (
            self.values.get_mut((row, column)),
            self.uncertainties.get_mut((row, column)),
        ) {
            (Some(slot), Some(uncertainty)) => {
                *slot = value.value;
                *uncertainty = value.uncertainty;
                true
            }
            _ => false,
        }
    }

    /// Adds `value` to the entry at `(row, column)` with the addition law.
    /// Returns `false` when out of bounds.
    pub fn accumulate(&mut self, row: usize, column: usize, value: Value) -> bool {
        match self.get(row, column) {
            Some(current) => self.set(row, column, current + value),
            None => false,
        }
    }

    /// The same values with every uncertainty dropped.
    pub fn without_uncertainty(&self) -> Self {
        Self {
            values: self.values.clone(),
            uncertainties: Array2::zeros(self.values.raw_dim()),
        }
    }

    /// Swaps rows and columns.
    pub fn transpose(&self) -> Self {
        Self {
            values: self.values.t().to_owned(),
            uncertainties: self.uncertainties.t().to_owned(),
        }
    }

    /// Whether every central value is strictly below `bound` in absolute
    /// value.
    pub fn is_below(&self, bound: f64) -> bool {
        self.values.iter().all(|value| value.abs() < bound)
    }

    /// Elementwise sum, applying the addition law to every entry.
    ///
    /// Both operands must have the same shape.
    pub fn add(&self, other: &UncertainMatrix) -> UncertainMatrix {
        let values = &self.values + &other.values;
        let squares = self.absolute().mapv(square) + other.absolute().mapv(square);

        Self::from_squares(values, squares)
    }

    /// Matrix product. Every entry is a sum of products, so each term gets the
    /// multiplication law and the terms are then combined with the addition
    /// law.
    ///
    /// The column count of `self` must equal the row count of `other`.
    pub fn dot(&self, other: &UncertainMatrix) -> UncertainMatrix {
        let values = self.values.dot(&other.values);

        // (ab)²(ua² + ub²) = (a·ua)²b² + a²(b·ub)²
        let squares = self
            .absolute()
            .mapv(square)
            .dot(&other.values.mapv(square))
            + self
                .values
                .mapv(square)
                .dot(&other.absolute().mapv(square));

        Self::from_squares(values, squares)
    }

    fn absolute(&self) -> Array2<f64> {
        (&self.values * &self.uncertainties).mapv(f64::abs)
    }

    fn from_squares(values: Array2<f64>, squares: Array2<f64>) -> Self {
        let uncertainties = Zip::from(&values)
            .and(&squares)
            .map_collect(|total, squares| sum_uncertainty(*total, squares.sqrt()));

        Self {
            values,
            uncertainties,
        }
    }
}

fn square(value: f64) -> f64 {
    value * value
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn matrix(entries: &[&[Value]]) -> UncertainMatrix {
        let rows = entries.len();
        let columns = entries.first().map_or(0, |row| row.len());
        let mut matrix = UncertainMatrix::zeros(rows, columns);
        for (row, values) in entries.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                matrix.set(row, column, *value);
            }
        }
        matrix
    }

    #[test]
    fn it_adds_entries_with_the_addition_law() {
        let left = matrix(&[&[Value::new(3.0, 0.1), Value::new(3.0, 0.1)]]);
        let right = matrix(&[&[Value::new(2.0, 0.2), Value::new(-3.0, 0.1)]]);

        let sum = left.add(&right);

        let first = sum.get(0, 0).unwrap_or_default();
        let expected = Value::new(3.0, 0.1) + Value::new(2.0, 0.2);
        assert_eq!(first.value, 5.0);
        assert!(close(first.uncertainty, expected.uncertainty));
        assert_eq!(sum.get(0, 1), Some(Value::ZERO));
    }

    #[test]
    fn it_multiplies_like_summed_value_products() {
        let a = [Value::new(2.0, 0.1), Value::new(0.5, 0.3)];
        let b = [Value::new(4.0, 0.2), Value::new(6.0, 0.0)];

        let left = matrix(&[&a]);
        let right = matrix(&[&[b[0]], &[b[1]]]);

        let product = left.dot(&right).get(0, 0);
        let expected: Value = a.iter().zip(&b).map(|(a, b)| *a * *b).sum();

        let product = product.unwrap_or_default();
        assert!(close(product.value, expected.value));
        assert!(close(product.uncertainty, expected.uncertainty));
    }

    #[test]
    fn it_accumulates_in_place() {
        let mut matrix = UncertainMatrix::zeros(2, 2);
        assert!(matrix.accumulate(1, 0, Value::new(0.5, 0.1)));
        assert!(matrix.accumulate(1, 0, Value::new(0.5, 0.1)));
        assert!(!matrix.accumulate(2, 0, Value::exact(1.0)));

        let entry = matrix.get(1, 0).unwrap_or_default();
        assert_eq!(entry.value, 1.0);
        assert!(close(entry.uncertainty, (2.0 * 0.05f64.powi(2)).sqrt()));
    }

    #[test]
    fn it_keeps_the_identity_exact() {
        let identity = UncertainMatrix::identity(3);
        let other = matrix(&[
            &[Value::new(1.0, 0.1), Value::ZERO, Value::ZERO],
            &[Value::new(2.0, 0.2), Value::exact(1.0), Value::ZERO],
            &[Value::ZERO, Value::ZERO, Value::exact(1.0)],
        ]);

        let product = identity.dot(&other);
        assert_eq!(product.values(), other.values());
        assert!(product
            .uncertainties()
            .iter()
            .zip(other.uncertainties())
            .all(|(a, b)| close(*a, *b)));
        assert_eq!(other.transpose().get(0, 1), Some(Value::new(2.0, 0.2)));
        assert!(other.without_uncertainty().uncertainties().iter().all(|u| *u == 0.0));
    }
}
