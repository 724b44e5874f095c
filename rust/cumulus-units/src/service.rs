use std::sync::Arc;

use crate::Unit;

/// Everything the translator and the calculation engine need to know about
/// units. Lookups that fail are reported as `None` / `false` so callers can
/// treat them as "incompatible" instead of aborting.
pub trait UnitService {
    /// Factor that converts a quantity in `unit` to the reference unit of its
    /// physical dimension. `None` when the unit is unknown.
    fn conversion_factor(&self, unit: &Unit) -> Option<f64>;

    /// Whether two units measure the same physical dimension.
    fn are_compatible(&self, a: &Unit, b: &Unit) -> bool;

    /// The unit of `a × b^exponent`, or `None` if either operand is unknown.
    fn multiply(&self, a: &Unit, b: &Unit, exponent: i32) -> Option<Unit>;
}

impl<T: UnitService + ?Sized> UnitService for &T {
    fn conversion_factor(&self, unit: &Unit) -> Option<f64> {
        (**self).conversion_factor(unit)
    }

    fn are_compatible(&self, a: &Unit, b: &Unit) -> bool {
        (**self).are_compatible(a, b)
    }

    fn multiply(&self, a: &Unit, b: &Unit, exponent: i32) -> Option<Unit> {
        (**self).multiply(a, b, exponent)
    }
}

impl<T: UnitService + ?Sized> UnitService for Arc<T> {
    fn conversion_factor(&self, unit: &Unit) -> Option<f64> {
        (**self).conversion_factor(unit)
    }

    fn are_compatible(&self, a: &Unit, b: &Unit) -> bool {
        (**self).are_compatible(a, b)
    }

    fn multiply(&self, a: &Unit, b: &Unit, exponent: i32) -> Option<Unit> {
        (**self).multiply(a, b, exponent)
    }
}
