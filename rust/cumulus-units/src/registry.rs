use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{DIMENSIONLESS, Unit, UnitError, UnitService};

/// Exponents of the physical dimensions a unit measures, e.g. `{mass: 1,
/// energy: -1}` for `kg.MJ^-1`. Zero exponents are never stored.
pub type Dimensions = BTreeMap<String, i32>;

/// How a base symbol relates to the reference unit of its dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Multiplier converting one of this unit into the reference unit.
    pub factor: f64,
    /// Physical dimensions measured by this unit.
    #[serde(default)]
    pub dimensions: Dimensions,
}

impl UnitDefinition {
    /// The definition of the dimensionless unit.
    pub fn dimensionless() -> Self {
        Self {
            factor: 1.0,
            dimensions: Dimensions::new(),
        }
    }
}

/// An in-memory [`UnitService`].
///
/// Base symbols are registered with [`UnitRegistry::define`]. Any product of
/// registered symbols can then be used, written as `.`-separated factors with
/// optional integer exponents: `t.km`, `kg.MJ^-1`, `m^2`. `1` is always known
/// and dimensionless.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    definitions: HashMap<String, UnitDefinition>,
}

impl UnitRegistry {
    /// Creates a registry that only knows the dimensionless unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the units that show up most in inventory
    /// data: mass, energy, volume, length, area, time, transport work and
    /// item counts.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let base: [(&str, f64, &[(&str, i32)]); 17] = [
            ("g", 1e-3, &[("mass", 1)]),
            ("kg", 1.0, &[("mass", 1)]),
            ("t", 1e3, &[("mass", 1)]),
            ("J", 1e-6, &[("energy", 1)]),
            ("kJ", 1e-3, &[("energy", 1)]),
            ("MJ", 1.0, &[("energy", 1)]),
            ("GJ", 1e3, &[("energy", 1)]),
            ("kWh", 3.6, &[("energy", 1)]),
            ("l", 1e-3, &[("length", 3)]),
            ("m3", 1.0, &[("length", 3)]),
            ("m", 1.0, &[("length", 1)]),
            ("km", 1e3, &[("length", 1)]),
            ("m2", 1.0, &[("length", 2)]),
            ("s", 1.0, &[("time", 1)]),
            ("h", 3600.0, &[("time", 1)]),
            ("tkm", 1e6, &[("mass", 1), ("length", 1)]),
            ("p", 1.0, &[("count", 1)]),
        ];

        for (symbol, factor, dimensions) in base {
            registry.definitions.insert(
                symbol.to_owned(),
                UnitDefinition {
                    factor,
                    dimensions: dimensions
                        .iter()
                        .map(|(name, power)| ((*name).to_owned(), *power))
                        .collect(),
                },
            );
        }

        registry
    }

    /// Registers (or replaces) a base symbol.
    pub fn define(
        &mut self,
        symbol: impl Into<String>,
        definition: UnitDefinition,
    ) -> Result<&mut Self, UnitError> {
        let symbol = symbol.into();

        if symbol.is_empty()
            || symbol == DIMENSIONLESS
            || symbol.contains(['.', '^'])
            || symbol.chars().any(char::is_whitespace)
        {
            return Err(UnitError::InvalidDefinition(format!(
                "\"{symbol}\" cannot be used as a base unit symbol"
            )));
        }

        if !definition.factor.is_finite() || definition.factor <= 0.0 {
            return Err(UnitError::InvalidDefinition(format!(
                "Unit \"{symbol}\" must have a positive conversion factor, got {}",
                definition.factor
            )));
        }

        let mut definition = definition;
        definition.dimensions.retain(|_, power| *power != 0);
        self.definitions.insert(symbol, definition);

        Ok(self)
    }

    /// Whether `symbol` is a registered base symbol.
    pub fn contains(&self, symbol: &str) -> bool {
        self.definitions.contains_key(symbol)
    }

    /// Resolves a (possibly compound) unit to its combined definition.
    pub fn resolve(&self, unit: &Unit) -> Result<UnitDefinition, UnitError> {
        let mut resolved = UnitDefinition::dimensionless();

        for (symbol, power) in parse_factors(unit.symbol())? {
            let Some(definition) = self.definitions.get(&symbol) else {
                return Err(UnitError::UnknownUnit(symbol));
            };

            resolved.factor *= definition.factor.powi(power);
            for (dimension, exponent) in &definition.dimensions {
                *resolved.dimensions.entry(dimension.clone()).or_default() += exponent * power;
            }
        }

        resolved.dimensions.retain(|_, power| *power != 0);
        Ok(resolved)
    }
}

impl UnitService for UnitRegistry {
    fn conversion_factor(&self, unit: &Unit) -> Option<f64> {
        self.resolve(unit)
            .ok()
            .map(|definition| definition.factor)
            .filter(|factor| factor.is_finite() && *factor > 0.0)
    }

    fn are_compatible(&self, a: &Unit, b: &Unit) -> bool {
        match (self.resolve(a), self.resolve(b)) {
            (Ok(a), Ok(b)) => a.dimensions == b.dimensions,
            _ => false,
        }
    }

    fn multiply(&self, a: &Unit, b: &Unit, exponent: i32) -> Option<Unit> {
        // Both operands must resolve.
        self.resolve(a).ok()?;
        self.resolve(b).ok()?;

        let mut factors = parse_factors(a.symbol()).ok()?;
        for (symbol, power) in parse_factors(b.symbol()).ok()? {
            *factors.entry(symbol).or_default() += power * exponent;
        }
        factors.retain(|_, power| *power != 0);

        Some(Unit::new(render_factors(&factors)))
    }
}

/// Splits a compound symbol into base symbols and their summed exponents.
fn parse_factors(symbol: &str) -> Result<BTreeMap<String, i32>, UnitError> {
    let mut factors = BTreeMap::new();

    if symbol == DIMENSIONLESS {
        return Ok(factors);
    }

    for part in symbol.split('.') {
        let (base, power) = match part.split_once('^') {
            Some((base, power)) => {
                let power = power
                    .parse::<i32>()
                    .map_err(|_| UnitError::MalformedUnit(symbol.to_owned()))?;
                (base, power)
            }
            None => (part, 1),
        };

        if base.is_empty() {
            return Err(UnitError::MalformedUnit(symbol.to_owned()));
        }

        if base == DIMENSIONLESS {
            continue;
        }

        *factors.entry(base.to_owned()).or_insert(0) += power;
    }

    factors.retain(|_, power| *power != 0);
    Ok(factors)
}

fn render_factors(factors: &BTreeMap<String, i32>) -> String {
    if factors.is_empty() {
        return DIMENSIONLESS.to_owned();
    }

    factors
        .iter()
        .map(|(symbol, power)| match power {
            1 => symbol.clone(),
            power => format!("{symbol}^{power}"),
        })
        .collect::<Vec<_>>()
        .join(".")
}
