use std::fmt;

use cumulus_units::Unit;
use serde::{Deserialize, Serialize};

use crate::{Dimension, DimensionSet};

/// What the elements of a group are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Activities that exchange flows and depend on each other.
    Process,
    /// Numeric factors that scale a relation between processes.
    Coefficient,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Process => write!(f, "process"),
            ElementKind::Coefficient => write!(f, "coefficient"),
        }
    }
}

/// A named family of elements.
///
/// The elements are the coordinates of the Cartesian product of the group's
/// dimensions, each tagged with every common keyword. A group is immutable;
/// its coordinates and full dimension set are computed once on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    dimensions: DimensionSet,
    common_keywords: Dimension,
    unit: Unit,
    kind: ElementKind,
    full_dimensions: DimensionSet,
    elements: DimensionSet,
}

impl Group {
    /// Creates a group and expands its coordinates.
    pub fn new(
        name: impl Into<String>,
        dimensions: DimensionSet,
        common_keywords: Dimension,
        unit: Unit,
        kind: ElementKind,
    ) -> Self {
        let full_dimensions = dimensions.with_singletons(&common_keywords);
        let elements = full_dimensions.combinations();

        Self {
            name: name.into(),
            dimensions,
            common_keywords,
            unit,
            kind,
            full_dimensions,
            elements,
        }
    }

    /// Name of the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The authored axes, without common keywords.
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dimensions
    }

    /// Keywords carried by every element.
    pub fn common_keywords(&self) -> &Dimension {
        &self.common_keywords
    }

    /// Unit shared by all elements.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Whether the elements are processes or coefficients.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The authored axes plus one singleton axis per common keyword. This is
    /// the shape used for compatibility checks and unions, so that common
    /// keywords take part in matching like any other tag.
    pub fn full_dimension_set(&self) -> &DimensionSet {
        &self.full_dimensions
    }

    /// One coordinate per element.
    pub fn coordinates(&self) -> &DimensionSet {
        &self.elements
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.full_dimensions, self.unit)
    }
}
