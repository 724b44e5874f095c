use cumulus_dimension::{Dimension, ElementKind};
use cumulus_units::Unit;
use serde::{Deserialize, Serialize};

use crate::{Catalog, ElementId, ResolveError};

/// What to do when a coordinate matches several coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityPolicy {
    /// Fail the resolution with [`ResolveError::MultipleElementsFound`].
    #[default]
    Reject,
    /// Use the first candidate in catalog order and log a warning.
    First,
}

/// Maps the coordinate of one side of a micro relation to a concrete
/// element.
pub trait ElementResolver {
    /// Returns the unique element of `kind` identified by `coordinate` and
    /// `unit`. Processes are created when missing; coefficients must exist.
    fn resolve(
        &mut self,
        coordinate: &Dimension,
        unit: &Unit,
        kind: ElementKind,
    ) -> Result<ElementId, ResolveError>;
}

/// [`ElementResolver`] backed by a [`Catalog`].
///
/// Coefficients are looked up by exact coordinate first. Otherwise every
/// coefficient in the same unit whose coordinate contains the requested
/// keywords is a candidate.
#[derive(Debug)]
pub struct CatalogResolver<'a> {
    catalog: &'a mut Catalog,
    policy: AmbiguityPolicy,
}

impl<'a> CatalogResolver<'a> {
    /// Resolves against `catalog` using `policy` for ambiguous coefficients.
    pub fn new(catalog: &'a mut Catalog, policy: AmbiguityPolicy) -> Self {
        Self { catalog, policy }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }
}

impl ElementResolver for CatalogResolver<'_> {
    fn resolve(
        &mut self,
        coordinate: &Dimension,
        unit: &Unit,
        kind: ElementKind,
    ) -> Result<ElementId, ResolveError> {
        match kind {
            ElementKind::Process => Ok(ElementId::Process(
                self.catalog.add_process(coordinate.clone(), unit.clone()),
            )),
            ElementKind::Coefficient => {
                if let Some(id) = self.catalog.find_coefficient(coordinate, unit) {
                    return Ok(ElementId::Coefficient(id));
                }

                let candidates: Vec<_> =
                    self.catalog.coefficients_covering(coordinate, unit).collect();

                match (candidates.as_slice(), self.policy) {
                    ([], _) => Err(ResolveError::NoElementFound {
                        kind,
                        coordinate: coordinate.clone(),
                        unit: unit.clone(),
                    }),
                    ([only], _) => Ok(ElementId::Coefficient(*only)),
                    ([first, ..], AmbiguityPolicy::First) => {
                        tracing::warn!(
                            %coordinate,
                            %unit,
                            candidates = candidates.len(),
                            "Coordinate matches several coefficients, using the first one"
                        );
                        Ok(ElementId::Coefficient(*first))
                    }
                    (_, AmbiguityPolicy::Reject) => Err(ResolveError::MultipleElementsFound {
                        kind,
                        coordinate: coordinate.clone(),
                        unit: unit.clone(),
                        candidates: candidates.len(),
                    }),
                }
            }
        }
    }
}
