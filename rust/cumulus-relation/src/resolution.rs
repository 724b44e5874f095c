use cumulus_dimension::{Dimension, ElementKind};
use cumulus_model::{CoefficientId, ElementId, ElementResolver, ProcessId, ResolveError};
use cumulus_units::Unit;

use crate::{DerivedRelation, MicroRelation};

/// A micro relation whose elements could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionFailure {
    /// The relation that was skipped.
    pub relation: MicroRelation,
    /// Why it was skipped.
    pub error: ResolveError,
}

/// Outcome of resolving a batch of micro relations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    /// Relations between concrete elements, in input order.
    pub relations: Vec<DerivedRelation>,
    /// One entry per relation that was skipped.
    pub failures: Vec<ResolutionFailure>,
}

impl ResolutionReport {
    /// Whether every relation resolved.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolves the three sides of `relation`.
///
/// The coefficient is resolved first so that a relation without a
/// coefficient does not leave freshly created processes behind.
pub fn resolve_relation<R>(
    resolver: &mut R,
    relation: &MicroRelation,
) -> Result<DerivedRelation, ResolveError>
where
    R: ElementResolver + ?Sized,
{
    let coefficient = resolve_coefficient(
        resolver,
        &relation.coefficient,
        &relation.units.coefficient,
    )?;
    let source = resolve_process(resolver, &relation.source, &relation.units.source)?;
    let destination = resolve_process(
        resolver,
        &relation.destination,
        &relation.units.destination,
    )?;

    Ok(DerivedRelation {
        source,
        coefficient,
        destination,
        exponent: relation.exponent,
        relation_type: relation.relation_type.clone(),
    })
}

/// Resolves every relation independently. Failures are collected and logged
/// and do not stop the batch.
pub fn resolve_all<'a, R>(
    resolver: &mut R,
    relations: impl IntoIterator<Item = &'a MicroRelation>,
) -> ResolutionReport
where
    R: ElementResolver + ?Sized,
{
    let mut report = ResolutionReport::default();

    for relation in relations {
        match resolve_relation(resolver, relation) {
            Ok(derived) => report.relations.push(derived),
            Err(error) => {
                tracing::warn!(%relation, %error, "Skipping unresolved relation");
                report.failures.push(ResolutionFailure {
                    relation: relation.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        resolved = report.relations.len(),
        skipped = report.failures.len(),
        "Resolved micro relations"
    );

    report
}

fn resolve_process<R>(
    resolver: &mut R,
    coordinate: &Dimension,
    unit: &Unit,
) -> Result<ProcessId, ResolveError>
where
    R: ElementResolver + ?Sized,
{
    match resolver.resolve(coordinate, unit, ElementKind::Process)? {
        ElementId::Process(id) => Ok(id),
        ElementId::Coefficient(_) => Err(ResolveError::KindMismatch {
            expected: ElementKind::Process,
            found: ElementKind::Coefficient,
        }),
    }
}

fn resolve_coefficient<R>(
    resolver: &mut R,
    coordinate: &Dimension,
    unit: &Unit,
) -> Result<CoefficientId, ResolveError>
where
    R: ElementResolver + ?Sized,
{
    match resolver.resolve(coordinate, unit, ElementKind::Coefficient)? {
        ElementId::Coefficient(id) => Ok(id),
        ElementId::Process(_) => Err(ResolveError::KindMismatch {
            expected: ElementKind::Coefficient,
            found: ElementKind::Process,
        }),
    }
}
