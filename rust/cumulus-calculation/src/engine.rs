use std::fmt;

use cumulus_model::{Catalog, CoefficientId, FlowTypeId, ImpactTypeId, ProcessId, Value};
use cumulus_relation::{DerivedRelation, Exponent};
use cumulus_units::{Unit, UnitService};

use crate::{
    CalculationError, CalculationSettings, PropagationMode, UncertainMatrix, transitive_closure,
};

/// Something the engine left out of a run without failing it.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationIssue {
    /// The coefficient unit has no conversion factor, so the relation was
    /// not added to the dependency matrix.
    UnknownCoefficientUnit {
        /// The coefficient of the relation.
        coefficient: CoefficientId,
        /// Its unit.
        unit: Unit,
    },
    /// An inverse relation over a coefficient of zero.
    ZeroInverseCoefficient {
        /// The coefficient of the relation.
        coefficient: CoefficientId,
        /// Source of the relation.
        source: ProcessId,
        /// Destination of the relation.
        destination: ProcessId,
    },
    /// The process unit has no conversion factor, so no result was written
    /// back onto it.
    UnknownProcessUnit {
        /// The process.
        process: ProcessId,
        /// Its unit.
        unit: Unit,
    },
}

impl fmt::Display for CalculationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationIssue::UnknownCoefficientUnit { coefficient, unit } => write!(
                f,
                "Coefficient #{} has unit {unit} without a conversion factor",
                coefficient.0
            ),
            CalculationIssue::ZeroInverseCoefficient {
                coefficient,
                source,
                destination,
            } => write!(
                f,
                "Relation #{} -> #{} divides by coefficient #{} which is zero",
                source.0, destination.0, coefficient.0
            ),
            CalculationIssue::UnknownProcessUnit { process, unit } => write!(
                f,
                "Process #{} has unit {unit} without a conversion factor",
                process.0
            ),
        }
    }
}

/// Everything computed by one [`CalculationEngine::run`].
///
/// Rows are processes, columns are flow types (for `cumulative_flows`) or
/// impact types (for `impacts`), all indexed like the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    /// Direct and indirect dependency weights, `[destination][source]`.
    pub transitive: UncertainMatrix,
    /// Cumulative elementary flows per process, before unit conversion.
    pub cumulative_flows: UncertainMatrix,
    /// Impact scores per process, before unit conversion.
    pub impacts: UncertainMatrix,
    /// Closure iterations that were run.
    pub iterations: usize,
    /// Whether the closure converged before the iteration cap.
    pub converged: bool,
    /// Relations and processes that were skipped.
    pub issues: Vec<CalculationIssue>,
}

impl Calculation {
    /// Cumulative value of `flow` for `process`.
    pub fn cumulative_flow(&self, process: ProcessId, flow: FlowTypeId) -> Option<Value> {
        self.cumulative_flows.get(process.0, flow.0)
    }

    /// Score of `impact` for `process`.
    pub fn impact(&self, process: ProcessId, impact: ImpactTypeId) -> Option<Value> {
        self.impacts.get(process.0, impact.0)
    }

    /// Combined weight of every dependency path from `source` to
    /// `destination`.
    pub fn dependency(&self, source: ProcessId, destination: ProcessId) -> Option<Value> {
        self.transitive.get(destination.0, source.0)
    }
}

/// Computes cumulative flows and impacts for every process of a catalog.
#[derive(Debug, Clone)]
pub struct CalculationEngine<U> {
    settings: CalculationSettings,
    units: U,
}

impl<U: UnitService> CalculationEngine<U> {
    /// An engine converting units through `units`.
    pub fn new(settings: CalculationSettings, units: U) -> Self {
        Self { settings, units }
    }

    /// The settings this engine runs with.
    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Runs the calculation and writes the results back onto the processes
    /// of `catalog`, replacing earlier results.
    pub fn run(
        &self,
        catalog: &mut Catalog,
        relations: &[DerivedRelation],
    ) -> Result<Calculation, CalculationError> {
        if catalog.process_count() == 0 {
            return Err(CalculationError::NoProcesses);
        }

        for relation in relations {
            catalog.process(relation.source)?;
            catalog.process(relation.destination)?;
            catalog.coefficient(relation.coefficient)?;
        }

        let mut issues = Vec::new();

        let ecological = ecological_matrix(catalog);
        let weights = impact_weights(catalog);
        let dependencies = self.dependency_matrix(catalog, relations, &mut issues)?;

        tracing::debug!(
            processes = catalog.process_count(),
            flow_types = catalog.flow_type_count(),
            impact_types = catalog.impact_type_count(),
            relations = relations.len(),
            "Built calculation matrices"
        );

        let dependencies = match self.settings.propagation {
            PropagationMode::Full => dependencies,
            PropagationMode::ValuesOnly => dependencies.without_uncertainty(),
        };

        let closure = transitive_closure(
            &dependencies,
            self.settings.threshold,
            self.settings.max_iterations,
        );

        let cumulative_flows = closure.matrix.dot(&ecological);
        let impacts = cumulative_flows.dot(&weights.transpose());

        self.write_back(catalog, &cumulative_flows, &impacts, &mut issues);

        for issue in &issues {
            tracing::warn!(%issue, "Calculation issue");
        }

        Ok(Calculation {
            transitive: closure.matrix,
            cumulative_flows,
            impacts,
            iterations: closure.iterations,
            converged: closure.converged,
            issues,
        })
    }

    fn dependency_matrix(
        &self,
        catalog: &Catalog,
        relations: &[DerivedRelation],
        issues: &mut Vec<CalculationIssue>,
    ) -> Result<UncertainMatrix, CalculationError> {
        let size = catalog.process_count();
        let mut dependencies = UncertainMatrix::zeros(size, size);

        for relation in relations {
            let coefficient = catalog.coefficient(relation.coefficient)?;

            let Some(factor) = self.units.conversion_factor(coefficient.unit()) else {
                issues.push(CalculationIssue::UnknownCoefficientUnit {
                    coefficient: relation.coefficient,
                    unit: coefficient.unit().clone(),
                });
                continue;
            };

            let value = coefficient.value.scale(factor);
            let value = match relation.exponent {
                Exponent::Direct => value,
                Exponent::Inverse => match value.reciprocal() {
                    Some(value) => value,
                    None => {
                        issues.push(CalculationIssue::ZeroInverseCoefficient {
                            coefficient: relation.coefficient,
                            source: relation.source,
                            destination: relation.destination,
                        });
                        continue;
                    }
                },
            };

            dependencies.accumulate(relation.destination.0, relation.source.0, value);
        }

        Ok(dependencies)
    }

    fn write_back(
        &self,
        catalog: &mut Catalog,
        cumulative_flows: &UncertainMatrix,
        impacts: &UncertainMatrix,
        issues: &mut Vec<CalculationIssue>,
    ) {
        let (_, flow_types) = cumulative_flows.dim();
        let (_, impact_types) = impacts.dim();

        for (id, process) in catalog.processes_mut() {
            process.clear_calculated();

            let Some(factor) = self.units.conversion_factor(process.unit()) else {
                issues.push(CalculationIssue::UnknownProcessUnit {
                    process: id,
                    unit: process.unit().clone(),
                });
                continue;
            };

            for flow in 0..flow_types {
                if let Some(value) = cumulative_flows.get(id.0, flow).filter(|v| !v.is_zero()) {
                    process
                        .calculated_flows
                        .insert(FlowTypeId(flow), value.scale(factor));
                }
            }

            for impact in 0..impact_types {
                if let Some(value) = impacts.get(id.0, impact).filter(|v| !v.is_zero()) {
                    process
                        .calculated_impacts
                        .insert(ImpactTypeId(impact), value.scale(factor));
                }
            }
        }
    }
}

/// Declared flows, one row per process and one column per flow type.
fn ecological_matrix(catalog: &Catalog) -> UncertainMatrix {
    let mut matrix = UncertainMatrix::zeros(catalog.process_count(), catalog.flow_type_count());
    for (id, process) in catalog.processes() {
        for (flow, value) in &process.flows {
            matrix.set(id.0, flow.0, *value);
        }
    }
    matrix
}

/// Flow weights, one row per impact type and one column per flow type.
fn impact_weights(catalog: &Catalog) -> UncertainMatrix {
    let mut matrix = UncertainMatrix::zeros(catalog.impact_type_count(), catalog.flow_type_count());
    for (id, impact) in catalog.impact_types() {
        for (flow, weight) in &impact.components {
            matrix.set(id.0, flow.0, *weight);
        }
    }
    matrix
}
