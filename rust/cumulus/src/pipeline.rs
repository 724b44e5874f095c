use cumulus_calculation::{Calculation, CalculationEngine};
use cumulus_dimension::Dimension;
use cumulus_model::{Catalog, CatalogResolver, Process, Value};
use cumulus_relation::{
    DerivedRelation, ResolutionReport, TranslationReport, Translator, resolve_all,
};
use cumulus_units::{Unit, UnitRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{CumulusError, Document, Settings};

/// Runs a [`Document`] from group relations to written-back results.
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
    units: UnitRegistry,
}

/// Everything produced by [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The catalog, with calculated flows and impacts on every process.
    pub catalog: Catalog,
    /// Micro relations and the group relations that failed to load or
    /// translate.
    pub translation: TranslationReport,
    /// Derived relations and the micro relations that failed to resolve.
    pub resolution: ResolutionReport,
    /// Matrices and diagnostics of the calculation.
    pub calculation: Calculation,
}

/// Calculated results of one process, keyed by flow and impact type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Coordinate of the process.
    pub coordinate: Dimension,
    /// Unit of the process.
    pub unit: Unit,
    /// Cumulative elementary flows.
    pub flows: IndexMap<String, Value>,
    /// Impact scores.
    pub impacts: IndexMap<String, Value>,
}

impl Pipeline {
    /// A pipeline resolving units through `units`, extended by the units of
    /// each document it runs.
    pub fn new(settings: Settings, units: UnitRegistry) -> Self {
        Self { settings, units }
    }

    /// The settings this pipeline runs with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads `document`, translates and resolves its relations, and runs
    /// the calculation.
    pub fn run(&self, document: &Document) -> Result<Outcome, CumulusError> {
        let mut units = self.units.clone();
        document.define_units(&mut units)?;

        let model = document.load()?;
        tracing::info!(
            groups = model.groups.len(),
            relations = model.relations.len(),
            unlinked = model.failures.len(),
            processes = model.catalog.process_count(),
            coefficients = model.catalog.coefficient_count(),
            "Loaded document"
        );

        let mut translation = Translator::new(&units).translate_all(&model.relations);
        let mut failures = model.failures;
        failures.append(&mut translation.failures);
        translation.failures = failures;
        tracing::info!(
            micro_relations = translation.relations.len(),
            failed = translation.failures.len(),
            "Translated relations"
        );

        let mut catalog = model.catalog;
        let resolution = {
            let mut resolver = CatalogResolver::new(&mut catalog, self.settings.resolution);
            resolve_all(&mut resolver, &translation.relations)
        };
        tracing::info!(
            derived_relations = resolution.relations.len(),
            failed = resolution.failures.len(),
            processes = catalog.process_count(),
            "Resolved relations"
        );

        let calculation = CalculationEngine::new(self.settings.calculation, &units)
            .run(&mut catalog, &resolution.relations)?;
        tracing::info!(
            iterations = calculation.iterations,
            converged = calculation.converged,
            issues = calculation.issues.len(),
            "Calculated cumulative flows"
        );

        Ok(Outcome {
            catalog,
            translation,
            resolution,
            calculation,
        })
    }
}

impl Outcome {
    /// Relations between concrete elements that went into the calculation.
    pub fn derived_relations(&self) -> &[DerivedRelation] {
        &self.resolution.relations
    }

    /// Whether every relation translated and resolved and nothing was
    /// skipped by the calculation.
    pub fn is_clean(&self) -> bool {
        self.translation.is_clean()
            && self.resolution.is_clean()
            && self.calculation.issues.is_empty()
    }

    /// Results of every process, in catalog order.
    pub fn results(&self) -> Vec<ProcessResult> {
        self.catalog
            .processes()
            .map(|(_, process)| self.result_of(process))
            .collect()
    }

    /// Results of the process at `coordinate`, in any unit.
    pub fn result(&self, coordinate: &Dimension) -> Option<ProcessResult> {
        self.catalog
            .processes()
            .find(|(_, process)| process.coordinate() == coordinate)
            .map(|(_, process)| self.result_of(process))
    }

    fn result_of(&self, process: &Process) -> ProcessResult {
        let flows = process
            .calculated_flows
            .iter()
            .filter_map(|(id, value)| {
                let flow = self.catalog.flow_type(*id)?;
                Some((flow.name.clone(), *value))
            })
            .collect();

        let impacts = process
            .calculated_impacts
            .iter()
            .filter_map(|(id, value)| {
                let impact = self.catalog.impact_type(*id)?;
                Some((impact.name.clone(), *value))
            })
            .collect();

        ProcessResult {
            coordinate: process.coordinate().clone(),
            unit: process.unit().clone(),
            flows,
            impacts,
        }
    }
}
