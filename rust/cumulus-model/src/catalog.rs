use cumulus_dimension::{Dimension, ElementKind};
use cumulus_units::Unit;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::{
    Coefficient, CoefficientId, ElementKey, ElementaryFlowType, FlowTypeId, ImpactType,
    ImpactTypeId, ModelError, Process, ProcessId, Value,
};

/// Owns every concrete element of one calculation run.
///
/// Elements are stored in insertion order and addressed by dense indices,
/// which double as matrix rows and columns. Nothing is ever removed, so
/// indices stay valid for the lifetime of the catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    processes: IndexMap<ElementKey, Process>,
    coefficients: IndexMap<ElementKey, Coefficient>,
    flow_types: IndexMap<String, ElementaryFlowType>,
    impact_types: IndexMap<String, ImpactType>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an elementary flow type.
    pub fn add_flow_type(
        &mut self,
        name: impl Into<String>,
        unit: Unit,
    ) -> Result<FlowTypeId, ModelError> {
        let name = name.into();
        match self.flow_types.entry(name.clone()) {
            Entry::Occupied(_) => Err(ModelError::DuplicateFlowType(name)),
            Entry::Vacant(entry) => {
                let id = FlowTypeId(entry.index());
                entry.insert(ElementaryFlowType { name, unit });
                Ok(id)
            }
        }
    }

    /// Registers an impact type and the weights of the flows it aggregates.
    pub fn add_impact_type<'a>(
        &mut self,
        name: impl Into<String>,
        unit: Unit,
        components: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<ImpactTypeId, ModelError> {
        let name = name.into();
        if self.impact_types.contains_key(&name) {
            return Err(ModelError::DuplicateImpactType(name));
        }

        let mut weights = IndexMap::new();
        for (flow, weight) in components {
            let id = self
                .flow_type_id(flow)
                .ok_or_else(|| ModelError::UnknownFlowType(flow.to_owned()))?;
            check_value(&weight)?;
            weights.insert(id, weight);
        }

        let (index, _) = self.impact_types.insert_full(
            name.clone(),
            ImpactType {
                name,
                unit,
                components: weights,
            },
        );
        Ok(ImpactTypeId(index))
    }

    /// Returns the process with this coordinate and unit, creating it if
    /// needed.
    pub fn add_process(&mut self, coordinate: Dimension, unit: Unit) -> ProcessId {
        let key = ElementKey::new(coordinate, unit);
        let entry = self.processes.entry(key);
        let id = ProcessId(entry.index());
        if let Entry::Vacant(entry) = entry {
            let key = entry.key().clone();
            entry.insert(Process::new(key));
        }
        id
    }

    /// Declares an elementary flow on a process. Declaring the same flow
    /// twice adds the values.
    pub fn declare_flow(
        &mut self,
        process: ProcessId,
        flow: FlowTypeId,
        value: Value,
    ) -> Result<(), ModelError> {
        if flow.0 >= self.flow_types.len() {
            return Err(ModelError::UnknownFlowType(format!("#{}", flow.0)));
        }
        check_value(&value)?;

        let target = self.process_mut(process)?;
        *target.flows.entry(flow).or_default() += value;
        Ok(())
    }

    /// Registers a coefficient. Coefficients are never created implicitly.
    pub fn add_coefficient(
        &mut self,
        coordinate: Dimension,
        unit: Unit,
        value: Value,
    ) -> Result<CoefficientId, ModelError> {
        check_value(&value)?;

        let key = ElementKey::new(coordinate, unit);
        match self.coefficients.entry(key) {
            Entry::Occupied(entry) => Err(ModelError::DuplicateCoefficient {
                coordinate: entry.key().coordinate.clone(),
                unit: entry.key().unit.clone(),
            }),
            Entry::Vacant(entry) => {
                let id = CoefficientId(entry.index());
                let key = entry.key().clone();
                entry.insert(Coefficient { key, value });
                Ok(id)
            }
        }
    }

    /// Looks up a flow type by name.
    pub fn flow_type_id(&self, name: &str) -> Option<FlowTypeId> {
        self.flow_types.get_index_of(name).map(FlowTypeId)
    }

    /// Looks up an impact type by name.
    pub fn impact_type_id(&self, name: &str) -> Option<ImpactTypeId> {
        self.impact_types.get_index_of(name).map(ImpactTypeId)
    }

    /// Looks up a process by its exact coordinate and unit.
    pub fn find_process(&self, coordinate: &Dimension, unit: &Unit) -> Option<ProcessId> {
        self.processes
            .get_index_of(&ElementKey::new(coordinate.clone(), unit.clone()))
            .map(ProcessId)
    }

    /// Looks up a coefficient by its exact coordinate and unit.
    pub fn find_coefficient(&self, coordinate: &Dimension, unit: &Unit) -> Option<CoefficientId> {
        self.coefficients
            .get_index_of(&ElementKey::new(coordinate.clone(), unit.clone()))
            .map(CoefficientId)
    }

    /// Coefficients in `unit` whose coordinate contains every keyword of
    /// `coordinate`, in insertion order.
    pub fn coefficients_covering<'a>(
        &'a self,
        coordinate: &'a Dimension,
        unit: &'a Unit,
    ) -> impl Iterator<Item = CoefficientId> + 'a {
        self.coefficients
            .values()
            .enumerate()
            .filter(move |(_, coefficient)| {
                coefficient.unit() == unit && coordinate.is_subset(coefficient.coordinate())
            })
            .map(|(index, _)| CoefficientId(index))
    }

    /// The process at `id`.
    pub fn process(&self, id: ProcessId) -> Result<&Process, ModelError> {
        self.processes
            .get_index(id.0)
            .map(|(_, process)| process)
            .ok_or(ModelError::UnknownElement {
                kind: ElementKind::Process,
                index: id.0,
            })
    }

    /// The process at `id`, mutably.
    pub fn process_mut(&mut self, id: ProcessId) -> Result<&mut Process, ModelError> {
        self.processes
            .get_index_mut(id.0)
            .map(|(_, process)| process)
            .ok_or(ModelError::UnknownElement {
                kind: ElementKind::Process,
                index: id.0,
            })
    }

    /// The coefficient at `id`.
    pub fn coefficient(&self, id: CoefficientId) -> Result<&Coefficient, ModelError> {
        self.coefficients
            .get_index(id.0)
            .map(|(_, coefficient)| coefficient)
            .ok_or(ModelError::UnknownElement {
                kind: ElementKind::Coefficient,
                index: id.0,
            })
    }

    /// The flow type at `id`.
    pub fn flow_type(&self, id: FlowTypeId) -> Option<&ElementaryFlowType> {
        self.flow_types.get_index(id.0).map(|(_, flow)| flow)
    }

    /// The impact type at `id`.
    pub fn impact_type(&self, id: ImpactTypeId) -> Option<&ImpactType> {
        self.impact_types.get_index(id.0).map(|(_, impact)| impact)
    }

    /// All processes with their ids.
    pub fn processes(&self) -> impl Iterator<Item = (ProcessId, &Process)> {
        self.processes
            .values()
            .enumerate()
            .map(|(index, process)| (ProcessId(index), process))
    }

    /// All processes, mutably.
    pub fn processes_mut(&mut self) -> impl Iterator<Item = (ProcessId, &mut Process)> {
        self.processes
            .values_mut()
            .enumerate()
            .map(|(index, process)| (ProcessId(index), process))
    }

    /// All coefficients with their ids.
    pub fn coefficients(&self) -> impl Iterator<Item = (CoefficientId, &Coefficient)> {
        self.coefficients
            .values()
            .enumerate()
            .map(|(index, coefficient)| (CoefficientId(index), coefficient))
    }

    /// All flow types with their ids.
    pub fn flow_types(&self) -> impl Iterator<Item = (FlowTypeId, &ElementaryFlowType)> {
        self.flow_types
            .values()
            .enumerate()
            .map(|(index, flow)| (FlowTypeId(index), flow))
    }

    /// All impact types with their ids.
    pub fn impact_types(&self) -> impl Iterator<Item = (ImpactTypeId, &ImpactType)> {
        self.impact_types
            .values()
            .enumerate()
            .map(|(index, impact)| (ImpactTypeId(index), impact))
    }

    /// Number of processes.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Number of coefficients.
    pub fn coefficient_count(&self) -> usize {
        self.coefficients.len()
    }

    /// Number of flow types.
    pub fn flow_type_count(&self) -> usize {
        self.flow_types.len()
    }

    /// Number of impact types.
    pub fn impact_type_count(&self) -> usize {
        self.impact_types.len()
    }
}

fn check_value(value: &Value) -> Result<(), ModelError> {
    if !value.value.is_finite() || !value.uncertainty.is_finite() || value.uncertainty < 0.0 {
        return Err(ModelError::InvalidValue(format!(
            "{value} is not a finite value with a non-negative uncertainty"
        )));
    }
    Ok(())
}
