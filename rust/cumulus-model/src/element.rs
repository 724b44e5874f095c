use std::collections::BTreeMap;

use cumulus_dimension::Dimension;
use cumulus_units::Unit;
use serde::{Deserialize, Serialize};

use crate::{FlowTypeId, ImpactTypeId, Value};

/// Index of a [`Process`] in its [`crate::Catalog`]. Also its row in every
/// matrix built by the calculation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

/// Index of a [`Coefficient`] in its [`crate::Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientId(pub usize);

/// A resolved element of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// A process.
    Process(ProcessId),
    /// A coefficient.
    Coefficient(CoefficientId),
}

/// Identity of a single element: its coordinate and its unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementKey {
    /// One keyword per axis of the group the element belongs to.
    pub coordinate: Dimension,
    /// Unit of the element.
    pub unit: Unit,
}

impl ElementKey {
    /// Creates a key.
    pub fn new(coordinate: Dimension, unit: Unit) -> Self {
        Self { coordinate, unit }
    }
}

/// An activity with declared elementary flows. After a calculation run it
/// also carries its cumulative flows and impacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Coordinate and unit.
    pub key: ElementKey,
    /// Flows declared directly on this process, per unit of the process.
    pub flows: BTreeMap<FlowTypeId, Value>,
    /// Cumulative flows written back by the calculation engine.
    #[serde(default)]
    pub calculated_flows: BTreeMap<FlowTypeId, Value>,
    /// Impact scores written back by the calculation engine.
    #[serde(default)]
    pub calculated_impacts: BTreeMap<ImpactTypeId, Value>,
}

impl Process {
    /// A process without flows.
    pub fn new(key: ElementKey) -> Self {
        Self {
            key,
            flows: BTreeMap::new(),
            calculated_flows: BTreeMap::new(),
            calculated_impacts: BTreeMap::new(),
        }
    }

    /// Coordinate of this process.
    pub fn coordinate(&self) -> &Dimension {
        &self.key.coordinate
    }

    /// Unit of this process.
    pub fn unit(&self) -> &Unit {
        &self.key.unit
    }

    /// Forgets the results of a previous calculation.
    pub fn clear_calculated(&mut self) {
        self.calculated_flows.clear();
        self.calculated_impacts.clear();
    }
}

/// A numeric factor scaling the relations it takes part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Coordinate and unit.
    pub key: ElementKey,
    /// The factor.
    pub value: Value,
}

impl Coefficient {
    /// Coordinate of this coefficient.
    pub fn coordinate(&self) -> &Dimension {
        &self.key.coordinate
    }

    /// Unit of this coefficient.
    pub fn unit(&self) -> &Unit {
        &self.key.unit
    }
}
