use cumulus_units::Unit;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Index of an [`ElementaryFlowType`] in its [`crate::Catalog`]. Also the
/// column of the flow in the ecological matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowTypeId(pub usize);

/// Index of an [`ImpactType`] in its [`crate::Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpactTypeId(pub usize);

/// A raw physical exchange such as an emission or a resource use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementaryFlowType {
    /// Unique name.
    pub name: String,
    /// Unit the flow is declared in.
    pub unit: Unit,
}

/// A scored category that aggregates elementary flows, e.g. climate change
/// expressed in kg CO2-eq.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactType {
    /// Unique name.
    pub name: String,
    /// Unit of the score.
    pub unit: Unit,
    /// Weight of each contributing flow.
    pub components: IndexMap<FlowTypeId, Value>,
}

impl ImpactType {
    /// Weight of `flow` in this impact, if it contributes.
    pub fn weight(&self, flow: FlowTypeId) -> Option<&Value> {
        self.components.get(&flow)
    }
}
