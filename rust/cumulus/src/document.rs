use std::path::Path;
use std::sync::Arc;

use cumulus_dimension::{Dimension, DimensionSet, ElementKind, Group, Vocabulary};
use cumulus_model::{Catalog, ModelError, Value};
use cumulus_relation::{
    Exponent, MacroRelation, RelationType, TranslationError, TranslationFailure,
};
use cumulus_units::{Dimensions, Unit, UnitDefinition, UnitRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::CumulusError;

/// An authored description of everything a calculation needs.
///
/// Keywords are plain strings everywhere; they are interned when the
/// document is [loaded](Document::load).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Base units to register on top of the pipeline's units.
    #[serde(default)]
    pub units: Vec<UnitDocument>,
    /// Elementary flow types.
    #[serde(default)]
    pub flow_types: Vec<FlowTypeDocument>,
    /// Impact types and their flow weights.
    #[serde(default)]
    pub impact_types: Vec<ImpactTypeDocument>,
    /// Groups of processes and coefficients.
    #[serde(default)]
    pub groups: Vec<GroupDocument>,
    /// Coefficient values.
    #[serde(default)]
    pub coefficients: Vec<CoefficientDocument>,
    /// Processes with declared flows.
    #[serde(default)]
    pub processes: Vec<ProcessDocument>,
    /// Relations between groups.
    #[serde(default)]
    pub relations: Vec<RelationDocument>,
}

/// A base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDocument {
    /// Base symbol, without `.` or `^`.
    pub symbol: String,
    /// Multiplier into the reference unit of its dimension.
    pub factor: f64,
    /// Physical dimension exponents.
    #[serde(default)]
    pub dimensions: Dimensions,
}

/// An elementary flow type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowTypeDocument {
    /// Unique name.
    pub name: String,
    /// Unit flows of this type are declared in.
    pub unit: Unit,
}

/// An impact type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactTypeDocument {
    /// Unique name.
    pub name: String,
    /// Unit of the score.
    pub unit: Unit,
    /// Weight of each contributing flow type, by name.
    #[serde(default)]
    pub components: IndexMap<String, Value>,
}

/// A group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDocument {
    /// Unique name, referenced by relations.
    pub name: String,
    /// Keywords of each dimension.
    #[serde(default)]
    pub dimensions: Vec<Vec<String>>,
    /// Keywords shared by every element.
    #[serde(default)]
    pub common_keywords: Vec<String>,
    /// Unit of every element.
    pub unit: Unit,
    /// Whether the elements are processes or coefficients.
    pub kind: ElementKind,
}

/// A coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientDocument {
    /// Keywords of its coordinate.
    pub coordinate: Vec<String>,
    /// Unit of the value.
    pub unit: Unit,
    /// The value and its relative uncertainty.
    #[serde(flatten)]
    pub value: Value,
}

/// A process and its declared flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDocument {
    /// Keywords of its coordinate.
    pub coordinate: Vec<String>,
    /// Unit of one unit of activity.
    pub unit: Unit,
    /// Declared flows, by flow type name.
    #[serde(default)]
    pub flows: IndexMap<String, Value>,
}

/// A relation between three groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDocument {
    /// Name used in reports.
    pub name: String,
    /// Name of the source group.
    pub source: String,
    /// Name of the coefficient group.
    pub coefficient: String,
    /// Name of the destination group.
    pub destination: String,
    /// `1` (default) or `-1`.
    #[serde(default)]
    pub exponent: Exponent,
    /// Free-form label, `dependency` by default.
    #[serde(default)]
    pub relation_type: RelationType,
}

/// A [`Document`] turned into the structures the pipeline operates on.
#[derive(Debug, Clone)]
pub struct Model {
    /// Every keyword mentioned by groups, coefficients and processes.
    pub vocabulary: Vocabulary,
    /// Groups by name, in document order.
    pub groups: IndexMap<String, Arc<Group>>,
    /// Declared flow types, impact types, coefficients and processes.
    pub catalog: Catalog,
    /// Relations between groups, in document order.
    pub relations: Vec<MacroRelation>,
    /// Relations left out because they name an undefined group.
    pub failures: Vec<TranslationFailure>,
}

impl Document {
    /// Parses a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, CumulusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CumulusError> {
        Self::from_json(&read_to_string(path.as_ref())?)
    }

    /// Registers the document's units in `registry`.
    pub fn define_units(&self, registry: &mut UnitRegistry) -> Result<(), CumulusError> {
        for unit in &self.units {
            registry.define(
                unit.symbol.clone(),
                UnitDefinition {
                    factor: unit.factor,
                    dimensions: unit.dimensions.clone(),
                },
            )?;
        }
        Ok(())
    }

    /// Builds groups, the catalog and the macro relations.
    ///
    /// A relation naming an undefined group is recorded in
    /// [`Model::failures`] and left out.
    pub fn load(&self) -> Result<Model, CumulusError> {
        let mut vocabulary = Vocabulary::new();
        let mut catalog = Catalog::new();

        for flow_type in &self.flow_types {
            catalog.add_flow_type(flow_type.name.clone(), flow_type.unit.clone())?;
        }

        for impact_type in &self.impact_types {
            catalog.add_impact_type(
                impact_type.name.clone(),
                impact_type.unit.clone(),
                impact_type
                    .components
                    .iter()
                    .map(|(flow, weight)| (flow.as_str(), *weight)),
            )?;
        }

        let mut groups = IndexMap::new();
        for group in &self.groups {
            if groups.contains_key(&group.name) {
                return Err(CumulusError::DuplicateGroup(group.name.clone()));
            }

            let dimensions = group
                .dimensions
                .iter()
                .map(|keywords| intern(&mut vocabulary, keywords))
                .collect::<Result<Vec<_>, _>>()?;

            let loaded = Group::new(
                group.name.clone(),
                DimensionSet::try_from_dimensions(dimensions)?,
                intern(&mut vocabulary, &group.common_keywords)?,
                group.unit.clone(),
                group.kind,
            );
            groups.insert(group.name.clone(), Arc::new(loaded));
        }

        for coefficient in &self.coefficients {
            catalog.add_coefficient(
                intern(&mut vocabulary, &coefficient.coordinate)?,
                coefficient.unit.clone(),
                coefficient.value,
            )?;
        }

        for process in &self.processes {
            let id = catalog.add_process(
                intern(&mut vocabulary, &process.coordinate)?,
                process.unit.clone(),
            );
            for (flow, value) in &process.flows {
                let flow = catalog
                    .flow_type_id(flow)
                    .ok_or_else(|| ModelError::UnknownFlowType(flow.clone()))?;
                catalog.declare_flow(id, flow, *value)?;
            }
        }

        let mut relations = Vec::with_capacity(self.relations.len());
        let mut failures = Vec::new();
        for relation in &self.relations {
            match relation.link(&groups) {
                Ok(loaded) => relations.push(loaded),
                Err(error) => {
                    tracing::warn!(relation = %relation.name, %error, "Skipping relation");
                    failures.push(TranslationFailure {
                        relation: relation.name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(Model {
            vocabulary,
            groups,
            catalog,
            relations,
            failures,
        })
    }
}

impl RelationDocument {
    fn link(
        &self,
        groups: &IndexMap<String, Arc<Group>>,
    ) -> Result<MacroRelation, TranslationError> {
        let group = |name: &String| {
            groups
                .get(name)
                .cloned()
                .ok_or_else(|| TranslationError::UnknownGroup(name.clone()))
        };

        Ok(MacroRelation {
            name: self.name.clone(),
            source: group(&self.source)?,
            coefficient: group(&self.coefficient)?,
            destination: group(&self.destination)?,
            exponent: self.exponent,
            relation_type: self.relation_type.clone(),
        })
    }
}

fn intern(vocabulary: &mut Vocabulary, keywords: &[String]) -> Result<Dimension, CumulusError> {
    keywords
        .iter()
        .map(|keyword| vocabulary.intern(keyword))
        .collect::<Result<Dimension, _>>()
        .map_err(CumulusError::from)
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, CumulusError> {
    std::fs::read_to_string(path).map_err(|source| CumulusError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_dimension::DimensionError;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    const DOCUMENT: &str = r#"{
        "flow_types": [{ "name": "CO2", "unit": "kg" }],
        "groups": [
            {
                "name": "heat",
                "dimensions": [["gas", "oil"]],
                "common_keywords": ["heat"],
                "unit": "MJ",
                "kind": "process"
            },
            {
                "name": "efficiency",
                "dimensions": [["gas", "oil"]],
                "common_keywords": ["efficiency"],
                "unit": "1",
                "kind": "coefficient"
            }
        ],
        "coefficients": [
            { "coordinate": ["efficiency", "gas"], "unit": "1", "value": 0.9, "uncertainty": 0.05 }
        ],
        "processes": [
            { "coordinate": ["heat", "gas"], "unit": "MJ", "flows": { "CO2": { "value": 0.06 } } }
        ],
        "relations": [
            { "name": "boiler", "source": "heat", "coefficient": "efficiency", "destination": "heat", "exponent": -1 }
        ]
    }"#;

    #[test]
    fn it_loads_groups_elements_and_relations() -> TestResult {
        let model = Document::from_json(DOCUMENT)?.load()?;

        assert_eq!(model.groups.len(), 2);
        assert_eq!(model.groups["heat"].coordinates().len(), 2);
        assert_eq!(model.catalog.coefficient_count(), 1);
        assert_eq!(model.catalog.process_count(), 1);

        let relation = &model.relations[0];
        assert_eq!(relation.exponent, Exponent::Inverse);
        assert_eq!(relation.relation_type, RelationType::default());
        assert!(Arc::ptr_eq(&relation.source, &model.groups["heat"]));
        assert!(model.failures.is_empty());

        // "heat", "gas", "oil", "efficiency"
        assert_eq!(model.vocabulary.len(), 4);
        Ok(())
    }

    #[test]
    fn it_skips_relations_to_unknown_groups() -> TestResult {
        let mut document = Document::from_json(DOCUMENT)?;
        document.relations[0].destination = "cooling".to_owned();

        let model = document.load()?;

        assert!(model.relations.is_empty());
        assert_eq!(
            model.failures,
            vec![TranslationFailure {
                relation: "boiler".to_owned(),
                error: TranslationError::UnknownGroup("cooling".to_owned()),
            }]
        );
        Ok(())
    }

    #[test]
    fn it_rejects_empty_dimensions() -> TestResult {
        let mut document = Document::from_json(DOCUMENT)?;
        document.groups[0].dimensions.push(Vec::new());

        assert!(matches!(
            document.load(),
            Err(CumulusError::Dimension(DimensionError::EmptyDimension))
        ));
        Ok(())
    }

    #[test]
    fn it_rejects_flows_of_unknown_types() -> TestResult {
        let mut document = Document::from_json(DOCUMENT)?;
        document.processes[0]
            .flows
            .insert("methane".to_owned(), Value::exact(1.0));

        assert!(matches!(
            document.load(),
            Err(CumulusError::Model(ModelError::UnknownFlowType(flow))) if flow == "methane"
        ));
        Ok(())
    }

    #[test]
    fn it_registers_document_units() -> TestResult {
        let document = Document::from_json(
            r#"{ "units": [{ "symbol": "MWh", "factor": 3600.0, "dimensions": { "energy": 1 } }] }"#,
        )?;
        let mut registry = UnitRegistry::standard();

        document.define_units(&mut registry)?;

        assert!(registry.contains("MWh"));
        Ok(())
    }
}
