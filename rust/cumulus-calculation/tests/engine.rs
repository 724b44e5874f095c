use cumulus_calculation::{CalculationEngine, CalculationSettings, PropagationMode};
use cumulus_dimension::{Dimension, Keyword};
use cumulus_model::{Catalog, CoefficientId, FlowTypeId, ImpactTypeId, ProcessId, Value};
use cumulus_relation::{DerivedRelation, Exponent, RelationType};
use cumulus_units::{Unit, UnitRegistry};
use pretty_assertions::assert_eq;
use testresult::TestResult;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn dimension(ids: &[&str]) -> Dimension {
    ids.iter().map(|id| Keyword::new(id)).collect()
}

/// Coal power: burning a kilogram of coal emits 2 kg of CO2, and a kWh of
/// power burns 0.4 kg of coal. A wind farm stands on its own.
struct Scenario {
    catalog: Catalog,
    relations: Vec<DerivedRelation>,
    coal: ProcessId,
    power: ProcessId,
    wind: ProcessId,
    co2: FlowTypeId,
    water: FlowTypeId,
    climate: ImpactTypeId,
}

fn scenario() -> Result<Scenario, cumulus_model::ModelError> {
    let mut catalog = Catalog::new();

    let co2 = catalog.add_flow_type("CO2", Unit::new("kg"))?;
    let water = catalog.add_flow_type("water", Unit::new("m3"))?;
    let climate = catalog.add_impact_type(
        "climate change",
        Unit::new("kg"),
        [("CO2", Value::exact(1.0))],
    )?;

    let coal = catalog.add_process(dimension(&["coal"]), Unit::new("kg"));
    let power = catalog.add_process(dimension(&["power", "coal"]), Unit::new("kWh"));
    let wind = catalog.add_process(dimension(&["power", "wind"]), Unit::new("kWh"));
    catalog.declare_flow(coal, co2, Value::new(2.0, 0.1))?;

    let intensity: CoefficientId = catalog.add_coefficient(
        dimension(&["intensity", "coal"]),
        Unit::new("kg.kWh^-1"),
        Value::new(0.4, 0.05),
    )?;

    let relations = vec![DerivedRelation {
        source: coal,
        coefficient: intensity,
        destination: power,
        exponent: Exponent::Direct,
        relation_type: RelationType::default(),
    }];

    Ok(Scenario {
        catalog,
        relations,
        coal,
        power,
        wind,
        co2,
        water,
        climate,
    })
}

#[test_log::test]
fn it_builds_the_closure_of_a_two_process_chain() -> TestResult {
    let mut scenario = scenario()?;
    let engine = CalculationEngine::new(CalculationSettings::default(), UnitRegistry::standard());

    let calculation = engine.run(&mut scenario.catalog, &scenario.relations)?;

    // kg of coal per MJ of power
    let weight = 0.4 / 3.6;
    let transitive = calculation.transitive.values();
    assert_eq!(transitive[[0, 0]], 1.0);
    assert_eq!(transitive[[0, 1]], 0.0);
    assert!(close(transitive[[1, 0]], weight));
    assert_eq!(transitive[[1, 1]], 1.0);
    assert_eq!(transitive[[2, 2]], 1.0);

    assert!(calculation.converged);
    assert!(calculation.issues.is_empty());
    Ok(())
}

#[test_log::test]
fn it_writes_back_converted_flows_and_impacts() -> TestResult {
    let mut scenario = scenario()?;
    let engine = CalculationEngine::new(CalculationSettings::default(), UnitRegistry::standard());

    engine.run(&mut scenario.catalog, &scenario.relations)?;

    let coal = scenario.catalog.process(scenario.coal)?;
    let direct = coal.calculated_flows[&scenario.co2];
    assert_eq!(direct.value, 2.0);
    assert!(close(direct.uncertainty, 0.1));

    let power = scenario.catalog.process(scenario.power)?;
    let emitted = power.calculated_flows[&scenario.co2];
    assert!(close(emitted.value, 0.8));
    assert!(close(emitted.uncertainty, 0.1f64.hypot(0.05)));

    let score = power.calculated_impacts[&scenario.climate];
    assert!(close(score.value, 0.8));
    assert!(close(score.uncertainty, 0.1f64.hypot(0.05)));

    // Zero entries are never written
    assert!(!power.calculated_flows.contains_key(&scenario.water));
    let wind = scenario.catalog.process(scenario.wind)?;
    assert!(wind.calculated_flows.is_empty());
    assert!(wind.calculated_impacts.is_empty());
    Ok(())
}

#[test]
fn it_replaces_results_of_an_earlier_run() -> TestResult {
    let mut scenario = scenario()?;
    let engine = CalculationEngine::new(CalculationSettings::default(), UnitRegistry::standard());

    engine.run(&mut scenario.catalog, &scenario.relations)?;
    let first = scenario.catalog.process(scenario.power)?.clone();

    // Without the relation, power no longer inherits the coal emissions.
    engine.run(&mut scenario.catalog, &[])?;
    let second = scenario.catalog.process(scenario.power)?;

    assert_eq!(first.calculated_flows.len(), 1);
    assert!(second.calculated_flows.is_empty());
    assert!(second.calculated_impacts.is_empty());
    Ok(())
}

#[test]
fn it_can_leave_uncertainty_out_of_the_closure() -> TestResult {
    let mut scenario = scenario()?;
    let settings = CalculationSettings {
        propagation: PropagationMode::ValuesOnly,
        ..CalculationSettings::default()
    };
    let engine = CalculationEngine::new(settings, UnitRegistry::standard());

    let calculation = engine.run(&mut scenario.catalog, &scenario.relations)?;

    assert!(calculation.transitive.uncertainties().iter().all(|u| *u == 0.0));

    let power = scenario.catalog.process(scenario.power)?;
    let emitted = power.calculated_flows[&scenario.co2];
    assert!(close(emitted.value, 0.8));
    assert!(close(emitted.uncertainty, 0.1));
    Ok(())
}

#[test]
fn it_reports_a_closure_that_hits_the_cap() -> TestResult {
    let mut catalog = Catalog::new();
    let a = catalog.add_process(dimension(&["a"]), Unit::new("kg"));
    let b = catalog.add_process(dimension(&["b"]), Unit::new("kg"));
    let double = catalog.add_coefficient(dimension(&["double"]), Unit::dimensionless(), Value::exact(2.0))?;

    let relations = [(a, b), (b, a)].map(|(source, destination)| DerivedRelation {
        source,
        coefficient: double,
        destination,
        exponent: Exponent::Direct,
        relation_type: RelationType::default(),
    });

    let settings = CalculationSettings {
        max_iterations: 10,
        ..CalculationSettings::default()
    };
    let calculation =
        CalculationEngine::new(settings, UnitRegistry::standard()).run(&mut catalog, &relations)?;

    assert!(!calculation.converged);
    assert_eq!(calculation.iterations, 10);
    Ok(())
}
