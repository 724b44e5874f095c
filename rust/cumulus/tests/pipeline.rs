use std::io::Write;

use cumulus::{CumulusError, Document, Pipeline, RelationDocument, Settings};
use cumulus_dimension::{Dimension, Keyword};
use cumulus_model::{AmbiguityPolicy, ResolveError};
use cumulus_relation::{Exponent, RelationType, TranslationError};
use cumulus_units::UnitRegistry;
use pretty_assertions::assert_eq;
use testresult::TestResult;

/// Electricity mixes of two countries, each made of coal and nuclear
/// production in different shares. A second relation splits the country
/// axis in a way that cannot be matched.
const ELECTRICITY: &str = r#"{
    "units": [
        { "symbol": "MJe", "factor": 1.0, "dimensions": { "energy": 1 } }
    ],
    "flow_types": [
        { "name": "CO2", "unit": "kg" }
    ],
    "impact_types": [
        { "name": "climate change", "unit": "kg", "components": { "CO2": { "value": 1.0 } } }
    ],
    "groups": [
        {
            "name": "production",
            "dimensions": [["FR", "DE"], ["coal", "nuclear"]],
            "common_keywords": ["production"],
            "unit": "MJe",
            "kind": "process"
        },
        {
            "name": "mix",
            "dimensions": [["FR", "DE"]],
            "common_keywords": ["mix"],
            "unit": "MJe",
            "kind": "process"
        },
        {
            "name": "share",
            "dimensions": [["FR", "DE"], ["coal", "nuclear"]],
            "common_keywords": ["share"],
            "unit": "1",
            "kind": "coefficient"
        },
        {
            "name": "split",
            "dimensions": [["FR"], ["DE"]],
            "common_keywords": ["split"],
            "unit": "1",
            "kind": "coefficient"
        }
    ],
    "coefficients": [
        { "coordinate": ["share", "FR", "coal"], "unit": "1", "value": 0.1 },
        { "coordinate": ["share", "FR", "nuclear"], "unit": "1", "value": 0.9 },
        { "coordinate": ["share", "DE", "coal"], "unit": "1", "value": 0.5, "uncertainty": 0.1 },
        { "coordinate": ["share", "DE", "nuclear"], "unit": "1", "value": 0.5, "uncertainty": 0.1 }
    ],
    "processes": [
        {
            "coordinate": ["production", "FR", "coal"],
            "unit": "MJe",
            "flows": { "CO2": { "value": 1.0, "uncertainty": 0.1 } }
        },
        {
            "coordinate": ["production", "DE", "coal"],
            "unit": "MJe",
            "flows": { "CO2": { "value": 1.0, "uncertainty": 0.1 } }
        },
        {
            "coordinate": ["production", "FR", "nuclear"],
            "unit": "MJe",
            "flows": { "CO2": { "value": 0.01 } }
        },
        {
            "coordinate": ["production", "DE", "nuclear"],
            "unit": "MJe",
            "flows": { "CO2": { "value": 0.01 } }
        }
    ],
    "relations": [
        { "name": "electricity mix", "source": "production", "coefficient": "share", "destination": "mix" },
        { "name": "split mix", "source": "production", "coefficient": "split", "destination": "mix" }
    ]
}"#;

fn dimension(ids: &[&str]) -> Dimension {
    ids.iter().map(|id| Keyword::new(id)).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn pipeline() -> Pipeline {
    Pipeline::new(Settings::default(), UnitRegistry::standard())
}

#[test_log::test]
fn it_calculates_a_document_end_to_end() -> TestResult {
    let outcome = pipeline().run(&Document::from_json(ELECTRICITY)?)?;

    assert_eq!(outcome.translation.relations.len(), 4);
    assert_eq!(outcome.derived_relations().len(), 4);
    assert!(outcome.calculation.converged);

    // Mixes are created on resolution, after the four declared productions
    assert_eq!(outcome.catalog.process_count(), 6);

    let france = outcome
        .result(&dimension(&["mix", "FR"]))
        .ok_or("no result for the French mix")?;
    assert!(close(france.flows["CO2"].value, 0.1 + 0.9 * 0.01));
    assert!(close(france.impacts["climate change"].value, 0.1 + 0.9 * 0.01));

    let germany = outcome
        .result(&dimension(&["mix", "DE"]))
        .ok_or("no result for the German mix")?;
    assert!(close(germany.flows["CO2"].value, 0.5 + 0.5 * 0.01));
    assert!(germany.flows["CO2"].uncertainty > 0.1);

    let coal = outcome
        .result(&dimension(&["production", "FR", "coal"]))
        .ok_or("no result for French coal")?;
    assert_eq!(coal.flows["CO2"].value, 1.0);
    Ok(())
}

#[test_log::test]
fn it_reports_a_bad_relation_without_stopping() -> TestResult {
    let outcome = pipeline().run(&Document::from_json(ELECTRICITY)?)?;

    assert!(!outcome.is_clean());
    assert_eq!(outcome.translation.failures.len(), 1);

    let failure = &outcome.translation.failures[0];
    assert_eq!(failure.relation, "split mix");
    assert!(matches!(
        failure.error,
        TranslationError::IncompatibleDimSet { .. }
    ));
    Ok(())
}

#[test_log::test]
fn it_keeps_running_when_a_relation_names_an_unknown_group() -> TestResult {
    let mut document = Document::from_json(ELECTRICITY)?;
    document.relations.push(RelationDocument {
        name: "storage".to_owned(),
        source: "mix".to_owned(),
        coefficient: "share".to_owned(),
        destination: "battery".to_owned(),
        exponent: Exponent::Direct,
        relation_type: RelationType::default(),
    });

    let outcome = pipeline().run(&document)?;

    assert_eq!(outcome.derived_relations().len(), 4);
    let failed = outcome
        .translation
        .failures
        .iter()
        .map(|failure| (failure.relation.as_str(), &failure.error))
        .collect::<Vec<_>>();
    assert_eq!(failed.len(), 2);
    assert_eq!(
        failed[0],
        ("storage", &TranslationError::UnknownGroup("battery".to_owned()))
    );
    assert_eq!(failed[1].0, "split mix");

    let france = outcome
        .result(&dimension(&["mix", "FR"]))
        .ok_or("no result for the French mix")?;
    assert!(close(france.flows["CO2"].value, 0.1 + 0.9 * 0.01));
    Ok(())
}

#[test]
fn it_reports_missing_coefficients() -> TestResult {
    let mut document = Document::from_json(ELECTRICITY)?;
    document
        .coefficients
        .retain(|coefficient| coefficient.coordinate != ["share", "DE", "nuclear"]);

    let outcome = pipeline().run(&document)?;

    assert_eq!(outcome.derived_relations().len(), 3);
    assert_eq!(outcome.resolution.failures.len(), 1);
    assert!(matches!(
        outcome.resolution.failures[0].error,
        ResolveError::NoElementFound { .. }
    ));
    Ok(())
}

#[test]
fn it_picks_the_first_coefficient_when_allowed() -> TestResult {
    // Shares only keyed by technology match the coefficients of both
    // countries.
    let mut document = Document::from_json(ELECTRICITY)?;
    document.relations.truncate(1);
    for group in &mut document.groups {
        if group.name == "share" {
            group.dimensions = vec![vec!["coal".to_owned(), "nuclear".to_owned()]];
        }
    }

    let rejected = pipeline().run(&document)?;
    assert!(rejected.derived_relations().is_empty());
    assert!(rejected.resolution.failures.iter().all(|failure| matches!(
        failure.error,
        ResolveError::MultipleElementsFound { candidates: 2, .. }
    )));

    let settings = Settings {
        resolution: AmbiguityPolicy::First,
        ..Settings::default()
    };
    let accepted = Pipeline::new(settings, UnitRegistry::standard()).run(&document)?;
    assert_eq!(accepted.derived_relations().len(), 4);
    Ok(())
}

#[test]
fn it_needs_processes_to_calculate() -> TestResult {
    let result = pipeline().run(&Document::default());

    assert!(matches!(result, Err(CumulusError::Calculation(_))));
    Ok(())
}

#[test]
fn it_loads_documents_and_settings_from_files() -> TestResult {
    let directory = tempfile::tempdir()?;

    let document_path = directory.path().join("electricity.json");
    std::fs::File::create(&document_path)?.write_all(ELECTRICITY.as_bytes())?;

    let settings_path = directory.path().join("settings.json");
    std::fs::write(&settings_path, r#"{ "calculation": { "threshold": 0.001 } }"#)?;

    let settings = Settings::from_path(&settings_path)?;
    let outcome = Pipeline::new(settings, UnitRegistry::standard())
        .run(&Document::from_path(&document_path)?)?;

    assert_eq!(outcome.results().len(), 6);

    let missing = Document::from_path(directory.path().join("missing.json"));
    assert!(matches!(missing, Err(CumulusError::Io { .. })));
    Ok(())
}
