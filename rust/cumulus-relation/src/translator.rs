use std::collections::HashMap;

use cumulus_dimension::{Dimension, DimensionSet, ElementKind, Group, HashKey};
use cumulus_units::UnitService;

use crate::{
    Exponent, MacroRelation, MicroRelation, RelationType, RelationUnits, Side, TranslationError,
};

/// Expands macro relations into micro relations.
#[derive(Debug, Clone)]
pub struct Translator<U> {
    units: U,
}

/// A macro relation that could not be translated.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationFailure {
    /// Name of the macro relation.
    pub relation: String,
    /// Why it failed.
    pub error: TranslationError,
}

/// Outcome of translating a batch of macro relations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationReport {
    /// Micro relations of every relation that translated successfully.
    pub relations: Vec<MicroRelation>,
    /// One entry per relation that was skipped.
    pub failures: Vec<TranslationFailure>,
}

impl TranslationReport {
    /// Whether every relation translated.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<U: UnitService> Translator<U> {
    /// A translator checking units against `units`.
    pub fn new(units: U) -> Self {
        Self { units }
    }

    /// Translates one macro relation.
    pub fn translate(&self, relation: &MacroRelation) -> Result<Vec<MicroRelation>, TranslationError> {
        let relations = self.translate_groups(
            &relation.source,
            &relation.coefficient,
            &relation.destination,
            relation.exponent,
            &relation.relation_type,
        )?;

        tracing::debug!(
            relation = %relation.name,
            micro_relations = relations.len(),
            "Translated relation"
        );

        Ok(relations)
    }

    /// Translates every relation independently. A failing relation is
    /// recorded in the report and does not stop the batch.
    pub fn translate_all<'a>(
        &self,
        relations: impl IntoIterator<Item = &'a MacroRelation>,
    ) -> TranslationReport {
        let mut report = TranslationReport::default();

        for relation in relations {
            match self.translate(relation) {
                Ok(mut translated) => report.relations.append(&mut translated),
                Err(error) => {
                    tracing::warn!(relation = %relation.name, %error, "Skipping relation");
                    report.failures.push(TranslationFailure {
                        relation: relation.name.clone(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Expands a relation between three groups.
    ///
    /// The source and coefficient shapes are merged first. Coefficients are
    /// then joined to sources on the keywords those two shapes share, and
    /// destinations are joined to each source/coefficient pair on the
    /// keywords the merged shape shares with the destination shape.
    pub fn translate_groups(
        &self,
        source: &Group,
        coefficient: &Group,
        destination: &Group,
        exponent: Exponent,
        relation_type: &RelationType,
    ) -> Result<Vec<MicroRelation>, TranslationError> {
        check_kind(source, Side::Source, ElementKind::Process)?;
        check_kind(coefficient, Side::Coefficient, ElementKind::Coefficient)?;
        check_kind(destination, Side::Destination, ElementKind::Process)?;

        let source_shape = source.full_dimension_set();
        let coefficient_shape = coefficient.full_dimension_set();
        let destination_shape = destination.full_dimension_set();

        check_compatible(Side::Source, source_shape, Side::Coefficient, coefficient_shape)?;
        check_compatible(Side::Source, source_shape, Side::Destination, destination_shape)?;
        check_compatible(
            Side::Coefficient,
            coefficient_shape,
            Side::Destination,
            destination_shape,
        )?;

        self.check_units(source, coefficient, destination, exponent)?;

        let merged = source_shape.union(coefficient_shape);
        check_compatible(
            Side::SourceWithCoefficient,
            &merged.dimensions,
            Side::Destination,
            destination_shape,
        )?;

        let destination_alpha = merged.dimensions.alpha(destination_shape);
        let destination_common = merged.dimensions.common_keywords(destination_shape);

        tracing::trace!(
            source_alpha = merged.alpha,
            source_common = %merged.common_keywords,
            destination_alpha,
            destination_common = %destination_common,
            "Joining groups"
        );

        let coefficients = index(
            coefficient.coordinates(),
            &merged.common_keywords,
            merged.alpha,
        );
        let destinations = index(
            destination.coordinates(),
            &destination_common,
            destination_alpha,
        );

        let units = RelationUnits {
            source: source.unit().clone(),
            coefficient: coefficient.unit().clone(),
            destination: destination.unit().clone(),
        };

        let mut relations = Vec::new();

        for source_coordinate in source.coordinates() {
            let key = HashKey::of(source_coordinate, &merged.common_keywords, merged.alpha);
            let Some(matching_coefficients) = coefficients.get(&key) else {
                continue;
            };

            for coefficient_coordinate in matching_coefficients {
                let combined = source_coordinate.union(coefficient_coordinate);
                let key = HashKey::of(&combined, &destination_common, destination_alpha);
                let Some(matching_destinations) = destinations.get(&key) else {
                    continue;
                };

                for destination_coordinate in matching_destinations {
                    relations.push(MicroRelation {
                        source: source_coordinate.clone(),
                        coefficient: (*coefficient_coordinate).clone(),
                        destination: (*destination_coordinate).clone(),
                        units: units.clone(),
                        exponent,
                        relation_type: relation_type.clone(),
                    });
                }
            }
        }

        Ok(relations)
    }

    fn check_units(
        &self,
        source: &Group,
        coefficient: &Group,
        destination: &Group,
        exponent: Exponent,
    ) -> Result<(), TranslationError> {
        let expected = self
            .units
            .multiply(destination.unit(), coefficient.unit(), exponent.as_i32());

        match expected {
            Some(expected) if self.units.are_compatible(source.unit(), &expected) => Ok(()),
            _ => Err(TranslationError::IncompatibleUnits {
                source_unit: source.unit().clone(),
                destination: destination.unit().clone(),
                coefficient: coefficient.unit().clone(),
                exponent: exponent.as_i32(),
            }),
        }
    }
}

/// Groups coordinates by their join key. Coordinates with a null key can
/// never match and are left out.
fn index<'a>(
    coordinates: &'a DimensionSet,
    common: &Dimension,
    alpha: usize,
) -> HashMap<HashKey, Vec<&'a Dimension>> {
    let mut table: HashMap<HashKey, Vec<&'a Dimension>> = HashMap::new();

    for coordinate in coordinates {
        let key = HashKey::of(coordinate, common, alpha);
        if !key.is_null() {
            table.entry(key).or_default().push(coordinate);
        }
    }

    table
}

fn check_kind(group: &Group, side: Side, expected: ElementKind) -> Result<(), TranslationError> {
    if group.kind() != expected {
        return Err(TranslationError::MisplacedGroup {
            group: group.name().to_owned(),
            side,
            expected,
            found: group.kind(),
        });
    }
    Ok(())
}

fn check_compatible(
    left: Side,
    left_shape: &DimensionSet,
    right: Side,
    right_shape: &DimensionSet,
) -> Result<(), TranslationError> {
    if !left_shape.is_compatible(right_shape) {
        return Err(TranslationError::IncompatibleDimSet {
            left,
            left_shape: left_shape.clone(),
            right,
            right_shape: right_shape.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_dimension::Keyword;
    use cumulus_units::{Unit, UnitRegistry};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn dimension(ids: &[&str]) -> Dimension {
        ids.iter().map(|id| Keyword::new(id)).collect()
    }

    fn group(name: &str, dimensions: &[&[&str]], unit: &str, kind: ElementKind) -> Group {
        let dimensions = DimensionSet::try_from_dimensions(dimensions.iter().map(|ids| dimension(ids)))
            .unwrap_or_default();
        Group::new(name, dimensions, Dimension::empty(), Unit::new(unit), kind)
    }

    #[test]
    fn it_keys_tables_by_shared_keywords() {
        let coordinates = group("g", &[&["a", "b"], &["x", "y"]], "1", ElementKind::Process);
        let table = index(coordinates.coordinates(), &dimension(&["a", "b"]), 1);

        assert_eq!(table.len(), 2);
        assert_eq!(table[&HashKey::Key("a".to_owned())].len(), 2);
        assert!(!table.contains_key(&HashKey::Null));
    }

    #[test]
    fn it_rejects_groups_in_the_wrong_role() -> TestResult {
        let translator = Translator::new(UnitRegistry::standard());
        let process = group("p", &[&["a"]], "kg", ElementKind::Process);

        let result = translator.translate_groups(
            &process,
            &process,
            &process,
            Exponent::Direct,
            &RelationType::default(),
        );

        assert_eq!(
            result,
            Err(TranslationError::MisplacedGroup {
                group: "p".to_owned(),
                side: Side::Coefficient,
                expected: ElementKind::Coefficient,
                found: ElementKind::Process,
            })
        );
        Ok(())
    }

    #[test]
    fn it_checks_units_with_the_exponent() -> TestResult {
        let translator = Translator::new(UnitRegistry::standard());
        let source = group("electricity", &[&["FR"]], "kWh", ElementKind::Process);
        let efficiency = group("efficiency", &[&["FR"]], "MJ.kg^-1", ElementKind::Coefficient);
        let fuel = group("fuel", &[&["FR"]], "kg", ElementKind::Process);

        // kWh ~ kg × (MJ/kg)
        let direct = translator.translate_groups(
            &source,
            &efficiency,
            &fuel,
            Exponent::Direct,
            &RelationType::default(),
        )?;
        assert_eq!(direct.len(), 1);

        // kWh is not kg / (MJ/kg)
        let inverse = translator.translate_groups(
            &source,
            &efficiency,
            &fuel,
            Exponent::Inverse,
            &RelationType::default(),
        );
        assert!(matches!(
            inverse,
            Err(TranslationError::IncompatibleUnits { exponent: -1, .. })
        ));
        Ok(())
    }

    #[test]
    fn it_treats_unknown_units_as_incompatible() {
        let translator = Translator::new(UnitRegistry::standard());
        let source = group("s", &[&["a"]], "widgets", ElementKind::Process);
        let coefficient = group("c", &[&["a"]], "1", ElementKind::Coefficient);

        let result = translator.translate_groups(
            &source,
            &coefficient,
            &source,
            Exponent::Direct,
            &RelationType::default(),
        );

        assert!(matches!(result, Err(TranslationError::IncompatibleUnits { .. })));
    }
}
