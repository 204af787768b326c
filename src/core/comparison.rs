use crate::core::align::{align_listing, align_section, Listing, SpecRow};
use crate::core::differences::{detect_differences, Differences};
use crate::core::table::Table;
use crate::domain::model::EntitySpecs;
use crate::utils::error::{CompareError, Result};
use crate::utils::validation::validate_unique_names;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The specification sections every datasheet extraction carries, in
/// presentation order. Features and advantages travel separately.
pub const SPEC_SECTIONS: [&str; 3] = [
    "Electrical_Specifications",
    "Magnetic_Specifications",
    "Physical_Operational_Specifications",
];

const DIAGRAM_CATEGORY: &str = "Diagram";

/// The full cross-entity comparison. Immutable once built; every field is
/// a pure function of the input aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub features_table: Table,
    pub advantages_table: Table,
    pub specs_table: Table,
    pub differences_table: Table,
    pub differences: Differences,
    pub entity_names: Vec<String>,
}

impl ComparisonResult {
    /// Builds the comparison for the given aggregates, in caller order.
    ///
    /// A malformed input (empty list, duplicate entity names) aborts the
    /// whole comparison; silently dropping one entity would shift the
    /// remaining columns.
    pub fn from_entities(entities: &[EntitySpecs]) -> Result<Self> {
        if entities.is_empty() {
            return Err(CompareError::ValidationError {
                message: "cannot compare an empty entity list".to_string(),
            });
        }

        let entity_names: Vec<String> = entities
            .iter()
            .map(|entity| entity.entity_name.clone())
            .collect();
        validate_unique_names("entity_names", &entity_names)?;

        let feature_rows = align_listing(entities, Listing::Features);
        let advantage_rows = align_listing(entities, Listing::Advantages);

        let mut spec_rows = Vec::new();
        for section in SPEC_SECTIONS {
            spec_rows.extend(align_section(entities, section));
        }

        let (divergent_rows, differences) = detect_differences(&spec_rows, &entity_names);

        // Diagram paths are appended after detection: they are artifacts,
        // not specifications, and must never register as differences.
        if let Some(diagram) = diagram_row(entities) {
            spec_rows.push(diagram);
        }

        Ok(Self {
            features_table: Table::from_label_rows(&feature_rows, &entity_names)?,
            advantages_table: Table::from_label_rows(&advantage_rows, &entity_names)?,
            specs_table: Table::from_spec_rows(&spec_rows, &entity_names)?,
            differences_table: Table::from_spec_rows(&divergent_rows, &entity_names)?,
            differences,
            entity_names,
        })
    }
}

fn diagram_row(entities: &[EntitySpecs]) -> Option<SpecRow> {
    let mut values = BTreeMap::new();
    for entity in entities {
        if let Some(path) = &entity.diagram_path {
            values.insert(entity.entity_name.clone(), path.clone());
        }
    }

    (!values.is_empty()).then(|| SpecRow {
        category: DIAGRAM_CATEGORY.to_string(),
        specification: String::new(),
        values,
    })
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output: Vec<String> = Vec::new();

        if !self.features_table.is_empty() {
            output.push("Features:".to_string());
            output.push(self.features_table.render());
            output.push(String::new());
        }

        if !self.advantages_table.is_empty() {
            output.push("Advantages:".to_string());
            output.push(self.advantages_table.render());
            output.push(String::new());
        }

        if !self.specs_table.is_empty() {
            output.push("Specifications:".to_string());
            output.push(self.specs_table.render());
            output.push(String::new());
        }

        if !self.differences_table.is_empty() {
            output.push("Key Differences:".to_string());
            output.push(self.differences_table.render());
        }

        if output.is_empty() {
            write!(f, "No data available.")
        } else {
            write!(f, "{}", output.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_coil_entity(name: &str, coil: &str) -> EntitySpecs {
        EntitySpecs::from_json(&json!({
            "entity_name": name,
            "sections": {
                "Electrical_Specifications": {
                    "categories": {
                        "Test Coil": {
                            "subcategories": {
                                "": {"unit": "NARM RS-421-A", "value": coil}
                            }
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_blank_subcategory_scenario() {
        // Two entities, one blank-keyed category, diverging coil values.
        let entities = vec![
            test_coil_entity("HSR-520R", "Coil II"),
            test_coil_entity("HSR-412R", "Coil III"),
        ];
        let result = ComparisonResult::from_entities(&entities).unwrap();

        // Specification is blank everywhere, so the column disappears and
        // the category is never substituted for the blank label.
        assert_eq!(
            result.specs_table.columns(),
            &["Category", "HSR-520R", "HSR-412R"]
        );
        assert_eq!(
            result.specs_table.rows()[0],
            vec!["Test Coil", "Coil II NARM RS-421-A", "Coil III NARM RS-421-A"]
        );

        // The rendered values differ, so the row lands in the differences.
        assert_eq!(result.differences.len(), 1);
        let diff = result.differences.iter().next().unwrap();
        assert_eq!(diff.category, "Test Coil");
        assert_eq!(diff.specification, "");
        assert_eq!(diff.unit.as_deref(), Some("RS-421-A"));
    }

    fn voltage_entity(name: &str, subcats: &[(&str, &str)]) -> EntitySpecs {
        let mut subcategories = serde_json::Map::new();
        for (key, value) in subcats {
            subcategories.insert(key.to_string(), json!({"unit": "VDC", "value": value}));
        }
        EntitySpecs::from_json(&json!({
            "entity_name": name,
            "sections": {
                "Electrical_Specifications": {
                    "categories": {
                        "Voltage": {"subcategories": serde_json::Value::Object(subcategories)}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_partial_overlap_scenario() {
        // Entity A has Switching and Breakdown; entity B only Switching.
        let entities = vec![
            voltage_entity("A", &[("Switching", "200"), ("Breakdown", "250")]),
            voltage_entity("B", &[("Switching", "200")]),
        ];
        let result = ComparisonResult::from_entities(&entities).unwrap();

        assert_eq!(result.specs_table.rows().len(), 2);
        let breakdown = &result.specs_table.rows()[1];
        assert_eq!(breakdown[1], "Breakdown");
        assert_eq!(breakdown[3], "");

        // Only one entity has a Breakdown value: not a difference. The
        // Switching values are identical: not a difference either.
        assert!(result.differences.is_empty());
        assert!(result.differences_table.is_empty());
    }

    #[test]
    fn test_duplicate_entity_names_abort() {
        let entities = vec![
            test_coil_entity("HSR-520R", "Coil II"),
            test_coil_entity("HSR-520R", "Coil III"),
        ];
        assert!(ComparisonResult::from_entities(&entities).is_err());
    }

    #[test]
    fn test_empty_entity_list_aborts() {
        assert!(ComparisonResult::from_entities(&[]).is_err());
    }

    #[test]
    fn test_sections_concatenate_in_fixed_order() {
        let entity = EntitySpecs::from_json(&json!({
            "entity_name": "A",
            "sections": {
                "Physical_Operational_Specifications": {
                    "categories": {
                        "Weight": {"subcategories": {"": {"unit": "g", "value": "12"}}}
                    }
                },
                "Electrical_Specifications": {
                    "categories": {
                        "Voltage": {"subcategories": {"Switching": {"unit": "VDC", "value": "200"}}}
                    }
                }
            }
        }))
        .unwrap();
        let result = ComparisonResult::from_entities(&[entity]).unwrap();

        // Electrical rows come first regardless of extraction order.
        let categories: Vec<&str> = result
            .specs_table
            .rows()
            .iter()
            .map(|row| row[0].as_str())
            .collect();
        assert_eq!(categories, vec!["Voltage", "Weight"]);
    }

    #[test]
    fn test_diagram_row_appended_but_never_a_difference() {
        let mut raw = json!({
            "entity_name": "A",
            "sections": {
                "Electrical_Specifications": {
                    "categories": {
                        "Voltage": {"subcategories": {"Switching": {"unit": "VDC", "value": "200"}}}
                    }
                }
            },
            "diagram_path": "diagrams/a.png"
        });
        let a = EntitySpecs::from_json(&raw).unwrap();
        raw["entity_name"] = json!("B");
        raw["diagram_path"] = json!("diagrams/b.png");
        let b = EntitySpecs::from_json(&raw).unwrap();

        let result = ComparisonResult::from_entities(&[a, b]).unwrap();
        let last = result.specs_table.rows().last().unwrap();
        assert_eq!(last[0], "Diagram");
        assert_eq!(last[2], "diagrams/a.png");
        assert_eq!(last[3], "diagrams/b.png");

        // Diverging paths must not show up as a specification difference.
        assert!(result.differences.is_empty());
    }

    #[test]
    fn test_result_serialization_is_deterministic() {
        let entities = vec![
            voltage_entity("A", &[("Switching", "200"), ("Breakdown", "250")]),
            voltage_entity("B", &[("Switching", "175")]),
        ];
        let first = serde_json::to_string(&ComparisonResult::from_entities(&entities).unwrap())
            .unwrap();
        let second = serde_json::to_string(&ComparisonResult::from_entities(&entities).unwrap())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_lists_populated_blocks() {
        let entities = vec![
            voltage_entity("A", &[("Switching", "200")]),
            voltage_entity("B", &[("Switching", "175")]),
        ];
        let rendered = ComparisonResult::from_entities(&entities).unwrap().to_string();

        assert!(rendered.contains("Specifications:"));
        assert!(rendered.contains("Key Differences:"));
        assert!(!rendered.contains("Features:"));
    }

    #[test]
    fn test_no_data_display() {
        let entity = EntitySpecs::from_json(&json!({"entity_name": "A", "sections": {}})).unwrap();
        let rendered = ComparisonResult::from_entities(&[entity]).unwrap().to_string();
        assert_eq!(rendered, "No data available.");
    }
}
