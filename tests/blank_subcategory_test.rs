use spec_compare::{ComparisonResult, EntitySpecs};

fn entity_from(raw: serde_json::Value) -> EntitySpecs {
    EntitySpecs::from_json(&raw).unwrap()
}

/// Every category here has a single blank-keyed subcategory; the invariant
/// must hold for all of them, not just a known-problematic name.
#[test]
fn test_blank_specification_never_backfilled_with_category_name() {
    let categories = [
        "Test Coil",
        "Contact Material",
        "Release Time",
        "Pull - In Range",
        "Some Brand New Category",
    ];

    let mut cats = serde_json::Map::new();
    for category in categories {
        cats.insert(
            category.to_string(),
            serde_json::json!({"subcategories": {"": {"unit": null, "value": format!("{} value A", category)}}}),
        );
    }
    // One named subcategory so the Specification column is present.
    cats.insert(
        "Voltage".to_string(),
        serde_json::json!({"subcategories": {"Switching": {"unit": "VDC", "value": "200"}}}),
    );

    let build = |name: &str| {
        entity_from(serde_json::json!({
            "entity_name": name,
            "sections": {
                "Electrical_Specifications": {
                    "categories": serde_json::Value::Object(cats.clone())
                }
            }
        }))
    };

    let result = ComparisonResult::from_entities(&[build("A"), build("B")]).unwrap();
    let table = &result.specs_table;
    assert_eq!(table.columns()[..2], ["Category", "Specification"]);

    for row in table.rows() {
        let category = &row[0];
        let specification = &row[1];
        assert_ne!(
            specification, category,
            "specification must never equal the category name"
        );
        if category != "Voltage" {
            assert_eq!(specification, "", "blank subcategory key must stay blank");
        }
    }
}

#[test]
fn test_all_tables_are_rectangular() {
    let a = entity_from(serde_json::json!({
        "entity_name": "A",
        "sections": {
            "Electrical_Specifications": {
                "categories": {
                    "Voltage": {"subcategories": {
                        "Switching": {"unit": "VDC", "value": "200"},
                        "Breakdown": {"unit": "VDC", "value": "250"}
                    }}
                }
            }
        },
        "features_advantages": {"features": ["• Sealed", "• Compact"], "advantages": ["• Cheap"]}
    }));
    let b = entity_from(serde_json::json!({
        "entity_name": "B",
        "sections": {
            "Magnetic_Specifications": {
                "categories": {
                    "Pull - In Range": {"subcategories": {"": {"unit": "AT", "value": "10-25"}}}
                }
            }
        },
        "features_advantages": {"features": ["• Sealed"], "advantages": []}
    }));

    let result = ComparisonResult::from_entities(&[a, b]).unwrap();
    for table in [
        &result.features_table,
        &result.advantages_table,
        &result.specs_table,
        &result.differences_table,
    ] {
        for row in table.rows() {
            assert_eq!(row.len(), table.columns().len());
            for cell in row {
                // Cells are real strings, empty when absent - never a
                // sentinel value.
                assert_ne!(cell, "null");
            }
        }
    }
}

#[test]
fn test_comparison_is_deterministic() {
    let build = || {
        vec![
            entity_from(serde_json::json!({
                "entity_name": "A",
                "sections": {
                    "Electrical_Specifications": {
                        "categories": {
                            "Voltage": {"subcategories": {
                                "Switching": {"unit": "VDC", "value": "200"},
                                "Breakdown": {"unit": "VDC", "value": "250"}
                            }},
                            "Test Coil": {"subcategories": {"": {"unit": "NARM RS-421-A", "value": "Coil II"}}}
                        }
                    }
                }
            })),
            entity_from(serde_json::json!({
                "entity_name": "B",
                "sections": {
                    "Electrical_Specifications": {
                        "categories": {
                            "Voltage": {"subcategories": {"Switching": {"unit": "VDC", "value": "175"}}}
                        }
                    }
                }
            })),
        ]
    };

    let first = ComparisonResult::from_entities(&build()).unwrap();
    let second = ComparisonResult::from_entities(&build()).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_difference_soundness() {
    // Divergent, identical, and single-valued rows in one comparison.
    let a = entity_from(serde_json::json!({
        "entity_name": "A",
        "sections": {
            "Electrical_Specifications": {
                "categories": {
                    "Voltage": {"subcategories": {
                        "Switching": {"unit": "VDC", "value": "200"},
                        "Breakdown": {"unit": "VDC", "value": "250"},
                        "Carry": {"unit": "A", "value": "1.0"}
                    }}
                }
            }
        }
    }));
    let b = entity_from(serde_json::json!({
        "entity_name": "B",
        "sections": {
            "Electrical_Specifications": {
                "categories": {
                    "Voltage": {"subcategories": {
                        "Switching": {"unit": "VDC", "value": "175"},
                        "Breakdown": {"unit": "VDC", "value": "250"}
                    }}
                }
            }
        }
    }));

    let result = ComparisonResult::from_entities(&[a, b]).unwrap();

    let diff_specs: Vec<String> = result
        .differences
        .iter()
        .map(|d| d.specification.clone())
        .collect();

    // Only the row with two distinct non-empty values qualifies.
    assert_eq!(diff_specs, vec!["Switching"]);
    assert_eq!(result.differences_table.rows().len(), 1);
}

#[test]
fn test_missing_section_yields_empty_cells_not_errors() {
    let a = entity_from(serde_json::json!({
        "entity_name": "A",
        "sections": {
            "Electrical_Specifications": {
                "categories": {
                    "Voltage": {"subcategories": {"Switching": {"unit": "VDC", "value": "200"}}}
                }
            }
        }
    }));
    let b = entity_from(serde_json::json!({"entity_name": "B", "sections": {}}));

    let result = ComparisonResult::from_entities(&[a, b]).unwrap();
    let row = &result.specs_table.rows()[0];
    assert_eq!(row.last().map(String::as_str), Some(""));
    // One non-empty value only: no difference.
    assert!(result.differences.is_empty());
}
