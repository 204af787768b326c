use crate::domain::model::{CategorySpecs, SectionData, SpecValue};

/// One canonical (category, specification, value) triple from a single
/// entity's section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSpec {
    pub category: String,
    pub specification: String,
    pub value: SpecValue,
}

/// Normalizes one category's subcategory map into rows.
///
/// The specification label is the subcategory key verbatim (trimmed): a
/// blank key yields a blank label, never the category name. This holds
/// for every category, whether it has a single blank-keyed subcategory
/// or several named ones. Pure function; row order mirrors the map's
/// insertion order.
pub fn normalize_category(category: &str, subcategories: &CategorySpecs) -> Vec<NormalizedSpec> {
    subcategories
        .iter()
        .map(|(subcat_key, value)| NormalizedSpec {
            category: category.trim().to_string(),
            specification: subcat_key.trim().to_string(),
            value: value.clone(),
        })
        .collect()
}

/// Normalizes every category of a section, preserving category order.
pub fn normalize_section(section: &SectionData) -> Vec<NormalizedSpec> {
    section
        .iter()
        .flat_map(|(category, subcategories)| normalize_category(category, subcategories))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_with(entries: &[(&str, &str, Option<&str>)]) -> CategorySpecs {
        let mut specs = CategorySpecs::default();
        for (key, value, unit) in entries {
            specs.insert(
                key.to_string(),
                SpecValue::new(value.to_string(), unit.map(str::to_string)),
            );
        }
        specs
    }

    #[test]
    fn test_blank_subcategory_keeps_blank_specification() {
        let specs = category_with(&[("", "Coil II", Some("NARM RS-421-A"))]);
        let rows = normalize_category("Test Coil", &specs);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Test Coil");
        assert_eq!(rows[0].specification, "");
        assert_ne!(rows[0].specification, rows[0].category);
        assert_eq!(rows[0].value.display(), "Coil II NARM RS-421-A");
    }

    #[test]
    fn test_blank_key_never_backfilled_for_any_category() {
        // The invariant is structural, not tied to one known category.
        for category in ["Test Coil", "Contact Material", "Release Time", "Storage"] {
            let specs = category_with(&[("", "x", None)]);
            let rows = normalize_category(category, &specs);
            assert_eq!(rows[0].specification, "");
        }
    }

    #[test]
    fn test_whitespace_only_key_normalizes_to_blank() {
        let specs = category_with(&[("   ", "x", None)]);
        let rows = normalize_category("Release Time", &specs);
        assert_eq!(rows[0].specification, "");
    }

    #[test]
    fn test_named_subcategories_keep_insertion_order() {
        let specs = category_with(&[
            ("Switching", "200", Some("VDC")),
            ("Breakdown", "250", Some("VDC")),
            ("Carry", "1.0", Some("A")),
        ]);
        let rows = normalize_category("Voltage", &specs);

        let labels: Vec<&str> = rows.iter().map(|r| r.specification.as_str()).collect();
        assert_eq!(labels, vec!["Switching", "Breakdown", "Carry"]);
    }

    #[test]
    fn test_empty_mapping_emits_no_rows() {
        let rows = normalize_category("Voltage", &CategorySpecs::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_normalize_section_flattens_in_category_order() {
        let mut section = SectionData::default();
        section.insert(
            "Voltage".to_string(),
            category_with(&[("Switching", "200", Some("VDC"))]),
        );
        section.insert("Test Coil".to_string(), category_with(&[("", "Coil II", None)]));

        let rows = normalize_section(&section);
        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.category.clone(), r.specification.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Voltage".to_string(), "Switching".to_string()),
                ("Test Coil".to_string(), "".to_string()),
            ]
        );
    }
}
