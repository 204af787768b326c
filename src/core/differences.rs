use crate::core::align::SpecRow;
use crate::core::units::standardize_unit;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// One genuinely divergent specification across entities. `values` holds
/// only the entities that reported a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    pub category: String,
    pub specification: String,
    pub unit: Option<String>,
    pub values: BTreeMap<String, String>,
}

impl Difference {
    /// True when at least two distinct non-empty values are present.
    pub fn is_divergent(&self) -> bool {
        let unique: HashSet<&str> = self
            .values
            .values()
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .collect();
        unique.len() > 1
    }

    /// Canonical display form of the inferred unit, for presentation.
    pub fn standardized_unit(&self) -> Option<String> {
        self.unit.as_deref().map(standardize_unit)
    }
}

/// The detected difference set, in aligned-row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Differences {
    differences: Vec<Difference>,
}

impl Differences {
    pub fn iter(&self) -> impl Iterator<Item = &Difference> {
        self.differences.iter()
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn has_differences(&self) -> bool {
        self.differences.iter().any(Difference::is_divergent)
    }

    /// Payload shape consumed by the external insight generator: one key
    /// per difference, `"{category} - {specification}"`, mapping entity
    /// names to their values. Rows without both labels are skipped.
    pub fn to_analysis_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut analysis = serde_json::Map::new();
        for diff in &self.differences {
            if diff.category.is_empty() || diff.specification.is_empty() {
                continue;
            }
            let key = format!("{} - {}", diff.category, diff.specification);
            let values: serde_json::Map<String, serde_json::Value> = diff
                .values
                .iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
                .collect();
            analysis.insert(key, serde_json::Value::Object(values));
        }
        analysis
    }
}

/// Scans aligned rows for divergent values.
///
/// A row is a candidate once two entities report non-empty values, and a
/// confirmed difference when those values are not all identical (exact
/// string comparison). Returns the divergent rows (for the difference
/// table, in aligned order) alongside the structured records.
pub fn detect_differences(
    rows: &[SpecRow],
    entity_names: &[String],
) -> (Vec<SpecRow>, Differences) {
    let mut divergent_rows = Vec::new();
    let mut differences = Vec::new();

    for row in rows {
        if row.values.len() < 2 {
            continue;
        }
        let unique: HashSet<&str> = row.values.values().map(String::as_str).collect();
        if unique.len() < 2 {
            continue;
        }

        divergent_rows.push(row.clone());
        differences.push(Difference {
            category: row.category.clone(),
            specification: row.specification.clone(),
            unit: infer_unit(row, entity_names),
            values: row.values.clone(),
        });
    }

    (divergent_rows, Differences { differences })
}

// Best-effort unit recovery from rendered cells: scanning in entity
// order, the first value with more than one whitespace-separated token
// donates its trailing token. Cells are pre-formatted strings here, so
// this stays a display heuristic, never an error.
fn infer_unit(row: &SpecRow, entity_names: &[String]) -> Option<String> {
    for name in entity_names {
        if let Some(value) = row.values.get(name) {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if parts.len() > 1 {
                return parts.last().map(|part| part.to_string());
            }
        }
    }
    None
}
