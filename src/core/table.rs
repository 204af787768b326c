use crate::core::align::{LabelRow, SpecRow};
use crate::utils::error::{CompareError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_unique_names};
use serde::ser::{Serialize, SerializeStruct, Serializer};

pub const CATEGORY_COLUMN: &str = "Category";
pub const SPECIFICATION_COLUMN: &str = "Specification";

/// Dense rectangular comparison table: every row has exactly one cell per
/// column, missing values are empty strings. Construction is the only way
/// to build one, so rectangularity holds by construction rather than by a
/// tabular library's fill behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the specification-shaped table: `[Category?, Specification?,
    /// entity...]`. The label columns are included only when at least one
    /// row carries a non-empty value for them.
    pub fn from_spec_rows(rows: &[SpecRow], entity_names: &[String]) -> Result<Self> {
        validate_entities(entity_names)?;
        for row in rows {
            validate_known_entities(row.values.keys(), entity_names)?;
        }

        if rows.is_empty() {
            return Ok(Self::empty());
        }

        let has_category = rows.iter().any(|row| !row.category.is_empty());
        let has_specification = rows.iter().any(|row| !row.specification.is_empty());

        let mut columns = Vec::new();
        if has_category {
            columns.push(CATEGORY_COLUMN.to_string());
        }
        if has_specification {
            columns.push(SPECIFICATION_COLUMN.to_string());
        }
        columns.extend(entity_names.iter().cloned());

        let mut cells = Vec::with_capacity(rows.len());
        for row in rows {
            let mut line = Vec::with_capacity(columns.len());
            if has_category {
                line.push(row.category.clone());
            }
            if has_specification {
                line.push(row.specification.clone());
            }
            for name in entity_names {
                line.push(row.values.get(name).cloned().unwrap_or_default());
            }
            cells.push(line);
        }

        Ok(Self {
            columns,
            rows: cells,
        })
    }

    /// Builds the feature/advantage-shaped table: a blank-named label
    /// column followed by one column per entity.
    pub fn from_label_rows(rows: &[LabelRow], entity_names: &[String]) -> Result<Self> {
        validate_entities(entity_names)?;
        for row in rows {
            validate_known_entities(row.values.keys(), entity_names)?;
        }

        if rows.is_empty() {
            return Ok(Self::empty());
        }

        let mut columns = vec![String::new()];
        columns.extend(entity_names.iter().cloned());

        let mut cells = Vec::with_capacity(rows.len());
        for row in rows {
            let mut line = Vec::with_capacity(columns.len());
            line.push(row.label.clone());
            for name in entity_names {
                line.push(row.values.get(name).cloned().unwrap_or_default());
            }
            cells.push(line);
        }

        Ok(Self {
            columns,
            rows: cells,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> Result<String> {
        if self.columns.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CompareError::ProcessingError {
                message: format!("CSV writer flush failed: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| CompareError::ProcessingError {
            message: format!("CSV output is not valid UTF-8: {}", e),
        })
    }

    /// Fixed-width plain-text rendering for terminal display.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(column.len()))
                    .max()
                    .unwrap_or(0)
                    + 2
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let header = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{:<width$}", column, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(header.clone());
        lines.push("-".repeat(header.len()));

        for row in &self.rows {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(line);
        }

        lines.join("\n")
    }
}

// Serialized shape is the API contract: {"columns": [...], "data":
// [{column: value, ...}]}, with object keys in column order.
impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data: Vec<serde_json::Map<String, serde_json::Value>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        (column.clone(), serde_json::Value::String(cell.clone()))
                    })
                    .collect()
            })
            .collect();

        let mut state = serializer.serialize_struct("Table", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("data", &data)?;
        state.end()
    }
}

fn validate_entities(entity_names: &[String]) -> Result<()> {
    if entity_names.is_empty() {
        return Err(CompareError::ValidationError {
            message: "entity name list cannot be empty".to_string(),
        });
    }
    for name in entity_names {
        validate_non_empty_string("entity_names", name).map_err(|_| {
            CompareError::ValidationError {
                message: "entity names cannot be empty".to_string(),
            }
        })?;
    }
    validate_unique_names("entity_names", entity_names)
}

fn validate_known_entities<'a>(
    used: impl Iterator<Item = &'a String>,
    entity_names: &[String],
) -> Result<()> {
    for name in used {
        if !entity_names.contains(name) {
            return Err(CompareError::ValidationError {
                message: format!("row references unknown entity '{}'", name),
            });
        }
    }
    Ok(())
}
