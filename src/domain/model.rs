use crate::core::comparison::ComparisonResult;
use crate::utils::error::{CompareError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One extracted specification value. `unit` is absent for dimensionless
/// specs; an empty unit string from the extractor is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecValue {
    pub value: String,
    pub unit: Option<String>,
}

impl SpecValue {
    pub fn new(value: impl Into<String>, unit: Option<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Cell rendering used by the aligner: `"{value} {unit}"` or `"{value}"`.
    pub fn display(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {}", self.value, unit),
            None => self.value.clone(),
        }
    }
}

/// Subcategory key → SpecValue, in extraction order. The empty key is a
/// meaningful first-class key ("no finer subdivision"), so this must never
/// be re-keyed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySpecs {
    entries: Vec<(String, SpecValue)>,
}

impl CategorySpecs {
    pub fn insert(&mut self, key: String, value: SpecValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&SpecValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Category name → CategorySpecs, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionData {
    categories: Vec<(String, CategorySpecs)>,
}

impl SectionData {
    pub fn insert(&mut self, name: String, specs: CategorySpecs) {
        if let Some(entry) = self.categories.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = specs;
        } else {
            self.categories.push((name, specs));
        }
    }

    pub fn get(&self, name: &str) -> Option<&CategorySpecs> {
        self.categories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategorySpecs)> {
        self.categories.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// One document's full extraction: sections plus feature/advantage lists,
/// keyed by entity name. Read-only input to the comparison core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpecs {
    pub entity_name: String,
    pub sections: Vec<(String, SectionData)>,
    pub features: Vec<String>,
    pub advantages: Vec<String>,
    pub diagram_path: Option<String>,
}

impl EntitySpecs {
    pub fn section(&self, name: &str) -> Option<&SectionData> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Decodes one extractor aggregate. This is the single explicit
    /// normalization step at the input boundary: names and keys are
    /// trimmed, scalar values are coerced to strings, and anything that
    /// does not match the contract aborts the decode.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let obj = raw.as_object().ok_or_else(|| CompareError::ValidationError {
            message: "entity aggregate must be a JSON object".to_string(),
        })?;

        let entity_name = obj
            .get("entity_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if entity_name.is_empty() {
            return Err(CompareError::ValidationError {
                message: "entity aggregate is missing a non-empty 'entity_name'".to_string(),
            });
        }

        let sections_obj = obj
            .get("sections")
            .and_then(Value::as_object)
            .ok_or_else(|| CompareError::ValidationError {
                message: format!("entity '{}': 'sections' must be a JSON object", entity_name),
            })?;

        let mut sections = Vec::new();
        for (section_name, section_val) in sections_obj {
            let section = decode_section(&entity_name, section_name, section_val)?;
            sections.push((section_name.trim().to_string(), section));
        }

        let (features, advantages) = match obj.get("features_advantages") {
            Some(fa) => decode_features_advantages(&entity_name, fa)?,
            // Older extractions carry features as a text blob inside a
            // Features_And_Advantages section instead.
            None => listings_from_sections(&sections),
        };

        let diagram_path = obj
            .get("diagram_path")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self {
            entity_name,
            sections,
            features,
            advantages,
            diagram_path,
        })
    }
}

/// What the pipeline's transform stage hands to the load stage.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutput {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ComparisonResult,
}

fn decode_section(entity_name: &str, section_name: &str, raw: &Value) -> Result<SectionData> {
    let categories_obj = raw
        .get("categories")
        .and_then(Value::as_object)
        .ok_or_else(|| CompareError::ValidationError {
            message: format!(
                "entity '{}': section '{}' is missing a 'categories' object",
                entity_name, section_name
            ),
        })?;

    let mut section = SectionData::default();
    for (category_name, category_val) in categories_obj {
        let subcategories_obj = category_val
            .get("subcategories")
            .and_then(Value::as_object)
            .ok_or_else(|| CompareError::ValidationError {
                message: format!(
                    "entity '{}': category '{}' in section '{}' is missing a 'subcategories' object",
                    entity_name, category_name, section_name
                ),
            })?;

        let mut specs = CategorySpecs::default();
        for (subcat_key, spec_val) in subcategories_obj {
            let value = spec_val.get("value").and_then(coerce_scalar).ok_or_else(|| {
                CompareError::ValidationError {
                    message: format!(
                        "entity '{}': subcategory '{}' of category '{}' has no scalar 'value'",
                        entity_name, subcat_key, category_name
                    ),
                }
            })?;
            let unit = spec_val
                .get("unit")
                .and_then(Value::as_str)
                .map(str::to_string);

            specs.insert(subcat_key.trim().to_string(), SpecValue::new(value, unit));
        }
        section.insert(category_name.trim().to_string(), specs);
    }

    Ok(section)
}

fn coerce_scalar(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode_features_advantages(
    entity_name: &str,
    raw: &Value,
) -> Result<(Vec<String>, Vec<String>)> {
    let features = decode_string_list(entity_name, "features", raw.get("features"))?;
    let advantages = decode_string_list(entity_name, "advantages", raw.get("advantages"))?;
    Ok((features, advantages))
}

fn decode_string_list(entity_name: &str, field: &str, raw: Option<&Value>) -> Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let items = raw.as_array().ok_or_else(|| CompareError::ValidationError {
        message: format!("entity '{}': '{}' must be an array", entity_name, field),
    })?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let text = item.as_str().ok_or_else(|| CompareError::ValidationError {
            message: format!(
                "entity '{}': '{}' entries must be strings",
                entity_name, field
            ),
        })?;
        out.push(text.to_string());
    }
    Ok(out)
}

const FEATURES_SECTION: &str = "Features_And_Advantages";

fn listings_from_sections(sections: &[(String, SectionData)]) -> (Vec<String>, Vec<String>) {
    let Some(section) = sections
        .iter()
        .find(|(name, _)| name == FEATURES_SECTION)
        .map(|(_, s)| s)
    else {
        return (Vec::new(), Vec::new());
    };

    let listing = |category: &str| -> Vec<String> {
        section
            .get(category)
            .and_then(|specs| specs.get(""))
            .map(|value| collect_bullet_items(&value.value))
            .unwrap_or_default()
    };

    (listing("Features"), listing("Advantages"))
}

/// Splits a feature text blob into items, merging wrapped bullet lines
/// back onto the bullet that started them.
pub(crate) fn collect_bullet_items(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('•') || line.starts_with('-') {
            if !current.is_empty() {
                items.push(std::mem::take(&mut current));
            }
            current = line.to_string();
        } else if current.is_empty() {
            // 第一行可能沒有符號
            current = line.to_string();
        } else {
            current = format!("{} {}", current, line);
        }
    }

    if !current.is_empty() {
        items.push(current);
    }

    items
}
