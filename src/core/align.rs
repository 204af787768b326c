use crate::core::normalize::normalize_section;
use crate::domain::model::EntitySpecs;
use std::collections::{BTreeMap, HashSet};

/// One aligned specification row. `values` holds only the entities that
/// reported a non-empty value; the table builder pads the rest with "".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub category: String,
    pub specification: String,
    pub values: BTreeMap<String, String>,
}

/// One aligned feature/advantage row. The label is the listed string
/// itself; per-entity values mark presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRow {
    pub label: String,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Features,
    Advantages,
}

impl Listing {
    fn items<'a>(&self, entity: &'a EntitySpecs) -> &'a [String] {
        match self {
            Listing::Features => &entity.features,
            Listing::Advantages => &entity.advantages,
        }
    }
}

/// Aligns one section across all entities.
///
/// The reference entity is the first one (caller order) whose sections
/// contain `section_name`; its (category, specification) keys define the
/// row set and the row order. Entities lacking a key contribute nothing
/// to that row. Rows where no entity has a non-empty value are dropped.
/// No entity with the section means zero rows, not an error.
pub fn align_section(entities: &[EntitySpecs], section_name: &str) -> Vec<SpecRow> {
    let Some(reference) = entities
        .iter()
        .find_map(|entity| entity.section(section_name))
    else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for key in normalize_section(reference) {
        let mut values = BTreeMap::new();
        for entity in entities {
            let rendered = entity
                .section(section_name)
                .and_then(|section| section.get(&key.category))
                .and_then(|category| category.get(&key.specification))
                .map(|spec_value| spec_value.display().trim().to_string())
                .unwrap_or_default();
            if !rendered.is_empty() {
                values.insert(entity.entity_name.clone(), rendered);
            }
        }

        if !values.is_empty() {
            rows.push(SpecRow {
                category: key.category,
                specification: key.specification,
                values,
            });
        }
    }

    rows
}

/// Aligns feature or advantage lists across all entities.
///
/// The reference entity is the first one with a non-empty list; one row
/// per distinct item in its order. Per-entity value is the item itself
/// when that entity lists it, used downstream as a presence marker.
pub fn align_listing(entities: &[EntitySpecs], listing: Listing) -> Vec<LabelRow> {
    let Some(reference) = entities
        .iter()
        .find(|entity| !listing.items(entity).is_empty())
    else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for item in listing.items(reference) {
        let label = item.trim();
        if label.is_empty() || !seen.insert(label.to_string()) {
            continue;
        }

        let mut values = BTreeMap::new();
        for entity in entities {
            if listing
                .items(entity)
                .iter()
                .any(|candidate| candidate.trim() == label)
            {
                values.insert(entity.entity_name.clone(), label.to_string());
            }
        }

        rows.push(LabelRow {
            label: label.to_string(),
            values,
        });
    }

    rows
}
