//! Encoding the catalog into a transfer document and reading one back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

use super::error::ImportError;
use super::wire::{TransferComponent, TransferDocument, TransferRecord, FORMAT_VERSION};
use crate::models::{Category, FoodItem, Unit};

/// Header fields and records of a decoded document.
#[derive(Debug, Clone, Default)]
pub struct DecodedDocument {
    pub format_version: Option<u64>,
    pub exported_at: Option<String>,
    pub item_count: Option<u64>,
    pub records: Vec<TransferRecord>,
}

/// Encodes `items` as a pretty-printed document with sorted keys.
///
/// Category and unit names are denormalized into each record so the file is
/// readable on its own. Items keep the order they were given in.
pub fn encode(
    items: &[FoodItem],
    categories: &[Category],
    units: &[Unit],
    exported_at: DateTime<Utc>,
) -> Result<Vec<u8>, ImportError> {
    let category_names: HashMap<Uuid, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let units_by_id: HashMap<Uuid, &Unit> = units.iter().map(|u| (u.id, u)).collect();

    let document = TransferDocument {
        format_version: FORMAT_VERSION,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        item_count: items.len(),
        items: items
            .iter()
            .map(|item| to_record(item, &category_names, &units_by_id))
            .collect(),
    };

    let value =
        serde_json::to_value(&document).map_err(|e| ImportError::Encode(e.to_string()))?;
    serde_json::to_vec_pretty(&sort_keys(value))
        .map_err(|e| ImportError::Encode(e.to_string()))
}

/// Decodes the records of a document, see [`decode_document`].
pub fn decode(bytes: &[u8]) -> Result<Vec<TransferRecord>, ImportError> {
    Ok(decode_document(bytes)?.records)
}

/// Reads a document permissively.
///
/// Only a structurally broken file is an error. A missing `items` array reads
/// as empty, and an element that is not a record at all becomes an empty
/// record that validation will reject.
pub fn decode_document(bytes: &[u8]) -> Result<DecodedDocument, ImportError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ImportError::UnreadableFile(e.to_string()))?;

    let Value::Object(mut root) = value else {
        return Err(ImportError::UnreadableFile(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let records: Vec<TransferRecord> = match root.remove("items") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| decode_record(index, item))
            .collect(),
        Some(_) => {
            return Err(ImportError::UnreadableFile(
                "\"items\" must be an array".to_string(),
            ))
        }
    };

    let format_version = root.get("formatVersion").and_then(Value::as_u64);
    let exported_at = root
        .get("exportedAt")
        .and_then(Value::as_str)
        .map(str::to_string);
    let item_count = root.get("itemCount").and_then(Value::as_u64);

    if let Some(version) = format_version {
        if version > u64::from(FORMAT_VERSION) {
            tracing::warn!(
                "Document format version {} is newer than supported version {}; reading anyway",
                version,
                FORMAT_VERSION
            );
        }
    }
    if let Some(count) = item_count {
        if count != records.len() as u64 {
            tracing::debug!(
                "Document declares {} item(s) but contains {}",
                count,
                records.len()
            );
        }
    }

    Ok(DecodedDocument {
        format_version,
        exported_at,
        item_count,
        records,
    })
}

fn decode_record(index: usize, value: Value) -> TransferRecord {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::debug!("Item {} is not a readable record: {}", index, e);
        TransferRecord::default()
    })
}

fn to_record(
    item: &FoodItem,
    category_names: &HashMap<Uuid, &str>,
    units_by_id: &HashMap<Uuid, &Unit>,
) -> TransferRecord {
    let unit = item.unit_id.and_then(|id| units_by_id.get(&id));

    TransferRecord {
        id: Some(item.id.to_string()),
        name: Some(item.name.clone()),
        category_id: Some(item.category_id.to_string()),
        category_name: category_names
            .get(&item.category_id)
            .map(|name| name.to_string()),
        portion_equivalent: Some(item.portion_equivalent),
        amount_per_portion: item.amount_per_portion,
        unit_id: item.unit_id.map(|id| id.to_string()),
        unit_name: unit.map(|u| u.name.clone()),
        unit_symbol: unit.map(|u| u.symbol.clone()),
        notes: item.notes.clone(),
        is_favorite: Some(item.is_favorite),
        image_path: item.image.path.clone(),
        image_remote_url: item.image.remote_url.clone(),
        image_source: item.image.source.map(|s| s.to_string()),
        image_source_id: item.image.source_id.clone(),
        image_attribution_name: item.image.attribution_name.clone(),
        image_attribution_url: item.image.attribution_url.clone(),
        image_source_url: item.image.source_url.clone(),
        kind: Some(item.kind.to_string()),
        composite_components: item.is_composite().then(|| {
            item.components
                .iter()
                .map(|c| TransferComponent {
                    food_item_id: Some(c.food_item_id.to_string()),
                    portion_multiplier: Some(c.portion_multiplier),
                })
                .collect()
        }),
    }
}

/// Rebuilds every object with its keys in sorted order.
///
/// `serde_json::Map` only sorts while the `preserve_order` feature is off, and
/// any crate in the build graph can turn it on.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
