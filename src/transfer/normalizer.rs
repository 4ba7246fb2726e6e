//! Turns untrusted transfer records into valid catalog items.

use thiserror::Error;
use uuid::Uuid;

use super::wire::TransferRecord;
use crate::models::{
    round_to_increment, Category, FoodComponent, FoodItem, FoodKind, ImageMetadata, ImageSource,
    MIN_PORTION_MULTIPLIER,
};

/// Category assigned when the catalog has no categories at all.
pub const UNASSIGNED_CATEGORY_ID: Uuid = Uuid::nil();

/// Why a record could not be imported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("record has no id")]
    MissingId,

    #[error("record id '{0}' is not a valid identifier")]
    MalformedId(String),

    #[error("record has no name")]
    MissingName,
}

/// Normalizes one record, or `None` if it must be rejected.
pub fn normalize(raw: &TransferRecord, existing_categories: &[Category]) -> Option<FoodItem> {
    match normalize_record(raw, existing_categories) {
        Ok(item) => Some(item),
        Err(reason) => {
            tracing::debug!("Rejected import record: {}", reason);
            None
        }
    }
}

/// Validates and normalizes one record.
///
/// Pure: the result depends only on `raw` and `existing_categories`.
pub fn normalize_record(
    raw: &TransferRecord,
    existing_categories: &[Category],
) -> Result<FoodItem, Rejection> {
    let id = match raw.id.as_deref().map(str::trim) {
        None | Some("") => return Err(Rejection::MissingId),
        Some(text) => Uuid::parse_str(text).map_err(|_| Rejection::MalformedId(text.to_string()))?,
    };

    let name = clean_text(raw.name.as_deref()).ok_or(Rejection::MissingName)?;

    let category_id = parse_id(raw.category_id.as_deref())
        .or_else(|| existing_categories.first().map(|c| c.id))
        .unwrap_or(UNASSIGNED_CATEGORY_ID);

    let portion_equivalent = rounded(raw.portion_equivalent).unwrap_or(1.0);

    // Amount and unit are kept only as a pair.
    let (amount_per_portion, unit_id) = match (
        rounded(raw.amount_per_portion),
        parse_id(raw.unit_id.as_deref()),
    ) {
        (Some(amount), Some(unit)) => (Some(amount), Some(unit)),
        _ => (None, None),
    };

    let kind = match raw.kind.as_deref() {
        None => FoodKind::default(),
        Some(tag) => tag.parse::<FoodKind>().unwrap_or_else(|e| {
            tracing::debug!("{}; treating record {} as single", e, id);
            FoodKind::default()
        }),
    };

    let source = raw
        .image_source
        .as_deref()
        .and_then(|tag| match tag.parse::<ImageSource>() {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::debug!("{}; dropping image source of record {}", e, id);
                None
            }
        });

    let components = if kind == FoodKind::Composite {
        normalize_components(id, raw)
    } else {
        Vec::new()
    };

    Ok(FoodItem {
        id,
        name,
        category_id,
        portion_equivalent,
        amount_per_portion,
        unit_id,
        notes: clean_text(raw.notes.as_deref()),
        is_favorite: raw.is_favorite.unwrap_or(false),
        image: ImageMetadata {
            path: clean_text(raw.image_path.as_deref()),
            remote_url: clean_text(raw.image_remote_url.as_deref()),
            source,
            source_id: clean_text(raw.image_source_id.as_deref()),
            attribution_name: clean_text(raw.image_attribution_name.as_deref()),
            attribution_url: clean_text(raw.image_attribution_url.as_deref()),
            source_url: clean_text(raw.image_source_url.as_deref()),
        },
        kind,
        components,
    })
}

fn normalize_components(own_id: Uuid, raw: &TransferRecord) -> Vec<FoodComponent> {
    raw.composite_components
        .iter()
        .flatten()
        .filter_map(|component| {
            let food_item_id = parse_id(component.food_item_id.as_deref())?;
            if food_item_id == own_id {
                return None;
            }
            let multiplier = positive(component.portion_multiplier)?;
            Some(FoodComponent::new(
                food_item_id,
                multiplier.max(MIN_PORTION_MULTIPLIER),
            ))
        })
        .collect()
}

fn parse_id(text: Option<&str>) -> Option<Uuid> {
    text.and_then(|t| Uuid::parse_str(t.trim()).ok())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Rounding can overflow near `f64::MAX`, so the result is checked again.
fn rounded(value: Option<f64>) -> Option<f64> {
    positive(value)
        .map(round_to_increment)
        .filter(|v| v.is_finite())
}

fn clean_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
