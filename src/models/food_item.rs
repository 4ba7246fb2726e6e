use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::food_kind::FoodKind;
use super::image_source::ImageSource;

/// Step that portion equivalents and amounts are rounded to.
pub const PORTION_INCREMENT: f64 = 0.25;

/// Smallest multiplier a composite component may carry.
pub const MIN_PORTION_MULTIPLIER: f64 = 0.1;

/// Rounds a positive value to the nearest [`PORTION_INCREMENT`], never below one increment.
pub fn round_to_increment(value: f64) -> f64 {
    let rounded = (value / PORTION_INCREMENT).round() * PORTION_INCREMENT;
    rounded.max(PORTION_INCREMENT)
}

/// A reference from a composite food to one of its parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodComponent {
    pub food_item_id: Uuid,
    pub portion_multiplier: f64,
}

impl FoodComponent {
    pub fn new(food_item_id: Uuid, portion_multiplier: f64) -> Self {
        Self {
            food_item_id,
            portion_multiplier,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageMetadata {
    pub path: Option<String>,
    pub remote_url: Option<String>,
    pub source: Option<ImageSource>,
    pub source_id: Option<String>,
    pub attribution_name: Option<String>,
    pub attribution_url: Option<String>,
    pub source_url: Option<String>,
}

impl ImageMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub portion_equivalent: f64,
    /// Always paired with `unit_id`.
    pub amount_per_portion: Option<f64>,
    pub unit_id: Option<Uuid>,
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub image: ImageMetadata,
    pub kind: FoodKind,
    /// Only populated for composite items.
    pub components: Vec<FoodComponent>,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, category_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category_id,
            portion_equivalent: 1.0,
            amount_per_portion: None,
            unit_id: None,
            notes: None,
            is_favorite: false,
            image: ImageMetadata::default(),
            kind: FoodKind::Single,
            components: Vec::new(),
        }
    }

    pub fn with_portion_equivalent(mut self, portion_equivalent: f64) -> Self {
        self.portion_equivalent = portion_equivalent;
        self
    }

    pub fn with_amount(mut self, amount_per_portion: f64, unit_id: Uuid) -> Self {
        self.amount_per_portion = Some(amount_per_portion);
        self.unit_id = Some(unit_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn with_image(mut self, image: ImageMetadata) -> Self {
        self.image = image;
        self
    }

    pub fn with_components(mut self, components: Vec<FoodComponent>) -> Self {
        self.kind = FoodKind::Composite;
        self.components = components;
        self
    }

    pub fn is_composite(&self) -> bool {
        self.kind == FoodKind::Composite
    }

    /// Same record under a freshly generated id.
    pub fn duplicated(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_favorite {
            write!(f, " *")?;
        }
        write!(f, " ({} portion", self.portion_equivalent)?;
        if let Some(amount) = self.amount_per_portion {
            write!(f, ", {} per portion", amount)?;
        }
        write!(f, ")")?;
        if self.is_composite() {
            write!(f, " [{} components]", self.components.len())?;
        }
        Ok(())
    }
}
