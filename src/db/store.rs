//! The persistence boundary the transfer engine talks to.

use thiserror::Error;

use crate::models::{Category, FoodItem, Unit};

/// Human-readable failure reported by a catalog store.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}

/// Read access to the catalog plus a single batch write.
///
/// `upsert_food_items` must apply the whole batch or nothing.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn list_food_items(&self) -> Result<Vec<FoodItem>, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError>;

    async fn upsert_food_items(&self, items: &[FoodItem]) -> Result<(), StoreError>;
}
