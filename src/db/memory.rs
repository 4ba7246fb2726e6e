//! In-memory catalog store for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::store::{CatalogStore, StoreError};
use crate::models::{Category, FoodItem, Unit};

#[derive(Default)]
pub struct MemoryStore {
    pub items: Mutex<Vec<FoodItem>>,
    pub categories: Vec<Category>,
    pub units: Vec<Unit>,
    pub fail_with: Option<String>,
    upsert_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(items: Vec<FoodItem>, categories: Vec<Category>, units: Vec<Unit>) -> Self {
        Self {
            items: Mutex::new(items),
            categories,
            units,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<FoodItem> {
        self.items.lock().unwrap().clone()
    }
}

impl CatalogStore for MemoryStore {
    async fn list_food_items(&self) -> Result<Vec<FoodItem>, StoreError> {
        Ok(self.snapshot())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.clone())
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        Ok(self.units.clone())
    }

    async fn upsert_food_items(&self, items: &[FoodItem]) -> Result<(), StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(StoreError(message.clone()));
        }

        let mut stored = self.items.lock().unwrap();
        for item in items {
            match stored.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => *existing = item.clone(),
                None => stored.push(item.clone()),
            }
        }
        Ok(())
    }
}
