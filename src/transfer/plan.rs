//! Classifying incoming records against the live catalog.

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::normalizer::{normalize, UNASSIGNED_CATEGORY_ID};
use super::wire::TransferRecord;
use crate::models::{Category, FoodItem};

/// An incoming item whose id already exists in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub existing: FoodItem,
    pub incoming: FoodItem,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub total_in_file: usize,
    pub invalid_count: usize,
    pub duplicate_in_file_count: usize,
    /// Items placed in [`UNASSIGNED_CATEGORY_ID`] because no category exists.
    pub unassigned_category_count: usize,
    pub new_items: Vec<FoodItem>,
    pub conflicts: Vec<Conflict>,
}

/// Counts shown when asking the user to confirm an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_in_file: usize,
    pub valid_count: usize,
    pub new_count: usize,
    pub conflict_count: usize,
    pub skipped_count: usize,
}

impl ImportPlan {
    /// Builds a plan with the standard normalizer.
    pub fn from_records(
        raw_records: &[TransferRecord],
        existing_categories: &[Category],
        existing_catalog: &[FoodItem],
    ) -> Self {
        build_plan(
            raw_records,
            |raw| normalize(raw, existing_categories),
            existing_catalog,
        )
    }

    pub fn valid_count(&self) -> usize {
        self.new_items.len() + self.conflicts.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.invalid_count + self.duplicate_in_file_count
    }

    /// True when nothing in the file can be imported.
    pub fn is_empty(&self) -> bool {
        self.valid_count() == 0
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            total_in_file: self.total_in_file,
            valid_count: self.valid_count(),
            new_count: self.new_items.len(),
            conflict_count: self.conflicts.len(),
            skipped_count: self.skipped_count(),
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items in file: {}", self.total_in_file)?;
        writeln!(f, "New: {}", self.new_count)?;
        writeln!(f, "Already in library: {}", self.conflict_count)?;
        if self.skipped_count > 0 {
            writeln!(f, "Skipped (invalid or duplicate): {}", self.skipped_count)?;
        }
        Ok(())
    }
}

/// Normalizes, deduplicates and partitions `raw_records`.
///
/// Within the file the last record for an id wins but keeps the position of
/// the first one. Every displaced record counts as a duplicate.
pub fn build_plan<F>(
    raw_records: &[TransferRecord],
    normalizer: F,
    existing_catalog: &[FoodItem],
) -> ImportPlan
where
    F: Fn(&TransferRecord) -> Option<FoodItem>,
{
    let mut invalid_count = 0;
    let mut duplicate_in_file_count = 0;
    let mut deduped: Vec<FoodItem> = Vec::with_capacity(raw_records.len());
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for raw in raw_records {
        let Some(item) = normalizer(raw) else {
            invalid_count += 1;
            continue;
        };

        match positions.get(&item.id) {
            Some(&position) => {
                duplicate_in_file_count += 1;
                deduped[position] = item;
            }
            None => {
                positions.insert(item.id, deduped.len());
                deduped.push(item);
            }
        }
    }

    let existing: HashMap<Uuid, &FoodItem> =
        existing_catalog.iter().map(|item| (item.id, item)).collect();

    let unassigned_category_count = deduped
        .iter()
        .filter(|item| item.category_id == UNASSIGNED_CATEGORY_ID)
        .count();

    let mut new_items = Vec::new();
    let mut conflicts = Vec::new();
    for item in deduped {
        match existing.get(&item.id) {
            Some(current) => conflicts.push(Conflict {
                existing: (*current).clone(),
                incoming: item,
            }),
            None => new_items.push(item),
        }
    }

    tracing::info!(
        "Import plan: {} in file, {} new, {} conflicting, {} invalid, {} duplicate",
        raw_records.len(),
        new_items.len(),
        conflicts.len(),
        invalid_count,
        duplicate_in_file_count
    );

    ImportPlan {
        total_in_file: raw_records.len(),
        invalid_count,
        duplicate_in_file_count,
        unassigned_category_count,
        new_items,
        conflicts,
    }
}
