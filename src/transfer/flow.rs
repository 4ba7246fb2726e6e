//! File-level entry points: exporting the catalog and preparing an import.

use chrono::{DateTime, Utc};
use std::path::Path;

use super::apply::export_report;
use super::codec::{decode, encode};
use super::error::ImportError;
use super::plan::ImportPlan;
use crate::db::CatalogStore;
use crate::models::OperationReport;

/// `food-library-YYYYMMDD-HHMMSS.json`
pub fn default_export_file_name(now: DateTime<Utc>) -> String {
    format!("food-library-{}.json", now.format("%Y%m%d-%H%M%S"))
}

pub fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Writes the whole catalog to `path`.
pub async fn export_catalog<S: CatalogStore>(
    store: &S,
    path: &Path,
) -> Result<OperationReport, ImportError> {
    let items = store.list_food_items().await?;
    let categories = store.list_categories().await?;
    let units = store.list_units().await?;

    let bytes = encode(&items, &categories, &units, Utc::now())?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| ImportError::Encode(format!("{}: {}", path.display(), e)))?;

    tracing::info!("Exported {} item(s) to {}", items.len(), path.display());
    Ok(export_report(items.len(), file_name(path)))
}

pub async fn read_document(path: &Path) -> Result<Vec<u8>, ImportError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ImportError::UnreadableFile(format!("{}: {}", path.display(), e)))
}

/// Decodes `bytes` and classifies them against the current catalog.
///
/// Fails with [`ImportError::EmptyOrAllInvalid`] when nothing is importable.
pub async fn prepare_import<S: CatalogStore>(
    bytes: &[u8],
    store: &S,
) -> Result<ImportPlan, ImportError> {
    let records = decode(bytes)?;
    let categories = store.list_categories().await?;
    let existing = store.list_food_items().await?;

    let plan = ImportPlan::from_records(&records, &categories, &existing);
    if plan.is_empty() {
        return Err(ImportError::EmptyOrAllInvalid);
    }
    if plan.unassigned_category_count > 0 {
        tracing::warn!(
            "{} imported item(s) have no category; the library has no categories yet",
            plan.unassigned_category_count
        );
    }
    Ok(plan)
}
