//! Writing a resolved import to the catalog and reporting on it.

use super::error::ImportError;
use super::resolver::Resolution;
use crate::db::CatalogStore;
use crate::models::{Operation, OperationReport};

/// Writes every resolved item in a single store call.
///
/// On failure nothing is reported and `resolution` is left intact, so the
/// caller may retry or discard it.
pub async fn apply<S: CatalogStore>(
    resolution: &Resolution,
    store: &S,
    file_name: Option<String>,
) -> Result<OperationReport, ImportError> {
    let items = resolution.items();

    if resolution.is_empty() {
        tracing::info!("Nothing to write; every conflict was kept");
    } else {
        store.upsert_food_items(&items).await.map_err(|e| {
            tracing::error!("Failed to write {} imported item(s): {}", items.len(), e);
            ImportError::from(e)
        })?;
    }

    let mut report = OperationReport::new(Operation::Import).with_file_name(file_name);
    report.processed_count = items.len();
    report.added_count = resolution.added_count();
    report.changed_count = resolution.changed_count();
    report.kept_count = resolution.kept_count;
    report.skipped_count = resolution.skipped_count;

    tracing::info!(
        "Imported {} item(s): {} added, {} replaced",
        report.processed_count,
        report.added_count,
        report.changed_count
    );
    Ok(report)
}

pub fn export_report(exported_count: usize, file_name: Option<String>) -> OperationReport {
    let mut report = OperationReport::new(Operation::Export).with_file_name(file_name);
    report.processed_count = exported_count;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::{FoodItem, RagStatus};
    use crate::transfer::plan::{Conflict, ImportPlan};
    use crate::transfer::resolver::{resolve_bulk, BulkDecision, Decision, ReviewSession, SessionState};
    use uuid::Uuid;

    fn conflict_with(existing: &FoodItem, name: &str) -> Conflict {
        let mut incoming = existing.clone();
        incoming.name = name.to_string();
        Conflict {
            existing: existing.clone(),
            incoming,
        }
    }

    fn review(plan: ImportPlan, decisions: &[Decision]) -> SessionState {
        let mut state = ReviewSession::start(plan);
        for decision in decisions {
            state = match state {
                SessionState::Reviewing(session) => session.submit_decision(*decision),
                other => return other,
            };
        }
        state
    }

    #[tokio::test]
    async fn test_apply_accounting_for_mixed_review() {
        let category = Uuid::new_v4();
        let kept = FoodItem::new("Kept", category);
        let replaced = FoodItem::new("Replaced", category);
        let copied = FoodItem::new("Copied", category);
        let store = MemoryStore::new(
            vec![kept.clone(), replaced.clone(), copied.clone()],
            vec![],
            vec![],
        );

        let plan = ImportPlan {
            total_in_file: 5,
            new_items: vec![
                FoodItem::new("New 1", category),
                FoodItem::new("New 2", category),
            ],
            conflicts: vec![
                conflict_with(&replaced, "Replaced v2"),
                conflict_with(&copied, "Copied v2"),
                conflict_with(&kept, "Kept v2"),
            ],
            ..ImportPlan::default()
        };

        let state = review(
            plan,
            &[Decision::Replace, Decision::ImportAsCopy, Decision::Keep],
        );
        let SessionState::Done(resolution) = state else {
            panic!("review should be done");
        };

        let report = apply(&resolution, &store, Some("foods.json".to_string()))
            .await
            .unwrap();

        assert_eq!(report.operation, Operation::Import);
        assert_eq!(report.status, RagStatus::Green);
        assert_eq!(report.processed_count, 4);
        assert_eq!(report.added_count, 3);
        assert_eq!(report.changed_count, 1);
        assert_eq!(report.kept_count, 1);
        assert_eq!(report.file_name.as_deref(), Some("foods.json"));
        assert_eq!(store.upsert_calls(), 1);

        let stored = store.snapshot();
        assert_eq!(stored.len(), 6);
        let name_of = |id: Uuid| stored.iter().find(|i| i.id == id).unwrap().name.clone();
        assert_eq!(name_of(kept.id), "Kept");
        assert_eq!(name_of(replaced.id), "Replaced v2");
        assert_eq!(name_of(copied.id), "Copied");
        assert!(stored.iter().any(|i| i.name == "Copied v2" && i.id != copied.id));
    }

    #[tokio::test]
    async fn test_cancelled_review_never_touches_store() {
        let existing = FoodItem::new("X", Uuid::new_v4());
        let store = MemoryStore::new(vec![existing.clone()], vec![], vec![]);
        let plan = ImportPlan {
            new_items: vec![FoodItem::new("Y", Uuid::new_v4())],
            conflicts: vec![conflict_with(&existing, "X v2")],
            ..ImportPlan::default()
        };

        let state = review(plan, &[Decision::CancelReview]);
        assert!(matches!(state, SessionState::Cancelled));
        assert_eq!(store.upsert_calls(), 0);
        assert_eq!(store.snapshot(), vec![existing]);
    }

    #[tokio::test]
    async fn test_store_failure_produces_no_report() {
        let store = MemoryStore::failing("database is locked");
        let plan = ImportPlan {
            new_items: vec![FoodItem::new("Y", Uuid::new_v4())],
            ..ImportPlan::default()
        };
        let resolution = resolve_bulk(plan, BulkDecision::ReplaceAll);

        let err = apply(&resolution, &store, None).await.unwrap_err();
        assert_eq!(
            err,
            ImportError::StoreFailure("database is locked".to_string())
        );
        // The resolution is still usable for a retry
        assert_eq!(resolution.items().len(), 1);
    }

    #[tokio::test]
    async fn test_all_kept_skips_store_call() {
        let existing = FoodItem::new("X", Uuid::new_v4());
        let store = MemoryStore::new(vec![existing.clone()], vec![], vec![]);
        let plan = ImportPlan {
            conflicts: vec![conflict_with(&existing, "X v2")],
            ..ImportPlan::default()
        };

        let resolution = resolve_bulk(plan, BulkDecision::KeepAll);
        let report = apply(&resolution, &store, None).await.unwrap();

        assert_eq!(store.upsert_calls(), 0);
        assert_eq!(report.processed_count, 0);
        assert_eq!(report.kept_count, 1);
    }

    #[test]
    fn test_export_report_shape() {
        let report = export_report(12, Some("backup.json".to_string()));
        assert_eq!(report.operation, Operation::Export);
        assert_eq!(report.status, RagStatus::Green);
        assert_eq!(report.processed_count, 12);
        assert_eq!(report.added_count, 0);
        assert_eq!(report.changed_count, 0);
    }
}
