//! Turning an import plan and the user's decisions into the items to write.

use uuid::Uuid;

use super::plan::{Conflict, ImportPlan};
use crate::models::{Category, FoodItem};

/// The items an import will write, grouped by how they were decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub new_items: Vec<FoodItem>,
    pub replacements: Vec<FoodItem>,
    pub copies: Vec<FoodItem>,
    pub kept_count: usize,
    /// Invalid and duplicate records carried over from the plan.
    pub skipped_count: usize,
}

impl Resolution {
    /// The plan's new items and nothing else.
    pub fn without_conflicts(plan: &ImportPlan) -> Self {
        Self {
            new_items: plan.new_items.clone(),
            skipped_count: plan.skipped_count(),
            ..Self::default()
        }
    }

    /// New items, then replacements, then copies.
    pub fn items(&self) -> Vec<FoodItem> {
        self.new_items
            .iter()
            .chain(&self.replacements)
            .chain(&self.copies)
            .cloned()
            .collect()
    }

    pub fn added_count(&self) -> usize {
        self.new_items.len() + self.copies.len()
    }

    pub fn changed_count(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty() && self.replacements.is_empty() && self.copies.is_empty()
    }
}

/// One answer applied to every conflict at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkDecision {
    ReplaceAll,
    KeepAll,
}

/// Resolves a plan without asking per conflict.
///
/// A plan without conflicts resolves to its new items whatever the decision.
pub fn resolve_bulk(plan: ImportPlan, decision: BulkDecision) -> Resolution {
    let conflict_count = plan.conflicts.len();
    let mut resolution = Resolution::without_conflicts(&plan);

    match decision {
        BulkDecision::ReplaceAll => {
            resolution.replacements = plan.conflicts.into_iter().map(|c| c.incoming).collect();
        }
        BulkDecision::KeepAll => {
            resolution.kept_count = conflict_count;
        }
    }
    resolution
}

/// The user's answer for the conflict under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Overwrite the existing item with the incoming one.
    Replace,
    /// Leave the existing item untouched.
    Keep,
    /// Add the incoming item under a new id.
    ImportAsCopy,
    /// Abandon the whole import.
    CancelReview,
}

#[derive(Debug)]
pub enum SessionState {
    Reviewing(ReviewSession),
    Done(Resolution),
    Cancelled,
}

/// Step-by-step review of a plan's conflicts, in plan order.
///
/// Each decision consumes the session, so a conflict cannot be skipped or
/// answered twice.
#[derive(Debug)]
pub struct ReviewSession {
    plan: ImportPlan,
    index: usize,
    replacements: Vec<FoodItem>,
    copies: Vec<FoodItem>,
    kept_count: usize,
}

impl ReviewSession {
    /// Starts reviewing `plan`. A plan without conflicts is done immediately.
    pub fn start(plan: ImportPlan) -> SessionState {
        Self {
            plan,
            index: 0,
            replacements: Vec::new(),
            copies: Vec::new(),
            kept_count: 0,
        }
        .advance()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.plan.conflicts.len()
    }

    pub fn remaining(&self) -> usize {
        self.total() - self.index
    }

    /// The conflict awaiting a decision.
    pub fn current(&self) -> &Conflict {
        &self.plan.conflicts[self.index]
    }

    pub fn submit_decision(mut self, decision: Decision) -> SessionState {
        let incoming = &self.plan.conflicts[self.index].incoming;

        match decision {
            Decision::Replace => self.replacements.push(incoming.clone()),
            Decision::Keep => self.kept_count += 1,
            Decision::ImportAsCopy => self.copies.push(incoming.duplicated()),
            Decision::CancelReview => {
                tracing::info!(
                    "Import review cancelled at conflict {} of {}",
                    self.index + 1,
                    self.total()
                );
                return SessionState::Cancelled;
            }
        }
        tracing::debug!(
            "Conflict {} ({}) resolved as {:?}",
            self.index + 1,
            incoming.id,
            decision
        );

        self.index += 1;
        self.advance()
    }

    fn advance(self) -> SessionState {
        if self.index < self.plan.conflicts.len() {
            return SessionState::Reviewing(self);
        }

        let mut resolution = Resolution::without_conflicts(&self.plan);
        resolution.replacements = self.replacements;
        resolution.copies = self.copies;
        resolution.kept_count = self.kept_count;
        SessionState::Done(resolution)
    }
}

/// A conflict with the display names of both records' categories.
#[derive(Debug, Clone)]
pub struct ConflictView<'a> {
    pub conflict: &'a Conflict,
    pub existing_category: String,
    pub incoming_category: String,
}

impl<'a> ConflictView<'a> {
    pub fn new(conflict: &'a Conflict, categories: &[Category]) -> Self {
        let name_of = |id: Uuid| {
            categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unassigned".to_string())
        };

        Self {
            conflict,
            existing_category: name_of(conflict.existing.category_id),
            incoming_category: name_of(conflict.incoming.category_id),
        }
    }
}
