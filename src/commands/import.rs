use clap::{Args, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::db::{CatalogRepository, CatalogStore};
use crate::models::{Category, FoodItem};
use crate::transfer::{
    apply, file_name, prepare_import, read_document, resolve_bulk, BulkDecision, ConflictView,
    Decision, ImportGuard, Resolution, ReviewSession, SessionState,
};

/// How items that already exist in the library are handled.
#[derive(Clone, Copy, ValueEnum, Default)]
pub enum ConflictStrategy {
    /// Decide for each item
    #[default]
    Review,
    /// Overwrite every existing item
    Replace,
    /// Keep every existing item and import only new ones
    Keep,
}

#[derive(Args)]
pub struct ImportCommand {
    /// Library file to import
    pub file: PathBuf,

    /// How to handle items that already exist
    #[arg(long, short, value_enum, default_value = "review")]
    pub strategy: ConflictStrategy,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

impl ImportCommand {
    pub async fn run(
        &self,
        repo: &CatalogRepository,
        guard: &ImportGuard,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let _attempt = guard.try_begin()?;

        let bytes = read_document(&self.file).await?;
        let plan = prepare_import(&bytes, repo).await?;
        let categories = repo.list_categories().await?;

        println!("Import from {}", self.file.display());
        print!("{}", plan.summary());
        if plan.unassigned_category_count > 0 {
            println!(
                "Note: {} item(s) will have no category until you create one.",
                plan.unassigned_category_count
            );
        }
        println!();

        let stdin = io::stdin();
        let mut input = stdin.lock();

        let resolution = if !plan.has_conflicts() {
            if !self.yes
                && !confirm(
                    &mut input,
                    &format!("Import {} new item(s)?", plan.new_items.len()),
                )?
            {
                println!("Import cancelled.");
                return Ok(());
            }
            resolve_bulk(plan, BulkDecision::ReplaceAll)
        } else {
            match self.strategy {
                ConflictStrategy::Replace | ConflictStrategy::Keep => {
                    let (decision, question) = match self.strategy {
                        ConflictStrategy::Replace => (
                            BulkDecision::ReplaceAll,
                            format!("Replace {} existing item(s)?", plan.conflicts.len()),
                        ),
                        _ => (
                            BulkDecision::KeepAll,
                            format!(
                                "Import {} new item(s) and keep {} existing?",
                                plan.new_items.len(),
                                plan.conflicts.len()
                            ),
                        ),
                    };
                    if !self.yes && !confirm(&mut input, &question)? {
                        println!("Import cancelled.");
                        return Ok(());
                    }
                    resolve_bulk(plan, decision)
                }
                ConflictStrategy::Review => {
                    let state = ReviewSession::start(plan);
                    match review_conflicts(state, &categories, &mut input)? {
                        Some(resolution) => resolution,
                        None => {
                            println!("Import cancelled. Nothing was changed.");
                            return Ok(());
                        }
                    }
                }
            }
        };
        drop(input);

        let report = apply(&resolution, repo, file_name(&self.file)).await?;
        println!();
        print!("{}", report);
        Ok(())
    }
}

/// Drives the review to completion. `None` means the user cancelled.
fn review_conflicts(
    mut state: SessionState,
    categories: &[Category],
    input: &mut impl BufRead,
) -> io::Result<Option<Resolution>> {
    loop {
        state = match state {
            SessionState::Reviewing(session) => {
                let view = ConflictView::new(session.current(), categories);
                print_conflict(&view, session.index(), session.total());
                let decision = prompt_decision(input)?;
                session.submit_decision(decision)
            }
            SessionState::Done(resolution) => return Ok(Some(resolution)),
            SessionState::Cancelled => return Ok(None),
        };
    }
}

fn print_conflict(view: &ConflictView<'_>, index: usize, total: usize) {
    println!("Conflict {} of {}", index + 1, total);
    println!("{}", "-".repeat(20));
    print_side("Existing", &view.conflict.existing, &view.existing_category);
    print_side("Incoming", &view.conflict.incoming, &view.incoming_category);
}

fn print_side(label: &str, item: &FoodItem, category: &str) {
    println!("  {:9} {}", format!("{}:", label), item);
    println!("  {:9} category: {}", "", category);
    if let Some(notes) = &item.notes {
        println!("  {:9} notes: {}", "", notes);
    }
}

fn prompt_decision(input: &mut impl BufRead) -> io::Result<Decision> {
    loop {
        print!("[r]eplace, [k]eep existing, import as [c]opy, [q]uit import? ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF
            return Ok(Decision::CancelReview);
        }

        match parse_decision(&line) {
            Some(decision) => return Ok(decision),
            None => println!("Please answer r, k, c or q."),
        }
    }
}

fn parse_decision(answer: &str) -> Option<Decision> {
    match answer.trim().to_lowercase().as_str() {
        "r" | "replace" => Some(Decision::Replace),
        "k" | "keep" => Some(Decision::Keep),
        "c" | "copy" => Some(Decision::ImportAsCopy),
        "q" | "quit" | "cancel" => Some(Decision::CancelReview),
        _ => None,
    }
}

fn confirm(input: &mut impl BufRead, question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
