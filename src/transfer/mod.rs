//! Export and conflict-aware import of the food library.
//!
//! Import runs document → codec → normalizer → plan → resolver → apply.

mod apply;
mod codec;
mod error;
mod flow;
mod guard;
mod normalizer;
mod plan;
mod resolver;
mod wire;

pub use apply::apply;
pub use flow::{default_export_file_name, export_catalog, file_name, prepare_import, read_document};
pub use guard::ImportGuard;
pub use resolver::{
    resolve_bulk, BulkDecision, ConflictView, Decision, Resolution, ReviewSession, SessionState,
};

#[allow(unused_imports)]
pub use apply::export_report;
#[allow(unused_imports)]
pub use codec::{decode, decode_document, encode, DecodedDocument};
#[allow(unused_imports)]
pub use error::ImportError;
#[allow(unused_imports)]
pub use guard::ImportAttempt;
#[allow(unused_imports)]
pub use normalizer::{normalize, normalize_record, Rejection, UNASSIGNED_CATEGORY_ID};
#[allow(unused_imports)]
pub use plan::{build_plan, Conflict, ImportPlan, PlanSummary};
#[allow(unused_imports)]
pub use wire::{TransferComponent, TransferDocument, TransferRecord, FORMAT_VERSION};
