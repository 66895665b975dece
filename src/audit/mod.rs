//! Audit logging for FinanceFlow
//!
//! Every create, update and delete performed through the service layer is
//! recorded with before/after values in an append-only JSONL file.
//!
//! - `AuditEntry`: one operation on one entity.
//! - `AuditLogger`: appends entries to `audit.log` and reads them back.
//! - `generate_diff`: one-line summary of what changed in an update.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
