//! First pass over the extract: frequency tallies and key classification
//! that the record builder consumes as read-only context.

pub mod auditor;
pub mod render;

pub use auditor::Auditor;
pub use render::write_audit_log;
