//! Append-only audit trail for privileged access and event delivery.

pub mod entry;
pub mod log;

pub use entry::{AuditAction, AuditEntry};
pub use log::{AuditLog, AuditQuery, ForensicSink, InMemoryAuditLog};
