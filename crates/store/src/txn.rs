//! Unit-of-work participation.

use std::sync::Arc;

use firmhub_audit::InMemoryAuditLog;

/// A store that can discard writes made since a checkpoint.
///
/// The unit of work calls `begin` on every participant before running an
/// operation, then `commit` on success or `rollback` on any error, so the
/// triggering write and all handler side effects succeed or fail together.
pub trait Transactional: Send + Sync {
    fn begin(&self);
    fn commit(&self);
    fn rollback(&self);
}

impl<T> Transactional for Arc<T>
where
    T: Transactional + ?Sized,
{
    fn begin(&self) {
        (**self).begin()
    }

    fn commit(&self) {
        (**self).commit()
    }

    fn rollback(&self) {
        (**self).rollback()
    }
}

// The transactional audit log rolls back with the unit of work; the forensic
// sink deliberately does not participate.
impl Transactional for InMemoryAuditLog {
    fn begin(&self) {
        InMemoryAuditLog::begin(self)
    }

    fn commit(&self) {
        InMemoryAuditLog::commit(self)
    }

    fn rollback(&self) {
        InMemoryAuditLog::rollback(self)
    }
}
