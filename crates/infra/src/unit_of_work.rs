//! Transactional boundary for one inbound operation.
//!
//! Events are published after the triggering write but before the unit of
//! work commits, so a handler failure aborts the whole operation: the
//! triggering write and every handler side effect succeed or fail together.
//! A workflow that partially applies is treated as a correctness bug, not a
//! degraded outcome.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use firmhub_core::DomainError;
use firmhub_events::PublishError;
use firmhub_store::{StoreError, Transactional};
use firmhub_tenancy::MissingTenantError;

/// Failure of one unit of work.
///
/// Internally precise so tests and the audit trail can distinguish isolation
/// violations from empty results; externally every variant surfaces as the
/// same generic message (no cross-tenant existence information leaks).
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("tenant resolution failed: {0}")]
    Resolve(#[from] MissingTenantError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl WorkflowError {
    /// What an end user is shown. Deliberately uniform: "not found" and
    /// "found but not yours" must be indistinguishable externally.
    pub fn user_message(&self) -> &'static str {
        "operation failed"
    }
}

/// Snapshot-based unit of work over the in-memory stores.
///
/// `execute` marks a checkpoint on every participant, runs the operation,
/// and commits or rolls all participants back together.
pub struct UnitOfWork {
    participants: Vec<Arc<dyn Transactional>>,
}

impl UnitOfWork {
    pub fn new(participants: Vec<Arc<dyn Transactional>>) -> Self {
        Self { participants }
    }

    pub fn execute<T, E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: core::fmt::Display,
    {
        for p in &self.participants {
            p.begin();
        }
        match f() {
            Ok(value) => {
                for p in &self.participants {
                    p.commit();
                }
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "unit of work aborted; rolling back all participants");
                for p in self.participants.iter().rev() {
                    p.rollback();
                }
                Err(err)
            }
        }
    }
}
