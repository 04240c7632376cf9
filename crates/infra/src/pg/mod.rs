//! Postgres backend with storage-level row security.
//!
//! Second, independent enforcement layer: policies attached to every
//! tenant-scoped table filter on a session-scoped variable, so a bug in the
//! application's scoped layer alone cannot leak rows. The SQL lives in
//! `migrations/`; this module handles session binding and row access.

pub mod client_store;
pub mod session;

pub use client_store::{ClientRow, PgClientStore};
pub use session::{acquire_bound, bind_tenant, reset_tenant, TENANT_GUC};

use thiserror::Error;

/// Postgres store failure.
#[derive(Debug, Error)]
pub enum PgStoreError {
    /// The data store itself rejected the access. Surfaces as a generic
    /// access-denied; details go to the logs/audit trail, never to end
    /// users.
    #[error("access denied")]
    RowSecurityViolation,

    #[error("database error: {0}")]
    Database(String),
}

/// Map a sqlx error, treating `42501` (insufficient privilege, the code
/// Postgres raises when a row-security policy rejects a write) as a
/// row-security violation.
pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> PgStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("42501") {
            tracing::warn!(operation, error = %db_err, "row security policy rejected access");
            return PgStoreError::RowSecurityViolation;
        }
    }
    tracing::error!(operation, error = %err, "database operation failed");
    PgStoreError::Database(err.to_string())
}
