use thiserror::Error;

/// Scoped data access failure.
///
/// Isolation violations are distinct variants, never empty results, so tests
/// can assert isolation explicitly. What the end user sees is a generic
/// "operation failed"; these details go to logs and the audit trail only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No tenant context was supplied. Scoped operations fail closed rather
    /// than falling back to "all tenants".
    #[error("no tenant context; scoped data access fails closed")]
    MissingContext,

    /// The entity's stored tenant does not match the active context. A
    /// security event: logged and the operation aborted.
    #[error("cross-tenant access denied for {entity_type}")]
    CrossTenantAccess { entity_type: &'static str },

    /// Absent, or owned by another tenant: externally indistinguishable.
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    /// The break-glass grant's time bound has passed.
    #[error("elevated access grant has expired")]
    GrantExpired,

    #[error("storage backend error: {0}")]
    Backend(String),
}
