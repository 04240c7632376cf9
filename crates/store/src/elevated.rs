//! Break-glass elevated access.
//!
//! A deliberately rare, justified, time-bounded override of normal tenant
//! scoping for support and compliance work. Ordinary request handling never
//! reaches this path: the grant is only obtainable through
//! [`with_elevated_access`], which writes an audit entry before any elevated
//! read or write proceeds.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use firmhub_audit::{AuditAction, AuditEntry, AuditLog};
use firmhub_core::{ActorId, TenantId};
use firmhub_tenancy::TenantContext;

use crate::error::StoreError;
use crate::scoped::Scoped;

/// A live break-glass grant for one target tenant.
#[derive(Debug)]
pub struct ElevatedAccess {
    ctx: TenantContext,
    expires_at: DateTime<Utc>,
}

impl ElevatedAccess {
    pub fn context(&self) -> &TenantContext {
        &self.ctx
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Open a scoped view under the grant. Checked against the time bound on
    /// every call, so a long-running closure cannot outlive its grant.
    pub fn scoped<'a, S>(&self, store: &'a S) -> Result<Scoped<'a, S>, StoreError> {
        if Utc::now() >= self.expires_at {
            return Err(StoreError::GrantExpired);
        }
        Scoped::open(Some(&self.ctx), store)
    }
}

/// Run `f` under an audited, time-bounded break-glass grant for `tenant_id`.
///
/// Exactly one audit entry is recorded per invocation, before `f` runs, and
/// it persists even when `f` subsequently fails or an enclosing unit of work
/// rolls back: the entry records the access, not the outcome, so it is
/// written through [`AuditLog::record_durable`].
pub fn with_elevated_access<L, T, F>(
    log: &L,
    actor_id: ActorId,
    tenant_id: TenantId,
    justification: &str,
    ttl: Duration,
    f: F,
) -> Result<T, StoreError>
where
    L: AuditLog,
    F: FnOnce(&ElevatedAccess) -> Result<T, StoreError>,
{
    warn!(
        actor = %actor_id,
        tenant = %tenant_id,
        justification,
        "break-glass elevated access invoked"
    );
    log.record_durable(
        AuditEntry::new(actor_id, tenant_id, AuditAction::ElevatedAccess, "tenant-data")
            .with_justification(justification),
    );

    let grant = ElevatedAccess {
        ctx: TenantContext::system_override(tenant_id, actor_id),
        expires_at: Utc::now() + ttl,
    };
    f(&grant)
}
