//! Tenant binding for Postgres sessions.
//!
//! The row-security policies filter on the `app.current_tenant` session
//! variable. Binding is connection-scoped, not process-global, and pooled
//! connections are re-bound on every checkout (reset-on-checkout): a stale
//! binding from the previous unit of work can never leak into this one, and
//! a missed bind fails closed because the policies treat an unset variable
//! as NULL and deny every row.

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use tracing::instrument;

use firmhub_core::TenantId;

use super::{map_sqlx_error, PgStoreError};

/// Session variable the row-security policies key off.
pub const TENANT_GUC: &str = "app.current_tenant";

/// Bind the session to a tenant. Session-scoped (`is_local = false`) so the
/// binding holds for the whole checkout, across transactions.
#[instrument(skip(conn), fields(tenant_id = %tenant_id))]
pub async fn bind_tenant(conn: &mut PgConnection, tenant_id: TenantId) -> Result<(), PgStoreError> {
    sqlx::query("SELECT set_config($1, $2, false)")
        .bind(TENANT_GUC)
        .bind(tenant_id.as_uuid().to_string())
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("bind_tenant", e))?;
    Ok(())
}

/// Clear the session's tenant binding. Policies deny all rows afterwards.
pub async fn reset_tenant(conn: &mut PgConnection) -> Result<(), PgStoreError> {
    sqlx::query("RESET app.current_tenant")
        .execute(conn)
        .await
        .map_err(|e| map_sqlx_error("reset_tenant", e))?;
    Ok(())
}

/// Check out a pooled connection with the tenant binding reset and re-bound.
///
/// Every unit of work acquires its connection through this function; raw
/// `pool.acquire()` would inherit whatever binding the previous holder left.
pub async fn acquire_bound(
    pool: &PgPool,
    tenant_id: TenantId,
) -> Result<PoolConnection<Postgres>, PgStoreError> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| map_sqlx_error("acquire", e))?;
    reset_tenant(&mut conn).await?;
    bind_tenant(&mut conn, tenant_id).await?;
    Ok(conn)
}
