//! Row access for the `clients` table.
//!
//! Queries here deliberately carry **no** tenant predicate in SQL: the
//! row-security policy is the only filter. Tests against a real database
//! prove the storage layer isolates rows even when the application-side
//! filter is absent; each layer must hold on its own.

use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use firmhub_core::TenantId;

use super::session::acquire_bound;
use super::{map_sqlx_error, PgStoreError};

/// Flat row shape for the `clients` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub source_correlation: Option<String>,
    pub portal_enabled: bool,
}

/// sqlx-backed client store, isolation enforced by row security alone.
#[derive(Debug, Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, row), fields(tenant_id = %tenant_id, client_id = %row.id), err)]
    pub async fn insert(&self, tenant_id: TenantId, row: &ClientRow) -> Result<(), PgStoreError> {
        let mut conn = acquire_bound(&self.pool, tenant_id).await?;
        sqlx::query(
            r#"
            INSERT INTO clients (id, tenant_id, name, source_correlation, portal_enabled)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(row.id)
        .bind(row.tenant_id)
        .bind(&row.name)
        .bind(&row.source_correlation)
        .bind(row.portal_enabled)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("insert_client", e))?;
        Ok(())
    }

    /// Fetch by id. No tenant predicate: a foreign row is filtered by the
    /// policy and comes back as `None`, indistinguishable from absent.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, client_id = %id), err)]
    pub async fn fetch(
        &self,
        tenant_id: TenantId,
        id: Uuid,
    ) -> Result<Option<ClientRow>, PgStoreError> {
        let mut conn = acquire_bound(&self.pool, tenant_id).await?;
        let row = sqlx::query(
            r#"
            SELECT id, tenant_id, name, source_correlation, portal_enabled
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("fetch_client", e))?;

        row.map(|r| from_pg_row(&r)).transpose()
    }

    /// List every client the session may see (the policy scopes the result
    /// to the bound tenant).
    #[instrument(skip(self), fields(tenant_id = %tenant_id), err)]
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<ClientRow>, PgStoreError> {
        let mut conn = acquire_bound(&self.pool, tenant_id).await?;
        let rows = sqlx::query(
            r#"
            SELECT id, tenant_id, name, source_correlation, portal_enabled
            FROM clients
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("list_clients", e))?;

        rows.iter().map(from_pg_row).collect()
    }
}

fn from_pg_row(row: &sqlx::postgres::PgRow) -> Result<ClientRow, PgStoreError> {
    Ok(ClientRow {
        id: row
            .try_get("id")
            .map_err(|e| map_sqlx_error("decode_client", e))?,
        tenant_id: row
            .try_get("tenant_id")
            .map_err(|e| map_sqlx_error("decode_client", e))?,
        name: row
            .try_get("name")
            .map_err(|e| map_sqlx_error("decode_client", e))?,
        source_correlation: row
            .try_get("source_correlation")
            .map_err(|e| map_sqlx_error("decode_client", e))?,
        portal_enabled: row
            .try_get("portal_enabled")
            .map_err(|e| map_sqlx_error("decode_client", e))?,
    })
}
