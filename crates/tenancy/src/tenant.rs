//! Tenant record and lifecycle.

use serde::{Deserialize, Serialize};

use firmhub_core::{DomainError, DomainResult, TenantId};

/// Tenant lifecycle status.
///
/// Tenants are never hard-deleted (audit history must survive); they move
/// through soft status transitions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
    Deactivated,
}

/// An isolated customer organization. Owns all of its business data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    id: TenantId,
    display_name: String,
    status: TenantStatus,
}

impl Tenant {
    pub fn onboard(id: TenantId, display_name: impl Into<String>) -> DomainResult<Self> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(DomainError::validation("tenant display name must not be empty"));
        }
        Ok(Self {
            id,
            display_name,
            status: TenantStatus::Active,
        })
    }

    pub fn id(&self) -> TenantId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> TenantStatus {
        self.status
    }

    /// Whether units of work may run under this tenant.
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }

    pub fn suspend(&mut self) -> DomainResult<()> {
        match self.status {
            TenantStatus::Active => {
                self.status = TenantStatus::Suspended;
                Ok(())
            }
            TenantStatus::Suspended => Ok(()),
            TenantStatus::Deactivated => {
                Err(DomainError::invariant("cannot suspend a deactivated tenant"))
            }
        }
    }

    pub fn reactivate(&mut self) -> DomainResult<()> {
        match self.status {
            TenantStatus::Suspended => {
                self.status = TenantStatus::Active;
                Ok(())
            }
            TenantStatus::Active => Ok(()),
            TenantStatus::Deactivated => {
                Err(DomainError::invariant("cannot reactivate a deactivated tenant"))
            }
        }
    }

    /// Terminal transition. The record itself is kept for audit history.
    pub fn deactivate(&mut self) {
        self.status = TenantStatus::Deactivated;
    }
}
