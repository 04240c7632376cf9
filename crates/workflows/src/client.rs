//! Client entity.

use serde::{Deserialize, Serialize};

use firmhub_core::{CorrelationId, EntityId, TenantEntity, TenantId};

/// A client of the firm.
///
/// `source_correlation` links a client back to the workflow that created it
/// and is what makes re-delivered onboarding events a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: EntityId,
    tenant_id: TenantId,
    name: String,
    source_correlation: Option<CorrelationId>,
    portal_enabled: bool,
}

impl Client {
    /// Register a client directly (no originating workflow).
    pub fn register(tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            tenant_id,
            name: name.into(),
            source_correlation: None,
            portal_enabled: false,
        }
    }

    /// Create a client from an accepted proposal workflow.
    pub fn onboard(
        tenant_id: TenantId,
        name: impl Into<String>,
        correlation: CorrelationId,
    ) -> Self {
        Self {
            id: EntityId::new(),
            tenant_id,
            name: name.into(),
            source_correlation: Some(correlation),
            portal_enabled: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_correlation(&self) -> Option<&CorrelationId> {
        self.source_correlation.as_ref()
    }

    pub fn portal_enabled(&self) -> bool {
        self.portal_enabled
    }

    pub fn enable_portal(&mut self) {
        self.portal_enabled = true;
    }
}

impl TenantEntity for Client {
    type Id = EntityId;

    fn id(&self) -> EntityId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn entity_type() -> &'static str {
        "clients"
    }
}
