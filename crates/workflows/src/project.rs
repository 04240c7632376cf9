//! Project entity.

use serde::{Deserialize, Serialize};

use firmhub_core::{CorrelationId, EntityId, TenantEntity, TenantId};

/// A delivery project for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: EntityId,
    tenant_id: TenantId,
    client_id: EntityId,
    name: String,
    source_correlation: CorrelationId,
}

impl Project {
    pub fn kickoff(
        tenant_id: TenantId,
        client_id: EntityId,
        name: impl Into<String>,
        correlation: CorrelationId,
    ) -> Self {
        Self {
            id: EntityId::new(),
            tenant_id,
            client_id,
            name: name.into(),
            source_correlation: correlation,
        }
    }

    pub fn client_id(&self) -> EntityId {
        self.client_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_correlation(&self) -> &CorrelationId {
        &self.source_correlation
    }
}

impl TenantEntity for Project {
    type Id = EntityId;

    fn id(&self) -> EntityId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn entity_type() -> &'static str {
        "projects"
    }
}
