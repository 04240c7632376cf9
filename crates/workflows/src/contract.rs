//! Contract entity.

use serde::{Deserialize, Serialize};

use firmhub_core::{CorrelationId, EntityId, TenantEntity, TenantId};

/// An engagement contract with a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    id: EntityId,
    tenant_id: TenantId,
    client_id: EntityId,
    amount_cents: i64,
    source_correlation: CorrelationId,
}

impl Contract {
    pub fn draft(
        tenant_id: TenantId,
        client_id: EntityId,
        amount_cents: i64,
        correlation: CorrelationId,
    ) -> Self {
        Self {
            id: EntityId::new(),
            tenant_id,
            client_id,
            amount_cents,
            source_correlation: correlation,
        }
    }

    pub fn client_id(&self) -> EntityId {
        self.client_id
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn source_correlation(&self) -> &CorrelationId {
        &self.source_correlation
    }
}

impl TenantEntity for Contract {
    type Id = EntityId;

    fn id(&self) -> EntityId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn entity_type() -> &'static str {
        "contracts"
    }
}
