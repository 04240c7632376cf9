//! Per-operation tenant context.

use firmhub_core::{ActorId, TenantId};

/// Tenant context for one unit of work (request or job).
///
/// This is immutable, created fresh at the start of each unit of work, and
/// passed explicitly through the call chain. It must never be stored in a
/// process-global or thread-local slot; concurrent units of work for
/// different tenants each own their own context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    actor_id: ActorId,
    is_system_override: bool,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId, actor_id: ActorId) -> Self {
        Self {
            tenant_id,
            actor_id,
            is_system_override: false,
        }
    }

    /// Context for an audited break-glass grant. Only the elevated-access
    /// path constructs this; ordinary request handling never does.
    pub fn system_override(tenant_id: TenantId, actor_id: ActorId) -> Self {
        Self {
            tenant_id,
            actor_id,
            is_system_override: true,
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn is_system_override(&self) -> bool {
        self.is_system_override
    }
}
