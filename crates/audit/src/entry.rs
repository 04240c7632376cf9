use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use firmhub_core::{ActorId, TenantId};

/// What a compliance-relevant entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A break-glass grant was exercised.
    ElevatedAccess,
    /// An event was delivered to a handler.
    EventDelivered,
    /// A handler raised during delivery.
    EventHandlerFailed,
    /// A cross-tenant write attempt was refused.
    CrossTenantDenied,
}

/// One append-only audit record. Never edited or deleted within the
/// retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    entry_id: Uuid,
    actor_id: ActorId,
    tenant_id: TenantId,
    action: AuditAction,
    target: String,
    timestamp: DateTime<Utc>,
    justification: Option<String>,
}

impl AuditEntry {
    pub fn new(
        actor_id: ActorId,
        tenant_id: TenantId,
        action: AuditAction,
        target: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: Uuid::now_v7(),
            actor_id,
            tenant_id,
            action,
            target: target.into(),
            timestamp: Utc::now(),
            justification: None,
        }
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }

    pub fn entry_id(&self) -> Uuid {
        self.entry_id
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn justification(&self) -> Option<&str> {
        self.justification.as_deref()
    }
}
