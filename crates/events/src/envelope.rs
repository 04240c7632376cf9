use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use firmhub_core::{CorrelationId, TenantId};

/// A domain event payload.
///
/// Payloads are tagged enum variants: one concrete shape per event type, so
/// handlers pattern-match instead of probing for optional fields.
pub trait EventKind: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "proposal.accepted").
    fn event_type(&self) -> &'static str;
}

/// Envelope for a domain event: an immutable fact about a completed state
/// transition, carrying multi-tenant and deduplication metadata.
///
/// Notes:
/// - **Multi-tenancy** is enforced here via `tenant_id`: the bus refuses to
///   deliver an envelope whose tenant differs from the publishing context.
/// - `correlation_id` is stable across retries; handlers use it to treat
///   re-delivery as a no-op.
/// - Accessors only; the envelope is never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent<P> {
    event_id: Uuid,
    tenant_id: TenantId,
    occurred_at: DateTime<Utc>,
    correlation_id: CorrelationId,
    payload: P,
}

impl<P> DomainEvent<P> {
    /// Record a new fact. Called at the moment the triggering state change
    /// has been durably written, before the enclosing unit of work commits.
    pub fn record(tenant_id: TenantId, correlation_id: CorrelationId, payload: P) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            tenant_id,
            occurred_at: Utc::now(),
            correlation_id,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

impl<P: EventKind> DomainEvent<P> {
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
