use firmhub_tenancy::TenantContext;

use crate::bus::EventBus;
use crate::envelope::{DomainEvent, EventKind};

/// A workflow orchestrator: reacts to one event instance under the ambient
/// tenant context of the publishing unit of work.
///
/// Contract:
/// - The event payload is the complete input; handlers must not reach back
///   into the publishing module's internals.
/// - All writes go through the scoped data access layer under `ctx`.
/// - Re-delivery of the same `correlation_id` must be a no-op.
/// - An error propagates to `publish` and aborts the enclosing unit of work
///   (fail-fast; partial workflows are a correctness bug, not a degraded
///   outcome).
///
/// Handlers receive the bus so they can publish follow-up events (chained
/// workflows) within the same delivery cycle.
pub trait EventHandler<P: EventKind>: Send + Sync {
    /// Stable handler name, used in error reporting and audit entries.
    fn name(&self) -> &'static str;

    fn handle(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<P>,
        bus: &EventBus<P>,
    ) -> anyhow::Result<()>;
}
