//! Synchronous, in-process event bus.
//!
//! Delivery model (deliberately different from a broker-backed bus):
//!
//! - **Synchronous**: `publish` runs every registered handler for the event
//!   type in the caller's thread and does not return until all have run or
//!   one has failed.
//! - **Ordered**: handlers for a given event type run in registration order.
//!   No ordering is guaranteed across unrelated publishes.
//! - **Fail-fast**: the first handler error stops delivery and propagates to
//!   the publisher, so the enclosing unit of work can roll everything back.
//!   Publisher and handlers succeed or fail together.
//! - **No IO**: the bus itself never touches storage; handlers perform their
//!   own scoped writes.
//!
//! "Fire and forget" is rejected on purpose: deferred delivery would allow a
//! workflow to partially apply after the publisher committed.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use firmhub_core::{CorrelationId, TenantId};
use firmhub_tenancy::TenantContext;

use crate::envelope::{DomainEvent, EventKind};
use crate::handler::EventHandler;

/// Event publication failure.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The envelope's tenant does not match the publishing context.
    #[error("event tenant {event_tenant} does not match context tenant {context_tenant}")]
    TenantMismatch {
        event_tenant: TenantId,
        context_tenant: TenantId,
    },

    /// A subscriber raised during delivery. Propagates to the publisher and
    /// aborts the enclosing unit of work.
    #[error("handler '{handler}' failed for '{event_type}' (correlation {correlation_id}): {source}")]
    Handler {
        event_type: &'static str,
        handler: &'static str,
        correlation_id: CorrelationId,
        #[source]
        source: anyhow::Error,
    },
}

/// Observes delivery outcomes without the bus depending on the audit layer.
///
/// The composition root plugs in an observer that writes audit entries:
/// successful deliveries into the transactional log, failures into the
/// non-transactional forensic sink (so a rolled-back workflow still leaves a
/// trace of the partial attempt).
pub trait DeliveryObserver: Send + Sync {
    fn delivered(
        &self,
        ctx: &TenantContext,
        event_type: &'static str,
        handler: &'static str,
        correlation_id: &CorrelationId,
    );

    fn failed(
        &self,
        ctx: &TenantContext,
        event_type: &'static str,
        handler: &'static str,
        correlation_id: &CorrelationId,
        error: &anyhow::Error,
    );
}

/// Builder for the bus. Subscriptions are registered once at process
/// start-up and are static for the process lifetime; there is no dynamic
/// unsubscribe.
pub struct EventBusBuilder<P: EventKind> {
    subscriptions: HashMap<&'static str, Vec<Arc<dyn EventHandler<P>>>>,
    observers: Vec<Arc<dyn DeliveryObserver>>,
}

impl<P: EventKind> Default for EventBusBuilder<P> {
    fn default() -> Self {
        Self {
            subscriptions: HashMap::new(),
            observers: Vec::new(),
        }
    }
}

impl<P: EventKind> EventBusBuilder<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event type. Registration order is delivery
    /// order.
    pub fn subscribe(mut self, event_type: &'static str, handler: Arc<dyn EventHandler<P>>) -> Self {
        self.subscriptions.entry(event_type).or_default().push(handler);
        self
    }

    pub fn observe(mut self, observer: Arc<dyn DeliveryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> EventBus<P> {
        EventBus {
            subscriptions: self.subscriptions,
            observers: self.observers,
        }
    }
}

/// In-process, synchronous publish/subscribe bus for domain events.
///
/// Immutable after construction, so `publish` takes `&self` and handlers can
/// re-enter the bus to publish chained events.
pub struct EventBus<P: EventKind> {
    subscriptions: HashMap<&'static str, Vec<Arc<dyn EventHandler<P>>>>,
    observers: Vec<Arc<dyn DeliveryObserver>>,
}

impl<P: EventKind> EventBus<P> {
    pub fn builder() -> EventBusBuilder<P> {
        EventBusBuilder::new()
    }

    /// Number of handlers registered for an event type.
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.subscriptions.get(event_type).map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler registered for its type, in
    /// registration order, within the caller's thread and transactional
    /// boundary.
    pub fn publish(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<P>,
    ) -> Result<(), PublishError> {
        if event.tenant_id() != ctx.tenant_id() {
            warn!(
                event_tenant = %event.tenant_id(),
                context_tenant = %ctx.tenant_id(),
                event_type = event.event_type(),
                "refusing to deliver event outside its tenant context"
            );
            return Err(PublishError::TenantMismatch {
                event_tenant: event.tenant_id(),
                context_tenant: ctx.tenant_id(),
            });
        }

        let event_type = event.event_type();
        let Some(handlers) = self.subscriptions.get(event_type) else {
            debug!(event_type, "no subscribers for event");
            return Ok(());
        };

        for handler in handlers {
            match handler.handle(ctx, event, self) {
                Ok(()) => {
                    debug!(
                        event_type,
                        handler = handler.name(),
                        correlation_id = %event.correlation_id(),
                        "event delivered"
                    );
                    for obs in &self.observers {
                        obs.delivered(ctx, event_type, handler.name(), event.correlation_id());
                    }
                }
                Err(source) => {
                    warn!(
                        event_type,
                        handler = handler.name(),
                        correlation_id = %event.correlation_id(),
                        error = %source,
                        "event handler failed; aborting delivery"
                    );
                    for obs in &self.observers {
                        obs.failed(ctx, event_type, handler.name(), event.correlation_id(), &source);
                    }
                    return Err(PublishError::Handler {
                        event_type,
                        handler: handler.name(),
                        correlation_id: event.correlation_id().clone(),
                        source,
                    });
                }
            }
        }

        Ok(())
    }
}
