//! Composition root for the workflow core.
//!
//! Wires the in-memory stores, the audit log, the event bus with its
//! standard subscriptions, and the unit of work into one runtime. Handler
//! registration happens here, once, at process start-up.

use std::sync::Arc;

use tracing::error;

use firmhub_audit::{AuditAction, AuditEntry, AuditLog, ForensicSink, InMemoryAuditLog};
use firmhub_core::{CorrelationId, EntityId};
use firmhub_events::{DeliveryObserver, DomainEvent, EventBus, EventHandler, PublishError};
use firmhub_store::{InMemoryEntityStore, Scoped, StoreError};
use firmhub_tenancy::TenantContext;
use firmhub_workflows::{
    events, Client, ClientOnboardingHandler, Contract, ContractSetupHandler, PortalAccessHandler,
    Project, ProjectKickoffHandler, Proposal, WorkflowEvent,
};

use crate::unit_of_work::{UnitOfWork, WorkflowError};

/// Backing stores for the workflow entities plus the audit sinks.
pub struct WorkflowStores {
    pub proposals: Arc<InMemoryEntityStore<Proposal>>,
    pub clients: Arc<InMemoryEntityStore<Client>>,
    pub contracts: Arc<InMemoryEntityStore<Contract>>,
    pub projects: Arc<InMemoryEntityStore<Project>>,
    pub audit: Arc<InMemoryAuditLog>,
    pub forensic: Arc<ForensicSink>,
}

impl WorkflowStores {
    pub fn new() -> Self {
        Self {
            proposals: Arc::new(InMemoryEntityStore::new()),
            clients: Arc::new(InMemoryEntityStore::new()),
            contracts: Arc::new(InMemoryEntityStore::new()),
            projects: Arc::new(InMemoryEntityStore::new()),
            audit: Arc::new(InMemoryAuditLog::new()),
            forensic: Arc::new(ForensicSink::new()),
        }
    }
}

impl Default for WorkflowStores {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard `proposal.accepted` subscription chain, in delivery order.
pub fn standard_handlers(
    stores: &WorkflowStores,
) -> Vec<(&'static str, Arc<dyn EventHandler<WorkflowEvent>>)> {
    vec![
        (
            events::PROPOSAL_ACCEPTED,
            Arc::new(ClientOnboardingHandler::new(stores.clients.clone())),
        ),
        (
            events::PROPOSAL_ACCEPTED,
            Arc::new(ContractSetupHandler::new(
                stores.clients.clone(),
                stores.contracts.clone(),
            )),
        ),
        (
            events::PROPOSAL_ACCEPTED,
            Arc::new(ProjectKickoffHandler::new(
                stores.clients.clone(),
                stores.projects.clone(),
            )),
        ),
        (
            events::PROPOSAL_ACCEPTED,
            Arc::new(PortalAccessHandler::new(stores.clients.clone())),
        ),
    ]
}

/// Writes delivery outcomes to the audit trail.
///
/// Successful deliveries go to the transactional log (they roll back with
/// the unit of work); failures go to the non-transactional forensic sink so
/// the partial attempt survives the rollback.
pub struct AuditDeliveryObserver {
    log: Arc<InMemoryAuditLog>,
    forensic: Arc<ForensicSink>,
}

impl AuditDeliveryObserver {
    pub fn new(log: Arc<InMemoryAuditLog>, forensic: Arc<ForensicSink>) -> Self {
        Self { log, forensic }
    }
}

impl DeliveryObserver for AuditDeliveryObserver {
    fn delivered(
        &self,
        ctx: &TenantContext,
        event_type: &'static str,
        handler: &'static str,
        _correlation_id: &CorrelationId,
    ) {
        self.log.record(AuditEntry::new(
            ctx.actor_id(),
            ctx.tenant_id(),
            AuditAction::EventDelivered,
            format!("{event_type} -> {handler}"),
        ));
    }

    fn failed(
        &self,
        ctx: &TenantContext,
        event_type: &'static str,
        handler: &'static str,
        correlation_id: &CorrelationId,
        err: &anyhow::Error,
    ) {
        error!(
            event_type,
            handler,
            correlation_id = %correlation_id,
            error = %err,
            "event handler failed"
        );
        self.forensic.note(
            AuditEntry::new(
                ctx.actor_id(),
                ctx.tenant_id(),
                AuditAction::EventHandlerFailed,
                format!("{event_type} -> {handler}"),
            )
            .with_justification(format!("correlation {correlation_id}: {err}")),
        );
    }
}

/// The assembled workflow core: stores, bus, audit, unit of work.
pub struct WorkflowRuntime {
    pub stores: WorkflowStores,
    bus: EventBus<WorkflowEvent>,
    uow: UnitOfWork,
}

impl WorkflowRuntime {
    /// Assemble with the standard subscription chain.
    pub fn standard() -> Self {
        let stores = WorkflowStores::new();
        let handlers = standard_handlers(&stores);
        Self::new(stores, handlers)
    }

    /// Assemble with an explicit subscription list (composition roots and
    /// tests that need a different chain).
    pub fn new(
        stores: WorkflowStores,
        handlers: Vec<(&'static str, Arc<dyn EventHandler<WorkflowEvent>>)>,
    ) -> Self {
        let observer = Arc::new(AuditDeliveryObserver::new(
            stores.audit.clone(),
            stores.forensic.clone(),
        ));

        let mut builder = EventBus::builder().observe(observer);
        for (event_type, handler) in handlers {
            builder = builder.subscribe(event_type, handler);
        }
        let bus = builder.build();

        let uow = UnitOfWork::new(vec![
            stores.proposals.clone(),
            stores.clients.clone(),
            stores.contracts.clone(),
            stores.projects.clone(),
            stores.audit.clone(),
        ]);

        Self { stores, bus, uow }
    }

    pub fn bus(&self) -> &EventBus<WorkflowEvent> {
        &self.bus
    }

    /// Accept a proposal and run the onboarding workflow, all within one
    /// transactional boundary.
    pub fn accept_proposal(
        &self,
        ctx: &TenantContext,
        proposal_id: EntityId,
        correlation: CorrelationId,
    ) -> Result<(), WorkflowError> {
        let result = self.uow.execute(|| {
            let db = Scoped::open(Some(ctx), &*self.stores.proposals)?;
            let mut proposal = db.get::<Proposal>(proposal_id)?;
            let fact = proposal.accept()?;
            db.update(proposal)?;

            let event = DomainEvent::record(ctx.tenant_id(), correlation, fact);
            self.bus.publish(ctx, &event)?;
            Ok(())
        });
        if let Err(err) = &result {
            self.note_cross_tenant_denial(ctx, err);
        }
        result
    }

    /// Deliver an already-recorded event within a fresh transactional
    /// boundary (retry/replay path; handlers dedupe by correlation id).
    pub fn deliver(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<WorkflowEvent>,
    ) -> Result<(), WorkflowError> {
        let result = self
            .uow
            .execute(|| self.bus.publish(ctx, event).map_err(WorkflowError::from));
        if let Err(err) = &result {
            self.note_cross_tenant_denial(ctx, err);
        }
        result
    }

    /// Cross-tenant denials are security events; record the attempt in the
    /// forensic sink so it stays visible after the rollback discards the
    /// transactional audit entries.
    fn note_cross_tenant_denial(&self, ctx: &TenantContext, err: &WorkflowError) {
        let entity_type = match err {
            WorkflowError::Store(StoreError::CrossTenantAccess { entity_type }) => {
                Some(*entity_type)
            }
            WorkflowError::Publish(PublishError::Handler { source, .. }) => {
                match source.downcast_ref::<StoreError>() {
                    Some(StoreError::CrossTenantAccess { entity_type }) => Some(*entity_type),
                    _ => None,
                }
            }
            _ => None,
        };
        let Some(entity_type) = entity_type else {
            return;
        };
        self.stores.forensic.note(AuditEntry::new(
            ctx.actor_id(),
            ctx.tenant_id(),
            AuditAction::CrossTenantDenied,
            entity_type,
        ));
    }
}
