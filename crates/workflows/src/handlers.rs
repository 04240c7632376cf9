//! Workflow orchestrators for the proposal-acceptance chain.
//!
//! All four handlers subscribe to `proposal.accepted` and run in
//! registration order: client onboarding, contract setup, optional project
//! kickoff, portal access. Each is idempotent by correlation id and performs
//! its writes through the scoped layer under the publishing context.

use std::sync::Arc;

use firmhub_core::TenantEntity;
use firmhub_events::{DomainEvent, EventBus, EventHandler};
use firmhub_store::{EntityStore, Scoped};
use firmhub_tenancy::TenantContext;

use crate::client::Client;
use crate::contract::Contract;
use crate::events::WorkflowEvent;
use crate::project::Project;

fn client_for_correlation<S: EntityStore<Client>>(
    db: &Scoped<'_, S>,
    event: &DomainEvent<WorkflowEvent>,
) -> anyhow::Result<Option<Client>> {
    let mut matches = db.list(|c: &Client| c.source_correlation() == Some(event.correlation_id()))?;
    Ok(matches.pop())
}

/// Creates the client record for an accepted proposal, then publishes the
/// chained `client.onboarded` fact.
pub struct ClientOnboardingHandler<S> {
    clients: Arc<S>,
}

impl<S> ClientOnboardingHandler<S> {
    pub fn new(clients: Arc<S>) -> Self {
        Self { clients }
    }
}

impl<S: EntityStore<Client>> EventHandler<WorkflowEvent> for ClientOnboardingHandler<S> {
    fn name(&self) -> &'static str {
        "client-onboarding"
    }

    fn handle(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<WorkflowEvent>,
        bus: &EventBus<WorkflowEvent>,
    ) -> anyhow::Result<()> {
        let WorkflowEvent::ProposalAccepted { client_name, .. } = event.payload() else {
            return Ok(());
        };

        let db = Scoped::open(Some(ctx), &*self.clients)?;
        if client_for_correlation(&db, event)?.is_some() {
            // Re-delivery of a correlation we already onboarded.
            return Ok(());
        }

        let client = Client::onboard(ctx.tenant_id(), client_name, event.correlation_id().clone());
        let client_id = client.id();
        db.create(client)?;

        let onboarded = DomainEvent::record(
            ctx.tenant_id(),
            event.correlation_id().clone(),
            WorkflowEvent::ClientOnboarded { client_id },
        );
        bus.publish(ctx, &onboarded)?;
        Ok(())
    }
}

/// Creates the initial engagement contract for the onboarded client.
pub struct ContractSetupHandler<CS, KS> {
    clients: Arc<CS>,
    contracts: Arc<KS>,
}

impl<CS, KS> ContractSetupHandler<CS, KS> {
    pub fn new(clients: Arc<CS>, contracts: Arc<KS>) -> Self {
        Self { clients, contracts }
    }
}

impl<CS, KS> EventHandler<WorkflowEvent> for ContractSetupHandler<CS, KS>
where
    CS: EntityStore<Client>,
    KS: EntityStore<Contract>,
{
    fn name(&self) -> &'static str {
        "contract-setup"
    }

    fn handle(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<WorkflowEvent>,
        _bus: &EventBus<WorkflowEvent>,
    ) -> anyhow::Result<()> {
        let WorkflowEvent::ProposalAccepted { amount_cents, .. } = event.payload() else {
            return Ok(());
        };

        let contracts = Scoped::open(Some(ctx), &*self.contracts)?;
        let existing = contracts
            .list(|k: &Contract| k.source_correlation() == event.correlation_id())?;
        if !existing.is_empty() {
            return Ok(());
        }

        let clients = Scoped::open(Some(ctx), &*self.clients)?;
        let Some(client) = client_for_correlation(&clients, event)? else {
            anyhow::bail!(
                "no onboarded client for correlation {}; handler ordering broken",
                event.correlation_id()
            );
        };

        contracts.create(Contract::draft(
            ctx.tenant_id(),
            client.id(),
            *amount_cents,
            event.correlation_id().clone(),
        ))?;
        Ok(())
    }
}

/// Creates a starter project when the accepted proposal asked for one.
pub struct ProjectKickoffHandler<CS, PS> {
    clients: Arc<CS>,
    projects: Arc<PS>,
}

impl<CS, PS> ProjectKickoffHandler<CS, PS> {
    pub fn new(clients: Arc<CS>, projects: Arc<PS>) -> Self {
        Self { clients, projects }
    }
}

impl<CS, PS> EventHandler<WorkflowEvent> for ProjectKickoffHandler<CS, PS>
where
    CS: EntityStore<Client>,
    PS: EntityStore<Project>,
{
    fn name(&self) -> &'static str {
        "project-kickoff"
    }

    fn handle(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<WorkflowEvent>,
        _bus: &EventBus<WorkflowEvent>,
    ) -> anyhow::Result<()> {
        let WorkflowEvent::ProposalAccepted {
            client_name,
            wants_project,
            ..
        } = event.payload()
        else {
            return Ok(());
        };
        if !wants_project {
            return Ok(());
        }

        let projects = Scoped::open(Some(ctx), &*self.projects)?;
        let existing =
            projects.list(|p: &Project| p.source_correlation() == event.correlation_id())?;
        if !existing.is_empty() {
            return Ok(());
        }

        let clients = Scoped::open(Some(ctx), &*self.clients)?;
        let Some(client) = client_for_correlation(&clients, event)? else {
            anyhow::bail!(
                "no onboarded client for correlation {}; handler ordering broken",
                event.correlation_id()
            );
        };

        projects.create(Project::kickoff(
            ctx.tenant_id(),
            client.id(),
            format!("Starter project for {client_name}"),
            event.correlation_id().clone(),
        ))?;
        Ok(())
    }
}

/// Enables portal sign-in for the onboarded client.
pub struct PortalAccessHandler<S> {
    clients: Arc<S>,
}

impl<S> PortalAccessHandler<S> {
    pub fn new(clients: Arc<S>) -> Self {
        Self { clients }
    }
}

impl<S: EntityStore<Client>> EventHandler<WorkflowEvent> for PortalAccessHandler<S> {
    fn name(&self) -> &'static str {
        "portal-access"
    }

    fn handle(
        &self,
        ctx: &TenantContext,
        event: &DomainEvent<WorkflowEvent>,
        _bus: &EventBus<WorkflowEvent>,
    ) -> anyhow::Result<()> {
        let WorkflowEvent::ProposalAccepted { .. } = event.payload() else {
            return Ok(());
        };

        let db = Scoped::open(Some(ctx), &*self.clients)?;
        let Some(mut client) = client_for_correlation(&db, event)? else {
            anyhow::bail!(
                "no onboarded client for correlation {}; handler ordering broken",
                event.correlation_id()
            );
        };
        if client.portal_enabled() {
            return Ok(());
        }

        client.enable_portal();
        db.update(client)?;
        Ok(())
    }
}
