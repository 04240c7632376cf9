//! Proposal entity: the workflow's publishing side.

use serde::{Deserialize, Serialize};

use firmhub_core::{DomainError, DomainResult, EntityId, TenantEntity, TenantId};

use crate::events::WorkflowEvent;

/// Proposal lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

/// A proposal sent to a prospective client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    id: EntityId,
    tenant_id: TenantId,
    client_name: String,
    amount_cents: i64,
    wants_project: bool,
    status: ProposalStatus,
}

impl Proposal {
    pub fn draft(
        tenant_id: TenantId,
        client_name: impl Into<String>,
        amount_cents: i64,
    ) -> DomainResult<Self> {
        let client_name = client_name.into();
        if client_name.trim().is_empty() {
            return Err(DomainError::validation("proposal client name must not be empty"));
        }
        if amount_cents <= 0 {
            return Err(DomainError::validation("proposal amount must be positive"));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            client_name,
            amount_cents,
            wants_project: false,
            status: ProposalStatus::Draft,
        })
    }

    /// Mark the proposal as including a starter project on acceptance.
    pub fn with_project(mut self) -> Self {
        self.wants_project = true;
        self
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn send(&mut self) -> DomainResult<()> {
        match self.status {
            ProposalStatus::Draft => {
                self.status = ProposalStatus::Sent;
                Ok(())
            }
            _ => Err(DomainError::invariant("only a draft proposal can be sent")),
        }
    }

    /// Accept the proposal. Returns the completed business fact for the
    /// caller to publish once the state change is durably written.
    pub fn accept(&mut self) -> DomainResult<WorkflowEvent> {
        match self.status {
            ProposalStatus::Sent => {
                self.status = ProposalStatus::Accepted;
                Ok(WorkflowEvent::ProposalAccepted {
                    proposal_id: self.id,
                    client_name: self.client_name.clone(),
                    amount_cents: self.amount_cents,
                    wants_project: self.wants_project,
                })
            }
            _ => Err(DomainError::invariant("only a sent proposal can be accepted")),
        }
    }

    pub fn decline(&mut self) -> DomainResult<()> {
        match self.status {
            ProposalStatus::Sent => {
                self.status = ProposalStatus::Declined;
                Ok(())
            }
            _ => Err(DomainError::invariant("only a sent proposal can be declined")),
        }
    }
}

impl TenantEntity for Proposal {
    type Id = EntityId;

    fn id(&self) -> EntityId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn entity_type() -> &'static str {
        "proposals"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent_proposal() -> Proposal {
        let mut p = Proposal::draft(TenantId::new(), "Acme", 250_000).unwrap();
        p.send().unwrap();
        p
    }

    #[test]
    fn accepting_a_sent_proposal_yields_the_fact() {
        let mut p = sent_proposal();
        let fact = p.accept().unwrap();

        assert_eq!(p.status(), ProposalStatus::Accepted);
        match fact {
            WorkflowEvent::ProposalAccepted {
                proposal_id,
                client_name,
                amount_cents,
                wants_project,
            } => {
                assert_eq!(proposal_id, p.id());
                assert_eq!(client_name, "Acme");
                assert_eq!(amount_cents, 250_000);
                assert!(!wants_project);
            }
            other => panic!("unexpected fact: {other:?}"),
        }
    }

    #[test]
    fn accepting_twice_violates_the_invariant() {
        let mut p = sent_proposal();
        p.accept().unwrap();
        assert!(matches!(p.accept(), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn a_draft_cannot_be_accepted() {
        let mut p = Proposal::draft(TenantId::new(), "Acme", 100).unwrap();
        assert!(p.accept().is_err());
    }

    #[test]
    fn validation_rejects_empty_name_and_non_positive_amounts() {
        assert!(Proposal::draft(TenantId::new(), "  ", 100).is_err());
        assert!(Proposal::draft(TenantId::new(), "Acme", 0).is_err());
    }
}
