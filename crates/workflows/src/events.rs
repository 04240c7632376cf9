//! Workflow event payloads.
//!
//! One concrete variant per event type, so subscribers pattern-match instead
//! of probing a dynamic payload for optional fields.

use serde::{Deserialize, Serialize};

use firmhub_core::EntityId;
use firmhub_events::EventKind;

pub const PROPOSAL_ACCEPTED: &str = "proposal.accepted";
pub const CLIENT_ONBOARDED: &str = "client.onboarded";
pub const CONTRACT_DRAFTED: &str = "contract.drafted";
pub const PROJECT_KICKED_OFF: &str = "project.kicked_off";
pub const PORTAL_ACCESS_ENABLED: &str = "portal.access_enabled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A sent proposal was accepted by the prospect.
    ProposalAccepted {
        proposal_id: EntityId,
        client_name: String,
        amount_cents: i64,
        wants_project: bool,
    },
    /// The client record for an accepted proposal exists.
    ClientOnboarded { client_id: EntityId },
    /// The initial engagement contract exists.
    ContractDrafted {
        contract_id: EntityId,
        client_id: EntityId,
    },
    /// The starter project exists.
    ProjectKickedOff {
        project_id: EntityId,
        client_id: EntityId,
    },
    /// The client can sign in to the portal.
    PortalAccessEnabled { client_id: EntityId },
}

impl EventKind for WorkflowEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WorkflowEvent::ProposalAccepted { .. } => PROPOSAL_ACCEPTED,
            WorkflowEvent::ClientOnboarded { .. } => CLIENT_ONBOARDED,
            WorkflowEvent::ContractDrafted { .. } => CONTRACT_DRAFTED,
            WorkflowEvent::ProjectKickedOff { .. } => PROJECT_KICKED_OFF,
            WorkflowEvent::PortalAccessEnabled { .. } => PORTAL_ACCESS_ENABLED,
        }
    }
}
