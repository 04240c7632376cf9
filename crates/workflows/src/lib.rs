//! Business entities and cross-module workflow orchestrators.
//!
//! The proposal module publishes facts; the client, contract, project, and
//! portal orchestrators subscribe to them. No module imports another's
//! internals; the event payload is the whole contract between them.

pub mod client;
pub mod contract;
pub mod events;
pub mod handlers;
pub mod project;
pub mod proposal;

pub use client::Client;
pub use contract::Contract;
pub use events::WorkflowEvent;
pub use handlers::{
    ClientOnboardingHandler, ContractSetupHandler, PortalAccessHandler, ProjectKickoffHandler,
};
pub use project::Project;
pub use proposal::{Proposal, ProposalStatus};
