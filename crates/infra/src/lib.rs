//! Infrastructure layer: unit-of-work composition and the Postgres
//! row-security backend.

pub mod pg;
pub mod runtime;
pub mod unit_of_work;


pub use runtime::{standard_handlers, AuditDeliveryObserver, WorkflowRuntime, WorkflowStores};
pub use unit_of_work::{UnitOfWork, WorkflowError};
