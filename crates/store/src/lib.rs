//! Scoped data access layer.
//!
//! Every read and write against tenant-scoped entities goes through
//! [`Scoped`], which derives an implicit tenant predicate from the active
//! [`TenantContext`](firmhub_tenancy::TenantContext). With no context, all
//! scoped operations fail closed. The only way around the scope is the
//! audited break-glass path in [`elevated`].

pub mod backend;
pub mod elevated;
pub mod error;
pub mod scoped;
pub mod txn;

pub use backend::{EntityStore, InMemoryEntityStore};
pub use elevated::{with_elevated_access, ElevatedAccess};
pub use error::StoreError;
pub use scoped::Scoped;
pub use txn::Transactional;
