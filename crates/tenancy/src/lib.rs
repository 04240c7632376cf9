//! Tenant lifecycle, per-operation tenant context, and context resolution.
//!
//! The resolver is the single entry point that turns an inbound trigger
//! (authenticated request session or background job parameters) into an
//! active [`TenantContext`]. Nothing downstream of it may touch tenant-scoped
//! data without one.

pub mod context;
pub mod directory;
pub mod resolver;
pub mod tenant;

pub use context::TenantContext;
pub use directory::{InMemoryTenantDirectory, TenantDirectory};
pub use resolver::{MissingTenantError, ResolutionSource, TenantResolver};
pub use tenant::{Tenant, TenantStatus};
