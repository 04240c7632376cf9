//! Tenant context resolution for inbound requests and background jobs.

use thiserror::Error;
use tracing::warn;

use firmhub_core::{ActorId, TenantId};

use crate::context::TenantContext;
use crate::directory::TenantDirectory;
use crate::tenant::TenantStatus;

/// Where a unit of work's tenant binding comes from.
///
/// Requests carry the tenant inside the already-authenticated session.
/// Background jobs must declare their tenant explicitly; there is no
/// "current tenant" to infer, which is what prevents one job's binding from
/// bleeding into the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// An authenticated request session (token decoding/verification happens
    /// upstream; this is the minimal claim set this core consumes).
    Session {
        actor_id: ActorId,
        tenant_id: TenantId,
    },
    /// A background job invocation with its declared tenant parameter.
    Job {
        job_name: String,
        actor_id: ActorId,
        tenant_id: Option<TenantId>,
    },
}

/// No valid tenant context could be established for the unit of work.
///
/// Fatal to the current operation; it must abort before any data access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MissingTenantError {
    #[error("background job '{job_name}' did not declare a tenant parameter")]
    JobWithoutTenant { job_name: String },

    #[error("tenant {0} does not exist")]
    UnknownTenant(TenantId),

    #[error("tenant {tenant_id} is not active (status: {status:?})")]
    TenantNotActive {
        tenant_id: TenantId,
        status: TenantStatus,
    },
}

/// Resolves and validates the active tenant for one unit of work.
///
/// Stateless apart from the directory handle: `resolve` mutates nothing, so
/// one resolver can serve concurrent operations.
#[derive(Debug)]
pub struct TenantResolver<D> {
    directory: D,
}

impl<D> TenantResolver<D>
where
    D: TenantDirectory,
{
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Resolve an inbound trigger into an active [`TenantContext`].
    pub fn resolve(&self, source: ResolutionSource) -> Result<TenantContext, MissingTenantError> {
        let (actor_id, tenant_id) = match source {
            ResolutionSource::Session {
                actor_id,
                tenant_id,
            } => (actor_id, tenant_id),
            ResolutionSource::Job {
                job_name,
                actor_id,
                tenant_id,
            } => {
                let tenant_id = tenant_id.ok_or_else(|| {
                    warn!(job = %job_name, "background job invoked without a tenant parameter");
                    MissingTenantError::JobWithoutTenant { job_name }
                })?;
                (actor_id, tenant_id)
            }
        };

        let tenant = self
            .directory
            .find(tenant_id)
            .ok_or(MissingTenantError::UnknownTenant(tenant_id))?;

        if !tenant.is_active() {
            return Err(MissingTenantError::TenantNotActive {
                tenant_id,
                status: tenant.status(),
            });
        }

        Ok(TenantContext::new(tenant_id, actor_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryTenantDirectory;
    use crate::tenant::Tenant;
    use std::sync::Arc;

    fn directory_with(tenant: &Tenant) -> Arc<InMemoryTenantDirectory> {
        let dir = Arc::new(InMemoryTenantDirectory::new());
        dir.upsert(tenant.clone());
        dir
    }

    #[test]
    fn session_resolves_to_context_for_active_tenant() {
        let tenant = Tenant::onboard(TenantId::new(), "Acme Advisory").unwrap();
        let resolver = TenantResolver::new(directory_with(&tenant));
        let actor = ActorId::new();

        let ctx = resolver
            .resolve(ResolutionSource::Session {
                actor_id: actor,
                tenant_id: tenant.id(),
            })
            .unwrap();

        assert_eq!(ctx.tenant_id(), tenant.id());
        assert_eq!(ctx.actor_id(), actor);
        assert!(!ctx.is_system_override());
    }

    #[test]
    fn job_without_tenant_parameter_is_rejected() {
        let resolver = TenantResolver::new(Arc::new(InMemoryTenantDirectory::new()));

        let err = resolver
            .resolve(ResolutionSource::Job {
                job_name: "invoice-reminders".to_string(),
                actor_id: ActorId::new(),
                tenant_id: None,
            })
            .unwrap_err();

        assert_eq!(
            err,
            MissingTenantError::JobWithoutTenant {
                job_name: "invoice-reminders".to_string()
            }
        );
    }

    #[test]
    fn unknown_tenant_is_rejected() {
        let resolver = TenantResolver::new(Arc::new(InMemoryTenantDirectory::new()));
        let tenant_id = TenantId::new();

        let err = resolver
            .resolve(ResolutionSource::Session {
                actor_id: ActorId::new(),
                tenant_id,
            })
            .unwrap_err();

        assert_eq!(err, MissingTenantError::UnknownTenant(tenant_id));
    }

    #[test]
    fn suspended_tenant_cannot_open_a_unit_of_work() {
        let mut tenant = Tenant::onboard(TenantId::new(), "Acme Advisory").unwrap();
        tenant.suspend().unwrap();
        let resolver = TenantResolver::new(directory_with(&tenant));

        let err = resolver
            .resolve(ResolutionSource::Job {
                job_name: "document-cleanup".to_string(),
                actor_id: ActorId::new(),
                tenant_id: Some(tenant.id()),
            })
            .unwrap_err();

        assert!(matches!(err, MissingTenantError::TenantNotActive { .. }));
    }
}
