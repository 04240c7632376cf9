//! Tenant directory: lookup of tenant records by id.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use firmhub_core::TenantId;

use crate::tenant::Tenant;

/// Lookup of tenant records (backed by the platform's tenant registry).
pub trait TenantDirectory: Send + Sync {
    fn find(&self, tenant_id: TenantId) -> Option<Tenant>;
    fn upsert(&self, tenant: Tenant);
}

impl<D> TenantDirectory for Arc<D>
where
    D: TenantDirectory + ?Sized,
{
    fn find(&self, tenant_id: TenantId) -> Option<Tenant> {
        (**self).find(tenant_id)
    }

    fn upsert(&self, tenant: Tenant) {
        (**self).upsert(tenant)
    }
}

/// In-memory tenant directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    inner: RwLock<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn find(&self, tenant_id: TenantId) -> Option<Tenant> {
        let map = self.inner.read().ok()?;
        map.get(&tenant_id).cloned()
    }

    fn upsert(&self, tenant: Tenant) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(tenant.id(), tenant);
        }
    }
}
