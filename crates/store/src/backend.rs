//! Raw entity storage backend.
//!
//! The backend is **unscoped**: rows carry their owning tenant but the
//! backend applies no tenant predicate of its own. Only the scoped layer
//! ([`crate::Scoped`]), the elevated-access path, and backend tests may use
//! it directly; application code must never issue raw operations against
//! tenant-scoped entities.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use firmhub_core::TenantEntity;

use crate::error::StoreError;
use crate::txn::Transactional;

/// Keyed storage for one entity type.
pub trait EntityStore<E: TenantEntity>: Send + Sync {
    fn fetch(&self, id: E::Id) -> Result<Option<E>, StoreError>;
    fn put(&self, entity: E) -> Result<(), StoreError>;
    fn remove(&self, id: E::Id) -> Result<Option<E>, StoreError>;
    fn scan(&self) -> Result<Vec<E>, StoreError>;
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: TenantEntity,
    S: EntityStore<E> + ?Sized,
{
    fn fetch(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        (**self).fetch(id)
    }

    fn put(&self, entity: E) -> Result<(), StoreError> {
        (**self).put(entity)
    }

    fn remove(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        (**self).remove(id)
    }

    fn scan(&self) -> Result<Vec<E>, StoreError> {
        (**self).scan()
    }
}

/// In-memory entity store for tests/dev.
///
/// Supports checkpoint/rollback so the unit of work can discard writes from
/// an aborted operation.
#[derive(Debug)]
pub struct InMemoryEntityStore<E: TenantEntity> {
    rows: RwLock<HashMap<E::Id, E>>,
    checkpoints: Mutex<Vec<HashMap<E::Id, E>>>,
}

impl<E: TenantEntity> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total row count across all tenants (backend diagnostics only).
    pub fn len(&self) -> usize {
        self.rows.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: TenantEntity> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            checkpoints: Mutex::new(Vec::new()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl<E: TenantEntity> EntityStore<E> for InMemoryEntityStore<E> {
    fn fetch(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id).cloned())
    }

    fn put(&self, entity: E) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(entity.id(), entity);
        Ok(())
    }

    fn remove(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        Ok(rows.remove(&id))
    }

    fn scan(&self) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().cloned().collect())
    }
}

impl<E: TenantEntity> Transactional for InMemoryEntityStore<E> {
    fn begin(&self) {
        let snapshot = self.rows.read().map(|r| r.clone()).unwrap_or_default();
        if let Ok(mut marks) = self.checkpoints.lock() {
            marks.push(snapshot);
        }
    }

    fn commit(&self) {
        if let Ok(mut marks) = self.checkpoints.lock() {
            marks.pop();
        }
    }

    fn rollback(&self) {
        let snapshot = match self.checkpoints.lock() {
            Ok(mut marks) => marks.pop(),
            Err(_) => None,
        };
        if let (Some(snapshot), Ok(mut rows)) = (snapshot, self.rows.write()) {
            *rows = snapshot;
        }
    }
}
