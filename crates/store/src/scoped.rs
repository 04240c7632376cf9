//! Tenant-scoped entity access.

use tracing::warn;

use firmhub_core::TenantEntity;
use firmhub_tenancy::TenantContext;

use crate::backend::EntityStore;
use crate::error::StoreError;

/// Scoped view over a backend store for one unit of work.
///
/// Every read appends an implicit `tenant_id = ctx.tenant_id` predicate;
/// every write stamps/verifies the owning tenant. Constructed from an
/// `Option<&TenantContext>` so callers holding an unresolved context fail
/// closed instead of falling back to "all tenants".
#[derive(Debug)]
pub struct Scoped<'a, S> {
    ctx: TenantContext,
    store: &'a S,
}

impl<'a, S> Scoped<'a, S> {
    pub fn open(ctx: Option<&TenantContext>, store: &'a S) -> Result<Self, StoreError> {
        let ctx = ctx.ok_or(StoreError::MissingContext)?;
        Ok(Self { ctx: *ctx, store })
    }

    pub fn context(&self) -> &TenantContext {
        &self.ctx
    }

    /// Read one entity. A row owned by another tenant is indistinguishable
    /// from an absent one; no cross-tenant existence information leaks.
    pub fn get<E>(&self, id: E::Id) -> Result<E, StoreError>
    where
        E: TenantEntity,
        S: EntityStore<E>,
    {
        match self.store.fetch(id)? {
            Some(e) if e.tenant_id() == self.ctx.tenant_id() => Ok(e),
            _ => Err(StoreError::NotFound),
        }
    }

    /// List entities of this tenant matching `filter`.
    pub fn list<E>(&self, filter: impl Fn(&E) -> bool) -> Result<Vec<E>, StoreError>
    where
        E: TenantEntity,
        S: EntityStore<E>,
    {
        let rows = self.store.scan()?;
        Ok(rows
            .into_iter()
            .filter(|e| e.tenant_id() == self.ctx.tenant_id() && filter(e))
            .collect())
    }

    /// Create an entity owned by the active tenant.
    ///
    /// An entity pre-stamped with a foreign tenant is refused outright; it
    /// indicates a bug (or an attack) above this layer.
    pub fn create<E>(&self, entity: E) -> Result<(), StoreError>
    where
        E: TenantEntity,
        S: EntityStore<E>,
    {
        if entity.tenant_id() != self.ctx.tenant_id() {
            warn!(
                entity_type = E::entity_type(),
                actor = %self.ctx.actor_id(),
                "refused create of entity stamped with a foreign tenant"
            );
            return Err(StoreError::CrossTenantAccess {
                entity_type: E::entity_type(),
            });
        }
        if self.store.fetch(entity.id())?.is_some() {
            return Err(StoreError::Conflict(format!(
                "{} id already exists",
                E::entity_type()
            )));
        }
        self.store.put(entity)
    }

    /// Replace an existing entity.
    ///
    /// Refuses to touch a row whose stored tenant differs from the context,
    /// and refuses any change to the owning tenant (it is immutable after
    /// creation).
    pub fn update<E>(&self, entity: E) -> Result<(), StoreError>
    where
        E: TenantEntity,
        S: EntityStore<E>,
    {
        let stored = self.store.fetch(entity.id())?.ok_or(StoreError::NotFound)?;
        if stored.tenant_id() != self.ctx.tenant_id() {
            warn!(
                entity_type = E::entity_type(),
                actor = %self.ctx.actor_id(),
                "cross-tenant update attempt denied"
            );
            return Err(StoreError::CrossTenantAccess {
                entity_type: E::entity_type(),
            });
        }
        if entity.tenant_id() != stored.tenant_id() {
            warn!(
                entity_type = E::entity_type(),
                actor = %self.ctx.actor_id(),
                "attempt to reassign an entity's owning tenant denied"
            );
            return Err(StoreError::CrossTenantAccess {
                entity_type: E::entity_type(),
            });
        }
        self.store.put(entity)
    }

    /// Delete an entity of the active tenant.
    pub fn delete<E>(&self, id: E::Id) -> Result<(), StoreError>
    where
        E: TenantEntity,
        S: EntityStore<E>,
    {
        let stored = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        if stored.tenant_id() != self.ctx.tenant_id() {
            warn!(
                entity_type = E::entity_type(),
                actor = %self.ctx.actor_id(),
                "cross-tenant delete attempt denied"
            );
            return Err(StoreError::CrossTenantAccess {
                entity_type: E::entity_type(),
            });
        }
        self.store.remove(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryEntityStore;
    use firmhub_core::{ActorId, EntityId, TenantId};
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: EntityId,
        tenant_id: TenantId,
        body: String,
    }

    impl Note {
        fn new(tenant_id: TenantId, body: &str) -> Self {
            Self {
                id: EntityId::new(),
                tenant_id,
                body: body.to_string(),
            }
        }
    }

    impl TenantEntity for Note {
        type Id = EntityId;

        fn id(&self) -> EntityId {
            self.id
        }

        fn tenant_id(&self) -> TenantId {
            self.tenant_id
        }

        fn entity_type() -> &'static str {
            "notes"
        }
    }

    fn ctx(tenant_id: TenantId) -> TenantContext {
        TenantContext::new(tenant_id, ActorId::new())
    }

    #[test]
    fn no_context_fails_closed() {
        let store: InMemoryEntityStore<Note> = InMemoryEntityStore::new();
        let err = Scoped::open(None, &store).unwrap_err();
        assert_eq!(err, StoreError::MissingContext);
    }

    #[test]
    fn reads_never_see_foreign_rows() {
        let store = InMemoryEntityStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        let ctx_a = ctx(tenant_a);
        let db_a = Scoped::open(Some(&ctx_a), &store).unwrap();
        let acme = Note::new(tenant_a, "Acme");
        db_a.create(acme.clone()).unwrap();

        let ctx_b = ctx(tenant_b);
        let db_b = Scoped::open(Some(&ctx_b), &store).unwrap();

        // get: foreign row looks absent
        assert_eq!(db_b.get::<Note>(acme.id).unwrap_err(), StoreError::NotFound);
        // list: foreign row never appears
        assert!(db_b.list::<Note>(|_| true).unwrap().is_empty());
        // owner still sees it
        assert_eq!(db_a.get::<Note>(acme.id).unwrap(), acme);
    }

    #[test]
    fn cross_tenant_update_is_a_distinct_security_error() {
        let store = InMemoryEntityStore::new();
        let tenant_a = TenantId::new();
        let ctx_a = ctx(tenant_a);
        let db_a = Scoped::open(Some(&ctx_a), &store).unwrap();

        let note = Note::new(tenant_a, "Acme");
        db_a.create(note.clone()).unwrap();

        let ctx_b = ctx(TenantId::new());
        let db_b = Scoped::open(Some(&ctx_b), &store).unwrap();

        let err = db_b.update(note.clone()).unwrap_err();
        assert_eq!(err, StoreError::CrossTenantAccess { entity_type: "notes" });

        let err = db_b.delete::<Note>(note.id).unwrap_err();
        assert_eq!(err, StoreError::CrossTenantAccess { entity_type: "notes" });
    }

    #[test]
    fn create_refuses_entities_stamped_with_a_foreign_tenant() {
        let store = InMemoryEntityStore::new();
        let ctx_a = ctx(TenantId::new());
        let db_a = Scoped::open(Some(&ctx_a), &store).unwrap();

        let foreign = Note::new(TenantId::new(), "smuggled");
        let err = db_a.create(foreign).unwrap_err();
        assert_eq!(err, StoreError::CrossTenantAccess { entity_type: "notes" });
        assert!(store.is_empty());
    }

    #[test]
    fn create_refuses_duplicate_ids() {
        let store = InMemoryEntityStore::new();
        let tenant = TenantId::new();
        let c = ctx(tenant);
        let db = Scoped::open(Some(&c), &store).unwrap();

        let note = Note::new(tenant, "first");
        db.create(note.clone()).unwrap();
        let err = db.create(note).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn owning_tenant_is_immutable() {
        let store = InMemoryEntityStore::new();
        let tenant = TenantId::new();
        let c = ctx(tenant);
        let db = Scoped::open(Some(&c), &store).unwrap();

        let note = Note::new(tenant, "original");
        db.create(note.clone()).unwrap();

        let mut moved = note;
        moved.tenant_id = TenantId::new();
        let err = db.update(moved).unwrap_err();
        assert_eq!(err, StoreError::CrossTenantAccess { entity_type: "notes" });
    }

    #[test]
    fn update_and_delete_within_the_tenant_work() {
        let store = InMemoryEntityStore::new();
        let tenant = TenantId::new();
        let c = ctx(tenant);
        let db = Scoped::open(Some(&c), &store).unwrap();

        let mut note = Note::new(tenant, "draft");
        db.create(note.clone()).unwrap();

        note.body = "final".to_string();
        db.update(note.clone()).unwrap();
        assert_eq!(db.get::<Note>(note.id).unwrap().body, "final");

        db.delete::<Note>(note.id).unwrap();
        assert_eq!(db.get::<Note>(note.id).unwrap_err(), StoreError::NotFound);
    }

    proptest! {
        /// For all tenant pairs T1 != T2 and any entity set owned by T1:
        /// reads under T2 return nothing of T1's, and writes fail with a
        /// cross-tenant error.
        #[test]
        fn isolation_holds_for_arbitrary_entity_sets(bodies in proptest::collection::vec(".{0,12}", 1..8)) {
            let store = InMemoryEntityStore::new();
            let tenant_a = TenantId::new();
            let tenant_b = TenantId::new();
            prop_assume!(tenant_a != tenant_b);

            let ctx_a = ctx(tenant_a);
            let db_a = Scoped::open(Some(&ctx_a), &store).unwrap();
            let mut owned = Vec::new();
            for body in &bodies {
                let note = Note::new(tenant_a, body);
                db_a.create(note.clone()).unwrap();
                owned.push(note);
            }

            let ctx_b = ctx(tenant_b);
            let db_b = Scoped::open(Some(&ctx_b), &store).unwrap();

            prop_assert!(db_b.list::<Note>(|_| true).unwrap().is_empty());
            for note in &owned {
                prop_assert_eq!(db_b.get::<Note>(note.id).unwrap_err(), StoreError::NotFound);
                prop_assert_eq!(
                    db_b.update(note.clone()).unwrap_err(),
                    StoreError::CrossTenantAccess { entity_type: "notes" }
                );
            }
            prop_assert_eq!(db_a.list::<Note>(|_| true).unwrap().len(), owned.len());
        }
    }
}
