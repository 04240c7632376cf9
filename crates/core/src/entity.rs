//! Entity trait: identity + an immutable owning tenant.

use crate::id::TenantId;

/// A tenant-scoped business record.
///
/// Every entity belongs to exactly one tenant for its whole lifetime. The
/// owning tenant is set at creation and no operation may move an entity to a
/// different tenant; the scoped data access layer enforces this on every
/// write.
pub trait TenantEntity: Clone + Send + Sync + 'static {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Returns the owning tenant. Immutable after creation.
    fn tenant_id(&self) -> TenantId;

    /// Stable table/collection name for this entity type (e.g. `"clients"`).
    fn entity_type() -> &'static str;
}
