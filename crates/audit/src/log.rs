//! Audit log storage: transactional log + non-transactional forensic sink.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};

use firmhub_core::{ActorId, TenantId};

use crate::entry::AuditEntry;

/// Query filter for the compliance read interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub tenant_id: Option<TenantId>,
    pub actor_id: Option<ActorId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AuditQuery {
    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            ..Self::default()
        }
    }

    pub fn by_actor(mut self, actor_id: ActorId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(t) = self.tenant_id {
            if entry.tenant_id() != t {
                return false;
            }
        }
        if let Some(a) = self.actor_id {
            if entry.actor_id() != a {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.timestamp() < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.timestamp() > to {
                return false;
            }
        }
        true
    }
}

/// Append-only audit log. No update or delete operations exist.
pub trait AuditLog: Send + Sync {
    fn record(&self, entry: AuditEntry);

    /// Record an entry that must survive a rollback of any enclosing unit of
    /// work. Break-glass entries use this: they record the access itself, not
    /// the outcome, so the enclosing operation failing must not erase them.
    fn record_durable(&self, entry: AuditEntry) {
        self.record(entry)
    }

    fn query(&self, query: &AuditQuery) -> Vec<AuditEntry>;
}

impl<L> AuditLog for Arc<L>
where
    L: AuditLog + ?Sized,
{
    fn record(&self, entry: AuditEntry) {
        (**self).record(entry)
    }

    fn record_durable(&self, entry: AuditEntry) {
        (**self).record_durable(entry)
    }

    fn query(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        (**self).query(query)
    }
}

/// In-memory append-only audit log for tests/dev.
///
/// Entries written inside a unit of work participate in its rollback: the
/// log supports checkpoint/revert so a rolled-back action does not leave an
/// orphaned "it happened" record. Entries written via `record_durable` are
/// exempt and survive the revert. Outside of rollback the log is strictly
/// append-only.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    // bool marks a durable entry (kept through rollback)
    entries: RwLock<Vec<(AuditEntry, bool)>>,
    checkpoints: Mutex<Vec<usize>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit-of-work support: mark the current end of the log.
    pub fn begin(&self) {
        let len = self.entries.read().map(|e| e.len()).unwrap_or(0);
        if let Ok(mut marks) = self.checkpoints.lock() {
            marks.push(len);
        }
    }

    /// Unit-of-work support: keep everything written since the last mark.
    pub fn commit(&self) {
        if let Ok(mut marks) = self.checkpoints.lock() {
            marks.pop();
        }
    }

    /// Unit-of-work support: discard entries written since the last mark,
    /// keeping durable ones.
    pub fn rollback(&self) {
        let mark = match self.checkpoints.lock() {
            Ok(mut marks) => marks.pop(),
            Err(_) => None,
        };
        if let (Some(mark), Ok(mut entries)) = (mark, self.entries.write()) {
            let tail = entries.split_off(mark);
            entries.extend(tail.into_iter().filter(|(_, durable)| *durable));
        }
    }
}

impl AuditLog for InMemoryAuditLog {
    fn record(&self, entry: AuditEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push((entry, false));
        }
    }

    fn record_durable(&self, entry: AuditEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push((entry, true));
        }
    }

    fn query(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        let entries = match self.entries.read() {
            Ok(e) => e,
            Err(_) => return vec![],
        };
        entries
            .iter()
            .filter(|(e, _)| query.matches(e))
            .map(|(e, _)| e.clone())
            .collect()
    }
}

/// Non-transactional sink for forensic records.
///
/// Handler failures are written here before the enclosing unit of work rolls
/// back, so the partial attempt stays visible to compliance review even
/// though the transactional log entries for that unit of work are gone.
#[derive(Debug, Default)]
pub struct ForensicSink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl ForensicSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&self, entry: AuditEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(entry);
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditAction;

    fn entry_for(tenant_id: TenantId, actor_id: ActorId) -> AuditEntry {
        AuditEntry::new(actor_id, tenant_id, AuditAction::ElevatedAccess, "clients")
            .with_justification("support ticket #9")
    }

    #[test]
    fn query_filters_by_tenant_and_actor() {
        let log = InMemoryAuditLog::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let actor = ActorId::new();

        log.record(entry_for(tenant_a, actor));
        log.record(entry_for(tenant_b, actor));
        log.record(entry_for(tenant_a, ActorId::new()));

        let by_tenant = log.query(&AuditQuery::for_tenant(tenant_a));
        assert_eq!(by_tenant.len(), 2);

        let by_both = log.query(&AuditQuery::for_tenant(tenant_a).by_actor(actor));
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].justification(), Some("support ticket #9"));
    }

    #[test]
    fn query_filters_by_time_range() {
        let log = InMemoryAuditLog::new();
        let tenant = TenantId::new();
        log.record(entry_for(tenant, ActorId::new()));

        let now = Utc::now();
        let recent = AuditQuery::for_tenant(tenant)
            .between(now - chrono::Duration::minutes(1), now + chrono::Duration::minutes(1));
        assert_eq!(log.query(&recent).len(), 1);

        let past = AuditQuery::for_tenant(tenant).between(
            now - chrono::Duration::hours(2),
            now - chrono::Duration::hours(1),
        );
        assert!(log.query(&past).is_empty());
    }

    #[test]
    fn rollback_discards_entries_since_checkpoint() {
        let log = InMemoryAuditLog::new();
        let tenant = TenantId::new();
        log.record(entry_for(tenant, ActorId::new()));

        log.begin();
        log.record(entry_for(tenant, ActorId::new()));
        log.rollback();

        assert_eq!(log.query(&AuditQuery::for_tenant(tenant)).len(), 1);
    }

    #[test]
    fn rollback_keeps_durable_entries() {
        let log = InMemoryAuditLog::new();
        let tenant = TenantId::new();

        log.begin();
        log.record(entry_for(tenant, ActorId::new()));
        log.record_durable(
            AuditEntry::new(ActorId::new(), tenant, AuditAction::ElevatedAccess, "clients")
                .with_justification("support ticket #9"),
        );
        log.record(entry_for(tenant, ActorId::new()));
        log.rollback();

        let kept = log.query(&AuditQuery::for_tenant(tenant));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].action(), AuditAction::ElevatedAccess);
    }

    #[test]
    fn commit_keeps_entries_written_since_checkpoint() {
        let log = InMemoryAuditLog::new();
        let tenant = TenantId::new();

        log.begin();
        log.record(entry_for(tenant, ActorId::new()));
        log.commit();

        assert_eq!(log.query(&AuditQuery::for_tenant(tenant)).len(), 1);
    }

    #[test]
    fn forensic_sink_is_independent_of_the_log() {
        let sink = ForensicSink::new();
        let tenant = TenantId::new();
        sink.note(entry_for(tenant, ActorId::new()));
        assert_eq!(sink.entries().len(), 1);
    }
}
