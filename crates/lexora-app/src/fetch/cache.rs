//! Collection cache for branch-scoped records
//!
//! Stores the last applied record list per resource kind. Records are
//! opaque payloads; the cache only tracks presence and membership so the
//! engine can purge and invalidate without knowing schemas.

use lexora_core::effects::RecordPayload;
use lexora_core::ResourceKind;
use std::collections::BTreeMap;

/// Per-kind record lists, keyed by the resource kind that fetched them.
#[derive(Debug, Clone, Default)]
pub struct CollectionCache {
    collections: BTreeMap<ResourceKind, Vec<RecordPayload>>,
}

impl CollectionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached records of one kind. Empty slice when never loaded.
    pub fn records(&self, kind: ResourceKind) -> &[RecordPayload] {
        self.collections.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Whether a collection has been loaded at least once.
    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        self.collections.contains_key(&kind)
    }

    /// Replace one collection with a fresh fetch result.
    pub fn apply(&mut self, kind: ResourceKind, records: Vec<RecordPayload>) {
        self.collections.insert(kind, records);
    }

    /// Append one created record to its collection.
    pub fn push(&mut self, kind: ResourceKind, record: RecordPayload) {
        self.collections.entry(kind).or_default().push(record);
    }

    /// Drop one collection, keeping the rest untouched.
    pub fn remove(&mut self, kind: ResourceKind) {
        self.collections.remove(&kind);
    }

    /// Drop every financial collection. Called when the financial
    /// capability is revoked so no stale financial data stays visible.
    pub fn purge_financial(&mut self) {
        self.collections.retain(|kind, _| !kind.is_financial());
    }

    /// Drop everything. Called at the branch-change barrier and on logout.
    pub fn clear(&mut self) {
        self.collections.clear();
    }

    /// Record counts per loaded kind, for snapshots.
    pub fn counts(&self) -> BTreeMap<ResourceKind, usize> {
        self.collections
            .iter()
            .map(|(kind, records)| (*kind, records.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unloaded_kind_is_empty_not_missing() {
        let cache = CollectionCache::new();
        assert!(cache.records(ResourceKind::Clients).is_empty());
        assert!(!cache.is_loaded(ResourceKind::Clients));
    }

    #[test]
    fn test_apply_replaces_not_merges() {
        let mut cache = CollectionCache::new();
        cache.apply(ResourceKind::Cases, vec![json!({"id": 1}), json!({"id": 2})]);
        cache.apply(ResourceKind::Cases, vec![json!({"id": 3})]);
        assert_eq!(cache.records(ResourceKind::Cases), [json!({"id": 3})]);
    }

    #[test]
    fn test_purge_financial_leaves_other_kinds() {
        let mut cache = CollectionCache::new();
        cache.apply(ResourceKind::FinancialRecords, vec![json!({"amount": 100})]);
        cache.apply(ResourceKind::Clients, vec![json!({"name": "Acme"})]);

        cache.purge_financial();

        assert!(!cache.is_loaded(ResourceKind::FinancialRecords));
        assert!(cache.is_loaded(ResourceKind::Clients));
    }

    #[test]
    fn test_counts_reflect_loaded_collections_only() {
        let mut cache = CollectionCache::new();
        cache.apply(ResourceKind::Tasks, vec![json!({}), json!({})]);

        let counts = cache.counts();
        assert_eq!(counts.get(&ResourceKind::Tasks), Some(&2));
        assert_eq!(counts.get(&ResourceKind::Clients), None);
    }
}
