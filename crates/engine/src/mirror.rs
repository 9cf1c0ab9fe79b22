//! Mirror store: identity -> document
//!
//! A plain owned map. It trusts the identities it is given and performs no
//! validation; the [`SyncEngine`](crate::SyncEngine) is its only writer and
//! keeps it coherent with the index.

use mirrorsearch_core::DocumentId;
use std::collections::HashMap;
use std::sync::Arc;

/// Owned mapping from identity to the last document added under it
///
/// Documents are held behind `Arc` so materialized results share the
/// mirrored allocation instead of cloning payloads.
#[derive(Debug)]
pub struct MirrorStore<T> {
    docs: HashMap<DocumentId, Arc<T>>,
}

impl<T> Default for MirrorStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MirrorStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        MirrorStore {
            docs: HashMap::new(),
        }
    }

    /// Insert or overwrite a document
    ///
    /// Returns the previous document under this identity.
    pub fn set(&mut self, id: DocumentId, doc: Arc<T>) -> Option<Arc<T>> {
        self.docs.insert(id, doc)
    }

    /// Look up a document
    pub fn get(&self, id: &DocumentId) -> Option<&Arc<T>> {
        self.docs.get(id)
    }

    /// Check whether an identity is mirrored
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.docs.contains_key(id)
    }

    /// Remove one identity
    pub fn delete_one(&mut self, id: &DocumentId) -> Option<Arc<T>> {
        self.docs.remove(id)
    }

    /// Remove several identities, returning how many were present
    pub fn delete_many<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a DocumentId>,
    {
        ids.into_iter()
            .filter(|id| self.docs.remove(*id).is_some())
            .count()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.docs.clear();
    }

    /// Merge a prepared batch in one pass; later entries win
    pub fn merge<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = (DocumentId, Arc<T>)>,
    {
        self.docs.extend(batch);
    }

    /// Number of mirrored documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// All mirrored identities, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> + '_ {
        self.docs.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> DocumentId {
        DocumentId::from(n)
    }

    #[test]
    fn test_set_get_overwrite() {
        let mut store = MirrorStore::new();
        assert!(store.set(id(1), Arc::new("a")).is_none());
        let previous = store.set(id(1), Arc::new("b")).unwrap();

        assert_eq!(*previous, "a");
        assert_eq!(**store.get(&id(1)).unwrap(), "b");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_null_identity_is_stored() {
        let mut store = MirrorStore::new();
        store.set(DocumentId::Null, Arc::new(0));
        assert!(store.contains(&DocumentId::Null));
    }

    #[test]
    fn test_delete_one_and_many() {
        let mut store = MirrorStore::new();
        store.merge((1..=4).map(|n| (id(n), Arc::new(n))));

        assert_eq!(store.delete_one(&id(1)).map(|d| *d), Some(1));
        assert!(store.delete_one(&id(1)).is_none());

        let removed = store.delete_many(&[id(2), id(3), id(9)]);
        assert_eq!(removed, 2);
        assert_eq!(store.ids().cloned().collect::<Vec<_>>(), vec![id(4)]);
    }

    #[test]
    fn test_merge_later_entries_win() {
        let mut store = MirrorStore::new();
        store.merge(vec![(id(1), Arc::new("first")), (id(1), Arc::new("second"))]);
        assert_eq!(store.len(), 1);
        assert_eq!(**store.get(&id(1)).unwrap(), "second");
    }

    #[test]
    fn test_clear() {
        let mut store = MirrorStore::new();
        store.merge((1..=3).map(|n| (id(n), Arc::new(n))));
        store.clear();
        assert!(store.is_empty());
    }
}
