//! In-memory record store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{Document, Error, RecordStore, Result, TournamentId};

/// A [`RecordStore`] keeping all documents in process memory.
///
/// The reference implementation, also used in tests. The lock is held for
/// the duration of a single call only; serializing writes per tournament
/// remains the caller's job.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<TournamentId, Document>>,
}

impl MemoryStore {
    /// Creates a new empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn create(&self, id: TournamentId, document: Document) -> Result<()> {
        let mut documents = self.documents.write();

        if documents.contains_key(&id) {
            return Err(Error::AlreadyExists(id));
        }

        documents.insert(id, document);
        Ok(())
    }

    fn read(&self, id: TournamentId) -> Result<Option<Document>> {
        Ok(self.documents.read().get(&id).cloned())
    }

    fn update(&self, id: TournamentId, document: Document) -> Result<()> {
        match self.documents.write().get_mut(&id) {
            Some(slot) => {
                *slot = document;
                Ok(())
            }
            None => Err(Error::NotFound(id)),
        }
    }

    fn delete(&self, id: TournamentId) -> Result<()> {
        match self.documents.write().remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::MemoryStore;
    use crate::{Error, RecordStore, TournamentId};

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        let id = TournamentId(1);

        assert!(store.is_empty());
        assert_eq!(store.read(id).unwrap(), None);

        store.create(id, json!({ "rounds": [] })).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.read(id).unwrap(), Some(json!({ "rounds": [] })));

        assert!(matches!(
            store.create(id, json!(null)),
            Err(Error::AlreadyExists(_))
        ));

        store.update(id, json!({ "rounds": [1] })).unwrap();
        assert_eq!(store.read(id).unwrap(), Some(json!({ "rounds": [1] })));

        store.delete(id).unwrap();
        assert!(store.is_empty());

        assert!(matches!(
            store.update(id, json!(null)),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(store.delete(id), Err(Error::NotFound(_))));
    }
}
