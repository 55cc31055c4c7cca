// Local in-memory copy of a remote collection

use crate::record::Record;
use tracing::{debug, warn};

/// Ordered cache of a remote collection
///
/// Order is that of the last full load, with created records appended at the
/// end. The cache only reflects the last full load plus the responses of the
/// mutations applied since.
#[derive(Debug, Clone)]
pub struct LocalCollection<T> {
    records: Vec<T>,
}

impl<T> Default for LocalCollection<T> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<T: Record> LocalCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Replace everything with the result of a full load
    pub fn replace_all(&mut self, records: Vec<T>) {
        debug!(collection = T::collection_name(), count = records.len(), "replace_all: called");
        self.records = records;
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Reconcile a created record
    pub fn append(&mut self, record: T) {
        debug!(collection = T::collection_name(), id = %record.id(), "append: called");
        self.records.push(record);
    }

    /// Reconcile an updated record, in place
    ///
    /// Returns `false` if no local entry carries the record's id, in which
    /// case the collection is left unchanged.
    pub fn replace(&mut self, record: T) -> bool {
        let id = record.id();
        match self.records.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                warn!(collection = T::collection_name(), %id, "Updated record is not cached locally");
                false
            }
        }
    }

    /// Reconcile a deleted record
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(index))
    }
}
