use super::JunctionDescriptor;
use crate::{probe::Prober, Result};

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Probed descriptors, keyed by `(parent collection, field)`.
///
/// Entries are immutable once stored; re-probing requires
/// [`invalidate`](DescriptorCache::invalidate). Share one cache between
/// engines with an `Arc`.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: Mutex<HashMap<(String, String), Arc<JunctionDescriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> DescriptorCache {
        DescriptorCache::default()
    }

    pub fn get(&self, collection: &str, field: &str) -> Option<Arc<JunctionDescriptor>> {
        self.lock()
            .get(&(collection.to_string(), field.to_string()))
            .cloned()
    }

    /// Stores `descriptor`, replacing any previous entry for the same pair.
    pub fn insert(&self, descriptor: JunctionDescriptor) -> Arc<JunctionDescriptor> {
        let key = (
            descriptor.parent_collection.clone(),
            descriptor.field.clone(),
        );
        let descriptor = Arc::new(descriptor);
        self.lock().insert(key, descriptor.clone());
        descriptor
    }

    /// Returns the cached descriptor, probing the host on a miss.
    ///
    /// Concurrent misses for the same pair may each probe; the last result
    /// is kept.
    pub async fn get_or_probe(
        &self,
        prober: &Prober,
        collection: &str,
        field: &str,
    ) -> Result<Arc<JunctionDescriptor>> {
        if let Some(descriptor) = self.get(collection, field) {
            return Ok(descriptor);
        }

        let descriptor = prober.probe(collection, field).await?;
        Ok(self.insert(descriptor))
    }

    pub fn invalidate(&self, collection: &str, field: &str) -> Option<Arc<JunctionDescriptor>> {
        self.lock()
            .remove(&(collection.to_string(), field.to_string()))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Arc<JunctionDescriptor>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
