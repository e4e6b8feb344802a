//! Contract with the index provider.
//!
//! The translator only supplies key functions and reads entries back through
//! [`ReverseIndex`]. Storage and maintenance belong to the provider.
//! [`MemoryIndex`] is an in-process provider used by tests and embedders that
//! do not have an informer cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_lock::RwLock;
use async_trait::async_trait;
use tracing::{debug, error, trace};

use vcluster_types::{IndexKey, IndexName, NamespacedName};

use crate::TranslateError;
use crate::kind::ResourceKind;
use crate::object::MetadataObject;
use crate::translator::physical_to_virtual;

pub type SharedIndex<I> = Arc<I>;

/// computes the index keys of a physical object
pub type IndexKeyFn = Arc<dyn Fn(&dyn MetadataObject) -> Vec<IndexKey> + Send + Sync>;

/// Key function for `INDEX_BY_VIRTUAL_NAME`: the derived virtual name of the object.
pub fn virtual_name_key<K: ResourceKind>() -> IndexKeyFn {
    Arc::new(|obj: &dyn MetadataObject| vec![physical_to_virtual::<K>(&obj.identity()).name])
}

pub trait IndexRegistrar {
    fn index_field(&mut self, index: IndexName, key_fn: IndexKeyFn) -> Result<(), TranslateError>;
}

#[async_trait]
pub trait ReverseIndex: Send + Sync {
    /// Physical object stored under `key`.
    /// More than one match must be reported as [`TranslateError::IndexIntegrity`].
    async fn get_by_index(
        &self,
        index: &str,
        key: &str,
    ) -> Result<Option<NamespacedName>, TranslateError>;
}

type Entries = HashMap<IndexKey, Vec<NamespacedName>>;

#[derive(Default)]
pub struct MemoryIndex {
    key_fns: HashMap<IndexName, IndexKeyFn>,
    entries: RwLock<HashMap<IndexName, Entries>>,
}

impl fmt::Debug for MemoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryIndex")
            .field("indices", &self.key_fns.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl IndexRegistrar for MemoryIndex {
    fn index_field(&mut self, index: IndexName, key_fn: IndexKeyFn) -> Result<(), TranslateError> {
        if self.key_fns.contains_key(index) {
            return Err(TranslateError::DuplicateIndex(index.to_owned()));
        }
        debug!(index, "registering index");
        self.key_fns.insert(index, key_fn);
        Ok(())
    }
}

impl MemoryIndex {
    pub fn shared(self) -> SharedIndex<Self> {
        Arc::new(self)
    }

    /// replace every entry with the keys of `objects`
    pub async fn rebuild<T>(&self, objects: &[T])
    where
        T: MetadataObject,
    {
        let mut rebuilt: HashMap<IndexName, Entries> = HashMap::new();
        for (index, key_fn) in &self.key_fns {
            let entries = rebuilt.entry(*index).or_default();
            for object in objects {
                for key in key_fn(object) {
                    entries.entry(key).or_default().push(object.identity());
                }
            }
        }

        debug!(objects = objects.len(), "rebuilt index");
        *self.entries.write().await = rebuilt;
    }

    /// add or refresh a single object
    pub async fn upsert(&self, object: &dyn MetadataObject) {
        let identity = object.identity();
        let mut lock = self.entries.write().await;
        for (index, key_fn) in &self.key_fns {
            let entries = lock.entry(*index).or_default();
            remove_identity(entries, &identity);
            for key in key_fn(object) {
                trace!(index, %key, %identity, "index entry");
                entries.entry(key).or_default().push(identity.clone());
            }
        }
    }

    pub async fn delete(&self, identity: &NamespacedName) {
        let mut lock = self.entries.write().await;
        for entries in lock.values_mut() {
            remove_identity(entries, identity);
        }
    }
}

fn remove_identity(entries: &mut Entries, identity: &NamespacedName) {
    entries.retain(|_, identities| {
        identities.retain(|existing| existing != identity);
        !identities.is_empty()
    });
}

#[async_trait]
impl ReverseIndex for MemoryIndex {
    async fn get_by_index(
        &self,
        index: &str,
        key: &str,
    ) -> Result<Option<NamespacedName>, TranslateError> {
        if !self.key_fns.contains_key(index) {
            return Err(TranslateError::UnknownIndex(index.to_owned()));
        }

        let lock = self.entries.read().await;
        let matches = lock.get(index).and_then(|entries| entries.get(key));
        match matches.map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([identity]) => Ok(Some(identity.clone())),
            Some(identities) => {
                error!(index, key, ?identities, "multiple objects share index key");
                Err(TranslateError::IndexIntegrity {
                    index: index.to_owned(),
                    key: key.to_owned(),
                    matches: identities.to_vec(),
                })
            }
        }
    }
}

#[async_trait]
impl<I> ReverseIndex for Arc<I>
where
    I: ReverseIndex + ?Sized,
{
    async fn get_by_index(
        &self,
        index: &str,
        key: &str,
    ) -> Result<Option<NamespacedName>, TranslateError> {
        self.as_ref().get_by_index(index, key).await
    }
}
