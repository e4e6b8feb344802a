use serde_json::Value;
use tracing::{debug, instrument};

use vcluster_types::NamespacedName;
use vcluster_types::defaults::INDEX_BY_VIRTUAL_NAME;

use crate::TranslateError;
use crate::config::TranslatorConfig;
use crate::index::{IndexRegistrar, ReverseIndex, SharedIndex, virtual_name_key};
use crate::kind::{CsiStorageCapacity, ResourceKind};
use crate::metadata::{MetadataDelta, MetadataTranslator};
use crate::object::MetadataObject;
use crate::translator::IdentityTranslator;

pub type CsiStorageCapacitySyncer<I> = ClusterSyncer<CsiStorageCapacity, I>;

/// Translator for a cluster scoped kind mirrored into `K::VIRTUAL_NAMESPACE`.
/// Called by the sync engine for every physical and virtual object of the kind.
pub struct ClusterSyncer<K, I> {
    identity: IdentityTranslator<K, I>,
    metadata: MetadataTranslator,
}

impl<K, I> ClusterSyncer<K, I>
where
    K: ResourceKind,
    I: ReverseIndex,
{
    pub fn new(index: SharedIndex<I>, config: &TranslatorConfig) -> Self {
        Self {
            identity: IdentityTranslator::new(index),
            metadata: MetadataTranslator::new(config),
        }
    }

    pub fn name(&self) -> &'static str {
        K::NAME
    }

    /// every object of the kind is synced
    pub fn is_managed(&self, _obj: &K::Object) -> bool {
        true
    }

    /// register the virtual name index with the index provider
    pub fn register_indices<R>(registrar: &mut R) -> Result<(), TranslateError>
    where
        R: IndexRegistrar + ?Sized,
    {
        debug!(syncer = K::NAME, index = INDEX_BY_VIRTUAL_NAME, "registering indices");
        registrar.index_field(INDEX_BY_VIRTUAL_NAME, virtual_name_key::<K>())
    }

    pub fn physical_to_virtual(&self, physical: &K::Object) -> NamespacedName {
        self.identity.physical_to_virtual(physical)
    }

    pub async fn virtual_to_physical(
        &self,
        req: &NamespacedName,
        virtual_obj: Option<&K::Object>,
    ) -> Result<Option<NamespacedName>, TranslateError> {
        self.identity
            .virtual_to_physical(req, virtual_obj.map(|obj| obj as &dyn MetadataObject))
            .await
    }

    #[instrument(skip_all, fields(syncer = K::NAME, physical = %physical.identity()))]
    pub fn translate_metadata(&self, physical: &K::Object) -> Result<K::Object, TranslateError> {
        let virtual_id = self.physical_to_virtual(physical);
        self.metadata.translate_metadata(physical, virtual_id)
    }

    /// untyped entry point, fails when `physical` is not an object of kind `K`
    pub fn translate_metadata_value(&self, physical: Value) -> Result<K::Object, TranslateError> {
        let physical = K::object_from_value(physical)?;
        self.translate_metadata(&physical)
    }

    pub fn translate_metadata_update(
        &self,
        virtual_obj: &K::Object,
        physical: &K::Object,
    ) -> MetadataDelta {
        self.metadata
            .translate_metadata_update(virtual_obj, physical)
    }
}
