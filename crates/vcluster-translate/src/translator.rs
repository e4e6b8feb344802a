use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::{debug, trace};

use vcluster_types::NamespacedName;
use vcluster_types::defaults::{INDEX_BY_VIRTUAL_NAME, NAME_ANNOTATION, NAMESPACE_ANNOTATION};

use crate::TranslateError;
use crate::index::{ReverseIndex, SharedIndex};
use crate::kind::ResourceKind;
use crate::name::concat_name_namespace;
use crate::object::MetadataObject;

/// Virtual identity of a physical object of kind `K`.
/// The namespace is always `K::VIRTUAL_NAMESPACE`.
pub fn physical_to_virtual<K: ResourceKind>(physical: &NamespacedName) -> NamespacedName {
    NamespacedName::new(
        concat_name_namespace(&physical.name, &physical.namespace),
        K::VIRTUAL_NAMESPACE,
    )
}

/// physical identity pinned by the override annotations, only when both are set
pub fn identity_from_annotations(annotations: &HashMap<String, String>) -> Option<NamespacedName> {
    let name = annotations.get(NAME_ANNOTATION).filter(|v| !v.is_empty())?;
    let namespace = annotations.get(NAMESPACE_ANNOTATION).filter(|v| !v.is_empty())?;
    Some(NamespacedName::new(name.as_str(), namespace.as_str()))
}

/// Maps identities of one resource kind between the clusters.
pub struct IdentityTranslator<K, I> {
    index: SharedIndex<I>,
    kind: PhantomData<K>,
}

impl<K, I> IdentityTranslator<K, I>
where
    K: ResourceKind,
    I: ReverseIndex,
{
    pub fn new(index: SharedIndex<I>) -> Self {
        Self {
            index,
            kind: PhantomData,
        }
    }

    pub fn index(&self) -> &SharedIndex<I> {
        &self.index
    }

    pub fn physical_to_virtual(&self, physical: &dyn MetadataObject) -> NamespacedName {
        physical_to_virtual::<K>(&physical.identity())
    }

    /// Physical identity behind a virtual object.
    ///
    /// Override annotations on `virtual_obj` win over the index. `Ok(None)`
    /// means there is no physical counterpart.
    pub async fn virtual_to_physical(
        &self,
        req: &NamespacedName,
        virtual_obj: Option<&dyn MetadataObject>,
    ) -> Result<Option<NamespacedName>, TranslateError> {
        if let Some(pinned) = virtual_obj.and_then(|obj| identity_from_annotations(obj.annotations()))
        {
            trace!(%req, %pinned, "physical identity from annotations");
            return Ok(Some(pinned));
        }

        let physical = self
            .index
            .get_by_index(INDEX_BY_VIRTUAL_NAME, &req.name)
            .await?;
        if physical.is_none() {
            debug!(kind = K::NAME, %req, "no physical object for virtual name");
        }
        Ok(physical)
    }
}

impl<K, I> Clone for IdentityTranslator<K, I> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            kind: PhantomData,
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::sync::Arc;

    use k8_types::ObjectMeta;
    use vcluster_types::NamespacedName;
    use vcluster_types::defaults::{NAME_ANNOTATION, NAMESPACE_ANNOTATION};

    use crate::TranslateError;
    use crate::index::{IndexRegistrar, MemoryIndex, virtual_name_key};
    use crate::kind::CsiStorageCapacity;
    use crate::object::MetadataObject;

    use super::{IdentityTranslator, identity_from_annotations, physical_to_virtual};

    type TestTranslator = IdentityTranslator<CsiStorageCapacity, MemoryIndex>;

    async fn translator_with(objects: &[ObjectMeta]) -> TestTranslator {
        let mut index = MemoryIndex::default();
        index
            .index_field(
                vcluster_types::defaults::INDEX_BY_VIRTUAL_NAME,
                virtual_name_key::<CsiStorageCapacity>(),
            )
            .expect("register");
        index.rebuild(objects).await;
        IdentityTranslator::new(index.shared())
    }

    fn annotated(name: &str, namespace: &str) -> ObjectMeta {
        let mut meta = ObjectMeta::new("virtual", "kube-system");
        meta.annotations = HashMap::from([
            (NAME_ANNOTATION.to_owned(), name.to_owned()),
            (NAMESPACE_ANNOTATION.to_owned(), namespace.to_owned()),
        ]);
        meta
    }

    #[test]
    fn test_physical_to_virtual() {
        let virtual_id =
            physical_to_virtual::<CsiStorageCapacity>(&NamespacedName::new("vol-1", "ns-a"));
        assert_eq!(virtual_id, NamespacedName::new("vol-1-x-ns-a", "kube-system"));
    }

    #[test]
    fn test_identity_from_annotations_requires_both() {
        assert_eq!(
            identity_from_annotations(&annotated("vol-9", "ns-z").annotations),
            Some(NamespacedName::new("vol-9", "ns-z"))
        );
        assert_eq!(identity_from_annotations(&annotated("vol-9", "").annotations), None);
        assert_eq!(identity_from_annotations(&annotated("", "ns-z").annotations), None);
        assert_eq!(identity_from_annotations(&HashMap::new()), None);
    }

    #[fluvio_future::test]
    async fn test_round_trip_through_index() {
        let physical = ObjectMeta::new("vol-1", "ns-a");
        let translator = translator_with(&[physical.clone()]).await;

        let virtual_id = translator.physical_to_virtual(&physical);
        let resolved = translator
            .virtual_to_physical(&virtual_id, None)
            .await
            .expect("resolve");
        assert_eq!(resolved, Some(NamespacedName::new("vol-1", "ns-a")));

        // virtual object without override annotations still goes through the index
        let virtual_obj = ObjectMeta::new(virtual_id.name.as_str(), "kube-system");
        let resolved = translator
            .virtual_to_physical(&virtual_id, Some(&virtual_obj as &dyn MetadataObject))
            .await
            .expect("resolve");
        assert_eq!(resolved, Some(NamespacedName::new("vol-1", "ns-a")));
    }

    #[fluvio_future::test]
    async fn test_annotations_override_index() {
        let physical = ObjectMeta::new("vol-1", "ns-a");
        let translator = translator_with(&[physical.clone()]).await;
        let virtual_id = translator.physical_to_virtual(&physical);

        let virtual_obj = annotated("vol-9", "ns-z");
        let resolved = translator
            .virtual_to_physical(&virtual_id, Some(&virtual_obj as &dyn MetadataObject))
            .await
            .expect("resolve");
        assert_eq!(resolved, Some(NamespacedName::new("vol-9", "ns-z")));
    }

    #[fluvio_future::test]
    async fn test_not_found() {
        let translator = translator_with(&[ObjectMeta::new("vol-1", "ns-a")]).await;
        let resolved = translator
            .virtual_to_physical(&NamespacedName::new("vol-2-x-ns-a", "kube-system"), None)
            .await
            .expect("resolve");
        assert_eq!(resolved, None);
    }

    #[fluvio_future::test]
    async fn test_index_integrity_is_surfaced() {
        // key function that folds every object onto the same virtual name
        let mut index = MemoryIndex::default();
        index
            .index_field(
                vcluster_types::defaults::INDEX_BY_VIRTUAL_NAME,
                Arc::new(|_: &dyn MetadataObject| vec!["vol-1-x-ns-a".to_owned()]),
            )
            .expect("register");
        index
            .rebuild(&[ObjectMeta::new("vol-1", "ns-a"), ObjectMeta::new("vol-2", "ns-b")])
            .await;
        let translator: TestTranslator = IdentityTranslator::new(index.shared());

        let err = translator
            .virtual_to_physical(&NamespacedName::new("vol-1-x-ns-a", "kube-system"), None)
            .await
            .expect_err("two objects share the key");
        assert!(err.is_index_integrity());
        let TranslateError::IndexIntegrity { matches, .. } = err else {
            panic!("expected integrity error");
        };
        assert_eq!(matches.len(), 2);

        // override annotations still win
        let virtual_obj = annotated("vol-2", "ns-b");
        let resolved = translator
            .virtual_to_physical(
                &NamespacedName::new("vol-1-x-ns-a", "kube-system"),
                Some(&virtual_obj as &dyn MetadataObject),
            )
            .await
            .expect("resolve");
        assert_eq!(resolved, Some(NamespacedName::new("vol-2", "ns-b")));
    }
}
