use serde_json::Value;

use vcluster_types::defaults::{
    CSI_STORAGE_CAPACITY_SYNCER, CSI_STORAGE_CAPACITY_VIRTUAL_NAMESPACE,
};

use crate::TranslateError;
use crate::object::{DynamicObject, MetadataObject};

/// Resource kind mirrored from the physical cluster into a fixed virtual namespace.
pub trait ResourceKind: Send + Sync + 'static {
    /// syncer name
    const NAME: &'static str;
    const API_VERSION: &'static str;
    const KIND: &'static str;
    /// every virtual object of this kind lives in this namespace
    const VIRTUAL_NAMESPACE: &'static str;

    type Object: MetadataObject + Clone + Send + Sync;

    /// type an untyped object as this kind
    fn object_from_value(value: Value) -> Result<Self::Object, TranslateError>;
}

/// `storage.k8s.io/v1` CSIStorageCapacity
#[derive(Debug, Default, Clone, Copy)]
pub struct CsiStorageCapacity;

impl ResourceKind for CsiStorageCapacity {
    const NAME: &'static str = CSI_STORAGE_CAPACITY_SYNCER;
    const API_VERSION: &'static str = "storage.k8s.io/v1";
    const KIND: &'static str = "CSIStorageCapacity";
    const VIRTUAL_NAMESPACE: &'static str = CSI_STORAGE_CAPACITY_VIRTUAL_NAMESPACE;

    type Object = DynamicObject;

    fn object_from_value(value: Value) -> Result<Self::Object, TranslateError> {
        DynamicObject::of_kind(value, Self::API_VERSION, Self::KIND)
    }
}
