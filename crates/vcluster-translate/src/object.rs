use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use k8_types::{K8Obj, ObjectMeta, Spec as K8Spec};
use vcluster_types::NamespacedName;

use crate::TranslateError;

/// Accessors the translator needs from a resource, whatever its kind.
pub trait MetadataObject {
    fn name(&self) -> &str;
    fn namespace(&self) -> &str;
    fn labels(&self) -> &HashMap<String, String>;
    fn annotations(&self) -> &HashMap<String, String>;

    fn set_name(&mut self, name: String);
    fn set_namespace(&mut self, namespace: String);
    fn set_labels(&mut self, labels: HashMap<String, String>);
    fn set_annotations(&mut self, annotations: HashMap<String, String>);

    /// drop everything the api server owns, keeping name, namespace, labels and annotations
    fn reset_metadata(&mut self);

    fn identity(&self) -> NamespacedName {
        NamespacedName::new(self.name(), self.namespace())
    }
}

impl MetadataObject for ObjectMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    fn annotations(&self) -> &HashMap<String, String> {
        &self.annotations
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_namespace(&mut self, namespace: String) {
        self.namespace = namespace;
    }

    fn set_labels(&mut self, labels: HashMap<String, String>) {
        self.labels = labels;
    }

    fn set_annotations(&mut self, annotations: HashMap<String, String>) {
        self.annotations = annotations;
    }

    fn reset_metadata(&mut self) {
        *self = ObjectMeta {
            name: std::mem::take(&mut self.name),
            namespace: std::mem::take(&mut self.namespace),
            labels: std::mem::take(&mut self.labels),
            annotations: std::mem::take(&mut self.annotations),
            ..Default::default()
        };
    }
}

impl<S> MetadataObject for K8Obj<S>
where
    S: K8Spec,
{
    fn name(&self) -> &str {
        MetadataObject::name(&self.metadata)
    }

    fn namespace(&self) -> &str {
        MetadataObject::namespace(&self.metadata)
    }

    fn labels(&self) -> &HashMap<String, String> {
        MetadataObject::labels(&self.metadata)
    }

    fn annotations(&self) -> &HashMap<String, String> {
        MetadataObject::annotations(&self.metadata)
    }

    fn set_name(&mut self, name: String) {
        MetadataObject::set_name(&mut self.metadata, name);
    }

    fn set_namespace(&mut self, namespace: String) {
        MetadataObject::set_namespace(&mut self.metadata, namespace);
    }

    fn set_labels(&mut self, labels: HashMap<String, String>) {
        MetadataObject::set_labels(&mut self.metadata, labels);
    }

    fn set_annotations(&mut self, annotations: HashMap<String, String>) {
        MetadataObject::set_annotations(&mut self.metadata, annotations);
    }

    fn reset_metadata(&mut self) {
        MetadataObject::reset_metadata(&mut self.metadata);
    }
}

/// Untyped object: metadata is parsed, every other field is kept as raw json.
/// Used for kinds without a `spec` section such as `CSIStorageCapacity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicObject {
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DynamicObject {
    /// parse `value`, rejecting objects whose `apiVersion` or `kind` is set to something else
    pub fn of_kind(value: Value, api_version: &str, kind: &str) -> Result<Self, TranslateError> {
        let object = Self::try_from(value)?;

        for (field, expected) in [("apiVersion", api_version), ("kind", kind)] {
            match object.fields.get(field) {
                None => {}
                Some(Value::String(actual)) if actual == expected => {}
                Some(actual) => {
                    return Err(TranslateError::type_mismatch(
                        &object.metadata.name,
                        format!("{field} is {actual}, expected {expected}"),
                    ));
                }
            }
        }

        Ok(object)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl TryFrom<Value> for DynamicObject {
    type Error = TranslateError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(TranslateError::type_mismatch("", "not a json object"));
        };

        let Some(raw_metadata) = fields.remove("metadata") else {
            return Err(TranslateError::type_mismatch("", "metadata is missing"));
        };

        let name = raw_metadata
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let metadata: ObjectMeta = serde_json::from_value(raw_metadata)
            .map_err(|err| TranslateError::type_mismatch(&name, err.to_string()))?;

        Ok(Self { metadata, fields })
    }
}

impl TryFrom<DynamicObject> for Value {
    type Error = TranslateError;

    fn try_from(object: DynamicObject) -> Result<Self, Self::Error> {
        let DynamicObject {
            metadata,
            mut fields,
        } = object;
        let metadata = serde_json::to_value(&metadata)
            .map_err(|err| TranslateError::type_mismatch(&metadata.name, err.to_string()))?;
        fields.insert("metadata".to_owned(), metadata);
        Ok(Value::Object(fields))
    }
}

impl MetadataObject for DynamicObject {
    fn name(&self) -> &str {
        MetadataObject::name(&self.metadata)
    }

    fn namespace(&self) -> &str {
        MetadataObject::namespace(&self.metadata)
    }

    fn labels(&self) -> &HashMap<String, String> {
        MetadataObject::labels(&self.metadata)
    }

    fn annotations(&self) -> &HashMap<String, String> {
        MetadataObject::annotations(&self.metadata)
    }

    fn set_name(&mut self, name: String) {
        MetadataObject::set_name(&mut self.metadata, name);
    }

    fn set_namespace(&mut self, namespace: String) {
        MetadataObject::set_namespace(&mut self.metadata, namespace);
    }

    fn set_labels(&mut self, labels: HashMap<String, String>) {
        MetadataObject::set_labels(&mut self.metadata, labels);
    }

    fn set_annotations(&mut self, annotations: HashMap<String, String>) {
        MetadataObject::set_annotations(&mut self.metadata, annotations);
    }

    fn reset_metadata(&mut self) {
        MetadataObject::reset_metadata(&mut self.metadata);
    }
}

#[cfg(test)]
mod test {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use k8_types::{Crd, CrdNames, DefaultHeader, K8Obj, ObjectMeta, Spec, Status};

    use super::{DynamicObject, MetadataObject};

    #[derive(Serialize, Deserialize, Default, Debug, Eq, PartialEq, Clone)]
    struct VolumeSpec {
        size: u64,
    }

    #[derive(Serialize, Deserialize, Default, Debug, Eq, PartialEq, Clone)]
    struct VolumeStatus {
        bound: bool,
    }

    impl Status for VolumeStatus {}

    impl Spec for VolumeSpec {
        type Status = VolumeStatus;
        type Header = DefaultHeader;

        fn metadata() -> &'static Crd {
            &Crd {
                group: "test.vcluster",
                version: "v1",
                names: CrdNames {
                    kind: "volume",
                    plural: "volumes",
                    singular: "volume",
                },
            }
        }
    }

    #[test]
    fn test_typed_object() {
        let mut obj = K8Obj::new("vol-1".to_owned(), VolumeSpec { size: 10 });
        MetadataObject::set_namespace(&mut obj, "ns-a".to_owned());
        MetadataObject::set_labels(&mut obj, [("a".to_owned(), "1".to_owned())].into());
        obj.metadata.uid = "1234".to_owned();

        MetadataObject::reset_metadata(&mut obj);
        assert_eq!(MetadataObject::identity(&obj).to_string(), "ns-a/vol-1");
        assert_eq!(MetadataObject::labels(&obj).len(), 1);
        assert!(obj.metadata.uid.is_empty());
        assert_eq!(obj.spec.size, 10);
    }

    #[test]
    fn test_reset_metadata() {
        let mut meta = ObjectMeta::new("vol-1", "ns-a");
        meta.uid = "1234".to_owned();
        meta.resource_version = "7".to_owned();
        meta.finalizers = vec!["keep-me".to_owned()];
        meta.labels.insert("a".to_owned(), "1".to_owned());

        meta.reset_metadata();
        assert_eq!(meta.name, "vol-1");
        assert_eq!(meta.namespace, "ns-a");
        assert_eq!(meta.labels.get("a").map(String::as_str), Some("1"));
        assert!(meta.uid.is_empty());
        assert!(meta.resource_version.is_empty());
        assert!(meta.finalizers.is_empty());
    }

    #[test]
    fn test_dynamic_object_from_value() {
        let value = json!({
            "apiVersion": "storage.k8s.io/v1",
            "kind": "CSIStorageCapacity",
            "metadata": {
                "name": "vol-1",
                "namespace": "ns-a",
                "labels": { "a": "1" }
            },
            "storageClassName": "standard",
            "capacity": "10Gi"
        });

        let object = DynamicObject::of_kind(value, "storage.k8s.io/v1", "CSIStorageCapacity")
            .expect("object");
        assert_eq!(object.identity().to_string(), "ns-a/vol-1");
        assert_eq!(object.labels().len(), 1);
        assert_eq!(object.field("storageClassName"), Some(&json!("standard")));

        let value = serde_json::Value::try_from(object).expect("serialize");
        assert_eq!(value["metadata"]["name"], json!("vol-1"));
        assert_eq!(value["capacity"], json!("10Gi"));
    }

    #[test]
    fn test_dynamic_object_type_mismatch() {
        let err = DynamicObject::try_from(json!(["not", "an", "object"])).expect_err("array");
        assert!(err.is_type_mismatch());

        let err = DynamicObject::try_from(json!({ "kind": "CSIStorageCapacity" }))
            .expect_err("no metadata");
        assert!(err.is_type_mismatch());

        let err = DynamicObject::try_from(json!({ "metadata": "vol-1" })).expect_err("bad meta");
        assert!(err.is_type_mismatch());

        let err = DynamicObject::of_kind(
            json!({ "kind": "Pod", "metadata": { "name": "p" } }),
            "storage.k8s.io/v1",
            "CSIStorageCapacity",
        )
        .expect_err("wrong kind");
        assert!(err.is_type_mismatch());
        assert!(err.to_string().contains("\"p\""));
    }
}
