use std::collections::{HashMap, HashSet};

use tracing::debug;

use vcluster_types::{AnnotationMap, LabelMap, NamespacedName};
use vcluster_types::defaults::{
    BOOKKEEPING_ANNOTATIONS, BOOKKEEPING_LABELS, NAME_ANNOTATION, NAMESPACE_ANNOTATION,
};

use crate::TranslateError;
use crate::config::TranslatorConfig;
use crate::object::MetadataObject;

/// Desired virtual metadata and whether it differs from what the virtual object has.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetadataDelta {
    pub changed: bool,
    pub annotations: AnnotationMap,
    pub labels: LabelMap,
}

/// Computes virtual labels and annotations from physical objects.
///
/// Everything is copied except bookkeeping keys and the configured exclusions.
/// Excluded keys already present on the virtual object are left untouched.
#[derive(Debug, Clone)]
pub struct MetadataTranslator {
    excluded_labels: HashSet<String>,
    excluded_annotations: HashSet<String>,
}

impl Default for MetadataTranslator {
    fn default() -> Self {
        Self::new(&TranslatorConfig::default())
    }
}

impl MetadataTranslator {
    pub fn new(config: &TranslatorConfig) -> Self {
        let excluded_labels = BOOKKEEPING_LABELS
            .iter()
            .map(|key| key.to_string())
            .chain(config.excluded_labels.iter().cloned())
            .collect();
        let excluded_annotations = BOOKKEEPING_ANNOTATIONS
            .iter()
            .map(|key| key.to_string())
            .chain(config.excluded_annotations.iter().cloned())
            .collect();

        Self {
            excluded_labels,
            excluded_annotations,
        }
    }

    pub fn translate_labels(
        &self,
        source: &dyn MetadataObject,
        target: Option<&dyn MetadataObject>,
    ) -> LabelMap {
        merge(
            source.labels(),
            target.map(|obj| obj.labels()),
            &self.excluded_labels,
        )
    }

    /// Same as labels, plus the source identity recorded in the override annotations.
    pub fn translate_annotations(
        &self,
        source: &dyn MetadataObject,
        target: Option<&dyn MetadataObject>,
    ) -> AnnotationMap {
        let mut annotations = merge(
            source.annotations(),
            target.map(|obj| obj.annotations()),
            &self.excluded_annotations,
        );

        annotations.insert(NAME_ANNOTATION.to_owned(), source.name().to_owned());
        if source.namespace().is_empty() {
            annotations.remove(NAMESPACE_ANNOTATION);
        } else {
            annotations.insert(NAMESPACE_ANNOTATION.to_owned(), source.namespace().to_owned());
        }

        annotations
    }

    /// New virtual object for `physical`, named `virtual_id`.
    pub fn translate_metadata<T>(
        &self,
        physical: &T,
        virtual_id: NamespacedName,
    ) -> Result<T, TranslateError>
    where
        T: MetadataObject + Clone,
    {
        if physical.name().is_empty() {
            return Err(TranslateError::type_mismatch(
                physical.name(),
                "physical object has no name",
            ));
        }

        let labels = self.translate_labels(physical, None);
        let annotations = self.translate_annotations(physical, None);

        let mut virtual_obj = physical.clone();
        virtual_obj.reset_metadata();
        virtual_obj.set_name(virtual_id.name);
        virtual_obj.set_namespace(virtual_id.namespace);
        virtual_obj.set_labels(labels);
        virtual_obj.set_annotations(annotations);
        Ok(virtual_obj)
    }

    /// recompute virtual metadata and compare it with `virtual_obj`, map entry order is irrelevant
    pub fn translate_metadata_update(
        &self,
        virtual_obj: &dyn MetadataObject,
        physical: &dyn MetadataObject,
    ) -> MetadataDelta {
        let annotations = self.translate_annotations(physical, Some(virtual_obj));
        let labels = self.translate_labels(physical, Some(virtual_obj));

        let changed = &annotations != virtual_obj.annotations() || &labels != virtual_obj.labels();
        if changed {
            debug!(
                virtual_obj = %virtual_obj.identity(),
                physical = %physical.identity(),
                "virtual metadata drifted"
            );
        }

        MetadataDelta {
            changed,
            annotations,
            labels,
        }
    }
}

fn merge(
    source: &HashMap<String, String>,
    target: Option<&HashMap<String, String>>,
    excluded: &HashSet<String>,
) -> HashMap<String, String> {
    let kept = target
        .into_iter()
        .flatten()
        .filter(|(key, _)| excluded.contains(key.as_str()));
    let copied = source
        .iter()
        .filter(|(key, _)| !excluded.contains(key.as_str()));

    kept.chain(copied)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
