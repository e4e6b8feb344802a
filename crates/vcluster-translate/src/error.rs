use thiserror::Error;

use vcluster_types::NamespacedName;

#[derive(Debug, Error)]
pub enum TranslateError {
    /// object can't be handled as a metadata bearing resource of the expected kind
    #[error("{name:?} not a metadata object: {reason}")]
    TypeMismatch { name: String, reason: String },
    /// more than one physical object derives the same key
    #[error("index {index}: key {key:?} maps to multiple objects: {matches:?}")]
    IndexIntegrity {
        index: String,
        key: String,
        matches: Vec<NamespacedName>,
    },
    #[error("index {0} is not registered")]
    UnknownIndex(String),
    #[error("index {0} is already registered")]
    DuplicateIndex(String),
    #[error("index query failed: {0}")]
    Index(#[from] anyhow::Error),
}

impl TranslateError {
    pub fn type_mismatch(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    pub fn is_index_integrity(&self) -> bool {
        matches!(self, Self::IndexIntegrity { .. })
    }
}
