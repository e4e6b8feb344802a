use std::fs::read_to_string;
use std::io::Error as IoError;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("IoError: {0}")]
    IoError(IoError),
    #[error("TomlError: {0}")]
    TomlError(toml::de::Error),
}

/// Per deployment translation policy.
///
/// ```toml
/// excluded_labels = ["topology.kubernetes.io/zone"]
/// excluded_annotations = ["example.com/owner"]
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// labels never copied from physical to virtual objects
    pub excluded_labels: Vec<String>,
    /// annotations never copied from physical to virtual objects
    pub excluded_annotations: Vec<String>,
}

impl TranslatorConfig {
    pub fn load_from<T: AsRef<Path>>(path: T) -> Result<Self, LoadConfigError> {
        let path_ref = path.as_ref();
        debug!(?path_ref, "loading translator config");

        let file_str = read_to_string(path_ref).map_err(LoadConfigError::IoError)?;
        Self::load_str(&file_str)
    }

    pub fn load_str(config: &str) -> Result<Self, LoadConfigError> {
        toml::from_str(config).map_err(LoadConfigError::TomlError)
    }
}
