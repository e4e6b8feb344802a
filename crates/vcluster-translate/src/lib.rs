pub mod config;
pub mod index;
pub mod kind;
pub mod metadata;
pub mod name;
pub mod object;
pub mod syncer;
pub mod translator;

mod error;

pub use config::TranslatorConfig;
pub use error::TranslateError;
pub use kind::{CsiStorageCapacity, ResourceKind};
pub use metadata::{MetadataDelta, MetadataTranslator};
pub use object::{DynamicObject, MetadataObject};
pub use syncer::{ClusterSyncer, CsiStorageCapacitySyncer};
pub use translator::IdentityTranslator;

// re-export k8-types crate
pub use k8_types;
pub use vcluster_types as types;

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;
