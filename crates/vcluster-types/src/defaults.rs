//! Constants shared between the translator and the components that call it.

// annotations written on virtual objects
pub const NAME_ANNOTATION: &str = "vcluster.loft.sh/object-name";
pub const NAMESPACE_ANNOTATION: &str = "vcluster.loft.sh/object-namespace";
pub const UID_ANNOTATION: &str = "vcluster.loft.sh/object-uid";
pub const MANAGED_ANNOTATIONS_ANNOTATION: &str = "vcluster.loft.sh/managed-annotations";

/// label marking objects owned by the virtual cluster control plane
pub const MARKER_LABEL: &str = "vcluster.loft.sh/managed-by";

/// Bookkeeping annotations, never copied between physical and virtual objects.
pub const BOOKKEEPING_ANNOTATIONS: [&str; 4] = [
    NAME_ANNOTATION,
    NAMESPACE_ANNOTATION,
    UID_ANNOTATION,
    MANAGED_ANNOTATIONS_ANNOTATION,
];

pub const BOOKKEEPING_LABELS: [&str; 1] = [MARKER_LABEL];

// indices
pub const INDEX_BY_VIRTUAL_NAME: &str = "indexByVirtualName";

// CSIStorageCapacity
pub const CSI_STORAGE_CAPACITY_SYNCER: &str = "csistoragecapacity";
pub const CSI_STORAGE_CAPACITY_VIRTUAL_NAMESPACE: &str = "kube-system";

// name derivation
pub const NAME_SEPARATOR: &str = "x";
pub const MAX_NAME_LENGTH: usize = 63;
pub const TRUNCATED_PREFIX_LENGTH: usize = 52;
pub const HASH_SUFFIX_LENGTH: usize = 10;
