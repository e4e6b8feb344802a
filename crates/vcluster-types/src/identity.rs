use std::fmt;

use serde::{Deserialize, Serialize};

/// Name and namespace pair identifying an object in either cluster.
/// An empty namespace means a cluster scoped object.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl NamespacedName {
    pub fn new<N, S>(name: N, namespace: S) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.namespace.is_empty()
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

impl<N, S> From<(N, S)> for NamespacedName
where
    N: Into<String>,
    S: Into<String>,
{
    fn from((name, namespace): (N, S)) -> Self {
        Self::new(name, namespace)
    }
}
