pub mod defaults;
pub mod identity;

pub use identity::NamespacedName;

//
// Types
//
pub type Name = String;
pub type NameSpace = String;

pub type LabelMap = std::collections::HashMap<String, String>;
pub type AnnotationMap = std::collections::HashMap<String, String>;

pub type IndexName = &'static str;
pub type IndexKey = String;
