use serde::{Deserialize, Serialize};

/// A rainfall sensor site.
///
/// `id` is the external sensor code used as the storage key; `name` is the
/// unique slug clients use in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
