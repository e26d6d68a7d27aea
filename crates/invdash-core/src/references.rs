use serde::{Deserialize, Serialize};

/// An `{id, name}` pair used to populate filter facets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub name: String,
}

pub type Category = Reference;
pub type Supplier = Reference;
