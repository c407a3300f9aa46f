use crate::domain::ids::TrainId;

/// A train identity. Immutable.
#[derive(Debug, Clone)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    pub number: String,
}

impl Train {
    pub fn new(id: TrainId, name: impl Into<String>, number: impl Into<String>) -> Self {
        Train { id, name: name.into(), number: number.into() }
    }
}
