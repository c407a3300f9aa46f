use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A phantom-typed wrapper around a `String` identifier.
///
/// Keeps e.g. `NodeId` and `SectionId` from being accidentally interchanged
/// even though both are, underneath, just strings.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    pub id: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");
        write!(f, "{}: {:?}", display_name, self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(wrapper: Id<T>) -> Self {
        wrapper.id
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct NodeTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct SectionTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct TrainTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct TaskTag;

pub type NodeId = Id<NodeTag>;
pub type SectionId = Id<SectionTag>;
pub type TrainId = Id<TrainTag>;
pub type TaskId = Id<TaskTag>;
