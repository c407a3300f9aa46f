use crate::domain::ids::{NodeId, SectionId};
use std::fmt;

/// The direction a section runs in, relative to the catalogue order used at
/// bootstrap. `Up` follows the catalogue's forward order, `Dn` the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Up,
    Dn,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Up => write!(f, "UP"),
            Line::Dn => write!(f, "DN"),
        }
    }
}

impl std::str::FromStr for Line {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Line::Up),
            "DN" => Ok(Line::Dn),
            other => Err(format!("unrecognised line '{}', expected UP or DN", other)),
        }
    }
}

/// A directed segment `(from_node, to_node, line)`. Immutable after creation;
/// each section owns an independent slot timeline (data model invariant 1).
#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub from_name: String,
    pub to_name: String,
    pub line: Line,
}

impl Section {
    pub fn new(id: SectionId, from_node: NodeId, to_node: NodeId, from_name: impl Into<String>, to_name: impl Into<String>, line: Line) -> Self {
        Section { id, from_node, to_node, from_name: from_name.into(), to_name: to_name.into(), line }
    }
}
