use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One entry of the train roster (§6): `{name, number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub number: String,
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<RosterEntry>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
