use crate::error::Result;
use std::fs;
use std::path::Path;

/// Loads the ordered node-name catalogue (§6): a JSON array of strings, in
/// the order topology bootstrap should thread them into sections.
pub fn load_topology(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
