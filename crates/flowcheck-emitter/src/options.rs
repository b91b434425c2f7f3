//! Transform options.
//!
//! Deserialized from the `transform` section of a `flowcheck.json` file or
//! built directly by embedders. Unknown keys are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_RUNTIME_LIBRARY: &str = "tcomb";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Do not emit the assert and extend helpers.
    pub skip_helpers: bool,
    /// Do not insert any assertion. Type declarations are still lowered.
    pub skip_asserts: bool,
    /// Helper logs failures instead of throwing.
    pub warn_on_failure: bool,
    /// Names erased to `Any` wherever referenced as types.
    #[serde(deserialize_with = "deserialize_name_list")]
    pub globals: Vec<String>,
    /// Additional opaque type names treated like globals.
    #[serde(deserialize_with = "deserialize_name_list")]
    pub ambient_types: Vec<String>,
    /// Module specifier of the combinator library.
    pub runtime_library: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            skip_helpers: false,
            skip_asserts: false,
            warn_on_failure: false,
            globals: Vec::new(),
            ambient_types: Vec::new(),
            runtime_library: DEFAULT_RUNTIME_LIBRARY.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameEntry {
    Name(String),
    Map(IndexMap<String, serde_json::Value>),
}

/// Accept `["Buffer"]` as well as `[{ "Buffer": true }]`. Map entries whose
/// value is `false` are skipped.
pub fn deserialize_name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<NameEntry>::deserialize(deserializer)?;
    let mut names = Vec::new();
    for entry in entries {
        match entry {
            NameEntry::Name(name) => names.push(name),
            NameEntry::Map(map) => names.extend(
                map.into_iter()
                    .filter(|(_, enabled)| enabled.as_bool() != Some(false))
                    .map(|(name, _)| name),
            ),
        }
    }
    Ok(names)
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
