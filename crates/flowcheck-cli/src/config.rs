//! `flowcheck.json` loading.
//!
//! ```json
//! {
//!   // comments are allowed
//!   "extends": "../flowcheck.base.json",
//!   "transform": {
//!     "warnOnFailure": true,
//!     "globals": ["Buffer", { "HTMLElement": true }]
//!   }
//! }
//! ```
//!
//! A config extending another is merged over it field by field. Flags on the
//! command line win over both.

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::args::CliArgs;
use flowcheck_emitter::TransformOptions;
use flowcheck_emitter::options::deserialize_name_list;

pub const CONFIG_FILE_NAME: &str = "flowcheck.json";

/// Accepts `true` as well as `"true"` for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

fn deserialize_optional_names<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_name_list(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FlowcheckConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub transform: Option<TransformSection>,
}

/// The `transform` section. Every field is optional so that an extending
/// config only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransformSection {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub skip_helpers: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub skip_asserts: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub warn_on_failure: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_names")]
    pub globals: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_names")]
    pub ambient_types: Option<Vec<String>>,
    #[serde(default)]
    pub runtime_library: Option<String>,
}

pub fn parse_config(source: &str) -> Result<FlowcheckConfig> {
    let stripped = strip_comments(source);
    let config = serde_json::from_str(&stripped).context("failed to parse flowcheck JSON")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<FlowcheckConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<FlowcheckConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("config extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_config_inner(&base_path, visited)?;
        config = merge_configs(base, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("config has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }

    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: FlowcheckConfig, child: FlowcheckConfig) -> FlowcheckConfig {
    let transform = match (base.transform, child.transform) {
        (Some(base), Some(child)) => Some(TransformSection {
            skip_helpers: child.skip_helpers.or(base.skip_helpers),
            skip_asserts: child.skip_asserts.or(base.skip_asserts),
            warn_on_failure: child.warn_on_failure.or(base.warn_on_failure),
            globals: child.globals.or(base.globals),
            ambient_types: child.ambient_types.or(base.ambient_types),
            runtime_library: child.runtime_library.or(base.runtime_library),
        }),
        (base, child) => child.or(base),
    };

    FlowcheckConfig {
        extends: None,
        transform,
    }
}

/// `flowcheck.json` next to the input, if any. Stdin input has no directory.
pub fn discover_config(input: &Path) -> Option<PathBuf> {
    if input.as_os_str() == "-" {
        return None;
    }
    let candidate = input.parent()?.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Final options: defaults, then the config file, then command-line flags.
pub fn resolve_transform_options(
    config: Option<&FlowcheckConfig>,
    args: &CliArgs,
) -> TransformOptions {
    let mut options = TransformOptions::default();

    if let Some(section) = config.and_then(|config| config.transform.as_ref()) {
        if let Some(skip_helpers) = section.skip_helpers {
            options.skip_helpers = skip_helpers;
        }
        if let Some(skip_asserts) = section.skip_asserts {
            options.skip_asserts = skip_asserts;
        }
        if let Some(warn_on_failure) = section.warn_on_failure {
            options.warn_on_failure = warn_on_failure;
        }
        if let Some(globals) = &section.globals {
            options.globals.clone_from(globals);
        }
        if let Some(ambient_types) = &section.ambient_types {
            options.ambient_types.clone_from(ambient_types);
        }
        if let Some(runtime_library) = &section.runtime_library {
            options.runtime_library.clone_from(runtime_library);
        }
    }

    options.skip_helpers |= args.skip_helpers;
    options.skip_asserts |= args.skip_asserts;
    options.warn_on_failure |= args.warn_on_failure;
    for global in &args.globals {
        if !options.globals.contains(global) {
            options.globals.push(global.clone());
        }
    }
    if let Some(runtime_library) = &args.runtime_library {
        options.runtime_library.clone_from(runtime_library);
    }

    options
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexing {
    Code,
    Str { escaped: bool },
    LineComment,
    BlockComment,
}

/// Remove `//` and `/* */` comments outside string literals. Newlines are
/// kept so serde_json error positions still line up.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut state = Lexing::Code;

    while let Some(ch) = chars.next() {
        let next = chars.peek().copied();
        state = match state {
            Lexing::LineComment => {
                if ch == '\n' {
                    out.push(ch);
                    Lexing::Code
                } else {
                    state
                }
            }
            Lexing::BlockComment => {
                if ch == '*' && next == Some('/') {
                    chars.next();
                    Lexing::Code
                } else {
                    if ch == '\n' {
                        out.push(ch);
                    }
                    state
                }
            }
            Lexing::Str { escaped } => {
                out.push(ch);
                match ch {
                    _ if escaped => Lexing::Str { escaped: false },
                    '\\' => Lexing::Str { escaped: true },
                    '"' => Lexing::Code,
                    _ => state,
                }
            }
            Lexing::Code => match (ch, next) {
                ('/', Some('/')) => {
                    chars.next();
                    Lexing::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    Lexing::BlockComment
                }
                _ => {
                    out.push(ch);
                    if ch == '"' {
                        Lexing::Str { escaped: false }
                    } else {
                        Lexing::Code
                    }
                }
            },
        };
    }

    out
}

#[cfg(test)]
#[path = "../tests/config.rs"]
mod tests;
