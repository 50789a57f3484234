//! Session configuration, loadable from YAML.
//!
//! ```yaml
//! max_depth: 2000
//! prompt: "sprig> "
//! echo_results: true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigResult};
use crate::runtime::context::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Bound on nested non-tail evaluation and on macro expansion depth.
    pub max_depth: usize,
    /// Prompt printed by the REPL before each line it reads from a terminal.
    pub prompt: String,
    /// Whether the REPL prints the value of each top-level form.
    pub echo_results: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            prompt: "sprig> ".to_string(),
            echo_results: true,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(text: &str) -> SprigResult<Self> {
        serde_yaml::from_str(text).map_err(|e| {
            Phase::Io.report(ErrorKind::Io {
                message: format!("invalid configuration: {e}"),
            })
        })
    }

    /// Loads a YAML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> SprigResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Phase::Io.report(ErrorKind::Io {
                message: format!("failed to read {}: {e}", path.display()),
            })
        })?;
        Self::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml("max_depth: 50\n").unwrap();
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.prompt, "sprig> ");
        assert!(config.echo_results);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EngineConfig::from_yaml("max_dept: 50\n").unwrap_err();
        assert_eq!(err.code(), "sprig::io::io");
    }
}
