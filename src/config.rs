use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunables for a [`QuestionGraph`](crate::graph::QuestionGraph) editing session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditorConfig {
    /// First order value of the terminal group; terminal nodes are numbered
    /// `base..base+K-1`.
    #[serde(default = "default_terminal_order_base")]
    pub terminal_order_base: i64,
    /// Coerce fully numeric variable comparisons to JSON numbers on save.
    #[serde(default = "default_true")]
    pub normalize_comparisons: bool,
    /// Do not offer a node as a "goto" target of its own rules.
    #[serde(default = "default_true")]
    pub exclude_owner_from_targets: bool,
}

fn default_terminal_order_base() -> i64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            terminal_order_base: default_terminal_order_base(),
            normalize_comparisons: true,
            exclude_owner_from_targets: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.terminal_order_base <= 0 {
            return Err(ConfigError::Invalid(format!(
                "terminal_order_base must be positive, got {}",
                self.terminal_order_base
            )));
        }
        Ok(())
    }
}
