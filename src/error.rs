use crate::graph::Group;
use crate::identity::LocalId;
use thiserror::Error;

/// Errors raised when parsing identifiers coming from the view layer or backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Identifier must not be empty")]
    Empty,

    #[error("'{0}' is not a session-local node id")]
    NotLocal(String),

    #[error("'{0}' is not a condition id")]
    NotCondition(String),
}

/// Errors raised by structural graph operations called with stale or invalid input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' does not exist in the question graph")]
    NodeNotFound(LocalId),

    #[error(
        "Proposed order for the {group} group is not a permutation of its {expected} node(s) (got {found})"
    )]
    InvalidPermutation {
        group: Group,
        expected: usize,
        found: usize,
    },
}

/// Errors at the persistence boundary: malformed records or unreadable files.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to parse form JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid custom form data: {0}")]
    Conversion(String),
}

/// Errors raised while loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
