//! Prelude module for convenient imports
//!
//! Re-exports the types an editor integration touches most often.
//!
//! ```rust
//! use bunki::prelude::*;
//!
//! let mut graph = QuestionGraph::new();
//! let welcome = graph.add_node(QuestionKind::Welcome, serde_json::json!({}), Group::Normal);
//! let rule = graph.add_condition(welcome).unwrap();
//! graph.change_predicate_type(rule, PredicateType::VariableGreater);
//! assert_eq!(graph.condition(rule).unwrap().action_type(), ActionType::GotoQuestion);
//! ```

// Graph and identity
pub use crate::graph::{
    GraphEvent, GraphListener, Group, LoadReport, QuestionGraph, QuestionKind, QuestionNode,
};
pub use crate::identity::{ConditionId, DurableId, IdentityMap, LocalId};

// Rule model
pub use crate::rules::{
    Action, ActionType, ConditionRecord, ConditionSet, Predicate, PredicateType, RuleIssue,
    VariableOperation,
};

// Persistence
pub use crate::persist::{
    AckRecord, FormDefinition, IntoForm, PersistedNode, PersistedRule, Scalar, Serializer,
    apply_acknowledgements,
};

// Views and configuration
pub use crate::config::EditorConfig;
pub use crate::describe::RuleFormatter;
pub use crate::selector::{Selection, TargetSelector};

// Error types
pub use crate::error::{ConfigError, GraphError, IdError, PersistError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
