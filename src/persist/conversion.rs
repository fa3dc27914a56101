use super::definition::FormDefinition;
use crate::error::PersistError;

/// A trait for custom export formats that can be converted into a `FormDefinition`.
///
/// Builders store forms in many shapes (database rows, plugin exports, older
/// schema versions). Implementing this trait on your own structs gives the
/// loader a single canonical input.
///
/// # Example
///
/// ```rust
/// use bunki::error::PersistError;
/// use bunki::persist::{FormDefinition, IntoForm, PersistedNode, PersistedId};
///
/// struct Row { post_id: u64, step_type: String }
/// struct Export { rows: Vec<Row> }
///
/// impl IntoForm for Export {
///     fn into_form(self) -> Result<FormDefinition, PersistError> {
///         let nodes = self
///             .rows
///             .into_iter()
///             .map(|row| PersistedNode {
///                 id: Some(PersistedId::Number(row.post_id)),
///                 temporal_id: None,
///                 kind: row.step_type.into(),
///                 order: None,
///                 payload: serde_json::Value::Null,
///                 conditions: vec![],
///             })
///             .collect();
///         Ok(FormDefinition { nodes })
///     }
/// }
/// ```
pub trait IntoForm {
    /// Consumes the object and converts it into the canonical persisted form.
    fn into_form(self) -> Result<FormDefinition, PersistError>;
}

impl IntoForm for FormDefinition {
    fn into_form(self) -> Result<FormDefinition, PersistError> {
        Ok(self)
    }
}
