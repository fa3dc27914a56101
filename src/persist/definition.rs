use crate::error::{IdError, PersistError};
use crate::graph::QuestionKind;
use crate::identity::DurableId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A JSON scalar that may arrive either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// The value as text, e.g. `42` -> `"42"`.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Text(String::new())
    }
}

fn zero_amount() -> Scalar {
    Scalar::Number(serde_json::Number::from(0))
}

/// A durable id as the backend writes it: usually an integer, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedId {
    Number(u64),
    Text(String),
}

impl PersistedId {
    pub fn to_durable(&self) -> Result<DurableId, IdError> {
        match self {
            PersistedId::Number(n) => Ok(DurableId::from(*n)),
            PersistedId::Text(s) => DurableId::new(s.as_str()),
        }
    }
}

impl From<&DurableId> for PersistedId {
    fn from(id: &DurableId) -> Self {
        match id.as_number() {
            Some(n) => PersistedId::Number(n),
            None => PersistedId::Text(id.to_string()),
        }
    }
}

/// One rule in the persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRule {
    #[serde(default)]
    pub condition_type: String,
    #[serde(default)]
    pub condition_value: String,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub action_value: String,
    #[serde(default)]
    pub variable_operation: String,
    #[serde(default = "zero_amount")]
    pub variable_amount: Scalar,
    #[serde(default)]
    pub comparison_value: Scalar,
}

/// One node in the persisted shape, used both for load input and save output.
///
/// On save `temporal_id` always carries the node's current local id, so the
/// caller can match durable ids returned for newly created nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PersistedId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_id: Option<String>,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub conditions: Vec<PersistedRule>,
}

/// A complete form as exchanged with the persistence backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub nodes: Vec<PersistedNode>,
}

impl FormDefinition {
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PersistError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the form as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?).map_err(|source| PersistError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// The backend's answer to a save: which durable id each new node received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckRecord {
    pub temporal_id: String,
    pub id: PersistedId,
}

impl AckRecord {
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, PersistError> {
        Ok(serde_json::from_str(json)?)
    }
}
