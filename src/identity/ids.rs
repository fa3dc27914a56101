use crate::error::IdError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

const LOCAL_PREFIX: &str = "tmp-";
const CONDITION_SEPARATOR: &str = "-c";

/// Session-scoped identifier of a question node.
///
/// Assigned once when a node is created or loaded and never reused within the
/// lifetime of a `QuestionGraph`, including across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(u64);

impl LocalId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", LOCAL_PREFIX, self.0)
    }
}

impl FromStr for LocalId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(LOCAL_PREFIX)
            .ok_or_else(|| IdError::NotLocal(s.to_string()))?;
        digits
            .parse::<u64>()
            .map(LocalId)
            .map_err(|_| IdError::NotLocal(s.to_string()))
    }
}

/// Identifier assigned by the persistence backend once a node has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DurableId(String);

impl DurableId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, when the backend hands out integer ids.
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for DurableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DurableId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DurableId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurableId> for String {
    fn from(id: DurableId) -> Self {
        id.0
    }
}

impl Borrow<str> for DurableId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<u64> for DurableId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a condition record: its owner node plus an ordinal that is
/// handed out once per set and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId {
    owner: LocalId,
    ordinal: u32,
}

impl ConditionId {
    pub fn new(owner: LocalId, ordinal: u32) -> Self {
        Self { owner, ordinal }
    }

    pub fn owner(&self) -> LocalId {
        self.owner
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.owner, CONDITION_SEPARATOR, self.ordinal)
    }
}

impl FromStr for ConditionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, ordinal) = s
            .rsplit_once(CONDITION_SEPARATOR)
            .ok_or_else(|| IdError::NotCondition(s.to_string()))?;
        let owner = owner
            .parse::<LocalId>()
            .map_err(|_| IdError::NotCondition(s.to_string()))?;
        let ordinal = ordinal
            .parse::<u32>()
            .map_err(|_| IdError::NotCondition(s.to_string()))?;
        Ok(Self { owner, ordinal })
    }
}
