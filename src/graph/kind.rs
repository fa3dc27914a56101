use serde::{Deserialize, Serialize};
use std::fmt;

/// The step type of a node. Unknown type names are kept verbatim so that
/// forms written by newer builders survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    Welcome,
    SingleChoice,
    MultipleChoice,
    ShortText,
    LongText,
    Email,
    Number,
    Rating,
    Date,
    Statement,
    Result,
    Other(String),
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::Welcome => "welcome",
            QuestionKind::SingleChoice => "single_choice",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::ShortText => "short_text",
            QuestionKind::LongText => "long_text",
            QuestionKind::Email => "email",
            QuestionKind::Number => "number",
            QuestionKind::Rating => "rating",
            QuestionKind::Date => "date",
            QuestionKind::Statement => "statement",
            QuestionKind::Result => "result",
            QuestionKind::Other(name) => name,
        }
    }

    /// Short human label, used when a node has no title of its own.
    pub fn label(&self) -> &str {
        match self {
            QuestionKind::Welcome => "Welcome",
            QuestionKind::SingleChoice => "Single choice",
            QuestionKind::MultipleChoice => "Multiple choice",
            QuestionKind::ShortText => "Short text",
            QuestionKind::LongText => "Long text",
            QuestionKind::Email => "Email",
            QuestionKind::Number => "Number",
            QuestionKind::Rating => "Rating",
            QuestionKind::Date => "Date",
            QuestionKind::Statement => "Statement",
            QuestionKind::Result => "Result",
            QuestionKind::Other(name) => name,
        }
    }
}

impl From<String> for QuestionKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "welcome" => QuestionKind::Welcome,
            "single_choice" => QuestionKind::SingleChoice,
            "multiple_choice" => QuestionKind::MultipleChoice,
            "short_text" => QuestionKind::ShortText,
            "long_text" => QuestionKind::LongText,
            "email" => QuestionKind::Email,
            "number" => QuestionKind::Number,
            "rating" => QuestionKind::Rating,
            "date" => QuestionKind::Date,
            "statement" => QuestionKind::Statement,
            "result" => QuestionKind::Result,
            _ => QuestionKind::Other(name),
        }
    }
}

impl From<&str> for QuestionKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
