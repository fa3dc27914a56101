use std::fmt;

/// The six action kinds an author can pick for the "then" clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    GotoQuestion,
    SkipToEnd,
    RedirectUrl,
    ShowMessage,
    AddVariable,
    SetVariable,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::GotoQuestion,
        ActionType::SkipToEnd,
        ActionType::RedirectUrl,
        ActionType::ShowMessage,
        ActionType::AddVariable,
        ActionType::SetVariable,
    ];

    /// Wire name used in `action_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::GotoQuestion => "goto_question",
            ActionType::SkipToEnd => "skip_to_end",
            ActionType::RedirectUrl => "redirect_url",
            ActionType::ShowMessage => "show_message",
            ActionType::AddVariable => "add_variable",
            ActionType::SetVariable => "set_variable",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Only variable actions have an amount operand.
    pub fn has_amount(&self) -> bool {
        matches!(self, ActionType::AddVariable | ActionType::SetVariable)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOperation {
    Add,
    Set,
}

impl VariableOperation {
    /// Wire name used in `variable_operation`.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableOperation::Add => "add",
            VariableOperation::Set => "set",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "add" => Some(VariableOperation::Add),
            "set" => Some(VariableOperation::Set),
            _ => None,
        }
    }
}

/// The "then" clause of a rule; each variant carries exactly its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `target` is a stored node reference (durable or local id). It is
    /// resolved at point of use and never rewritten to a different node.
    GotoQuestion { target: String },
    SkipToEnd,
    RedirectUrl { url: String },
    ShowMessage { message: String },
    Variable {
        operation: VariableOperation,
        name: String,
        amount: f64,
    },
}

impl Action {
    /// The empty operand shape for `kind`.
    pub fn empty(kind: ActionType) -> Self {
        match kind {
            ActionType::GotoQuestion => Action::GotoQuestion {
                target: String::new(),
            },
            ActionType::SkipToEnd => Action::SkipToEnd,
            ActionType::RedirectUrl => Action::RedirectUrl { url: String::new() },
            ActionType::ShowMessage => Action::ShowMessage {
                message: String::new(),
            },
            ActionType::AddVariable => Self::variable(VariableOperation::Add),
            ActionType::SetVariable => Self::variable(VariableOperation::Set),
        }
    }

    fn variable(operation: VariableOperation) -> Self {
        Action::Variable {
            operation,
            name: String::new(),
            amount: 0.0,
        }
    }

    pub fn kind(&self) -> ActionType {
        match self {
            Action::GotoQuestion { .. } => ActionType::GotoQuestion,
            Action::SkipToEnd => ActionType::SkipToEnd,
            Action::RedirectUrl { .. } => ActionType::RedirectUrl,
            Action::ShowMessage { .. } => ActionType::ShowMessage,
            Action::Variable { operation, .. } => match operation {
                VariableOperation::Add => ActionType::AddVariable,
                VariableOperation::Set => ActionType::SetVariable,
            },
        }
    }

    /// The string operand: target reference, URL, message or variable name.
    pub fn value(&self) -> &str {
        match self {
            Action::GotoQuestion { target } => target,
            Action::SkipToEnd => "",
            Action::RedirectUrl { url } => url,
            Action::ShowMessage { message } => message,
            Action::Variable { name, .. } => name,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Action::Variable { amount, .. } => Some(*amount),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<VariableOperation> {
        match self {
            Action::Variable { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// The stored "goto" reference, if this is a non-empty goto action.
    pub fn goto_target(&self) -> Option<&str> {
        match self {
            Action::GotoQuestion { target } if !target.trim().is_empty() => Some(target),
            _ => None,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::empty(ActionType::GotoQuestion)
    }
}
