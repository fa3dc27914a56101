use std::fmt;

/// The six predicate kinds an author can pick for the "if" clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateType {
    AnswerEquals,
    AnswerContains,
    AnswerNotEquals,
    VariableGreater,
    VariableLess,
    VariableEquals,
}

impl PredicateType {
    pub const ALL: [PredicateType; 6] = [
        PredicateType::AnswerEquals,
        PredicateType::AnswerContains,
        PredicateType::AnswerNotEquals,
        PredicateType::VariableGreater,
        PredicateType::VariableLess,
        PredicateType::VariableEquals,
    ];

    /// Wire name used in `condition_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateType::AnswerEquals => "answer_equals",
            PredicateType::AnswerContains => "answer_contains",
            PredicateType::AnswerNotEquals => "answer_not_equals",
            PredicateType::VariableGreater => "variable_greater",
            PredicateType::VariableLess => "variable_less",
            PredicateType::VariableEquals => "variable_equals",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            PredicateType::VariableGreater
                | PredicateType::VariableLess
                | PredicateType::VariableEquals
        )
    }

    /// Whether the comparison operand is expected to be a number.
    pub fn is_threshold(&self) -> bool {
        matches!(
            self,
            PredicateType::VariableGreater | PredicateType::VariableLess
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PredicateType::AnswerEquals | PredicateType::VariableEquals => "=",
            PredicateType::AnswerContains => "contains",
            PredicateType::AnswerNotEquals => "!=",
            PredicateType::VariableGreater => ">",
            PredicateType::VariableLess => "<",
        }
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerOp {
    Equals,
    Contains,
    NotEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOp {
    Greater,
    Less,
    Equals,
}

/// The "if" clause of a rule.
///
/// Answer predicates carry one string; variable predicates carry a variable
/// name plus the comparison operand exactly as the author typed it. Numeric
/// coercion of that operand happens on save.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Answer {
        op: AnswerOp,
        value: String,
    },
    Variable {
        op: VariableOp,
        name: String,
        comparison: String,
    },
}

impl Predicate {
    /// The empty operand shape for `kind`.
    pub fn empty(kind: PredicateType) -> Self {
        match kind {
            PredicateType::AnswerEquals => Self::answer(AnswerOp::Equals),
            PredicateType::AnswerContains => Self::answer(AnswerOp::Contains),
            PredicateType::AnswerNotEquals => Self::answer(AnswerOp::NotEquals),
            PredicateType::VariableGreater => Self::variable(VariableOp::Greater),
            PredicateType::VariableLess => Self::variable(VariableOp::Less),
            PredicateType::VariableEquals => Self::variable(VariableOp::Equals),
        }
    }

    fn answer(op: AnswerOp) -> Self {
        Predicate::Answer {
            op,
            value: String::new(),
        }
    }

    fn variable(op: VariableOp) -> Self {
        Predicate::Variable {
            op,
            name: String::new(),
            comparison: String::new(),
        }
    }

    pub fn kind(&self) -> PredicateType {
        match self {
            Predicate::Answer { op, .. } => match op {
                AnswerOp::Equals => PredicateType::AnswerEquals,
                AnswerOp::Contains => PredicateType::AnswerContains,
                AnswerOp::NotEquals => PredicateType::AnswerNotEquals,
            },
            Predicate::Variable { op, .. } => match op {
                VariableOp::Greater => PredicateType::VariableGreater,
                VariableOp::Less => PredicateType::VariableLess,
                VariableOp::Equals => PredicateType::VariableEquals,
            },
        }
    }

    /// Primary operand: the expected answer, or the variable name.
    pub fn value(&self) -> &str {
        match self {
            Predicate::Answer { value, .. } => value,
            Predicate::Variable { name, .. } => name,
        }
    }

    /// Secondary operand; only variable predicates have one.
    pub fn comparison(&self) -> Option<&str> {
        match self {
            Predicate::Answer { .. } => None,
            Predicate::Variable { comparison, .. } => Some(comparison),
        }
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::empty(PredicateType::AnswerEquals)
    }
}
