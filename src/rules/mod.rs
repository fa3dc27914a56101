//! Per-node rule authoring.
//!
//! A [`ConditionSet`] is the ordered list of rules attached to one node. Each
//! [`ConditionRecord`] pairs a [`Predicate`] with an [`Action`]; both are tagged
//! unions, so a record can only ever hold the operands its current types allow.
//! Switching a type resets that axis to its empty shape and leaves the other
//! axis alone.

mod action;
mod predicate;

pub use action::{Action, ActionType, VariableOperation};
pub use predicate::{AnswerOp, Predicate, PredicateType, VariableOp};

use crate::identity::{ConditionId, LocalId};
use crate::persist::numeric_literal;

/// Authoring problems that do not block saving but should be shown to the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleIssue {
    MissingTarget,
    MissingVariableName,
    NonNumericThreshold(String),
    EmptyUrl,
    EmptyMessage,
}

/// One "if predicate then action" rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionRecord {
    id: ConditionId,
    predicate: Predicate,
    action: Action,
}

impl ConditionRecord {
    fn new(id: ConditionId, predicate: Predicate, action: Action) -> Self {
        Self {
            id,
            predicate,
            action,
        }
    }

    pub fn id(&self) -> ConditionId {
        self.id
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn predicate_type(&self) -> PredicateType {
        self.predicate.kind()
    }

    pub fn action_type(&self) -> ActionType {
        self.action.kind()
    }

    /// Full reset of the predicate operands to the empty shape of `kind`.
    pub fn change_predicate_type(&mut self, kind: PredicateType) {
        self.predicate = Predicate::empty(kind);
    }

    /// Full reset of the action operands to the empty shape of `kind`.
    pub fn change_action_type(&mut self, kind: ActionType) {
        self.action = Action::empty(kind);
    }

    pub fn set_answer_value(&mut self, input: &str) -> bool {
        if let Predicate::Answer { value, .. } = &mut self.predicate {
            *value = input.to_string();
            return true;
        }
        self.reject("answer value")
    }

    pub fn set_variable_name(&mut self, input: &str) -> bool {
        if let Predicate::Variable { name, .. } = &mut self.predicate {
            *name = input.trim().to_string();
            return true;
        }
        self.reject("variable name")
    }

    pub fn set_comparison_value(&mut self, input: &str) -> bool {
        if let Predicate::Variable { comparison, .. } = &mut self.predicate {
            *comparison = input.to_string();
            return true;
        }
        self.reject("comparison value")
    }

    /// Sets the URL of a redirect or the text of a message action.
    pub fn set_action_text(&mut self, input: &str) -> bool {
        match &mut self.action {
            Action::RedirectUrl { url } => *url = input.trim().to_string(),
            Action::ShowMessage { message } => *message = input.to_string(),
            _ => return self.reject("action text"),
        }
        true
    }

    pub fn set_action_variable(&mut self, input: &str) -> bool {
        if let Action::Variable { name, .. } = &mut self.action {
            *name = input.trim().to_string();
            return true;
        }
        self.reject("action variable")
    }

    pub fn set_action_amount(&mut self, input: f64) -> bool {
        if !input.is_finite() {
            return self.reject("non-finite action amount");
        }
        if let Action::Variable { amount, .. } = &mut self.action {
            *amount = input;
            return true;
        }
        self.reject("action amount")
    }

    /// Stores a raw goto reference. Callers go through
    /// [`QuestionGraph::set_goto_target`](crate::graph::QuestionGraph::set_goto_target)
    /// so the target is validated against the live graph first.
    pub(crate) fn set_goto_reference(&mut self, reference: String) -> bool {
        if let Action::GotoQuestion { target } = &mut self.action {
            *target = reference;
            return true;
        }
        self.reject("goto target")
    }

    /// Problems the author should fix; none of them prevents a save.
    pub fn issues(&self) -> Vec<RuleIssue> {
        let mut issues = Vec::new();

        if let Predicate::Variable { name, comparison, .. } = &self.predicate {
            if name.is_empty() {
                issues.push(RuleIssue::MissingVariableName);
            }
            if self.predicate.kind().is_threshold()
                && !comparison.trim().is_empty()
                && numeric_literal(comparison).is_none()
            {
                issues.push(RuleIssue::NonNumericThreshold(comparison.clone()));
            }
        }

        match &self.action {
            Action::GotoQuestion { target } if target.trim().is_empty() => {
                issues.push(RuleIssue::MissingTarget)
            }
            Action::RedirectUrl { url } if url.is_empty() => issues.push(RuleIssue::EmptyUrl),
            Action::ShowMessage { message } if message.trim().is_empty() => {
                issues.push(RuleIssue::EmptyMessage)
            }
            Action::Variable { name, .. } if name.is_empty() => {
                issues.push(RuleIssue::MissingVariableName)
            }
            _ => {}
        }

        issues
    }

    fn reject(&self, operand: &str) -> bool {
        log::debug!(
            "Ignoring {} on condition '{}' ({} / {}): not part of its shape",
            operand,
            self.id,
            self.predicate.kind(),
            self.action.kind()
        );
        false
    }
}

/// The ordered rules of a single node.
///
/// Ids are `owner + ordinal`. Ordinals come from a per-set counter that only
/// grows, so ids stay unique after deletions and never change on re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSet {
    owner: LocalId,
    records: Vec<ConditionRecord>,
    next_ordinal: u32,
}

impl ConditionSet {
    pub fn new(owner: LocalId) -> Self {
        Self {
            owner,
            records: Vec::new(),
            next_ordinal: 0,
        }
    }

    pub fn owner(&self) -> LocalId {
        self.owner
    }

    /// Appends an empty `AnswerEquals` / `GotoQuestion` rule.
    pub fn add(&mut self) -> ConditionId {
        self.push(Predicate::default(), Action::default())
    }

    /// Appends a rule with the given operands.
    pub fn push(&mut self, predicate: Predicate, action: Action) -> ConditionId {
        let id = ConditionId::new(self.owner, self.next_ordinal);
        self.next_ordinal += 1;
        self.records.push(ConditionRecord::new(id, predicate, action));
        id
    }

    pub fn get(&self, id: ConditionId) -> Option<&ConditionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: ConditionId) -> Option<&mut ConditionRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn change_predicate_type(&mut self, id: ConditionId, kind: PredicateType) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.change_predicate_type(kind);
                true
            }
            None => self.missing(id, "change predicate type"),
        }
    }

    pub fn change_action_type(&mut self, id: ConditionId, kind: ActionType) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.change_action_type(kind);
                true
            }
            None => self.missing(id, "change action type"),
        }
    }

    /// Removes the rule with exactly this id. A miss is a logged no-op so a
    /// repeated delete from the view layer is harmless.
    pub fn delete(&mut self, id: ConditionId) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => self.missing(id, "delete"),
        }
    }

    /// Moves a rule to `index` (clamped), keeping the relative order of the rest.
    pub fn move_to(&mut self, id: ConditionId, index: usize) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(from) => {
                let record = self.records.remove(from);
                let to = index.min(self.records.len());
                self.records.insert(to, record);
                true
            }
            None => self.missing(id, "move"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> Vec<ConditionId> {
        self.records.iter().map(|r| r.id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn missing(&self, id: ConditionId, operation: &str) -> bool {
        log::debug!(
            "No condition '{}' on node '{}' to {}; ignoring",
            id,
            self.owner,
            operation
        );
        false
    }
}
