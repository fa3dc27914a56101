use super::definition::{AckRecord, FormDefinition, PersistedId, PersistedNode, PersistedRule, Scalar};
use crate::graph::{QuestionGraph, QuestionNode};
use crate::identity::{DurableId, LocalId};
use crate::rules::{Action, ActionType, ConditionRecord, Predicate, PredicateType, VariableOperation};
use serde_json::Number;

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parses a fully numeric literal: optional `-`, digits, optional `.` and digits.
/// Integers that fit `i64` or `u64` become JSON integers, everything else a
/// JSON float.
pub fn numeric_literal(input: &str) -> Option<Number> {
    let text = input.trim();
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return None;
    }

    if fraction.is_none() {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::from(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::from(n));
        }
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Normalizes a variable comparison operand for persistence: fully numeric
/// text becomes a number, anything else stays the string the author typed.
pub fn normalize_comparison(raw: &str, coerce: bool) -> Scalar {
    if coerce {
        if let Some(n) = numeric_literal(raw) {
            return Scalar::Number(n);
        }
    }
    Scalar::Text(raw.to_string())
}

fn amount_scalar(amount: f64) -> Scalar {
    if amount.fract() == 0.0 && amount.abs() < MAX_EXACT_INTEGER {
        return Scalar::Number(Number::from(amount as i64));
    }
    Scalar::Number(Number::from_f64(amount).unwrap_or_else(|| Number::from(0)))
}

/// Converts a persisted rule into its in-memory operands.
///
/// Unknown predicate or action types fall back to the empty default of that
/// axis rather than rejecting the node.
pub fn decode_rule(rule: &PersistedRule) -> (Predicate, Action) {
    (decode_predicate(rule), decode_action(rule))
}

fn decode_predicate(rule: &PersistedRule) -> Predicate {
    let Some(kind) = PredicateType::parse(&rule.condition_type) else {
        log::warn!(
            "Unknown condition type '{}'; using an empty predicate",
            rule.condition_type
        );
        return Predicate::default();
    };

    match Predicate::empty(kind) {
        Predicate::Answer { op, .. } => Predicate::Answer {
            op,
            value: rule.condition_value.clone(),
        },
        Predicate::Variable { op, .. } => Predicate::Variable {
            op,
            name: rule.condition_value.trim().to_string(),
            comparison: rule.comparison_value.to_text(),
        },
    }
}

fn decode_action(rule: &PersistedRule) -> Action {
    let kind = ActionType::parse(&rule.action_type).or_else(|| {
        // Older builders stored variable actions as a single "variable" type.
        if rule.action_type.trim().eq_ignore_ascii_case("variable") {
            VariableOperation::parse(&rule.variable_operation).map(|op| match op {
                VariableOperation::Add => ActionType::AddVariable,
                VariableOperation::Set => ActionType::SetVariable,
            })
        } else {
            None
        }
    });
    let Some(kind) = kind else {
        log::warn!(
            "Unknown action type '{}'; using an empty action",
            rule.action_type
        );
        return Action::default();
    };

    let value = rule.action_value.trim().to_string();
    match Action::empty(kind) {
        Action::GotoQuestion { .. } => Action::GotoQuestion { target: value },
        Action::SkipToEnd => Action::SkipToEnd,
        Action::RedirectUrl { .. } => Action::RedirectUrl { url: value },
        Action::ShowMessage { .. } => Action::ShowMessage {
            message: rule.action_value.clone(),
        },
        Action::Variable { operation, .. } => {
            let amount = rule.variable_amount.as_f64().unwrap_or_else(|| {
                log::warn!(
                    "Variable amount '{}' for '{}' is not a number; using 0",
                    rule.variable_amount.to_text(),
                    value
                );
                0.0
            });
            Action::Variable {
                operation,
                name: value,
                amount,
            }
        }
    }
}

/// Converts in-memory rules and nodes into the persisted shape.
pub struct Serializer<'g> {
    graph: &'g QuestionGraph,
}

impl<'g> Serializer<'g> {
    pub fn new(graph: &'g QuestionGraph) -> Self {
        Self { graph }
    }

    /// The persisted rules of one node, in author order. Empty if the node is gone.
    pub fn get_serializable(&self, node: LocalId) -> Vec<PersistedRule> {
        self.graph
            .node(node)
            .map(|n| n.conditions().iter().map(|r| self.encode_rule(r)).collect())
            .unwrap_or_default()
    }

    pub fn encode_rule(&self, record: &ConditionRecord) -> PersistedRule {
        let (condition_value, comparison_value) = match record.predicate() {
            Predicate::Answer { value, .. } => (value.clone(), Scalar::default()),
            Predicate::Variable {
                name, comparison, ..
            } => (
                name.clone(),
                normalize_comparison(comparison, self.graph.config().normalize_comparisons),
            ),
        };

        let action = record.action();
        let action_value = match action {
            Action::GotoQuestion { target } => self.encode_target(target),
            other => other.value().to_string(),
        };
        let (variable_operation, variable_amount) = match action {
            Action::Variable {
                operation, amount, ..
            } => (operation.as_str().to_string(), amount_scalar(*amount)),
            _ => (String::new(), amount_scalar(0.0)),
        };

        PersistedRule {
            condition_type: record.predicate_type().as_str().to_string(),
            condition_value,
            action_type: record.action_type().as_str().to_string(),
            action_value,
            variable_operation,
            variable_amount,
            comparison_value,
        }
    }

    /// A reference that still resolves is written as the target's durable id
    /// (or local id if it has none yet); one that does not is kept verbatim.
    fn encode_target(&self, reference: &str) -> String {
        match self.graph.resolve(reference) {
            Some(node) => node.reference(),
            None => reference.to_string(),
        }
    }

    pub fn serialize_node(&self, node: &QuestionNode) -> PersistedNode {
        PersistedNode {
            id: node.durable_id().map(PersistedId::from),
            temporal_id: Some(node.local_id().to_string()),
            kind: node.kind().clone(),
            order: Some(node.order()),
            payload: node.payload().clone(),
            conditions: node.conditions().iter().map(|r| self.encode_rule(r)).collect(),
        }
    }

    /// The whole form in visual order, ready for the backend.
    pub fn serialize(&self) -> FormDefinition {
        FormDefinition {
            nodes: self
                .graph
                .nodes()
                .map(|node| self.serialize_node(node))
                .collect(),
        }
    }
}

/// Applies a save acknowledgement to `graph`. `temporal_id`s may be current
/// local ids or aliases registered on load. Returns how many pairs were applied.
pub fn apply_acknowledgements(graph: &mut QuestionGraph, acks: &[AckRecord]) -> usize {
    let pairs: Vec<(LocalId, DurableId)> = acks
        .iter()
        .filter_map(|ack| {
            let local = ack
                .temporal_id
                .parse::<LocalId>()
                .ok()
                .or_else(|| graph.identity().local_for_alias(&ack.temporal_id));
            let Some(local) = local else {
                log::warn!("Acknowledgement names unknown temporal id '{}'", ack.temporal_id);
                return None;
            };
            match ack.id.to_durable() {
                Ok(durable) => Some((local, durable)),
                Err(e) => {
                    log::warn!("Acknowledgement for '{}' has an unusable id: {}", ack.temporal_id, e);
                    None
                }
            }
        })
        .collect();
    graph.acknowledge_all(pairs)
}
