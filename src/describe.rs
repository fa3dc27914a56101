use crate::graph::{QuestionGraph, QuestionNode};
use crate::rules::{Action, ConditionRecord, Predicate, VariableOperation};

/// Label for a node in selectors and summaries, e.g. `#2 Favourite colour`
/// or `End 1 Result` for terminal nodes.
pub fn node_label(graph: &QuestionGraph, node: &QuestionNode) -> String {
    let position = node.order() - graph.base_order(node.group()) + 1;
    let name = node.title().unwrap_or_else(|| node.kind().label());
    if node.is_terminal() {
        format!("End {} {}", position, name)
    } else {
        format!("#{} {}", position, name)
    }
}

/// Formats rules into human-readable one-liners.
pub struct RuleFormatter;

impl RuleFormatter {
    /// Describes a rule, resolving its goto target against the live graph.
    pub fn describe(graph: &QuestionGraph, record: &ConditionRecord) -> String {
        format!(
            "If {} then {}",
            Self::format_predicate(record.predicate()),
            Self::format_action(graph, record.action())
        )
    }

    fn format_predicate(predicate: &Predicate) -> String {
        let kind = predicate.kind();
        match predicate {
            Predicate::Answer { value, .. } => {
                format!("answer {} \"{}\"", kind.symbol(), value)
            }
            Predicate::Variable {
                name, comparison, ..
            } => {
                format!("variable \"{}\" {} {}", name, kind.symbol(), Self::format_operand(comparison))
            }
        }
    }

    fn format_action(graph: &QuestionGraph, action: &Action) -> String {
        match action {
            Action::GotoQuestion { target } if target.trim().is_empty() => {
                "go to <no target>".to_string()
            }
            Action::GotoQuestion { target } => match graph.resolve(target) {
                Some(node) => format!("go to {}", node_label(graph, node)),
                None => format!("go to <unresolved {}>", target),
            },
            Action::SkipToEnd => "skip to end".to_string(),
            Action::RedirectUrl { url } => format!("redirect to {}", url),
            Action::ShowMessage { message } => format!("show \"{}\"", message),
            Action::Variable {
                operation,
                name,
                amount,
            } => {
                let amount = Self::format_amount(*amount);
                match operation {
                    VariableOperation::Add => format!("add {} to \"{}\"", amount, name),
                    VariableOperation::Set => format!("set \"{}\" to {}", name, amount),
                }
            }
        }
    }

    /// Numeric operands print bare, anything else quoted.
    fn format_operand(operand: &str) -> String {
        if crate::persist::numeric_literal(operand).is_some() {
            operand.trim().to_string()
        } else {
            format!("\"{}\"", operand)
        }
    }

    fn format_amount(amount: f64) -> String {
        if amount.fract() == 0.0 {
            format!("{}", amount as i64)
        } else {
            format!("{}", amount)
        }
    }
}
