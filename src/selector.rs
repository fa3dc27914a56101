//! View-model for a rule's "goto" target selector.
//!
//! A selector is a snapshot: the options and the resolved selection as of the
//! graph revision it was built from. Rebuild it on
//! [`GraphEvent::StructureReady`](crate::graph::GraphEvent::StructureReady);
//! choosing an option re-checks the live graph instead of trusting the snapshot.

use crate::describe::node_label;
use crate::graph::{Group, QuestionGraph};
use crate::identity::{ConditionId, LocalId};
use crate::rules::Action;

/// What the selector shows as selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The rule has no target yet.
    Empty,
    Selected(LocalId),
    /// The stored reference no longer matches any node; shown unselected with
    /// a hint. The reference itself is left untouched.
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOption {
    pub local_id: LocalId,
    pub label: String,
    pub group: Group,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    pub condition: ConditionId,
    pub options: Vec<TargetOption>,
    pub selection: Selection,
    /// Graph revision the snapshot was taken at.
    pub revision: u64,
}

impl TargetSelector {
    /// Builds the selector for a goto rule. `None` if the rule no longer
    /// exists or its action is not a goto.
    pub fn build(graph: &QuestionGraph, condition: ConditionId) -> Option<Self> {
        let record = graph.condition(condition)?;
        let Action::GotoQuestion { target } = record.action() else {
            return None;
        };

        let exclude_owner = graph.config().exclude_owner_from_targets;
        let options = graph
            .nodes()
            .filter(|n| !(exclude_owner && n.local_id() == condition.owner()))
            .map(|n| TargetOption {
                local_id: n.local_id(),
                label: node_label(graph, n),
                group: n.group(),
                order: n.order(),
            })
            .collect();

        let selection = if target.trim().is_empty() {
            Selection::Empty
        } else {
            match graph.resolve(target) {
                Some(node) => Selection::Selected(node.local_id()),
                None => {
                    log::debug!(
                        "Goto target '{}' of '{}' does not resolve; rendering unselected",
                        target,
                        condition
                    );
                    Selection::Unresolved(target.clone())
                }
            }
        };

        Some(Self {
            condition,
            options,
            selection,
            revision: graph.revision(),
        })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.selection, Selection::Unresolved(_))
    }

    pub fn selected_option(&self) -> Option<&TargetOption> {
        match self.selection {
            Selection::Selected(id) => self.options.iter().find(|o| o.local_id == id),
            _ => None,
        }
    }

    /// Whether the graph has changed structurally since this snapshot.
    pub fn is_stale(&self, graph: &QuestionGraph) -> bool {
        graph.revision() != self.revision
    }

    /// Applies the author's choice. The target is revalidated against the live
    /// graph, so an option captured before the node was deleted is refused.
    pub fn choose(&self, graph: &mut QuestionGraph, target: LocalId) -> bool {
        graph.set_goto_target(self.condition, target)
    }
}
