use super::{Group, QuestionGraph};
use crate::identity::{ConditionId, DurableId, LocalId};

/// Notifications emitted synchronously by a [`QuestionGraph`] after it mutates.
///
/// Every structural change ends with [`GraphEvent::StructureReady`]. Views that
/// depend on other views existing (such as a rule's target selector) rebuild on
/// that event instead of waiting on a timer.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// A full load finished: identities registered and rules attached.
    Loaded { nodes: usize, rules: usize },
    NodeAdded { id: LocalId, group: Group },
    NodeDuplicated { source: LocalId, clone: LocalId },
    /// Rules elsewhere that referenced this node are left as they are.
    NodeRemoved {
        id: LocalId,
        durable: Option<DurableId>,
    },
    NodeMoved { id: LocalId, from: Group, to: Group },
    GroupReordered { group: Group },
    IdentityAcknowledged { local: LocalId, durable: DurableId },
    /// Rules pointing at `target` must re-resolve their selection.
    TargetsNeedRevalidation {
        target: LocalId,
        rules: Vec<ConditionId>,
    },
    /// The graph is consistent and dependent views may be (re)built.
    StructureReady { revision: u64 },
}

/// Receives [`GraphEvent`]s together with a read-only view of the graph.
pub trait GraphListener {
    fn on_event(&mut self, graph: &QuestionGraph, event: &GraphEvent);
}

impl<F> GraphListener for F
where
    F: FnMut(&QuestionGraph, &GraphEvent),
{
    fn on_event(&mut self, graph: &QuestionGraph, event: &GraphEvent) {
        self(graph, event)
    }
}
