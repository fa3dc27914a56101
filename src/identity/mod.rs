//! Identity reconciliation between session-local and durable node ids.
//!
//! A node is known by a [`LocalId`] for the whole editing session and, once the
//! backend has stored it, by a [`DurableId`] as well. Rules written at different
//! times may point at either form, so every "goto" reference is resolved here
//! against the live graph at the point of use.

mod ids;

pub use ids::{ConditionId, DurableId, LocalId};

use crate::graph::{QuestionGraph, QuestionNode};
use ahash::AHashMap;

/// Outcome of registering a `local ⇄ durable` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The pair was new and is now authoritative.
    Inserted,
    /// The exact pair was already registered.
    AlreadyKnown,
    /// Another mapping was registered first and keeps winning.
    Conflict(IdentityConflict),
}

/// A registration that lost against an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityConflict {
    /// `durable` already belongs to `kept`; `rejected` will not be found through it.
    DurableTaken {
        durable: DurableId,
        kept: LocalId,
        rejected: LocalId,
    },
    /// `local` already carries `kept`; `rejected` was ignored.
    LocalTaken {
        local: LocalId,
        kept: DurableId,
        rejected: DurableId,
    },
}

/// Bidirectional map between local and durable ids, plus aliases for
/// local-style ids written by earlier editing sessions.
///
/// Rebuilt from scratch on every load and updated incrementally when the
/// backend acknowledges a save. Entries are never dropped lazily: a mapping
/// whose node has since been deleted simply stops resolving.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    forward: AHashMap<LocalId, DurableId>,
    reverse: AHashMap<DurableId, LocalId>,
    aliases: AHashMap<String, LocalId>,
    conflicts: Vec<IdentityConflict>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every node that carries a durable id, in iteration order.
    pub fn build<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a QuestionNode>,
    {
        let mut map = Self::new();
        for node in nodes {
            if let Some(durable) = node.durable_id() {
                map.register(node.local_id(), durable.clone());
            }
        }
        log::debug!(
            "Identity map built with {} durable id(s), {} conflict(s)",
            map.forward.len(),
            map.conflicts.len()
        );
        map
    }

    /// Registers a pair. The first mapping registered for either side wins;
    /// later conflicting registrations are recorded and logged, never raised.
    pub fn register(&mut self, local: LocalId, durable: DurableId) -> Registration {
        if let Some(existing) = self.forward.get(&local) {
            if *existing == durable {
                return Registration::AlreadyKnown;
            }
            log::warn!(
                "Node '{}' is already mapped to durable id '{}'; ignoring '{}'",
                local,
                existing,
                durable
            );
            let conflict = IdentityConflict::LocalTaken {
                local,
                kept: existing.clone(),
                rejected: durable,
            };
            self.conflicts.push(conflict.clone());
            return Registration::Conflict(conflict);
        }

        if let Some(kept) = self.reverse.get(&durable).copied() {
            log::warn!(
                "Durable id '{}' is claimed by both '{}' and '{}'; keeping '{}'",
                durable,
                kept,
                local,
                kept
            );
            let conflict = IdentityConflict::DurableTaken {
                durable,
                kept,
                rejected: local,
            };
            self.conflicts.push(conflict.clone());
            return Registration::Conflict(conflict);
        }

        self.forward.insert(local, durable.clone());
        self.reverse.insert(durable, local);
        Registration::Inserted
    }

    /// Records a legacy local-style id (e.g. a `temporal_id` from a previous
    /// session) as another name for `local`. The first alias registered wins.
    pub fn register_alias(&mut self, alias: &str, local: LocalId) {
        let alias = alias.trim();
        if alias.is_empty() {
            return;
        }
        self.aliases.entry(alias.to_string()).or_insert(local);
    }

    pub fn durable_for(&self, local: LocalId) -> Option<&DurableId> {
        self.forward.get(&local)
    }

    pub fn local_for(&self, durable: &str) -> Option<LocalId> {
        self.reverse.get(durable).copied()
    }

    pub fn local_for_alias(&self, alias: &str) -> Option<LocalId> {
        self.aliases.get(alias).copied()
    }

    pub fn conflicts(&self) -> &[IdentityConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Resolves a stored reference to a node currently in `graph`.
    ///
    /// Tries durable ids first, then legacy aliases, then local ids of this
    /// session. Anything that does not land on a live node yields `None`,
    /// which callers treat as "target no longer exists".
    pub fn resolve<'g>(&self, graph: &'g QuestionGraph, reference: &str) -> Option<&'g QuestionNode> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        if let Some(node) = self.local_for(reference).and_then(|local| graph.node(local)) {
            return Some(node);
        }
        // The first registrant may be gone while a later holder of the id is alive.
        if let Some(node) = graph
            .nodes()
            .find(|n| n.durable_id().is_some_and(|d| d.as_str() == reference))
        {
            return Some(node);
        }

        // A stored temporal id names the node it was saved with, never
        // whichever node of this session happens to share the string.
        if let Some(local) = self.local_for_alias(reference) {
            return graph.node(local);
        }

        reference
            .parse::<LocalId>()
            .ok()
            .and_then(|local| graph.node(local))
    }
}
