//! The ordered collection of form steps and the structural operations on it.
//!
//! Nodes live in an arena keyed by [`LocalId`]. Two id vectors hold the visual
//! order of the normal group and the terminal group; every mutation renumbers
//! the affected group so both `order` sequences stay dense at all times.

mod events;
mod kind;
pub mod order;

pub use events::{GraphEvent, GraphListener};
pub use kind::QuestionKind;

use crate::config::EditorConfig;
use crate::error::GraphError;
use crate::identity::{ConditionId, DurableId, IdentityMap, LocalId, Registration};
use crate::persist::{FormDefinition, decode_rule};
use crate::rules::{ActionType, ConditionRecord, ConditionSet, PredicateType};
use ahash::AHashMap;
use itertools::Itertools;
use std::fmt;

/// Which of the two independently ordered sequences a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Normal,
    /// End states of the form, numbered from `terminal_order_base`.
    Terminal,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Normal => f.write_str("normal"),
            Group::Terminal => f.write_str("terminal"),
        }
    }
}

/// One step of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionNode {
    local_id: LocalId,
    durable_id: Option<DurableId>,
    order: i64,
    group: Group,
    kind: QuestionKind,
    payload: serde_json::Value,
    conditions: ConditionSet,
}

impl QuestionNode {
    fn new(local_id: LocalId, kind: QuestionKind, payload: serde_json::Value, group: Group) -> Self {
        Self {
            local_id,
            durable_id: None,
            order: 0,
            group,
            kind,
            payload,
            conditions: ConditionSet::new(local_id),
        }
    }

    pub fn local_id(&self) -> LocalId {
        self.local_id
    }

    pub fn durable_id(&self) -> Option<&DurableId> {
        self.durable_id.as_ref()
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn is_terminal(&self) -> bool {
        self.group == Group::Terminal
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Kind-specific settings; opaque to this crate.
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut serde_json::Value {
        &mut self.payload
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionSet {
        &mut self.conditions
    }

    /// The reference a rule should store to point at this node: the durable id
    /// once known, the local id before that.
    pub fn reference(&self) -> String {
        match &self.durable_id {
            Some(durable) => durable.to_string(),
            None => self.local_id.to_string(),
        }
    }

    /// The `title` string of the payload, if it has one.
    pub fn title(&self) -> Option<&str> {
        self.payload
            .get("title")
            .and_then(|t| t.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Summary of a [`QuestionGraph::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub nodes: usize,
    pub rules: usize,
    pub durable_ids: usize,
    pub conflicts: usize,
}

/// The authoritative in-memory form: nodes, their order, their rules, and the
/// identity map that ties local ids to durable ids.
pub struct QuestionGraph {
    config: EditorConfig,
    nodes: AHashMap<LocalId, QuestionNode>,
    normal: Vec<LocalId>,
    terminal: Vec<LocalId>,
    identity: IdentityMap,
    next_local: u64,
    revision: u64,
    listeners: Vec<Box<dyn GraphListener>>,
}

impl fmt::Debug for QuestionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionGraph")
            .field("normal", &self.normal)
            .field("terminal", &self.terminal)
            .field("identity", &self.identity)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for QuestionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionGraph {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            nodes: AHashMap::new(),
            normal: Vec::new(),
            terminal: Vec::new(),
            identity: IdentityMap::new(),
            next_local: 0,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    /// Incremented on every `StructureReady`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl GraphListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- Lookup ---

    pub fn node(&self, id: LocalId) -> Option<&QuestionNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: LocalId) -> Option<&mut QuestionNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: LocalId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visual order of one group.
    pub fn group_ids(&self, group: Group) -> &[LocalId] {
        match group {
            Group::Normal => &self.normal,
            Group::Terminal => &self.terminal,
        }
    }

    /// All nodes in visual order: the normal group, then the terminal group.
    pub fn nodes(&self) -> impl Iterator<Item = &QuestionNode> {
        self.normal
            .iter()
            .chain(self.terminal.iter())
            .filter_map(|id| self.nodes.get(id))
    }

    /// Resolves a stored reference (durable id, local id or legacy alias) to a
    /// live node. See [`IdentityMap::resolve`].
    pub fn resolve(&self, reference: &str) -> Option<&QuestionNode> {
        self.identity.resolve(self, reference)
    }

    pub fn base_order(&self, group: Group) -> i64 {
        match group {
            Group::Normal => 0,
            Group::Terminal => self.config.terminal_order_base,
        }
    }

    // --- Load & identity ---

    /// Replaces the whole graph with persisted records.
    ///
    /// Every node gets a fresh local id. All durable ids (and legacy
    /// `temporal_id` aliases) are registered before any rule is attached, so
    /// the first `StructureReady` already sees fully resolvable targets.
    pub fn load(&mut self, form: FormDefinition) -> LoadReport {
        self.nodes.clear();
        self.normal.clear();
        self.terminal.clear();

        self.reserve_stored_locals(&form);

        let base = self.config.terminal_order_base;
        let mut staged = Vec::with_capacity(form.nodes.len());
        let mut sort_keys = AHashMap::new();

        for (position, record) in form.nodes.iter().enumerate() {
            let local = self.allocate_local();
            let group = match record.order {
                Some(order) if order >= base => Group::Terminal,
                _ => Group::Normal,
            };
            let mut node = QuestionNode::new(local, record.kind.clone(), record.payload.clone(), group);
            node.durable_id = record.id.as_ref().and_then(|id| match id.to_durable() {
                Ok(durable) => Some(durable),
                Err(e) => {
                    log::warn!("Node at position {} has an unusable id: {}", position, e);
                    None
                }
            });
            sort_keys.insert(local, (record.order.unwrap_or(position as i64), position));
            staged.push(node);
        }

        self.identity = IdentityMap::build(staged.iter());
        for (node, record) in staged.iter().zip(form.nodes.iter()) {
            if let Some(alias) = &record.temporal_id {
                self.identity.register_alias(alias, node.local_id);
            }
        }

        let mut rules = 0;
        for (node, record) in staged.iter_mut().zip(form.nodes.iter()) {
            for rule in &record.conditions {
                let (predicate, action) = decode_rule(rule);
                node.conditions.push(predicate, action);
                rules += 1;
            }
        }

        for node in staged
            .into_iter()
            .sorted_by_key(|n| sort_keys.get(&n.local_id).copied().unwrap_or_default())
        {
            match node.group {
                Group::Normal => self.normal.push(node.local_id),
                Group::Terminal => self.terminal.push(node.local_id),
            }
            self.nodes.insert(node.local_id, node);
        }
        self.renumber(Group::Normal);
        self.renumber(Group::Terminal);

        let report = LoadReport {
            nodes: self.nodes.len(),
            rules,
            durable_ids: self.identity.len(),
            conflicts: self.identity.conflicts().len(),
        };
        log::info!(
            "Loaded {} node(s) with {} rule(s); {} durable id(s), {} conflict(s)",
            report.nodes,
            report.rules,
            report.durable_ids,
            report.conflicts
        );

        self.emit(GraphEvent::Loaded {
            nodes: report.nodes,
            rules: report.rules,
        });
        self.structure_ready();
        report
    }

    /// Applies durable ids handed back by the backend after a save.
    /// Pairs naming nodes that no longer exist are skipped. Returns how many
    /// pairs were applied.
    pub fn acknowledge_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (LocalId, DurableId)>,
    {
        let mut applied = 0;
        for (local, durable) in pairs {
            if !self.nodes.contains_key(&local) {
                log::debug!(
                    "Save acknowledgement for '{}' -> '{}' names a node that no longer exists",
                    local,
                    durable
                );
                continue;
            }
            match self.identity.register(local, durable.clone()) {
                Registration::Inserted => {
                    if let Some(node) = self.nodes.get_mut(&local) {
                        node.durable_id = Some(durable.clone());
                    }
                    applied += 1;
                    self.emit(GraphEvent::IdentityAcknowledged { local, durable });
                }
                Registration::AlreadyKnown => applied += 1,
                Registration::Conflict(_) => {}
            }
        }
        self.structure_ready();
        applied
    }

    // --- Structural operations ---

    /// Appends a new node (with an empty rule set) to the end of `group`.
    pub fn add_node(&mut self, kind: QuestionKind, payload: serde_json::Value, group: Group) -> LocalId {
        let index = self.group_ids(group).len();
        self.insert_node(kind, payload, group, index)
    }

    /// Inserts a new node at `index` (clamped) within `group`.
    pub fn insert_node(
        &mut self,
        kind: QuestionKind,
        payload: serde_json::Value,
        group: Group,
        index: usize,
    ) -> LocalId {
        let id = self.allocate_local();
        self.nodes.insert(id, QuestionNode::new(id, kind, payload, group));
        let ids = self.group_ids_mut(group);
        let index = index.min(ids.len());
        ids.insert(index, id);
        self.renumber(group);

        self.emit(GraphEvent::NodeAdded { id, group });
        self.structure_ready();
        id
    }

    /// Clones a node right after its source.
    ///
    /// The clone has a new local id, no durable id and an empty rule set; its
    /// payload is a deep copy. Rules are not copied because their "goto"
    /// targets would still point into the source's position in the form.
    pub fn duplicate_node(&mut self, id: LocalId) -> Result<LocalId, GraphError> {
        let source = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        let (kind, payload, group) = (source.kind.clone(), source.payload.clone(), source.group);

        let clone = self.allocate_local();
        self.nodes.insert(clone, QuestionNode::new(clone, kind, payload, group));
        let ids = self.group_ids_mut(group);
        let index = ids.iter().position(|x| *x == id).map_or(ids.len(), |p| p + 1);
        ids.insert(index, clone);
        self.renumber(group);

        log::debug!("Duplicated '{}' as '{}' (rules not copied)", id, clone);
        self.emit(GraphEvent::NodeDuplicated { source: id, clone });
        self.structure_ready();
        Ok(clone)
    }

    /// Removes a node. Rules on other nodes that point at it are left as they
    /// are and will show as unresolved. A missing id is a logged no-op.
    pub fn remove_node(&mut self, id: LocalId) -> Option<QuestionNode> {
        let Some(node) = self.nodes.remove(&id) else {
            log::debug!("No node '{}' to remove; ignoring", id);
            return None;
        };
        self.group_ids_mut(node.group).retain(|x| *x != id);
        self.renumber(node.group);

        self.emit(GraphEvent::NodeRemoved {
            id,
            durable: node.durable_id.clone(),
        });
        self.structure_ready();
        Some(node)
    }

    /// Moves a node to `index` (clamped) within its own group.
    pub fn move_node(&mut self, id: LocalId, index: usize) -> Result<(), GraphError> {
        let group = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?.group;
        if !order::move_within(self.group_ids_mut(group), id, index) {
            return Err(GraphError::NodeNotFound(id));
        }
        self.renumber(group);

        self.emit(GraphEvent::GroupReordered { group });
        self.structure_ready();
        Ok(())
    }

    /// Replaces the visual order of `group` with `proposed`, which must be a
    /// permutation of the group's current members.
    pub fn reorder_group(&mut self, group: Group, proposed: &[LocalId]) -> Result<(), GraphError> {
        let current = self.group_ids(group);
        if !order::is_permutation(current, proposed) {
            return Err(GraphError::InvalidPermutation {
                group,
                expected: current.len(),
                found: proposed.len(),
            });
        }
        *self.group_ids_mut(group) = proposed.to_vec();
        self.renumber(group);

        self.emit(GraphEvent::GroupReordered { group });
        self.structure_ready();
        Ok(())
    }

    /// Moves a node into the other group, appending it there and keeping both
    /// sequences dense. Its identity does not change.
    ///
    /// Returns the rules elsewhere that point at the node so their selectors
    /// can be revalidated; the same list is announced as
    /// [`GraphEvent::TargetsNeedRevalidation`].
    pub fn move_to_group(&mut self, id: LocalId, to: Group) -> Result<Vec<ConditionId>, GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        let from = node.group;
        if from == to {
            return Ok(Vec::new());
        }
        node.group = to;

        self.group_ids_mut(from).retain(|x| *x != id);
        self.group_ids_mut(to).push(id);
        self.renumber(from);
        self.renumber(to);

        let rules = self.referencing_rules(id);
        self.emit(GraphEvent::NodeMoved { id, from, to });
        self.emit(GraphEvent::TargetsNeedRevalidation {
            target: id,
            rules: rules.clone(),
        });
        self.structure_ready();
        Ok(rules)
    }

    // --- Rule authoring, routed by condition id ---

    pub fn condition(&self, id: ConditionId) -> Option<&ConditionRecord> {
        self.nodes.get(&id.owner())?.conditions.get(id)
    }

    pub fn condition_mut(&mut self, id: ConditionId) -> Option<&mut ConditionRecord> {
        self.nodes.get_mut(&id.owner())?.conditions.get_mut(id)
    }

    /// Appends an empty rule to `node`. `None` if the node is gone.
    pub fn add_condition(&mut self, node: LocalId) -> Option<ConditionId> {
        match self.nodes.get_mut(&node) {
            Some(n) => Some(n.conditions.add()),
            None => {
                log::debug!("No node '{}' to add a condition to; ignoring", node);
                None
            }
        }
    }

    pub fn change_predicate_type(&mut self, id: ConditionId, kind: PredicateType) -> bool {
        self.nodes
            .get_mut(&id.owner())
            .is_some_and(|n| n.conditions.change_predicate_type(id, kind))
    }

    pub fn change_action_type(&mut self, id: ConditionId, kind: ActionType) -> bool {
        self.nodes
            .get_mut(&id.owner())
            .is_some_and(|n| n.conditions.change_action_type(id, kind))
    }

    /// Deletes a rule by exact id; a miss is a logged no-op.
    pub fn delete_condition(&mut self, id: ConditionId) -> bool {
        match self.nodes.get_mut(&id.owner()) {
            Some(n) => n.conditions.delete(id),
            None => {
                log::debug!("Owner of condition '{}' no longer exists; ignoring delete", id);
                false
            }
        }
    }

    /// Moves a rule to `index` (clamped) within its owner's set.
    pub fn move_condition(&mut self, id: ConditionId, index: usize) -> bool {
        self.nodes
            .get_mut(&id.owner())
            .is_some_and(|n| n.conditions.move_to(id, index))
    }

    /// Points a goto rule at `target`, validating at point of use that the
    /// target still exists. Stores the target's durable id when it has one.
    pub fn set_goto_target(&mut self, id: ConditionId, target: LocalId) -> bool {
        let Some(reference) = self.nodes.get(&target).map(QuestionNode::reference) else {
            log::debug!("Goto target '{}' for '{}' no longer exists; ignoring", target, id);
            return false;
        };
        if self.config.exclude_owner_from_targets && target == id.owner() {
            log::debug!("Condition '{}' cannot target its own node", id);
            return false;
        }
        self.condition_mut(id)
            .is_some_and(|record| record.set_goto_reference(reference))
    }

    /// Goto rules (on any node) whose stored reference resolves to `target`.
    pub fn referencing_rules(&self, target: LocalId) -> Vec<ConditionId> {
        self.nodes()
            .flat_map(|n| n.conditions.iter())
            .filter(|r| {
                r.action()
                    .goto_target()
                    .and_then(|reference| self.resolve(reference))
                    .is_some_and(|n| n.local_id == target)
            })
            .map(|r| r.id())
            .collect()
    }

    /// Goto rules whose non-empty reference no longer resolves, with the
    /// reference they still hold.
    pub fn dangling_references(&self) -> Vec<(ConditionId, String)> {
        self.nodes()
            .flat_map(|n| n.conditions.iter())
            .filter_map(|r| {
                let reference = r.action().goto_target()?;
                match self.resolve(reference) {
                    Some(_) => None,
                    None => Some((r.id(), reference.to_string())),
                }
            })
            .collect()
    }

    // --- Internals ---

    fn allocate_local(&mut self) -> LocalId {
        let id = LocalId::from_raw(self.next_local);
        self.next_local += 1;
        id
    }

    /// Moves the local id counter past every `tmp-N` written into `form`, so
    /// no node of this session can answer to a reference saved by another.
    fn reserve_stored_locals(&mut self, form: &FormDefinition) {
        let floor = form
            .nodes
            .iter()
            .flat_map(|n| {
                n.temporal_id
                    .iter()
                    .map(String::as_str)
                    .chain(n.conditions.iter().map(|r| r.action_value.as_str()))
            })
            .filter_map(|reference| reference.trim().parse::<LocalId>().ok())
            .map(|id| id.raw().saturating_add(1))
            .max()
            .unwrap_or(0);
        if floor > self.next_local {
            log::debug!("Stored references use local ids below {}; skipping ahead", floor);
            self.next_local = floor;
        }
    }

    fn group_ids_mut(&mut self, group: Group) -> &mut Vec<LocalId> {
        match group {
            Group::Normal => &mut self.normal,
            Group::Terminal => &mut self.terminal,
        }
    }

    fn renumber(&mut self, group: Group) {
        let base = self.base_order(group);
        let ids = match group {
            Group::Normal => &self.normal,
            Group::Terminal => &self.terminal,
        };
        if group == Group::Normal && ids.len() as i64 > self.config.terminal_order_base {
            log::warn!(
                "{} normal nodes overlap the terminal order base {}",
                ids.len(),
                self.config.terminal_order_base
            );
        }
        order::renumber(&mut self.nodes, ids, base);
    }

    fn emit(&mut self, event: GraphEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener.on_event(self, &event);
        }
        self.listeners = listeners;
    }

    fn structure_ready(&mut self) {
        self.revision += 1;
        let revision = self.revision;
        self.emit(GraphEvent::StructureReady { revision });
    }
}
