//! # Bunki - Branching Rule Authoring for Multi-Step Forms
//!
//! **Bunki** is the core behind a form builder's "logic" tab: it lets an author
//! attach rules such as *"if the answer equals `yes`, go to step 4"* or
//! *"if variable `score` > 10, show a message"* to the steps of a form, and it
//! keeps those rules pointing at the right steps while the steps are created,
//! duplicated, reordered, deleted and saved.
//!
//! Rendering, drag-and-drop, transport and evaluating rules while a visitor
//! fills in the form all live elsewhere. Bunki only authors the rules.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse the backend's records into a [`persist::FormDefinition`] (or
//!     implement [`persist::IntoForm`] for your own export format) and hand it to
//!     [`graph::QuestionGraph::load`]. Every step gets a session-local id, and all
//!     durable ids are registered before any rule is attached.
//! 2.  **Author**: Mutate the graph from UI handlers: add or duplicate steps, move
//!     them, add rules, switch predicate/action types, pick "goto" targets through a
//!     [`selector::TargetSelector`].
//! 3.  **Save**: Run a [`persist::Serializer`] over the graph. Goto references are
//!     written as durable ids where possible, and numeric comparison values become
//!     JSON numbers.
//! 4.  **Acknowledge**: Feed the backend's `temporal_id -> id` answer to
//!     [`persist::apply_acknowledgements`] so newly created steps become durable.
//!
//! ## Quick Start
//!
//! ```rust
//! use bunki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let form = FormDefinition::from_json(r#"{
//!         "nodes": [
//!             { "id": 5, "kind": "single_choice", "order": 0, "conditions": [{
//!                 "condition_type": "answer_equals", "condition_value": "yes",
//!                 "action_type": "goto_question", "action_value": "7"
//!             }]},
//!             { "id": 7, "kind": "short_text", "order": 1 }
//!         ]
//!     }"#)?;
//!
//!     let mut graph = QuestionGraph::new();
//!     graph.load(form);
//!
//!     // The rule on the first step resolves its target from the first paint.
//!     let first = graph.group_ids(Group::Normal)[0];
//!     let rule = graph.node(first).unwrap().conditions().ids()[0];
//!     let selector = TargetSelector::build(&graph, rule).unwrap();
//!     assert!(!selector.is_unresolved());
//!
//!     // Saving writes the reference back as the durable id.
//!     let saved = Serializer::new(&graph).serialize();
//!     assert_eq!(saved.nodes[0].conditions[0].action_value, "7");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod describe;
pub mod error;
pub mod graph;
pub mod identity;
pub mod persist;
pub mod prelude;
pub mod rules;
pub mod selector;
