//! Tests for identity reconciliation between local and durable ids.
mod common;
use bunki::identity::{IdentityConflict, Registration};
use bunki::persist::PersistedId;
use bunki::prelude::*;
use common::*;

#[test]
fn test_resolve_by_durable_and_local_id() {
    let graph = load_graph(create_linked_form());
    let b = local_of(&graph, "7");

    assert_eq!(graph.resolve("7").map(|n| n.local_id()), Some(b));
    assert_eq!(graph.resolve(&b.to_string()).map(|n| n.local_id()), Some(b));
    // Surrounding whitespace from hand-edited exports is tolerated.
    assert_eq!(graph.resolve(" 7 ").map(|n| n.local_id()), Some(b));
}

#[test]
fn test_resolve_misses() {
    let graph = load_graph(create_linked_form());
    assert!(graph.resolve("").is_none());
    assert!(graph.resolve("   ").is_none());
    assert!(graph.resolve("999").is_none());
    assert!(graph.resolve("tmp-999").is_none());
}

#[test]
fn test_legacy_temporal_id_resolves_through_alias() {
    let graph = load_graph(create_form_with_endings());
    let draft = graph
        .identity()
        .local_for_alias("tmp-legacy-3")
        .expect("alias registered on load");

    let node = graph.resolve("tmp-legacy-3").expect("alias resolves");
    assert_eq!(node.local_id(), draft);
    assert!(node.durable_id().is_none());
}

#[test]
fn test_durable_ids_registered_before_rules_attach() {
    let mut graph = QuestionGraph::new();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&seen);
    graph.subscribe(move |g: &QuestionGraph, event: &GraphEvent| {
        if let GraphEvent::StructureReady { .. } = event {
            sink.borrow_mut().push(g.dangling_references().len());
        }
    });

    graph.load(create_linked_form());
    assert_eq!(*seen.borrow(), vec![0]);
}

#[test]
fn test_first_registration_wins_on_duplicate_durable_id() {
    let form = FormDefinition {
        nodes: vec![
            persisted_node(Some(5), "short_text", 0, "First"),
            persisted_node(Some(5), "short_text", 1, "Second"),
        ],
    };
    let mut graph = QuestionGraph::new();
    let report = graph.load(form);
    assert_eq!(report.conflicts, 1);

    let first = graph.group_ids(Group::Normal)[0];
    let second = graph.group_ids(Group::Normal)[1];
    assert_eq!(graph.resolve("5").map(|n| n.local_id()), Some(first));
    assert!(matches!(
        graph.identity().conflicts()[0],
        IdentityConflict::DurableTaken { kept, rejected, .. } if kept == first && rejected == second
    ));

    // Once the winner is gone the remaining holder of the id is found instead.
    graph.remove_node(first);
    assert_eq!(graph.resolve("5").map(|n| n.local_id()), Some(second));
}

#[test]
fn test_register_outcomes() {
    let graph = load_graph(create_linked_form());
    let a = local_of(&graph, "5");
    let b = local_of(&graph, "7");
    let mut map = graph.identity().clone();

    assert_eq!(
        map.register(a, DurableId::from(5)),
        Registration::AlreadyKnown
    );
    assert!(matches!(
        map.register(a, DurableId::from(6)),
        Registration::Conflict(IdentityConflict::LocalTaken { .. })
    ));
    assert!(matches!(
        map.register(b, DurableId::from(8)),
        Registration::Conflict(_)
    ));
    assert_eq!(map.conflicts().len(), 2);
    assert_eq!(map.durable_for(a).map(DurableId::as_str), Some("5"));
}

#[test]
fn test_local_ids_never_reused_across_reloads() {
    let mut graph = QuestionGraph::new();
    graph.load(create_linked_form());
    let first: Vec<LocalId> = graph.group_ids(Group::Normal).to_vec();

    graph.load(create_linked_form());
    let second: Vec<LocalId> = graph.group_ids(Group::Normal).to_vec();

    assert!(first.iter().all(|id| !second.contains(id)));
    assert!(first.iter().max() < second.iter().min());
}

#[test]
fn test_acknowledgement_makes_new_node_durable() {
    let mut graph = load_graph(create_linked_form());
    let a = local_of(&graph, "5");
    let fresh = graph.add_node(QuestionKind::Email, serde_json::json!({}), Group::Normal);
    let rule = graph.add_condition(a).expect("A exists");
    assert!(graph.set_goto_target(rule, fresh));
    // Before the save the rule can only hold the local id.
    assert_eq!(
        graph.condition(rule).and_then(|r| r.action().goto_target()),
        Some(fresh.to_string().as_str())
    );

    let events = record_events(&mut graph);
    let acks = AckRecord::list_from_json(&format!(r#"[{{"temporal_id": "{}", "id": 42}}]"#, fresh))
        .expect("valid ack JSON");
    assert_eq!(apply_acknowledgements(&mut graph, &acks), 1);

    assert_eq!(graph.node(fresh).and_then(|n| n.durable_id()).map(|d| d.as_str()), Some("42"));
    assert_eq!(graph.resolve("42").map(|n| n.local_id()), Some(fresh));
    // The stored local reference keeps resolving, and is written durable on save.
    assert_eq!(graph.resolve(&fresh.to_string()).map(|n| n.local_id()), Some(fresh));
    let saved = Serializer::new(&graph).get_serializable(a);
    assert_eq!(saved.last().map(|r| r.action_value.as_str()), Some("42"));

    assert!(events.borrow().contains(&GraphEvent::IdentityAcknowledged {
        local: fresh,
        durable: DurableId::from(42),
    }));
}

#[test]
fn test_acknowledgement_by_legacy_alias_and_unknown_id() {
    let mut graph = load_graph(create_form_with_endings());
    let acks = vec![
        AckRecord {
            temporal_id: "tmp-legacy-3".to_string(),
            id: bunki::persist::PersistedId::Text("abc".to_string()),
        },
        AckRecord {
            temporal_id: "tmp-404".to_string(),
            id: bunki::persist::PersistedId::Number(1),
        },
    ];

    assert_eq!(apply_acknowledgements(&mut graph, &acks), 1);
    assert!(graph.resolve("abc").is_some());
    assert!(graph.resolve("1").is_none());
}

#[test]
fn test_acknowledgement_for_deleted_node_is_skipped() {
    let mut graph = QuestionGraph::new();
    let gone = graph.add_node(QuestionKind::ShortText, serde_json::json!({}), Group::Normal);
    graph.remove_node(gone);

    assert_eq!(graph.acknowledge_all([(gone, DurableId::from(9))]), 0);
    assert!(graph.identity().is_empty());
}

#[test]
fn test_stored_temporal_ids_resolve_to_their_own_node() {
    // The previous session saved A as tmp-0 and B as tmp-1; storage now
    // lists B first, so a naive numbering would hand B the id tmp-0.
    let mut b = persisted_node(Some(7), "short_text", 1, "B");
    b.temporal_id = Some("tmp-1".to_string());
    let mut a = persisted_node(Some(5), "single_choice", 0, "A");
    a.temporal_id = Some("tmp-0".to_string());
    a.conditions.push(goto_rule("yes", "tmp-1"));
    let graph = load_graph(FormDefinition { nodes: vec![b, a] });

    let b_local = local_of(&graph, "7");
    let a_local = local_of(&graph, "5");
    assert_eq!(graph.resolve("tmp-1").map(|n| n.local_id()), Some(b_local));
    assert_eq!(graph.resolve("tmp-0").map(|n| n.local_id()), Some(a_local));
    assert!(graph.dangling_references().is_empty());

    let saved = Serializer::new(&graph).get_serializable(a_local);
    assert_eq!(saved[0].action_value, "7");
}

#[test]
fn test_stale_local_reference_never_binds_to_a_new_node() {
    let mut a = persisted_node(Some(5), "single_choice", 0, "A");
    a.conditions.push(goto_rule("yes", "tmp-3"));
    let mut graph = load_graph(FormDefinition { nodes: vec![a] });

    for _ in 0..5 {
        graph.add_node(QuestionKind::ShortText, serde_json::json!({}), Group::Normal);
    }
    assert!(graph.resolve("tmp-3").is_none());
    assert_eq!(graph.dangling_references().len(), 1);

    let a_local = local_of(&graph, "5");
    let saved = Serializer::new(&graph).get_serializable(a_local);
    assert_eq!(saved[0].action_value, "tmp-3");
}

#[test]
fn test_conflicting_acknowledgements_keep_first_registration() {
    let mut graph = QuestionGraph::new();
    let a = graph.add_node(QuestionKind::Email, serde_json::json!({}), Group::Normal);
    let b = graph.add_node(QuestionKind::Email, serde_json::json!({}), Group::Normal);

    let applied = graph.acknowledge_all([(a, DurableId::from(9)), (b, DurableId::from(9))]);
    assert_eq!(applied, 1);
    assert_eq!(graph.identity().conflicts().len(), 1);
    assert_eq!(graph.identity().durable_for(b), None);
    assert_eq!(graph.resolve("9").map(|n| n.local_id()), Some(a));

    let saved = Serializer::new(&graph).serialize();
    let ids: Vec<Option<PersistedId>> = saved.nodes.into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![Some(PersistedId::Number(9)), None]);
}
