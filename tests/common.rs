//! Common test utilities for building forms and observing graph events.
use bunki::persist::PersistedId;
use bunki::prelude::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// A persisted rule `answer_equals <answer> -> goto_question <target>`.
#[allow(dead_code)]
pub fn goto_rule(answer: &str, target: &str) -> PersistedRule {
    PersistedRule {
        condition_type: "answer_equals".to_string(),
        condition_value: answer.to_string(),
        action_type: "goto_question".to_string(),
        action_value: target.to_string(),
        variable_operation: String::new(),
        variable_amount: Scalar::Number(0.into()),
        comparison_value: Scalar::Text(String::new()),
    }
}

/// A persisted node with a numeric durable id.
#[allow(dead_code)]
pub fn persisted_node(id: Option<u64>, kind: &str, order: i64, title: &str) -> PersistedNode {
    PersistedNode {
        id: id.map(PersistedId::Number),
        temporal_id: None,
        kind: kind.into(),
        order: Some(order),
        payload: json!({ "title": title }),
        conditions: vec![],
    }
}

/// Two saved steps: A (id 5) with a rule pointing at B (id 7).
///
/// Logic: `answer == "yes"` on A -> goto `"7"`
#[allow(dead_code)]
pub fn create_linked_form() -> FormDefinition {
    let mut a = persisted_node(Some(5), "single_choice", 0, "Do you like tea?");
    a.conditions.push(goto_rule("yes", "7"));
    let b = persisted_node(Some(7), "short_text", 1, "Which kind?");
    FormDefinition { nodes: vec![a, b] }
}

/// Three normal steps and two endings. The second step carries a variable
/// rule and a goto into the terminal group; the third is unsaved.
#[allow(dead_code)]
pub fn create_form_with_endings() -> FormDefinition {
    let welcome = persisted_node(Some(10), "welcome", 0, "Welcome");
    let mut quiz = persisted_node(Some(11), "rating", 1, "Rate us");
    quiz.conditions.push(PersistedRule {
        condition_type: "variable_greater".to_string(),
        condition_value: "score".to_string(),
        action_type: "add_variable".to_string(),
        action_value: "bonus".to_string(),
        variable_operation: "add".to_string(),
        variable_amount: Scalar::Number(5.into()),
        comparison_value: Scalar::Number(10.into()),
    });
    quiz.conditions.push(goto_rule("1", "20"));
    let mut draft = persisted_node(None, "email", 2, "Your email");
    draft.temporal_id = Some("tmp-legacy-3".to_string());

    let good = persisted_node(Some(20), "result", 1000, "Great result");
    let bad = persisted_node(Some(21), "result", 1001, "Try again");

    FormDefinition {
        nodes: vec![welcome, quiz, draft, good, bad],
    }
}

/// The linked form as backend JSON.
#[allow(dead_code)]
pub const LINKED_FORM_JSON: &str = r#"{
    "nodes": [
        {
            "id": 5,
            "kind": "single_choice",
            "order": 0,
            "payload": { "title": "Do you like tea?" },
            "conditions": [
                {
                    "condition_type": "answer_equals",
                    "condition_value": "yes",
                    "action_type": "goto_question",
                    "action_value": "7",
                    "variable_operation": "",
                    "variable_amount": 0,
                    "comparison_value": ""
                }
            ]
        },
        {
            "id": 7,
            "kind": "short_text",
            "order": 1,
            "payload": { "title": "Which kind?" },
            "conditions": []
        }
    ]
}"#;

/// Loads `form` into a fresh graph.
#[allow(dead_code)]
pub fn load_graph(form: FormDefinition) -> QuestionGraph {
    let mut graph = QuestionGraph::new();
    graph.load(form);
    graph
}

/// Local id of the node carrying `durable`.
#[allow(dead_code)]
pub fn local_of(graph: &QuestionGraph, durable: &str) -> LocalId {
    graph
        .identity()
        .local_for(durable)
        .unwrap_or_else(|| panic!("durable id '{}' is not registered", durable))
}

/// The `order` values of one group, in visual order.
#[allow(dead_code)]
pub fn orders(graph: &QuestionGraph, group: Group) -> Vec<i64> {
    graph
        .group_ids(group)
        .iter()
        .map(|id| graph.node(*id).expect("listed node exists").order())
        .collect()
}

/// Subscribes a recorder and returns the shared event log.
#[allow(dead_code)]
pub fn record_events(graph: &mut QuestionGraph) -> Rc<RefCell<Vec<GraphEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    graph.subscribe(move |_: &QuestionGraph, event: &GraphEvent| {
        sink.borrow_mut().push(event.clone());
    });
    log
}
