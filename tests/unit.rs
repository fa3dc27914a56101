//! Unit tests for ids, configuration, kinds and rule descriptions.
mod common;
use bunki::prelude::*;
use common::*;
use rstest::rstest;
use serde_json::json;

#[test]
fn test_local_id_display_and_parse() {
    let id: LocalId = "tmp-12".parse().expect("valid local id");
    assert_eq!(id.raw(), 12);
    assert_eq!(id.to_string(), "tmp-12");

    assert_eq!("12".parse::<LocalId>(), Err(IdError::NotLocal("12".to_string())));
    assert!("tmp-".parse::<LocalId>().is_err());
    assert!("tmp-x1".parse::<LocalId>().is_err());
}

#[test]
fn test_condition_id_display_and_parse() {
    let owner: LocalId = "tmp-4".parse().expect("valid local id");
    let id = ConditionId::new(owner, 2);
    assert_eq!(id.to_string(), "tmp-4-c2");
    assert_eq!("tmp-4-c2".parse::<ConditionId>(), Ok(id));
    assert!("tmp-4".parse::<ConditionId>().is_err());
    assert!("7-c1".parse::<ConditionId>().is_err());
}

#[test]
fn test_durable_id_rules() {
    assert_eq!(DurableId::new(""), Err(IdError::Empty));
    assert_eq!(DurableId::new("  "), Err(IdError::Empty));
    let id = DurableId::new(" 42 ").expect("non-empty");
    assert_eq!(id.as_str(), "42");
    assert_eq!(id.as_number(), Some(42));
    assert_eq!(DurableId::from(7).to_string(), "7");
    assert_eq!(DurableId::new("post-1").map(|d| d.as_number()), Ok(None));

    assert!(serde_json::from_str::<DurableId>(r#""""#).is_err());
    assert_eq!(
        serde_json::to_string(&DurableId::from(9)).expect("serializable"),
        r#""9""#
    );
}

#[test]
fn test_editor_config_defaults_and_validation() {
    let config = EditorConfig::default();
    assert_eq!(config.terminal_order_base, 1000);
    assert!(config.normalize_comparisons);
    assert!(config.exclude_owner_from_targets);

    assert_eq!(EditorConfig::from_json("{}").expect("empty config is valid"), config);
    assert!(matches!(
        EditorConfig::from_json(r#"{ "terminal_order_base": 0 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        EditorConfig::from_json(r#"{ "terminal_order_base": "high" }"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        EditorConfig::from_file("/definitely/not/here.json"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_normalization_can_be_disabled() {
    let config = EditorConfig::from_json(r#"{ "normalize_comparisons": false }"#).expect("valid");
    let mut graph = QuestionGraph::with_config(config);
    let node = graph.add_node(QuestionKind::Number, json!({}), Group::Normal);
    let rule = graph.add_condition(node).expect("node exists");
    graph.change_predicate_type(rule, PredicateType::VariableLess);
    graph
        .condition_mut(rule)
        .expect("rule exists")
        .set_comparison_value("42");

    let saved = Serializer::new(&graph).get_serializable(node);
    assert_eq!(saved[0].comparison_value, Scalar::Text("42".to_string()));
}

#[rstest]
#[case("single_choice", QuestionKind::SingleChoice)]
#[case("result", QuestionKind::Result)]
#[case("welcome", QuestionKind::Welcome)]
#[case("nps_scale", QuestionKind::Other("nps_scale".to_string()))]
fn test_question_kind_names(#[case] name: &str, #[case] kind: QuestionKind) {
    assert_eq!(QuestionKind::from(name), kind);
    assert_eq!(kind.as_str(), name);
    assert_eq!(
        serde_json::to_value(&kind).expect("serializable"),
        json!(name)
    );
}

#[rstest]
#[case("answer_equals", Some(PredicateType::AnswerEquals))]
#[case("VARIABLE_GREATER", Some(PredicateType::VariableGreater))]
#[case(" variable_less ", Some(PredicateType::VariableLess))]
#[case("answer_matches", None)]
fn test_predicate_type_parse(#[case] name: &str, #[case] expected: Option<PredicateType>) {
    assert_eq!(PredicateType::parse(name), expected);
}

#[test]
fn test_wire_names_round_trip() {
    for kind in PredicateType::ALL {
        assert_eq!(PredicateType::parse(kind.as_str()), Some(kind));
    }
    for kind in ActionType::ALL {
        assert_eq!(ActionType::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(ActionType::parse("variable"), None);
}

#[test]
fn test_error_messages() {
    let id: LocalId = "tmp-3".parse().expect("valid local id");
    assert_eq!(
        GraphError::NodeNotFound(id).to_string(),
        "Node 'tmp-3' does not exist in the question graph"
    );
    assert_eq!(
        GraphError::InvalidPermutation {
            group: Group::Terminal,
            expected: 2,
            found: 1
        }
        .to_string(),
        "Proposed order for the terminal group is not a permutation of its 2 node(s) (got 1)"
    );
}

#[test]
fn test_node_labels() {
    let graph = load_graph(create_form_with_endings());
    let labels: Vec<String> = graph
        .nodes()
        .map(|n| bunki::describe::node_label(&graph, n))
        .collect();
    assert_eq!(
        labels,
        vec!["#1 Welcome", "#2 Rate us", "#3 Your email", "End 1 Great result", "End 2 Try again"]
    );

    let mut graph = QuestionGraph::new();
    let untitled = graph.add_node(QuestionKind::MultipleChoice, json!({ "title": "  " }), Group::Normal);
    let node = graph.node(untitled).expect("node exists");
    assert_eq!(bunki::describe::node_label(&graph, node), "#1 Multiple choice");
}

#[test]
fn test_rule_formatter() {
    let mut graph = load_graph(create_form_with_endings());
    let quiz = local_of(&graph, "11");
    let ids = graph.node(quiz).expect("quiz exists").conditions().ids();
    let describe = |graph: &QuestionGraph, id: ConditionId| {
        RuleFormatter::describe(graph, graph.condition(id).expect("rule exists"))
    };

    assert_eq!(
        describe(&graph, ids[0]),
        "If variable \"score\" > 10 then add 5 to \"bonus\""
    );
    assert_eq!(
        describe(&graph, ids[1]),
        "If answer = \"1\" then go to End 1 Great result"
    );

    let rule = graph.add_condition(quiz).expect("quiz exists");
    assert_eq!(
        describe(&graph, rule),
        "If answer = \"\" then go to <no target>"
    );

    graph.change_predicate_type(rule, PredicateType::VariableEquals);
    graph.change_action_type(rule, ActionType::SetVariable);
    let record = graph.condition_mut(rule).expect("rule exists");
    record.set_variable_name("tier");
    record.set_comparison_value("gold");
    record.set_action_variable("level");
    record.set_action_amount(2.5);
    assert_eq!(
        describe(&graph, rule),
        "If variable \"tier\" = \"gold\" then set \"level\" to 2.5"
    );

    graph.change_action_type(rule, ActionType::SkipToEnd);
    assert_eq!(
        describe(&graph, rule),
        "If variable \"tier\" = \"gold\" then skip to end"
    );
}
