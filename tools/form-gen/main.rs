use bunki::prelude::*;
use bunki::persist::PersistedId;
use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;

/// A CLI tool to generate random forms with cross-referencing rules
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_form.json")]
    output: String,

    /// Number of normal steps
    #[arg(long, default_value_t = 8)]
    steps: usize,

    /// Number of terminal (result) steps
    #[arg(long, default_value_t = 2)]
    endings: usize,

    /// The maximum number of rules per step
    #[arg(long, default_value_t = 3)]
    max_rules: usize,

    /// Percentage of steps that are already persisted (carry a durable id)
    #[arg(long, default_value_t = 70)]
    persisted: u32,
}

const KINDS: [QuestionKind; 6] = [
    QuestionKind::SingleChoice,
    QuestionKind::MultipleChoice,
    QuestionKind::ShortText,
    QuestionKind::Number,
    QuestionKind::Rating,
    QuestionKind::Email,
];

const VARIABLES: [&str; 3] = ["score", "tier", "attempts"];

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.steps == 0 {
        eprintln!("Error: --steps must be at least 1");
        std::process::exit(1);
    }
    if cli.persisted > 100 {
        eprintln!("Error: --persisted ({}) must be a percentage", cli.persisted);
        std::process::exit(1);
    }

    println!(
        "Generating form ({} steps, {} endings, up to {} rules per step)...",
        cli.steps, cli.endings, cli.max_rules
    );

    let total = cli.steps + cli.endings;
    let ids: Vec<Option<u64>> = (0..total)
        .map(|i| (rng.random_range(0..100) < cli.persisted).then_some(100 + i as u64))
        .collect();
    let references: Vec<String> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| id.map_or_else(|| format!("legacy-{}", i), |d| d.to_string()))
        .collect();

    let mut nodes = Vec::with_capacity(total);
    for i in 0..total {
        let terminal = i >= cli.steps;
        let kind = if i == 0 {
            QuestionKind::Welcome
        } else if terminal {
            QuestionKind::Result
        } else {
            KINDS[rng.random_range(0..KINDS.len())].clone()
        };
        let order = if terminal {
            1000 + (i - cli.steps) as i64
        } else {
            i as i64
        };
        let rule_count = if terminal { 0 } else { rng.random_range(0..=cli.max_rules) };
        let conditions = (0..rule_count)
            .map(|_| generate_rule(&mut rng, &references, i))
            .collect();

        nodes.push(PersistedNode {
            id: ids[i].map(PersistedId::Number),
            temporal_id: ids[i].is_none().then(|| format!("legacy-{}", i)),
            kind,
            order: Some(order),
            payload: json!({ "title": format!("Step {}", i + 1) }),
            conditions,
        });
    }

    let form = FormDefinition { nodes };
    form.save(&cli.output)?;

    println!(
        "Successfully generated and saved form with {} node(s) to '{}'",
        total, cli.output
    );
    Ok(())
}

/// Builds one random rule; goto targets point at any step other than `owner`.
fn generate_rule(rng: &mut ThreadRng, references: &[String], owner: usize) -> PersistedRule {
    let predicate = PredicateType::ALL[rng.random_range(0..PredicateType::ALL.len())];
    let action = ActionType::ALL[rng.random_range(0..ActionType::ALL.len())];

    let (condition_value, comparison_value) = if predicate.is_variable() {
        let variable = VARIABLES[rng.random_range(0..VARIABLES.len())];
        let comparison = if rng.random_bool(0.8) {
            Scalar::Number(rng.random_range(0..50i64).into())
        } else {
            Scalar::Text("gold".to_string())
        };
        (variable.to_string(), comparison)
    } else {
        let answers = ["yes", "no", "maybe"];
        (
            answers[rng.random_range(0..answers.len())].to_string(),
            Scalar::Text(String::new()),
        )
    };

    let (action_value, variable_operation, amount) = match action {
        ActionType::GotoQuestion => {
            let mut target = rng.random_range(0..references.len());
            if target == owner {
                target = (target + 1) % references.len();
            }
            (references[target].clone(), String::new(), 0i64)
        }
        ActionType::SkipToEnd => (String::new(), String::new(), 0),
        ActionType::RedirectUrl => ("https://example.com/thanks".to_string(), String::new(), 0),
        ActionType::ShowMessage => ("Almost there!".to_string(), String::new(), 0),
        ActionType::AddVariable => (
            VARIABLES[0].to_string(),
            "add".to_string(),
            rng.random_range(1..10),
        ),
        ActionType::SetVariable => (
            VARIABLES[1].to_string(),
            "set".to_string(),
            rng.random_range(0..5),
        ),
    };

    PersistedRule {
        condition_type: predicate.as_str().to_string(),
        condition_value,
        action_type: action.as_str().to_string(),
        action_value,
        variable_operation,
        variable_amount: Scalar::Number(amount.into()),
        comparison_value,
    }
}
