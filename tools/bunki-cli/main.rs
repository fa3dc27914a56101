use bunki::prelude::*;
use bunki::persist::PersistedId;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;

// --- JSON Deserialization Structs (Builder Export Format) ---
// These structs match the builder's raw export and are only used here for conversion.

#[derive(Deserialize)]
struct RawExport {
    questions: Vec<RawQuestion>,
}

#[derive(Deserialize)]
struct RawQuestion {
    #[serde(default, alias = "ID")]
    id: Option<PersistedId>,
    #[serde(default, alias = "temporalId")]
    temporal_id: Option<String>,
    #[serde(alias = "questionType")]
    question_type: String,
    #[serde(default, alias = "menuOrder")]
    menu_order: Option<i64>,
    #[serde(default)]
    settings: serde_json::Value,
    #[serde(default)]
    conditions: Vec<RawCondition>,
}

#[derive(Deserialize)]
struct RawCondition {
    #[serde(default, alias = "conditionType")]
    condition_type: String,
    #[serde(default, alias = "conditionValue")]
    condition_value: String,
    #[serde(default, alias = "actionType")]
    action_type: String,
    #[serde(default, alias = "actionValue")]
    action_value: String,
    #[serde(default, alias = "variableOperation")]
    variable_operation: String,
    #[serde(default, alias = "variableAmount")]
    variable_amount: Option<Scalar>,
    #[serde(default, alias = "comparisonValue")]
    comparison_value: Scalar,
}

/// Which JSON shape the input file uses.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// `{ "nodes": [...] }` as produced by the serializer
    Canonical,
    /// `{ "questions": [...] }` builder export with camelCase keys
    Raw,
}

// --- Converter Implementation ---

impl IntoForm for RawExport {
    fn into_form(self) -> std::result::Result<FormDefinition, PersistError> {
        let nodes = self
            .questions
            .into_iter()
            .map(|q| {
                if q.question_type.trim().is_empty() {
                    return Err(PersistError::Conversion(
                        "question without a questionType".to_string(),
                    ));
                }
                Ok(PersistedNode {
                    id: q.id,
                    temporal_id: q.temporal_id,
                    kind: q.question_type.into(),
                    order: q.menu_order,
                    payload: q.settings,
                    conditions: q
                        .conditions
                        .into_iter()
                        .map(|c| PersistedRule {
                            condition_type: c.condition_type,
                            condition_value: c.condition_value,
                            action_type: c.action_type,
                            action_value: c.action_value,
                            variable_operation: c.variable_operation,
                            variable_amount: c
                                .variable_amount
                                .unwrap_or_else(|| Scalar::Number(0.into())),
                            comparison_value: c.comparison_value,
                        })
                        .collect(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(FormDefinition { nodes })
    }
}

/// Inspect and normalize branching rules of a multi-step form
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the form JSON file
    form_path: Option<String>,

    /// Input shape of the form file
    #[arg(short, long, value_enum, default_value = "canonical")]
    format: InputFormat,

    /// Optional editor configuration JSON
    #[arg(short, long)]
    config: Option<String>,

    /// Write the normalized save payload to this path
    #[arg(short, long)]
    normalize: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.human {
        run_interactive();
    } else {
        let form_path = cli.form_path.unwrap_or_else(|| {
            exit_with_error("Form path is required in non-interactive mode.");
        });
        run_inspection(form_path, cli.format, cli.config, cli.normalize);
    }
}

fn run_inspection(
    form_path: String,
    format: InputFormat,
    config_path: Option<String>,
    normalize_path: Option<String>,
) {
    let total_start = Instant::now();

    // --- 1. Configuration ---
    let config = match config_path {
        Some(path) => EditorConfig::from_file(&path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EditorConfig::default(),
    };

    // --- 2. Parsing and Conversion ---
    let load_start = Instant::now();
    let form = match format {
        InputFormat::Canonical => FormDefinition::from_file(&form_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load form: {}", e))),
        InputFormat::Raw => {
            let json = fs::read_to_string(&form_path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read form file '{}': {}", form_path, e))
            });
            let raw: RawExport = serde_json::from_str(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse export JSON: {}", e)));
            raw.into_form()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert export: {}", e)))
        }
    };

    let mut graph = QuestionGraph::with_config(config);
    let report = graph.load(form);
    let load_duration = load_start.elapsed();

    println!(
        "Loaded {} node(s), {} rule(s), {} durable id(s) in {:?}",
        report.nodes, report.rules, report.durable_ids, load_duration
    );
    if report.conflicts > 0 {
        println!("  -> {} identity conflict(s); first registration kept", report.conflicts);
    }

    // --- 3. Listing ---
    for group in [Group::Normal, Group::Terminal] {
        let ids = graph.group_ids(group);
        if ids.is_empty() {
            continue;
        }
        println!("\n--- {} nodes ---", group);
        for node in ids.iter().filter_map(|id| graph.node(*id)) {
            let durable = node
                .durable_id()
                .map_or_else(|| "new".to_string(), |d| format!("id {}", d));
            println!(
                "[{:>4}] {} ({}, {})",
                node.order(),
                bunki::describe::node_label(&graph, node),
                node.local_id(),
                durable
            );
            for record in node.conditions().iter() {
                println!("       {}  {}", record.id(), RuleFormatter::describe(&graph, record));
                for issue in record.issues() {
                    println!("         ! {:?}", issue);
                }
            }
        }
    }

    let dangling = graph.dangling_references();
    if !dangling.is_empty() {
        println!("\n--- Unresolved goto targets ---");
        for (condition, reference) in &dangling {
            println!("  -> {} points at '{}', which is not in this form", condition, reference);
        }
    }

    // --- 4. Normalized output ---
    if let Some(out) = normalize_path {
        let saved = Serializer::new(&graph).serialize();
        saved
            .save(&out)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", out, e)));
        println!("\n  -> Wrote normalized form to '{}'", out);
    }

    println!("\nTotal Execution: {:?}", total_start.elapsed());
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() {
    println!("--- Bunki Interactive Mode ---");

    let form_path = prompt_for_input("Enter form path", Some("data/form.json"));
    let format = loop {
        let choice = prompt_for_input("Input format (1: canonical, 2: raw export)", Some("1"));
        match choice.trim() {
            "1" => break InputFormat::Canonical,
            "2" => break InputFormat::Raw,
            _ => println!("Invalid choice. Please enter 1 or 2."),
        }
    };
    let normalize = prompt_for_input("Write normalized output to (optional)", None);
    let normalize = if normalize.is_empty() {
        None
    } else {
        Some(normalize)
    };

    run_inspection(form_path, format, None, normalize);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if io::stdout().flush().is_err() || io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read from the terminal");
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
