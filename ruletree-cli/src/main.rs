//! Command-line interface for ruletree
//! Tokenizes a text file with a rule file and prints the resulting tree or token stream.
//!
//! Usage:
//!   ruletree `<path>` --rules `<rules>` [--config `<toml>`] [--format `<format>`]
//!   ruletree --list-formats
//!
//! `<path>` may be `-` to read standard input. Set `RUST_LOG=ruletree=debug` for build logs.

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command};
use ruletree::ruletree::loader::DocumentLoader;
use ruletree::RuleSet;
use ruletree_config::{Loader, RuletreeConfig, ValueKind};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let matches = Command::new("ruletree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build a tree from text using ordered tokenizer rules")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the input text, or '-' for standard input")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .short('r')
                .help("Rule file (.json, .yaml or .yml)")
                .required_unless_present("list-formats"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from config: json)"),
        )
        .arg(
            Arg::new("strict-close")
                .long("strict-close")
                .help("Reject closing tokens whose first param differs from the opening one")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-loc")
                .long("show-loc")
                .help("Append source locations to treeviz output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    if let Err(message) = handle_execute_command(&matches) {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the execute command
fn handle_execute_command(matches: &ArgMatches) -> Result<(), String> {
    let config = load_cli_config(matches)?;

    let (Some(path), Some(rules_path)) = (
        matches.get_one::<String>("path"),
        matches.get_one::<String>("rules"),
    ) else {
        return Err("both <path> and --rules are required".to_string());
    };

    let rules = RuleSet::from_path(rules_path)
        .map_err(|e| format!("Failed to load rules from {rules_path}: {e}"))?;
    tracing::debug!(rules = rules.len(), path = %rules_path, "loaded rules");

    let loader = if path == "-" {
        DocumentLoader::from_stdin()
    } else {
        DocumentLoader::from_path(path)
    }
    .map_err(|e| format!("Failed to read {path}: {e}"))?;

    let settings = transforms::TransformSettings {
        options: config.build_options(),
        show_loc: config.output.show_loc,
    };
    let output =
        transforms::execute_transform(&loader, &rules, &config.output.format, &settings)?;

    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
    Ok(())
}

/// Layer the optional config file and the command-line flags over the defaults
fn load_cli_config(matches: &ArgMatches) -> Result<RuletreeConfig, String> {
    let mut overrides: Vec<(&str, ValueKind)> = Vec::new();
    if let Some(format) = matches.get_one::<String>("format") {
        overrides.push(("output.format", format.as_str().into()));
    }
    if matches.get_flag("strict-close") {
        overrides.push(("build.close_matching", "strict".into()));
    }
    if matches.get_flag("show-loc") {
        overrides.push(("output.show_loc", true.into()));
    }

    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader
        .set_overrides(overrides)
        .and_then(Loader::build)
        .map_err(|e| format!("Failed to load configuration: {e}"))
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    for (name, description) in transforms::available_transforms() {
        println!("  {name:<16} {description}");
    }
}
