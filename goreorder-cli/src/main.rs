//! Command-line interface for goreorder
//!
//! Usage:
//!   goreorder reorder [options] [file.go|directory]   - Reorder a file, a tree, or stdin
//!   goreorder print-config [options]                 - Print the effective configuration
//!   goreorder completion `<shell>`                     - Print a shell completion script

mod logging;
mod walk;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use goreorder::{reorder_source, Order, ReorderConfig};
use goreorder_config::{GoreorderConfig, Loader};
use tracing::{debug, error, warn};

const STDIN_FILENAME: &str = "stdin.go";

fn option_args() -> Vec<Arg> {
    vec![
        Arg::new("format")
            .long("format")
            .short('f')
            .value_name("TOOL")
            .help("Formatter: builtin, gofmt, goimports or another executable"),
        Arg::new("diff-tool")
            .long("diff-tool")
            .value_name("TOOL")
            .help("Diff tool: diff or builtin"),
        Arg::new("write")
            .long("write")
            .short('w')
            .help("Write the result to the source file instead of stdout")
            .action(ArgAction::SetTrue),
        Arg::new("verbose")
            .long("verbose")
            .short('v')
            .help("Verbose output")
            .action(ArgAction::SetTrue),
        Arg::new("reorder-types")
            .long("reorder-types")
            .short('r')
            .help("Sort types alphabetically too")
            .action(ArgAction::SetTrue),
        Arg::new("diff")
            .long("diff")
            .short('d')
            .help("Print a unified diff instead of the reordered file")
            .conflicts_with("write")
            .action(ArgAction::SetTrue),
        Arg::new("order")
            .long("order")
            .short('o')
            .value_name("LIST")
            .help(
                "Categories to place first, comma separated; the others follow in the default \
                 order const,var,interface,type,func. init and main are sorted with the other \
                 functions unless listed",
            )
            .value_delimiter(',')
            .value_parser(value_parser!(Order))
            .action(ArgAction::Append),
        Arg::new("config")
            .long("config")
            .short('c')
            .value_name("FILE")
            .help("Configuration file to use instead of ./.goreorder")
            .value_parser(value_parser!(PathBuf)),
    ]
}

fn build_cli() -> Command {
    Command::new("goreorder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reorders the consts, vars, types, methods and functions of Go source files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("reorder")
                .about("Reorder a Go file, every Go file of a directory, or stdin")
                .args(option_args())
                .arg(
                    Arg::new("path")
                        .help("A .go file or a directory; stdin is read when omitted")
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("print-config")
                .about("Print the effective configuration as YAML")
                .args(option_args()),
        )
        .subcommand(
            Command::new("completion")
                .about("Print a shell completion script")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                        .index(1),
                ),
        )
}

fn main() {
    let mut cli = build_cli();
    let matches = cli.clone().get_matches();

    let result = match matches.subcommand() {
        Some(("reorder", sub)) => handle_reorder_command(sub),
        Some(("print-config", sub)) => handle_print_config_command(sub),
        Some(("completion", sub)) => handle_completion_command(&mut cli, sub),
        _ => Ok(()),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn given(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Defaults, project or explicit file, environment, then the flags actually given
fn load_config(matches: &ArgMatches) -> Result<GoreorderConfig, String> {
    let loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_project_file("."),
    };
    let mut loader = loader.with_env();

    for (id, key) in [("format", "format"), ("diff-tool", "diff-tool")] {
        if given(matches, id) {
            if let Some(value) = matches.get_one::<String>(id) {
                loader = loader
                    .set_override(key, value.as_str())
                    .map_err(|e| e.to_string())?;
            }
        }
    }
    for (id, key) in [
        ("write", "write"),
        ("verbose", "verbose"),
        ("reorder-types", "reorder-types"),
        ("diff", "diff"),
    ] {
        if given(matches, id) {
            loader = loader
                .set_override(key, matches.get_flag(id))
                .map_err(|e| e.to_string())?;
        }
    }
    if given(matches, "order") {
        let order: Vec<&str> = matches
            .get_many::<Order>("order")
            .into_iter()
            .flatten()
            .map(|order| order.as_str())
            .collect();
        loader = loader
            .set_override("order", order)
            .map_err(|e| e.to_string())?;
    }

    loader
        .build()
        .map_err(|e| format!("invalid configuration: {}", e))
}

/// Handle the reorder command
fn handle_reorder_command(matches: &ArgMatches) -> Result<(), String> {
    let settings = load_config(matches)?;
    logging::init(settings.verbose);
    if settings.write && settings.diff {
        warn!(target: "goreorder::cli", "diff output requested, files are not written");
    }

    let Some(path) = matches.get_one::<PathBuf>("path") else {
        if io::stdin().is_terminal() {
            return Err("provide a file or a directory, or pipe Go source to stdin".to_string());
        }
        let mut source = Vec::new();
        io::stdin()
            .read_to_end(&mut source)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        return process_file(&settings, Path::new(STDIN_FILENAME), Some(source), false);
    };

    if path.is_dir() {
        let files = walk::go_files(path);
        debug!(target: "goreorder::cli", dir = %path.display(), files = files.len(), "walking");
        let mut failed = 0;
        for file in &files {
            if let Err(message) = process_file(&settings, file, None, settings.write) {
                error!(target: "goreorder::cli", "{}", message);
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(format!("{} of {} files failed", failed, files.len()));
        }
        return Ok(());
    }

    if walk::is_test_file(path) {
        return Err(format!("{}: test files are not reordered", path.display()));
    }
    process_file(&settings, path, None, settings.write)
}

fn process_file(
    settings: &GoreorderConfig,
    path: &Path,
    source: Option<Vec<u8>>,
    write: bool,
) -> Result<(), String> {
    let config = ReorderConfig {
        filename: path.to_path_buf(),
        source,
        format_tool: settings.format.clone(),
        diff_tool: settings.diff_tool.clone(),
        reorder_types: settings.reorder_types,
        order: settings.requested_order(),
        diff: settings.diff,
    };
    let output = reorder_source(&config).map_err(|failure| failure.to_string())?;

    if write && !settings.diff {
        let current = fs::read_to_string(path).unwrap_or_default();
        if current == output {
            debug!(target: "goreorder::cli", file = %path.display(), "already ordered");
            return Ok(());
        }
        fs::write(path, output).map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        debug!(target: "goreorder::cli", file = %path.display(), "rewritten");
    } else {
        print!("{}", output);
    }
    Ok(())
}

/// Handle the print-config command
fn handle_print_config_command(matches: &ArgMatches) -> Result<(), String> {
    let settings = load_config(matches)?.with_effective_order();
    let yaml = settings
        .to_yaml()
        .map_err(|e| format!("cannot render configuration: {}", e))?;
    print!("{}", yaml);
    Ok(())
}

/// Handle the completion command
fn handle_completion_command(cli: &mut Command, matches: &ArgMatches) -> Result<(), String> {
    let shell = matches
        .get_one::<Shell>("shell")
        .copied()
        .ok_or_else(|| "shell type required".to_string())?;
    clap_complete::generate(shell, cli, "goreorder", &mut io::stdout());
    Ok(())
}
