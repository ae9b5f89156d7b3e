//! Template Duality CLI
//!
//! Usage:
//!   template-duality [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --table <FILE>        Directive table (TOML format)
//!   -r, --record              Print the template record as TOML
//!   -c, --check               Report directives that would become UNKNOWN placeholders
//!   -i, --insert              Resolve the template for insertion
//!   --engine-cmd <PROGRAM>    Dynamic engine command used by --insert
//!   --syntax                  Show directive and placeholder syntax
//!   -v, --verbose             Debug logging
//!   -h, --help                Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use template_duality::{
    build_with_table, check, resolve, CommandEngine, DirectiveTable, DynamicEngine, EngineError,
    Notifier,
};

#[derive(Parser)]
#[command(name = "template-duality")]
#[command(about = "Dynamic templates with a static placeholder fallback")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Directive table file (TOML format)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Print the template record as TOML
    #[arg(short, long)]
    record: bool,

    /// Report directives that would become UNKNOWN placeholders
    #[arg(short, long)]
    check: bool,

    /// Resolve the template for insertion
    #[arg(short, long)]
    insert: bool,

    /// Dynamic engine command; the engine counts as available only when set
    #[arg(long, value_name = "PROGRAM")]
    engine_cmd: Option<String>,

    /// Show directive and placeholder syntax
    #[arg(long)]
    syntax: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Prints notices to stderr
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("notice: {}", message);
    }
}

/// Stands in when no engine command is configured; never executed
struct NoEngine;

impl DynamicEngine for NoEngine {
    fn execute(&self, _dynamic_content: &str) -> Result<String, EngineError> {
        Err(EngineError::execution("no engine configured"))
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.syntax {
        print_syntax();
        return;
    }

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let table = match &cli.table {
        Some(path) => match DirectiveTable::from_file(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading directive table '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => DirectiveTable::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    if cli.check {
        let diagnostics = check(&source, &table);
        for diagnostic in &diagnostics {
            eprint!("{}", diagnostic.format(&source, &filename));
        }
        if !diagnostics.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    let id = cli
        .input
        .as_ref()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string());
    let record = build_with_table(id, source, &table);

    if cli.record {
        match toml::to_string(&record) {
            Ok(encoded) => print!("{}", encoded),
            Err(e) => {
                eprintln!("Error encoding template record: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.insert {
        let result = match &cli.engine_cmd {
            Some(program) => resolve(&record, true, &CommandEngine::new(program), &StderrNotifier),
            None => resolve(&record, false, &NoEngine, &StderrNotifier),
        };
        print!("{}", result.final_text);
        for span in &result.placeholder_positions {
            eprintln!(
                "placeholder {}..{}: {}",
                span.start,
                span.end,
                &result.final_text[span.clone()]
            );
        }
        return;
    }

    print!("{}", record.static_content);
}

fn print_intro() {
    println!(
        r#"Template Duality - dynamic templates with a static placeholder fallback

USAGE:
    template-duality [OPTIONS] [FILE]
    cat daily.md | template-duality

OPTIONS:
    -r, --record            Print the template record as TOML
    -c, --check             Report directives that would become UNKNOWN placeholders
    -i, --insert            Resolve for insertion (static unless --engine-cmd is set)
    --engine-cmd <PROGRAM>  Dynamic engine: template on stdin, result on stdout
    -t, --table <FILE>      Custom directive table (TOML)
    --syntax                Show directive and placeholder syntax
    -v, --verbose           Debug logging
    -h, --help              Print help

QUICK START:
    echo 'Mood: <% tp.system.prompt("Mood", "ok") %>' | template-duality

prints the static version: Mood: [[PROMPT: Mood (default: ok)]]"#
    );
}

const SYNTAX_HELP: &str = r#"DIRECTIVES
==========
<% path.to.function(arg, ...) %>    Call; string arguments in "..." or '...'
<% path.to.value %>                 Value without arguments
<%* if (...) { %> ... <%* } %>      Conditional block
<%_ ... _%>  <%- ... -%>            Whitespace control (markers only)

Default directive table (roots: tp):
    tp.date.*                       DATE
    tp.system.prompt, suggester     PROMPT
    tp.system.clipboard             SYSTEM_INFO
    tp.file.*, tp.frontmatter.*     SYSTEM_INFO
    tp.config.*                     SYSTEM_INFO
    if / else / for / while / switch, bare }   CONDITIONAL
    anything else                   OTHER

PLACEHOLDERS
============
DATE          [[DATE: <format or "format">]]
PROMPT        [[PROMPT: <label> (default: <default or "none">)]]
SYSTEM_INFO   [[SYSTEM: <first argument or "info">]]
CONDITIONAL   [[CONDITIONAL: <directive text>]]
OTHER         [[UNKNOWN: <directive text>]]

DIRECTIVE TABLE FILE
====================
roots = ["tp"]
conditionals = ["if", "else"]

[paths]
"date" = "date"
"system.prompt" = "prompt"
"web" = "system_info""#;

fn print_syntax() {
    println!("{}", SYNTAX_HELP);
}
