//! CLI entry point for `mailpred`.
//!
//! Plays the role of the host: evaluates one exported predicate against
//! one file and reports the boolean result (exit code 0 for a match,
//! 1 for no match).

use clap::{CommandFactory, Parser, Subcommand};

use mailpred::extension;
use mailpred::Evaluator;

#[derive(Parser)]
#[command(name = "mailpred", version, about = extension::EXTENSION_DESCRIPTION)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a predicate against a file
    Eval {
        /// Predicate name (see `list`)
        predicate: String,
        /// Email file or mbox archive
        file: String,
        /// Extra string arguments for the predicate
        args: Vec<String>,
        /// Print a JSON object instead of true/false
        #[arg(long)]
        json: bool,
    },
    /// List the exported predicates
    List {
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Command::Eval {
            predicate,
            file,
            args,
            json,
        } => cmd_eval(&predicate, &file, &args, json),
        Command::List { json } => cmd_list(json),
        Command::Completions { shell } => cmd_completions(shell),
        Command::Manpage => cmd_manpage(),
    }
}

/// Set up tracing on stderr; `RUST_LOG` overrides the verbosity flags.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Evaluate one predicate and exit 0 (match) or 1 (no match).
fn cmd_eval(predicate: &str, file: &str, args: &[String], json: bool) -> anyhow::Result<()> {
    let export = extension::find_export(predicate).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown predicate '{}'. Run `mailpred list` for the export table.",
            predicate
        )
    })?;

    if args.len() != export.extra_args {
        anyhow::bail!(
            "'{}' takes {} argument(s) after the file path, got {}",
            export.name,
            export.extra_args,
            args.len()
        );
    }

    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let mut evaluator = Evaluator::new();
    let result = (export.call)(&mut evaluator, file, &arg_refs);

    if json {
        let output = serde_json::json!({
            "predicate": export.name,
            "file": file,
            "args": args,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{result}");
    }

    std::process::exit(if result { 0 } else { 1 });
}

/// Print the export table.
fn cmd_list(json: bool) -> anyhow::Result<()> {
    if json {
        let items: Vec<serde_json::Value> = extension::exports()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "extra_args": e.extra_args,
                })
            })
            .collect();
        let output = serde_json::json!({
            "name": extension::EXTENSION_NAME,
            "version": extension::EXTENSION_VERSION,
            "description": extension::EXTENSION_DESCRIPTION,
            "exports": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {} — {}",
            extension::EXTENSION_NAME,
            extension::EXTENSION_VERSION,
            extension::EXTENSION_DESCRIPTION
        );
        println!();
        for export in extension::exports() {
            println!("  {:<22} <file> + {} arg(s)", export.name, export.extra_args);
        }
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailpred", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
