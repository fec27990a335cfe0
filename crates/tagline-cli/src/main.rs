//! tagline CLI
//!
//! Scans a text file with tagging rules and edits it at the tagged lines.

mod cli;
mod commands;
mod error;
mod logging;
mod rules;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;
use rules::RuleSet;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(command = ?cli.command, "Starting tagline");

    let mut rules = match &cli.rules {
        Some(path) => RuleSet::load(path)?,
        None => RuleSet::default(),
    };
    for rule in &cli.matches {
        rules.push_inline(rule)?;
    }

    let doc = commands::load_document(cli.command.file(), &rules)?;
    execute_command(&doc, cli.command)
}

fn execute_command(doc: &tagline_core::Document, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Tags { json, .. } => commands::run_tags(doc, json),
        Commands::Insert {
            tags,
            lines,
            dry_run,
            ..
        } => commands::run_insert(doc, &tags, &lines, dry_run),
        Commands::InsertBetween {
            start,
            end,
            lines,
            unique,
            dry_run,
            ..
        } => commands::run_insert_between(doc, &start, &end, &lines, unique, dry_run),
        Commands::Delete { tags, dry_run, .. } => commands::run_delete(doc, &tags, dry_run),
        Commands::DeleteBetween {
            start,
            end,
            dry_run,
            ..
        } => commands::run_delete_between(doc, &start, &end, dry_run),
    }
}
