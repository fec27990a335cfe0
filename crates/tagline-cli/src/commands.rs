//! Command implementations for tagline-cli

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tagline_core::{Document, Rewrite, unified_diff};

use crate::error::Result;
use crate::rules::{RuleSet, as_dyn};

/// A tagged line as reported by `tagline tags`.
#[derive(Debug, Serialize)]
struct TaggedLine<'a> {
    line: usize,
    tags: Vec<&'a str>,
    content: &'a str,
}

/// Open `file` and scan it with every rule.
pub fn load_document(file: &Path, rules: &RuleSet) -> Result<Document> {
    let classifiers = rules.classifiers()?;
    let mut doc = Document::open(file)?;
    doc.scan(&as_dyn(&classifiers))?;
    Ok(doc)
}

/// Run the tags command
pub fn run_tags(doc: &Document, json: bool) -> Result<()> {
    let tagged: Vec<TaggedLine<'_>> = doc
        .lines()
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.tags.is_empty())
        .map(|(index, line)| {
            let mut tags: Vec<&str> = line.tags.iter().map(String::as_str).collect();
            tags.sort_unstable();
            TaggedLine {
                line: index + 1,
                tags,
                content: &line.content,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&tagged)?);
        return Ok(());
    }

    if tagged.is_empty() {
        println!("{} No tagged lines in {}", "=>".blue().bold(), doc.path().display());
        return Ok(());
    }

    for entry in &tagged {
        println!(
            "{:>5}  {}  {}",
            entry.line.to_string().yellow(),
            entry.tags.join(", ").cyan(),
            entry.content
        );
    }
    Ok(())
}

/// Print the diff a rewrite would make.
fn preview(doc: &Document, rewrite: &Rewrite) {
    let label = doc
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let diff = unified_diff(&label, &doc.snapshot_text(), &rewrite.text());

    if diff.is_empty() {
        println!("{} No changes.", "OK".green().bold());
        return;
    }

    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
}

fn report(verb: &str, count: usize, doc: &Document) {
    println!(
        "{} {} {} line(s) in {}",
        "OK".green().bold(),
        verb,
        count,
        doc.path().display()
    );
}

/// Run the insert command
pub fn run_insert(doc: &Document, tags: &[String], lines: &[String], dry_run: bool) -> Result<()> {
    let rewrite = doc.plan_insert(tags, lines);
    if dry_run {
        preview(doc, &rewrite);
        return Ok(());
    }

    doc.insert(tags, lines)?;
    report("Inserted", rewrite.changed, doc);
    Ok(())
}

/// Run the insert-between command
pub fn run_insert_between(
    doc: &Document,
    start: &str,
    end: &str,
    lines: &[String],
    unique: bool,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        let rewrite = if unique {
            doc.plan_insert_between_unique(start, end, lines)?
        } else {
            doc.plan_insert_between(start, end, lines)?
        };
        preview(doc, &rewrite);
        return Ok(());
    }

    let inserted = if unique {
        doc.insert_between_unique(start, end, lines)?
    } else {
        let rewrite = doc.plan_insert_between(start, end, lines)?;
        doc.insert_between(start, end, lines)?;
        rewrite.changed
    };
    report("Inserted", inserted, doc);
    Ok(())
}

/// Run the delete command
pub fn run_delete(doc: &Document, tags: &[String], dry_run: bool) -> Result<()> {
    if dry_run {
        preview(doc, &doc.plan_delete(tags));
        return Ok(());
    }

    let removed = doc.delete(tags)?;
    report("Deleted", removed, doc);
    Ok(())
}

/// Run the delete-between command
pub fn run_delete_between(doc: &Document, start: &str, end: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        preview(doc, &doc.plan_delete_between(start, end)?);
        return Ok(());
    }

    let removed = doc.delete_between(start, end)?;
    report("Deleted", removed, doc);
    Ok(())
}
