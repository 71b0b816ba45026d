use std::io::Write;

use owo_colors::OwoColorize;

use citelink_content::{LinkOutcome, ReferenceKind};
use citelink_core::{Bibliography, ContentTree};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn kind_name(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Numeric => "numeric",
        ReferenceKind::NameYear => "name-year",
    }
}

/// Print the per-document linking summary.
pub fn print_summary(
    w: &mut dyn Write,
    tree: &ContentTree,
    bibliography: &Bibliography,
    outcome: &LinkOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(
        w,
        "Detected style: {} citations in {:?} brackets",
        kind_name(outcome.style.kind),
        outcome.style.bracket
    )?;
    writeln!(
        w,
        "Structure: {} sections, {} paragraphs, {} end references",
        tree.heading_count(),
        tree.paragraph_count(),
        bibliography.len()
    )?;

    let stats = &outcome.stats;
    let resolved_line = format!(
        "Resolved {} of {} candidates ({} unresolved, {} false positives, {} invalid spans)",
        stats.resolved,
        stats.candidates,
        stats.unresolved,
        stats.false_positives,
        stats.invalid_spans
    );
    if color.enabled() && stats.resolved > 0 {
        writeln!(w, "{}", resolved_line.green())?;
    } else if color.enabled() {
        writeln!(w, "{}", resolved_line.dimmed())?;
    } else {
        writeln!(w, "{resolved_line}")?;
    }
    Ok(())
}

/// Print every resolved in-text reference with its cited entries.
pub fn print_references(
    w: &mut dyn Write,
    tree: &ContentTree,
    bibliography: &Bibliography,
    color: ColorMode,
) -> std::io::Result<()> {
    for (paragraph_id, reference) in tree.all_references() {
        let text = &tree.paragraph(paragraph_id).text;
        let cited = &text[reference.start..reference.end];
        let rids: Vec<&str> = reference
            .entries
            .iter()
            .filter_map(|&id| bibliography.get(id))
            .map(|entry| entry.id())
            .collect();
        if color.enabled() {
            writeln!(w, "  {} -> {}", cited.bold(), rids.join(" ").cyan())?;
        } else {
            writeln!(w, "  {} -> {}", cited, rids.join(" "))?;
        }
    }
    Ok(())
}
