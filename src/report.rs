//! Console rendering of combine outcomes.

use std::fmt::Write;

use crate::combine::{BatchOutcome, CombineOutcome};
use crate::config::CombineConfig;

/// Errors listed individually before the rest are summarised.
pub const MAX_DISPLAYED_ERRORS: usize = 10;

const RULE_WIDTH: usize = 60;

/// Human-readable report for one category run.
pub fn render_outcome(outcome: &CombineOutcome) -> String {
    let mut out = String::new();

    // Discovery failures happen before any file is read.
    if outcome.files_found > 0 {
        let _ = writeln!(out, "\nCombining {} {} files...", outcome.files_found, outcome.category);
    }

    if !outcome.errors.is_empty() {
        let _ = writeln!(out, "\nWarning: Found {} errors:", outcome.errors.len());
        for error in outcome.errors.iter().take(MAX_DISPLAYED_ERRORS) {
            let _ = writeln!(out, "  - {error}");
        }
        if outcome.errors.len() > MAX_DISPLAYED_ERRORS {
            let _ = writeln!(
                out,
                "  ... and {} more errors",
                outcome.errors.len() - MAX_DISPLAYED_ERRORS
            );
        }
    }

    if let Some(outputs) = &outcome.outputs {
        let _ = writeln!(
            out,
            "Successfully combined {} {} into {}",
            outcome.combined_count,
            outcome.category,
            outputs.primary.display()
        );
        let _ = writeln!(out, "   File size: {:.2} KB", outputs.primary_bytes as f64 / 1024.0);
        if let Some(public) = &outputs.public {
            let _ = writeln!(out, "   Also copied to {}", public.display());
        }
    }

    if let Some(failure) = &outcome.failure {
        let _ = writeln!(out, "Error: {failure}");
    }

    out
}

/// Closing summary of a batch run.
pub fn render_batch_summary(batch: &BatchOutcome) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\nCombined {}/{} data types successfully\n{rule}\n",
        batch.succeeded(),
        batch.total()
    )
}

/// One line per configured category with its declared file shape.
pub fn render_categories(config: &CombineConfig) -> String {
    let mut out = String::new();
    for category in &config.categories {
        let _ = writeln!(
            out,
            "{:<16} {:<7} {}",
            category.name,
            category.shape().as_str(),
            config.source_dir(&category.name).display()
        );
    }
    out
}
