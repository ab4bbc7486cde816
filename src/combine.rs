//! Coordinating module for the discover-merge-write pipeline.
//!
//! Every run builds its own [`CombineOutcome`]; nothing is shared between
//! categories or between invocations.

use tracing::{error, info, info_span};

use crate::config::{output_path, CategorySpec, CombineConfig};
use crate::contract::{CombineFailure, ErrorRecord, OutputWriter};
use crate::discover::discover_sources;
use crate::envelope::OutputEnvelope;
use crate::merge::merge_sources;
use crate::output::{copy_to_public, write_primary, FsOutputWriter, WrittenOutputs};

/// Result of combining one category.
#[derive(Debug)]
pub struct CombineOutcome {
    pub category: String,
    /// Source files considered, after exclusions.
    pub files_found: usize,
    pub combined_count: usize,
    /// Non-fatal diagnostics, in processing order.
    pub errors: Vec<ErrorRecord>,
    /// Set when the category failed. No output is written then, except when
    /// the public copy failed after the primary write (`outputs` is kept).
    pub failure: Option<CombineFailure>,
    pub outputs: Option<WrittenOutputs>,
}

impl CombineOutcome {
    fn new(category: &CategorySpec) -> Self {
        Self {
            category: category.name.clone(),
            files_found: 0,
            combined_count: 0,
            errors: Vec::new(),
            failure: None,
            outputs: None,
        }
    }

    fn failed(mut self, failure: CombineFailure) -> Self {
        error!(category = %self.category, error = %failure, "Category failed");
        self.failure = Some(failure);
        self
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of a batch run over the configured categories.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub outcomes: Vec<CombineOutcome>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success(&self) -> bool {
        self.succeeded() == self.total()
    }
}

/// Combines one category on the local filesystem.
pub fn combine(config: &CombineConfig, category: &CategorySpec) -> CombineOutcome {
    combine_with(config, category, &FsOutputWriter)
}

/// Combines one category, persisting through `writer`.
pub fn combine_with<W: OutputWriter + ?Sized>(
    config: &CombineConfig,
    category: &CategorySpec,
    writer: &W,
) -> CombineOutcome {
    let span = info_span!("combine", category = %category.name);
    let _enter = span.enter();

    let mut outcome = CombineOutcome::new(category);
    let source_dir = config.source_dir(&category.name);

    let files = match discover_sources(category, &source_dir) {
        Ok(files) => files,
        Err(failure) => return outcome.failed(failure),
    };
    outcome.files_found = files.len();
    info!(files = files.len(), shape = category.shape().as_str(), "Combining category");

    let merged = merge_sources(category, &files);
    outcome.errors = merged.errors;
    outcome.combined_count = merged.collection.len();

    if merged.collection.is_empty() {
        return outcome.failed(CombineFailure::NoValidItems {
            category: category.name.clone(),
        });
    }

    let envelope = OutputEnvelope::new(&category.name, merged.collection.items());
    let contents = match envelope.to_pretty_bytes() {
        Ok(contents) => contents,
        Err(e) => {
            return outcome.failed(CombineFailure::Serialize {
                category: category.name.clone(),
                source: e,
            })
        }
    };

    let primary = output_path(&source_dir, category);
    let public_dir = config.public_dir(&category.name);
    let mut outputs = match write_primary(writer, &contents, &primary) {
        Ok(outputs) => outputs,
        Err(failure) => return outcome.failed(failure),
    };
    let copied = copy_to_public(
        writer,
        &contents,
        &public_dir,
        &category.output_filename(),
        &mut outputs,
    );
    let primary_path = outputs.primary.clone();
    // The primary file exists even when the public copy failed.
    outcome.outputs = Some(outputs);
    if let Err(failure) = copied {
        return outcome.failed(failure);
    }

    info!(
        items = outcome.combined_count,
        errors = outcome.errors.len(),
        path = %primary_path.display(),
        "Category combined"
    );
    outcome
}

/// Combines every configured category in order on the local filesystem.
pub fn combine_all(config: &CombineConfig) -> BatchOutcome {
    combine_all_with(config, &FsOutputWriter)
}

/// Combines every configured category in order; one category failing never
/// stops the rest.
pub fn combine_all_with<W: OutputWriter + ?Sized>(config: &CombineConfig, writer: &W) -> BatchOutcome {
    let outcomes: Vec<_> = config
        .categories
        .iter()
        .map(|category| combine_with(config, category, writer))
        .collect();
    let batch = BatchOutcome { outcomes };
    info!(
        succeeded = batch.succeeded(),
        total = batch.total(),
        "Batch combine finished"
    );
    batch
}
