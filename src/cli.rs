//! Command-line surface: argument parsing, config selection and report output.
//!
//! All combine logic lives in [`crate::combine`]; this module only decides what
//! to run and prints the report.

use crate::combine::{combine, combine_all};
use crate::config::{validate_category_name, CombineConfig};
use crate::contract::SourceShape;
use crate::load_config::load_config;
use crate::report::{render_batch_summary, render_categories, render_outcome};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for content-combine: merge per-entity content files into combined documents.
#[derive(Parser)]
#[clap(
    name = "content-combine",
    version,
    about = "Merge per-entity game content JSON files into versioned combined documents"
)]
pub struct Cli {
    /// Project root containing the source and public data directories
    #[clap(long, global = true)]
    pub root: Option<PathBuf>,

    /// Optional YAML file describing the layout and categories
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine every configured category
    All,
    /// Combine a single category
    Category {
        /// Category name, e.g. `items`
        name: String,
        /// Treat source files as arrays of items
        #[clap(long, conflicts_with = "object")]
        array: bool,
        /// Treat source files as single item objects
        #[clap(long)]
        object: bool,
    },
    /// List configured categories
    List,
}

fn resolve_config(cli: &Cli) -> Result<CombineConfig> {
    let config = match &cli.config {
        Some(path) => load_config(path, cli.root.clone())?,
        None => match &cli.root {
            Some(root) => CombineConfig::with_root(root.clone()),
            None => CombineConfig::default(),
        },
    };
    config.trace_loaded();
    Ok(config)
}

/// CLI entrypoint shared by `main()` and the integration tests.
/// Fails when any requested category failed.
pub fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::All => {
            let batch = combine_all(&config);
            for outcome in &batch.outcomes {
                print!("{}", render_outcome(outcome));
            }
            print!("{}", render_batch_summary(&batch));
            if !batch.success() {
                anyhow::bail!(
                    "{} of {} categories failed",
                    batch.total() - batch.succeeded(),
                    batch.total()
                );
            }
            Ok(())
        }
        Commands::Category { name, array, object } => {
            validate_category_name(&name)?;
            let shape = match (array, object) {
                (true, _) => Some(SourceShape::Array),
                (_, true) => Some(SourceShape::Object),
                _ => None,
            };
            let category = config.resolve_category(&name, shape);
            let outcome = combine(&config, &category);
            print!("{}", render_outcome(&outcome));
            match outcome.failure {
                Some(failure) => Err(anyhow::Error::new(failure).context(format!("combining {name} failed"))),
                None => Ok(()),
            }
        }
        Commands::List => {
            print!("{}", render_categories(&config));
            Ok(())
        }
    }
}
