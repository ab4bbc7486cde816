#![doc = "content-combine: merge per-entity game content files into combined documents."]

//! For each content category (items, monsters, skills, ...) the hand-authored
//! JSON files are discovered, validated for an `id`, merged first-wins into a
//! single keyed collection and written as a versioned envelope to the source
//! directory and, when present, the public distribution directory.
//!
//! Start at [`combine::combine`] for one category or [`combine::combine_all`]
//! for the configured batch.

pub mod cli;
pub mod combine;
pub mod config;
pub mod contract;
pub mod discover;
pub mod envelope;
pub mod load_config;
pub mod merge;
pub mod output;
pub mod report;

pub use cli::{run, Cli, Commands};
pub use combine::{combine, combine_all, BatchOutcome, CombineOutcome};
