#![warn(missing_docs)]
//! Hornet Core - Benchmark Model
//!
//! This crate holds everything a benchmark session is built from:
//! - `BenchmarkDef` records as loaded from a definitions file
//! - `Registry` of benchmarks with weights normalized to 100
//! - `TagIndex` grouping benchmarks into CORE/EXTENDED/NONE and user tags
//! - Scoring functions turning run means into the index

mod benchmark;
mod registry;
mod scoring;
mod tags;

pub use benchmark::{Benchmark, BenchmarkDef, BenchmarkStatus, Run, RunResult};
pub use registry::{Registry, RegistryError, derive_id};
pub use scoring::{
    BenchmarkScore, ScoreTotals, accumulated_mean, format_index, raw_score, score,
};
pub use tags::{
    CORE_TAG, EXTENDED_TAG, NONE_TAG, Tag, TagActivity, TagDef, TagError, TagIndex, TagKind,
};
