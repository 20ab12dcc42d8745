//! Benchmark Registry
//!
//! Owns the ordered collection of benchmarks for a session. Weights are
//! normalized once at construction so that `computed_weight` sums to 100.

use crate::benchmark::{Benchmark, BenchmarkDef, BenchmarkStatus};
use fxhash::FxHashMap;
use regex::Regex;
use std::ops::Index;
use std::sync::LazyLock;
use thiserror::Error;

/// Matches the stem of the identifying path: `.../<letters>.<ext>`
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([A-Za-z_]+)\.").expect("benchmark id pattern is a valid regex")
});

/// Errors raised while building a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Weights sum to zero, so no share of 100 can be computed
    #[error("Total benchmark weight is zero")]
    ZeroWeight,

    /// A weight is negative or not finite, or the weights overflow
    #[error("Invalid weight {weight} for benchmark '{name}'")]
    InvalidWeight {
        /// Benchmark name
        name: String,
        /// Offending weight
        weight: f64,
    },

    /// The identifying path has no `/<letters>.` stem
    #[error("Cannot derive benchmark id from path: {0}")]
    MalformedPath(String),

    /// Two paths derive the same id
    #[error("Duplicate benchmark id: {0}")]
    DuplicateId(String),
}

/// Derive the stable benchmark id from its identifying path.
///
/// Takes the first `/<letters>.` segment and lowercases it, so
/// `benchmarks/addRow.html` becomes `addrow`.
pub fn derive_id(path: &str) -> Option<String> {
    ID_PATTERN
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Immutable ordered benchmark collection
#[derive(Debug, Clone)]
pub struct Registry {
    benchmarks: Vec<Benchmark>,
    by_id: FxHashMap<String, usize>,
    total_weight: f64,
}

impl Registry {
    /// Build a registry from raw definitions, in input order.
    pub fn new(definitions: impl IntoIterator<Item = BenchmarkDef>) -> Result<Self, RegistryError> {
        let definitions: Vec<BenchmarkDef> = definitions.into_iter().collect();

        for def in &definitions {
            if !def.weight.is_finite() || def.weight < 0.0 {
                return Err(RegistryError::InvalidWeight {
                    name: def.name.clone(),
                    weight: def.weight,
                });
            }
        }

        let total_weight: f64 = definitions.iter().map(|d| d.weight).sum();
        if !total_weight.is_finite() {
            return Err(RegistryError::InvalidWeight {
                name: "(total)".to_string(),
                weight: total_weight,
            });
        }
        if total_weight == 0.0 {
            return Err(RegistryError::ZeroWeight);
        }

        let mut benchmarks = Vec::with_capacity(definitions.len());
        let mut by_id = FxHashMap::default();

        for (index, def) in definitions.into_iter().enumerate() {
            let id = derive_id(&def.filename)
                .ok_or_else(|| RegistryError::MalformedPath(def.filename.clone()))?;
            if by_id.insert(id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateId(id));
            }

            let mut tags: Vec<String> = Vec::with_capacity(def.tags.len());
            for tag in def.tags {
                let tag = tag.to_uppercase();
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }

            benchmarks.push(Benchmark {
                index,
                id,
                name: def.name,
                description: def.description,
                filename: def.filename,
                runs: def.runs,
                weight: def.weight,
                computed_weight: def.weight / total_weight * 100.0,
                baseline_time: def.baseline_time,
                tags,
                issue_number: def.issue_number,
                extended: def.extended,
                enabled: true,
                status: BenchmarkStatus::NoStatus,
                results: Vec::new(),
            });
        }

        Ok(Self {
            benchmarks,
            by_id,
            total_weight,
        })
    }

    /// Number of benchmarks
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether the registry holds no benchmarks (never true for a built registry)
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// Sum of raw weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Iterate in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Benchmark> {
        self.benchmarks.iter()
    }

    /// All benchmarks in registry order
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    /// Benchmark at `index`
    pub fn get(&self, index: usize) -> Option<&Benchmark> {
        self.benchmarks.get(index)
    }

    /// Mutable benchmark at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Benchmark> {
        self.benchmarks.get_mut(index)
    }

    /// Registry index of the benchmark with `id` (case-insensitive)
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id
            .get(id)
            .or_else(|| self.by_id.get(&id.to_lowercase()))
            .copied()
    }

    /// Benchmark with `id` (case-insensitive)
    pub fn by_id(&self, id: &str) -> Option<&Benchmark> {
        self.index_of(id).map(|i| &self.benchmarks[i])
    }

    /// Whether any benchmark is outside the core set
    pub fn has_extended(&self) -> bool {
        self.benchmarks.iter().any(|b| b.extended)
    }

    /// Enable or disable the benchmark with `id`. Returns `false` if unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.benchmarks[index].enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Enable every benchmark
    pub fn enable_all(&mut self) {
        for benchmark in &mut self.benchmarks {
            benchmark.enabled = true;
        }
    }

    /// Disable every benchmark
    pub fn disable_all(&mut self) {
        for benchmark in &mut self.benchmarks {
            benchmark.enabled = false;
        }
    }

    /// Ids of enabled benchmarks, in registry order
    pub fn enabled_ids(&self) -> Vec<&str> {
        self.benchmarks
            .iter()
            .filter(|b| b.enabled)
            .map(|b| b.id.as_str())
            .collect()
    }

    /// Ids of disabled benchmarks, in registry order
    pub fn disabled_ids(&self) -> Vec<&str> {
        self.benchmarks
            .iter()
            .filter(|b| !b.enabled)
            .map(|b| b.id.as_str())
            .collect()
    }

    /// Number of enabled benchmarks
    pub fn enabled_count(&self) -> usize {
        self.benchmarks.iter().filter(|b| b.enabled).count()
    }
}

impl Index<usize> for Registry {
    type Output = Benchmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.benchmarks[index]
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Benchmark;
    type IntoIter = std::slice::Iter<'a, Benchmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.benchmarks.iter()
    }
}
