#![warn(missing_docs)]
//! Hornet Statistical Engine
//!
//! Turns the raw samples a timing suite collects for one run into the
//! figures a run reports:
//! - Mean and sample standard deviation
//! - Standard error and Student-t margin of error
//! - Relative margin of error in percent

mod distribution;
mod summary;

pub use distribution::{T_INFINITY, t_critical};
pub use summary::{SummaryStatistics, compute_summary};

/// Samples a run collects before its statistics are considered usable
pub const DEFAULT_MIN_SAMPLES: usize = 5;
