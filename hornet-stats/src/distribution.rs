//! Student's t Distribution
//!
//! Two-sided 95% critical values, used to turn a standard error into a
//! margin of error for small sample counts.

/// Critical values for 1..=30 degrees of freedom
const T_TABLE: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.16,
    2.145, 2.131, 2.12, 2.11, 2.101, 2.093, 2.086, 2.08, 2.074, 2.069, 2.064, 2.06, 2.056, 2.052,
    2.048, 2.045, 2.042,
];

/// Critical value beyond the table (normal approximation)
pub const T_INFINITY: f64 = 1.96;

/// Two-sided 95% critical value for `degrees_of_freedom`.
///
/// Zero degrees of freedom are treated as one.
pub fn t_critical(degrees_of_freedom: usize) -> f64 {
    let df = degrees_of_freedom.max(1);
    T_TABLE.get(df - 1).copied().unwrap_or(T_INFINITY)
}
