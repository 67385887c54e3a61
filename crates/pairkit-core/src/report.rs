//! Summary statistics for a generated row set.
//!
//! Computed independently of the engine from the string-level pair model,
//! so a summary also serves as a coverage audit of the rows it describes.

use std::fmt;

use pairkit_engine::constraint::{satisfies_require, violates_forbid};
use pairkit_engine::pair::{covered_pairs, reachable_pair_universe};
use pairkit_ir::types::{Row, Spec};
use serde::Serialize;

/// Reduction and coverage figures for one spec and its rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of declared parameters.
    pub parameters: usize,
    /// Size of the full cross-product.
    pub total_combinations: u128,
    /// Rows generated.
    pub rows: usize,
    /// `100 * (1 - rows / total_combinations)`.
    pub reduction_percent: f64,
    /// Pairs the rows must cover.
    pub target_pairs: usize,
    /// Target pairs present in at least one row.
    pub covered_pairs: usize,
    /// `100 * covered / target`, or 100 for an empty target.
    pub coverage_percent: f64,
    /// Rows matching a forbid pattern.
    pub forbid_violations: usize,
    /// Rows matching a require pattern (all rows when none are declared).
    pub require_satisfied: usize,
}

pub fn summarize(spec: &Spec, rows: &[Row]) -> Summary {
    let total_combinations = spec.parameters.total_combinations();
    let target = reachable_pair_universe(&spec.parameters, &spec.forbid);
    let covered = covered_pairs(rows);
    let covered_count = target.intersection(&covered).count();

    let reduction_percent = if total_combinations == 0 {
        0.0
    } else {
        100.0 * (1.0 - rows.len() as f64 / total_combinations as f64)
    };
    let coverage_percent = if target.is_empty() {
        100.0
    } else {
        100.0 * covered_count as f64 / target.len() as f64
    };

    Summary {
        parameters: spec.parameters.len(),
        total_combinations,
        rows: rows.len(),
        reduction_percent,
        target_pairs: target.len(),
        covered_pairs: covered_count,
        coverage_percent,
        forbid_violations: rows
            .iter()
            .filter(|r| violates_forbid(r, &spec.forbid))
            .count(),
        require_satisfied: rows
            .iter()
            .filter(|r| satisfies_require(r, &spec.require))
            .count(),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rows: {} of {} combinations ({:.1}% reduction); pairs covered {}/{} ({:.1}%); forbid violations: {}",
            self.rows,
            self.total_combinations,
            self.reduction_percent,
            self.covered_pairs,
            self.target_pairs,
            self.coverage_percent,
            self.forbid_violations,
        )
    }
}
