//! Greedy pairwise row generation.
//!
//! One call runs four phases over a fresh working set:
//!
//! 1. **Greedy synthesis**: hill-climb from the all-first-values seed,
//!    maximizing pairs not yet covered; repair forbid violations; merge a
//!    require pattern when one fits; keep the row if it covers something new.
//! 2. **Exhaustive fallback**: walk the cross-product for whatever the greedy
//!    phase left uncovered. Capped by `max_exhaustive_combinations`.
//! 3. **Pruning**: drop rows, last first, while coverage stays complete,
//!    until no single row can be removed.
//! 4. **Finalize**: deduplicate and decode rows in parameter order.
//!
//! The result is deterministic for a given input ordering.

use std::collections::HashSet;

use pairkit_ir::types::{Domains, GenerationConfig, Pattern, Row, Spec};
use serde::Serialize;

use crate::cartesian::{cross_product_size, IndexProduct};
use crate::encode::{EncodedPair, EncodedRow, EncodedRules, EncodedSpace};
use crate::pair::Pair;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "domain too large for exhaustive completion: {combinations} combinations exceed \
         the limit of {limit} with {} pair(s) still uncovered", .uncovered.len()
    )]
    ExhaustiveTooLarge {
        combinations: u128,
        limit: u64,
        /// Pairs the greedy phase could not reach, in canonical order.
        uncovered: Vec<Pair>,
    },
}

/// Counters from one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Greedy attempts made.
    pub attempts: usize,
    /// Rows contributed by greedy synthesis.
    pub greedy_rows: usize,
    /// Rows contributed by the exhaustive fallback.
    pub exhaustive_rows: usize,
    /// Rows removed by pruning.
    pub pruned_rows: usize,
    /// Rows dropped as exact duplicates.
    pub duplicate_rows: usize,
    /// Size of the coverage target.
    pub target_pairs: usize,
    /// Target pairs present in the final rows.
    pub covered_pairs: usize,
}

impl GenerationStats {
    pub fn is_complete(&self) -> bool {
        self.covered_pairs >= self.target_pairs
    }
}

/// Rows plus run statistics.
#[derive(Debug, Clone)]
pub struct Generation {
    pub rows: Vec<Row>,
    pub stats: GenerationStats,
}

/// Pairwise generator over borrowed inputs.
///
/// Inputs are read-only for the duration of [`run`](Generator::run); the
/// generator keeps no state between runs.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    domains: &'a Domains,
    forbid: &'a [Pattern],
    require: &'a [Pattern],
    config: GenerationConfig,
}

impl<'a> Generator<'a> {
    pub fn new(domains: &'a Domains, forbid: &'a [Pattern], require: &'a [Pattern]) -> Self {
        Self {
            domains,
            forbid,
            require,
            config: GenerationConfig::default(),
        }
    }

    /// Generator for a parsed spec, using its `generation` settings.
    pub fn from_spec(spec: &'a Spec) -> Self {
        Self::new(&spec.parameters, &spec.forbid, &spec.require)
            .with_config(spec.generation.clone())
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn run(&self) -> Result<Generation, GenerateError> {
        let space = EncodedSpace::new(self.domains);
        let rules = EncodedRules::new(&space, self.forbid, self.require);
        if rules.forbid_len() < self.forbid.len() {
            tracing::debug!(
                inert = self.forbid.len() - rules.forbid_len(),
                "forbid patterns reference undeclared parameters or values"
            );
        }

        let mut target = space.universe();
        target.retain(|p| !rules.pair_is_forbidden(p));

        let mut search = Search {
            space: &space,
            rules: &rules,
            target,
            covered: HashSet::new(),
            rows: Vec::new(),
            stats: GenerationStats::default(),
        };
        search.stats.target_pairs = search.target.len();

        let Some(seed) = space.seed_row() else {
            tracing::warn!("a parameter has an empty domain; no total assignment exists");
            return Ok(search.finish());
        };

        tracing::debug!(
            parameters = space.param_count(),
            target = search.target.len(),
            "starting greedy synthesis"
        );
        search.greedy(&seed, self.config.max_attempts(search.target.len()));

        if !search.fully_covered() {
            let combinations = cross_product_size(self.domains);
            if let Some(limit) = self.config.max_exhaustive_combinations {
                if combinations > u128::from(limit) {
                    return Err(GenerateError::ExhaustiveTooLarge {
                        combinations,
                        limit,
                        uncovered: search.uncovered(),
                    });
                }
            }
            tracing::debug!(
                combinations = %combinations,
                uncovered = search.target.difference(&search.covered).count(),
                "greedy synthesis left gaps; walking the cross-product"
            );
            search.exhaustive();
        }

        search.prune();
        let generation = search.finish();

        if generation.stats.is_complete() {
            tracing::info!(
                rows = generation.rows.len(),
                target = generation.stats.target_pairs,
                attempts = generation.stats.attempts,
                "pairwise generation complete"
            );
        } else {
            tracing::warn!(
                rows = generation.rows.len(),
                covered = generation.stats.covered_pairs,
                target = generation.stats.target_pairs,
                "pairwise coverage incomplete"
            );
        }
        Ok(generation)
    }
}

/// Generate pairwise rows with the default configuration.
pub fn generate(
    domains: &Domains,
    forbid: &[Pattern],
    require: &[Pattern],
) -> Result<Vec<Row>, GenerateError> {
    Ok(Generator::new(domains, forbid, require).run()?.rows)
}

/// Working set for a single run.
struct Search<'s> {
    space: &'s EncodedSpace,
    rules: &'s EncodedRules,
    target: HashSet<EncodedPair>,
    covered: HashSet<EncodedPair>,
    rows: Vec<EncodedRow>,
    stats: GenerationStats,
}

impl Search<'_> {
    fn fully_covered(&self) -> bool {
        self.target.is_subset(&self.covered)
    }

    fn uncovered(&self) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = self
            .target
            .difference(&self.covered)
            .map(|&p| self.space.decode_pair(p))
            .collect();
        pairs.sort();
        pairs
    }

    /// Pairs in `row` not yet covered.
    fn gain(&self, row: &[usize]) -> usize {
        self.space
            .pairs_of(row)
            .filter(|p| !self.covered.contains(p))
            .count()
    }

    fn greedy(&mut self, seed: &[usize], max_attempts: usize) {
        while !self.fully_covered() && self.stats.attempts < max_attempts {
            self.stats.attempts += 1;

            let climbed = self.climb(seed.to_vec());
            let Some(candidate) = self.repair(climbed) else {
                tracing::debug!(attempt = self.stats.attempts, "no single-field repair clears forbid");
                break;
            };
            let candidate = self.merge_require(candidate);

            // A rejected candidate leaves `covered` untouched, so every later
            // attempt would rebuild the same candidate.
            if !self.admit(candidate) {
                tracing::debug!(attempt = self.stats.attempts, "greedy synthesis stalled");
                break;
            }
            self.stats.greedy_rows += 1;
        }
    }

    /// First-improvement hill climb over single-field substitutions.
    fn climb(&self, mut best: EncodedRow) -> EncodedRow {
        let mut best_gain = self.gain(&best);
        let mut improved = true;

        while improved {
            improved = false;
            for param in 0..best.len() {
                for value in 0..self.space.domain_size(param) {
                    if best[param] == value {
                        continue;
                    }
                    let mut trial = best.clone();
                    trial[param] = value;
                    if self.rules.violates_forbid(&trial) {
                        continue;
                    }
                    let gain = self.gain(&trial);
                    if gain > best_gain {
                        best = trial;
                        best_gain = gain;
                        improved = true;
                    }
                }
            }
        }

        best
    }

    /// The row itself if legal, else the first single-field substitution
    /// that is.
    fn repair(&self, row: EncodedRow) -> Option<EncodedRow> {
        if !self.rules.violates_forbid(&row) {
            return Some(row);
        }
        for param in 0..row.len() {
            for value in 0..self.space.domain_size(param) {
                let mut trial = row.clone();
                trial[param] = value;
                if !self.rules.violates_forbid(&trial) {
                    return Some(trial);
                }
            }
        }
        None
    }

    /// Merge the first require pattern that keeps the row legal. Leaves the
    /// row alone when require is already met or nothing fits.
    fn merge_require(&self, row: EncodedRow) -> EncodedRow {
        if self.rules.satisfies_require(&row) {
            return row;
        }
        for pattern in self.rules.require_patterns() {
            let mut trial = row.clone();
            pattern.merge_into(&mut trial);
            if !self.rules.violates_forbid(&trial) {
                return trial;
            }
        }
        row
    }

    /// Append the row if it covers at least one new pair.
    fn admit(&mut self, row: EncodedRow) -> bool {
        if self.gain(&row) == 0 {
            return false;
        }
        self.covered.extend(self.space.pairs_of(&row));
        self.rows.push(row);
        true
    }

    fn exhaustive(&mut self) {
        for row in IndexProduct::new(self.space.domain_sizes()) {
            if self.rules.violates_forbid(&row) {
                continue;
            }
            if self.admit(row) {
                self.stats.exhaustive_rows += 1;
            }
            if self.fully_covered() {
                break;
            }
        }
    }

    /// Remove rows from the end while the rest still cover the target;
    /// repeat sweeps until one removes nothing.
    fn prune(&mut self) {
        let mut removed_any = true;
        while removed_any {
            removed_any = false;
            for index in (0..self.rows.len()).rev() {
                let saved = self.rows.remove(index);
                let remaining: HashSet<EncodedPair> = self
                    .rows
                    .iter()
                    .flat_map(|r| self.space.pairs_of(r))
                    .collect();
                if self.target.is_subset(&remaining) {
                    removed_any = true;
                    self.stats.pruned_rows += 1;
                } else {
                    self.rows.insert(index, saved);
                }
            }
        }
    }

    fn finish(mut self) -> Generation {
        let mut seen = HashSet::new();
        let before = self.rows.len();
        self.rows.retain(|r| seen.insert(r.clone()));
        self.stats.duplicate_rows = before - self.rows.len();

        let present: HashSet<EncodedPair> = self
            .rows
            .iter()
            .flat_map(|r| self.space.pairs_of(r))
            .collect();
        self.stats.covered_pairs = self.target.intersection(&present).count();

        let rows = self.rows.iter().map(|r| self.space.decode_row(r)).collect();
        Generation {
            rows,
            stats: self.stats,
        }
    }
}
