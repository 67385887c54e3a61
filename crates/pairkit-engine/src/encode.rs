//! Index encoding of domains and patterns.
//!
//! The engine works on `(parameter index, value index)` bindings instead of
//! strings:
//! - a row is a `Vec<usize>` holding one value index per parameter, in
//!   declaration order;
//! - a pair is canonical by parameter *name* order, so encoded pairs
//!   correspond one-to-one with [`Pair`];
//! - patterns that mention an undeclared parameter or value are inert.

use std::collections::HashSet;

use pairkit_ir::types::{Domains, Pattern, Row};

use crate::pair::Pair;

/// A row as one value index per parameter.
pub type EncodedRow = Vec<usize>;

/// One `(parameter index, value index)` binding.
pub type Binding = (usize, usize);

/// A pair of bindings, ordered so that `a`'s parameter name sorts before
/// `b`'s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedPair {
    pub a: Binding,
    pub b: Binding,
}

/// Domains mapped to index space.
#[derive(Debug, Clone)]
pub struct EncodedSpace {
    names: Vec<String>,
    values: Vec<Vec<String>>,
    /// `rank[i]` is the position of parameter `i` in ordinal name order.
    rank: Vec<usize>,
}

impl EncodedSpace {
    pub fn new(domains: &Domains) -> Self {
        let names: Vec<String> = domains.names().map(str::to_string).collect();
        let values: Vec<Vec<String>> = domains.iter().map(|p| p.values.clone()).collect();

        let mut order: Vec<usize> = (0..names.len()).collect();
        order.sort_by(|&i, &j| names[i].cmp(&names[j]));
        let mut rank = vec![0; names.len()];
        for (position, &index) in order.iter().enumerate() {
            rank[index] = position;
        }

        Self {
            names,
            values,
            rank,
        }
    }

    pub fn param_count(&self) -> usize {
        self.names.len()
    }

    pub fn domain_size(&self, param: usize) -> usize {
        self.values[param].len()
    }

    pub fn domain_sizes(&self) -> Vec<usize> {
        self.values.iter().map(Vec::len).collect()
    }

    /// First value of every domain, or `None` if some domain is empty.
    pub fn seed_row(&self) -> Option<EncodedRow> {
        if self.values.iter().any(Vec::is_empty) {
            return None;
        }
        Some(vec![0; self.names.len()])
    }

    pub fn pair(&self, x: Binding, y: Binding) -> EncodedPair {
        if self.rank[x.0] <= self.rank[y.0] {
            EncodedPair { a: x, b: y }
        } else {
            EncodedPair { a: y, b: x }
        }
    }

    /// The C(k, 2) pairs present in a row.
    pub fn pairs_of<'a>(&'a self, row: &'a [usize]) -> impl Iterator<Item = EncodedPair> + 'a {
        (0..row.len()).flat_map(move |i| {
            ((i + 1)..row.len()).map(move |j| self.pair((i, row[i]), (j, row[j])))
        })
    }

    /// Every pair across two distinct parameters.
    pub fn universe(&self) -> HashSet<EncodedPair> {
        let mut pairs = HashSet::new();
        for i in 0..self.names.len() {
            for j in (i + 1)..self.names.len() {
                for v in 0..self.values[i].len() {
                    for w in 0..self.values[j].len() {
                        pairs.insert(self.pair((i, v), (j, w)));
                    }
                }
            }
        }
        pairs
    }

    /// Map a pattern into index space. `None` means the pattern names a
    /// parameter or value the domains lack, so it can never match.
    pub fn encode_pattern(&self, pattern: &Pattern) -> Option<EncodedPattern> {
        let mut bindings = Vec::with_capacity(pattern.len());
        for (name, value) in pattern.iter() {
            let param = self.names.iter().position(|n| n == name)?;
            let index = self.values[param].iter().position(|v| v == value)?;
            bindings.push((param, index));
        }
        Some(EncodedPattern { bindings })
    }

    pub fn decode_row(&self, row: &[usize]) -> Row {
        row.iter()
            .enumerate()
            .map(|(param, &value)| {
                (
                    self.names[param].as_str(),
                    self.values[param][value].as_str(),
                )
            })
            .collect()
    }

    pub fn decode_pair(&self, pair: EncodedPair) -> Pair {
        let (p, v) = pair.a;
        let (q, w) = pair.b;
        Pair::new(
            (self.names[p].as_str(), self.values[p][v].as_str()),
            (self.names[q].as_str(), self.values[q][w].as_str()),
        )
    }
}

/// A pattern in index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPattern {
    bindings: Vec<Binding>,
}

impl EncodedPattern {
    pub fn matches(&self, row: &[usize]) -> bool {
        self.bindings.iter().all(|&(param, value)| row[param] == value)
    }

    /// Every binding of the pattern is one of the pair's two bindings.
    pub fn within_pair(&self, pair: &EncodedPair) -> bool {
        self.bindings.iter().all(|&b| b == pair.a || b == pair.b)
    }

    /// Overwrite the row with this pattern's bindings.
    pub fn merge_into(&self, row: &mut [usize]) {
        for &(param, value) in &self.bindings {
            row[param] = value;
        }
    }
}

/// Forbid and require lists in index space.
#[derive(Debug, Clone)]
pub struct EncodedRules {
    forbid: Vec<EncodedPattern>,
    require: Vec<EncodedPattern>,
    /// Whether any require pattern was declared at all, inert or not.
    require_declared: bool,
}

impl EncodedRules {
    pub fn new(space: &EncodedSpace, forbid: &[Pattern], require: &[Pattern]) -> Self {
        let forbid: Vec<_> = forbid.iter().filter_map(|p| space.encode_pattern(p)).collect();
        let encoded: Vec<_> = require.iter().filter_map(|p| space.encode_pattern(p)).collect();
        Self {
            forbid,
            require: encoded,
            require_declared: !require.is_empty(),
        }
    }

    pub fn violates_forbid(&self, row: &[usize]) -> bool {
        self.forbid.iter().any(|p| p.matches(row))
    }

    pub fn satisfies_require(&self, row: &[usize]) -> bool {
        !self.require_declared || self.require.iter().any(|p| p.matches(row))
    }

    /// Require patterns that can be realized in a total assignment, in
    /// declaration order.
    pub fn require_patterns(&self) -> &[EncodedPattern] {
        &self.require
    }

    /// Whether no legal row can contain this pair.
    pub fn pair_is_forbidden(&self, pair: &EncodedPair) -> bool {
        self.forbid.iter().any(|p| p.within_pair(pair))
    }

    pub fn forbid_len(&self) -> usize {
        self.forbid.len()
    }
}
