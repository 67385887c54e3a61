//! Lazy cross-product enumeration.
//!
//! Index rows come out in odometer order: the first parameter changes slowest,
//! the last fastest. Nothing is materialized beyond the current row.

use pairkit_ir::types::Domains;

use crate::encode::EncodedRow;

/// Size of the full cross-product, saturating at `u128::MAX`.
pub fn cross_product_size(domains: &Domains) -> u128 {
    domains.total_combinations()
}

/// Odometer over value indices for domains of the given sizes.
#[derive(Debug, Clone)]
pub struct IndexProduct {
    sizes: Vec<usize>,
    next: Option<EncodedRow>,
}

impl IndexProduct {
    pub fn new(sizes: Vec<usize>) -> Self {
        let next = if sizes.contains(&0) {
            None
        } else {
            Some(vec![0; sizes.len()])
        };
        Self { sizes, next }
    }
}

impl Iterator for IndexProduct {
    type Item = EncodedRow;

    fn next(&mut self) -> Option<EncodedRow> {
        let current = self.next.take()?;

        let mut following = current.clone();
        let mut position = following.len();
        while position > 0 {
            position -= 1;
            following[position] += 1;
            if following[position] < self.sizes[position] {
                self.next = Some(following);
                break;
            }
            following[position] = 0;
        }

        Some(current)
    }
}
