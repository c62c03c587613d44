//! Identifier generation for packages and items.
//!
//! Two flavors are handed out: short decimal tokens for answer and response
//! labels inside one item, and long `g`-prefixed hex tokens for the
//! assessment, items, manifest and resources. The importer's schema types
//! the long ones as XML `ID`, which cannot start with a digit.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Short identifiers are drawn from `0..SHORT_ID_SPACE`.
pub const SHORT_ID_SPACE: u32 = 10_000;

/// Total length of a long identifier, prefix included.
pub const LONG_ID_LEN: usize = 32;

const LONG_ID_PREFIX: char = 'g';

pub struct IdGenerator {
    rng: StdRng,
    issued: HashSet<String>,
}

impl IdGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Generator whose whole output sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    /// A fresh long identifier, distinct from every other one this
    /// generator has produced.
    pub fn long_id(&mut self) -> String {
        loop {
            let bits: u128 = self.rng.gen();
            let hex = format!("{:032x}", bits);
            let id = format!("{}{}", LONG_ID_PREFIX, &hex[..LONG_ID_LEN - 1]);
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Open a scope for the short identifiers of one item.
    pub fn item_scope(&mut self) -> ShortIds<'_> {
        ShortIds {
            rng: &mut self.rng,
            used: HashSet::new(),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Short identifiers unique within one item.
pub struct ShortIds<'a> {
    rng: &'a mut StdRng,
    used: HashSet<u32>,
}

impl ShortIds<'_> {
    pub fn next_id(&mut self) -> String {
        // Once every value is taken there is nothing left to retry for.
        if self.used.len() >= SHORT_ID_SPACE as usize {
            return self.rng.gen_range(0..SHORT_ID_SPACE).to_string();
        }
        loop {
            let n = self.rng.gen_range(0..SHORT_ID_SPACE);
            if self.used.insert(n) {
                return n.to_string();
            }
        }
    }

    pub fn take(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_ids_have_fixed_shape() {
        let mut ids = IdGenerator::with_seed(7);
        for _ in 0..100 {
            let id = ids.long_id();
            assert_eq!(id.len(), LONG_ID_LEN);
            assert!(id.starts_with('g'));
            assert!(id[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn short_ids_never_repeat_within_an_item() {
        let mut ids = IdGenerator::with_seed(1);
        let mut scope = ids.item_scope();
        let tokens = scope.take(5_000);
        let unique: HashSet<&String> = tokens.iter().collect();
        assert_eq!(unique.len(), tokens.len());
        for token in &tokens {
            let n: u32 = token.parse().unwrap();
            assert!(n < SHORT_ID_SPACE);
        }
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = IdGenerator::with_seed(42);
        let mut b = IdGenerator::with_seed(42);
        assert_eq!(a.long_id(), b.long_id());
        assert_eq!(a.item_scope().take(3), b.item_scope().take(3));
    }
}
