// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Keyed embedding-position sequencing.
//!
//! Draws sample indices from an eligible pool in a pseudo-random order using
//! a lazy Fisher-Yates shuffle driven by a ChaCha20 PRNG seeded from the
//! derived key material. Both hide and reveal see the same pool (it depends
//! only on public carrier data) and the same seed, so they walk the same
//! sequence. The shuffle is lazy: reveal stops drawing as soon as the frame is
//! complete instead of permuting the whole carrier.
//!
//! # Cross-platform portability
//!
//! The shuffle uses `u32` for `gen_range` (not `usize`) so that the sequence
//! is identical on all platforms. `usize` is 32-bit on WASM but 64-bit on
//! native, which makes `rand::Rng::gen_range` consume different amounts of
//! PRNG entropy per step and produce a completely different order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::stego::error::StegoError;

/// Lazy, seeded, duplicate-free walk over a pool of sample indices.
pub struct PositionSequencer {
    pool: Vec<usize>,
    rng: ChaCha20Rng,
    next: usize,
}

impl PositionSequencer {
    /// Start a sequence over `pool`. The pool's order matters: the same pool
    /// order and seed always give the same sequence.
    pub fn new(pool: Vec<usize>, seed: &[u8; 32]) -> Result<Self, StegoError> {
        if pool.len() > u32::MAX as usize {
            return Err(StegoError::InternalConsistency("position pool exceeds u32 range"));
        }
        Ok(Self { pool, rng: ChaCha20Rng::from_seed(*seed), next: 0 })
    }

    /// Positions not yet drawn.
    pub fn remaining(&self) -> usize {
        self.pool.len() - self.next
    }
}

impl Iterator for PositionSequencer {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let i = self.next;
        let last = self.pool.len().checked_sub(1)?;
        if i > last {
            return None;
        }
        let j = self.rng.gen_range(i as u32..=last as u32) as usize;
        self.pool.swap(i, j);
        self.next += 1;
        Some(self.pool[i])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for PositionSequencer {}

/// Draw exactly `count` distinct positions from `eligible`.
///
/// `count == 0` gives an empty sequence. Asking for more positions than the
/// pool holds is a caller bug (capacity is checked first) and returns
/// [`StegoError::InternalConsistency`].
pub fn sequence(eligible: &[usize], seed: &[u8; 32], count: usize) -> Result<Vec<usize>, StegoError> {
    if count > eligible.len() {
        return Err(StegoError::InternalConsistency(
            "sequencer asked for more positions than are eligible",
        ));
    }
    Ok(PositionSequencer::new(eligible.to_vec(), seed)?.take(count).collect())
}

/// `pool` without the entries of `taken`, keeping the pool's order.
pub fn exclude(pool: &[usize], taken: &[usize]) -> Vec<usize> {
    let mut taken = taken.to_vec();
    taken.sort_unstable();
    pool.iter()
        .copied()
        .filter(|p| taken.binary_search(p).is_err())
        .collect()
}
