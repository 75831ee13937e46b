//! The bit array: a contiguous, cache-aligned array of 256-bit blocks.
//!
//! `block_count` is always a power of two (enforced by [`crate::params`]),
//! which is what lets [`crate::block::block_index`] use a mask instead of a
//! modulo. Each block is wrapped in [`AlignedBlock`] so the array never
//! straddles a cache line unfavourably, the same cache-line consciousness
//! the surrounding storage engine applies to its SSTable footer layout.

use crate::block::{self, Mask};

/// A single 256-bit block, forced to a 64-byte (cache-line) alignment.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(align(64))]
struct AlignedBlock([u32; block::K]);

impl AlignedBlock {
    const ZERO: Self = AlignedBlock([0u32; block::K]);
}

/// The bit array backing a [`crate::Filter`].
#[derive(Clone)]
pub struct Blocks {
    blocks: Vec<AlignedBlock>,
}

impl Blocks {
    /// Allocates a zeroed array of `block_count` blocks.
    pub fn new(block_count: u64) -> Self {
        debug_assert!(block_count.is_power_of_two() && block_count >= 1);
        Blocks {
            blocks: vec![AlignedBlock::ZERO; block_count as usize],
        }
    }

    /// Number of 256-bit blocks.
    pub fn block_count(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Total bits: `256 * block_count`.
    pub fn bit_count(&self) -> u64 {
        self.block_count() * 256
    }

    /// Total bytes: `32 * block_count`.
    pub fn byte_count(&self) -> u64 {
        self.block_count() * 32
    }

    /// ORs `mask` into the block addressed by `seed`. Idempotent.
    #[inline]
    pub fn insert(&mut self, seed: u64) {
        let idx = block::block_index(seed, self.block_count()) as usize;
        let mask = block::make_mask(seed);
        let block = &mut self.blocks[idx].0;
        for (lane, m) in block.iter_mut().zip(mask.iter()) {
            *lane |= m;
        }
    }

    /// `true` iff every bit of the mask derived from `seed` is set in the
    /// addressed block.
    #[inline]
    pub fn may_contain(&self, seed: u64) -> bool {
        let idx = block::block_index(seed, self.block_count()) as usize;
        let mask = block::make_mask(seed);
        let block = &self.blocks[idx].0;
        block
            .iter()
            .zip(mask.iter())
            .all(|(lane, m)| lane & m == *m)
    }

    /// Zeroes every block. Does not resize.
    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            *block = AlignedBlock::ZERO;
        }
    }

    /// `true` iff no bit anywhere in the array is set.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.0.iter().all(|lane| *lane == 0))
    }

    /// Bitwise OR of `self` and `other`, block-for-block. Caller must have
    /// already checked `block_count()` equality.
    pub fn union(&self, other: &Blocks) -> Blocks {
        debug_assert_eq!(self.block_count(), other.block_count());
        let blocks = self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .map(|(a, b)| {
                let mut out = [0u32; block::K];
                for i in 0..block::K {
                    out[i] = a.0[i] | b.0[i];
                }
                AlignedBlock(out)
            })
            .collect();
        Blocks { blocks }
    }

    /// In-place bitwise OR of `other` into `self`.
    pub fn union_in_place(&mut self, other: &Blocks) {
        debug_assert_eq!(self.block_count(), other.block_count());
        for (a, b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            for i in 0..block::K {
                a.0[i] |= b.0[i];
            }
        }
    }

    /// Serializes the raw block bytes, little-endian within each lane, one
    /// block after another -- the payload of the persistence codec.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_count() as usize);
        for block in &self.blocks {
            for lane in block.0 {
                out.extend_from_slice(&lane.to_le_bytes());
            }
        }
        out
    }

    /// Rebuilds a `Blocks` from `block_count` blocks of raw little-endian
    /// bytes. `bytes.len()` must equal `32 * block_count`.
    pub fn from_le_bytes(bytes: &[u8], block_count: u64) -> Self {
        debug_assert_eq!(bytes.len() as u64, block_count * 32);
        let mut blocks = Vec::with_capacity(block_count as usize);
        for chunk in bytes.chunks_exact(32) {
            let mut lanes = [0u32; block::K];
            for (lane, word) in lanes.iter_mut().zip(chunk.chunks_exact(4)) {
                *lane = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
            }
            blocks.push(AlignedBlock(lanes));
        }
        Blocks { blocks }
    }
}

impl PartialEq for Blocks {
    fn eq(&self, other: &Self) -> bool {
        self.blocks.len() == other.blocks.len()
            && self.blocks.iter().zip(other.blocks.iter()).all(|(a, b)| a == b)
    }
}
impl Eq for Blocks {}
