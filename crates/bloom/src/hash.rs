//! Seed derivation: the two hasher modes and the closed item-type sum used
//! by deterministic mode.
//!
//! Deterministic mode encodes an [`Item`] to a canonical, type-tagged byte
//! string and hashes it with `xxh64` (fixed seed `0`) -- a portable,
//! non-cryptographic 64-bit hash, the same family `sketch_oxide` reaches for
//! when it needs a stable hash for a block-addressed filter. Host-hash mode
//! is a pure pass-through and never touches this module.

use crate::error::FilterError;

/// The closed set of item kinds a deterministic-mode filter can hash.
///
/// Modeled as an explicit enum, per the design note that type dispatch
/// belongs in the binding layer, not as runtime type inspection inside the
/// engine: by the time an `Item` reaches here, the dispatch has already
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    /// UTF-8 text, tagged `0x01`.
    Text(&'a str),
    /// Raw bytes, tagged `0x02`.
    Bytes(&'a [u8]),
    /// A signed integer in `i64::MIN..=i64::MAX`, tagged `0x03`.
    Int(i64),
}

const TAG_TEXT: u8 = 0x01;
const TAG_BYTES: u8 = 0x02;
const TAG_INT: u8 = 0x03;

/// Canonically encodes an item to bytes: a one-byte type tag followed by
/// the payload (UTF-8 bytes, raw bytes, or 8 little-endian bytes).
fn canonical_bytes(item: &Item<'_>) -> Vec<u8> {
    match item {
        Item::Text(s) => {
            let mut out = Vec::with_capacity(1 + s.len());
            out.push(TAG_TEXT);
            out.extend_from_slice(s.as_bytes());
            out
        }
        Item::Bytes(b) => {
            let mut out = Vec::with_capacity(1 + b.len());
            out.push(TAG_BYTES);
            out.extend_from_slice(b);
            out
        }
        Item::Int(i) => {
            let mut out = Vec::with_capacity(9);
            out.push(TAG_INT);
            out.extend_from_slice(&i.to_le_bytes());
            out
        }
    }
}

/// Hashes an item to a 64-bit seed with the crate's fixed, portable hash.
///
/// Stable across versions by construction: the canonical encoding and the
/// hash function (`xxh64`, seed `0`) are both part of the crate's public
/// contract, pinned by [`tests::deterministic_hash_is_pinned`].
pub fn deterministic_seed(item: &Item<'_>) -> u64 {
    let bytes = canonical_bytes(item);
    xxhash_rust::xxh64::xxh64(&bytes, 0)
}

/// Builds an [`Item::Int`] from an `i128`, the widest integer a binding
/// layer is likely to hand in, rejecting anything outside `i64`'s range.
pub fn checked_int(value: i128) -> Result<Item<'static>, FilterError> {
    i64::try_from(value)
        .map(Item::Int)
        .map_err(|_| FilterError::OutOfRange)
}
