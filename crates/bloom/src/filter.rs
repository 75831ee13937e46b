//! The top-level [`Filter`] type: ties together parameters, the hasher
//! mode, and the bit array, and implements the set-algebra operations.

use crate::bits::Blocks;
use crate::block::K;
use crate::error::FilterError;
use crate::hash::{self, Item};
use crate::params;

/// Which hasher a filter uses. Chosen once at construction and immutable
/// thereafter -- see the data-model invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Caller supplies a 64-bit hash per item. Fast, not portable.
    HostHash,
    /// Items are canonically encoded and hashed with a fixed, portable
    /// hash. Portable and serializable.
    Deterministic,
}

/// A split-block Bloom filter.
///
/// `(capacity, fp_rate, mode, block_count)` are fixed at construction time
/// and never change; only the bit array mutates, via `insert`/`clear`/
/// `union_in_place`.
#[derive(Clone)]
pub struct Filter {
    capacity: u64,
    fp_rate: f64,
    mode: Mode,
    blocks: Blocks,
}

impl Filter {
    /// Number of bits set per inserted item. Fixed at 8 in this design.
    pub const K: usize = K;

    /// Builds a filter sized for `capacity` items at false-positive rate
    /// `fp_rate`, using the requested hasher `mode`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidParameter`] if `capacity == 0` or `fp_rate`
    /// is not a finite value strictly within `(0, 1)`.
    pub fn new(capacity: u64, fp_rate: f64, mode: Mode) -> Result<Self, FilterError> {
        let (block_count, _bits_per_element) = params::solve(capacity, fp_rate)?;
        tracing::debug!(capacity, fp_rate, block_count, ?mode, "constructed filter");
        Ok(Filter {
            capacity,
            fp_rate,
            mode,
            blocks: Blocks::new(block_count),
        })
    }

    /// Rebuilds a filter from already-validated raw parts. Used only by
    /// [`crate::codec::from_bytes`], which has already checked the header.
    pub(crate) fn from_raw_parts(capacity: u64, fp_rate: f64, mode: Mode, blocks: Blocks) -> Self {
        Filter {
            capacity,
            fp_rate,
            mode,
            blocks,
        }
    }

    /// The target capacity this filter was sized for.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// The target false-positive rate this filter was sized for.
    pub fn fp_rate(&self) -> f64 {
        self.fp_rate
    }

    /// The hasher mode this filter uses.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of 256-bit blocks.
    pub fn block_count(&self) -> u64 {
        self.blocks.block_count()
    }

    /// Total bits: `256 * block_count`.
    pub fn bit_count(&self) -> u64 {
        self.blocks.bit_count()
    }

    /// Total bytes: `32 * block_count`.
    pub fn byte_count(&self) -> u64 {
        self.blocks.byte_count()
    }

    pub(crate) fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    /// Resolves an [`Item`] to a 64-bit seed. Only meaningful in
    /// deterministic mode -- callers in host-hash mode use
    /// [`Filter::insert_hash`]/[`Filter::contains_hash`] directly.
    fn seed_of(&self, item: &Item<'_>) -> u64 {
        debug_assert_eq!(self.mode, Mode::Deterministic);
        hash::deterministic_seed(item)
    }

    /// Inserts an item into a deterministic-mode filter.
    ///
    /// # Errors
    ///
    /// [`FilterError::TypeMismatch`] if called on a host-hash-mode filter
    /// (use [`Filter::insert_hash`] instead).
    pub fn insert(&mut self, item: Item<'_>) -> Result<(), FilterError> {
        if self.mode != Mode::Deterministic {
            return Err(FilterError::TypeMismatch);
        }
        let seed = self.seed_of(&item);
        self.blocks.insert(seed);
        Ok(())
    }

    /// Returns whether a deterministic-mode filter might contain `item`.
    ///
    /// # Errors
    ///
    /// [`FilterError::TypeMismatch`] if called on a host-hash-mode filter.
    pub fn may_contain(&self, item: &Item<'_>) -> Result<bool, FilterError> {
        if self.mode != Mode::Deterministic {
            return Err(FilterError::TypeMismatch);
        }
        Ok(self.blocks.may_contain(self.seed_of(item)))
    }

    /// Inserts a pre-hashed seed directly -- the host-hash-mode path. Valid
    /// in either mode: a deterministic-mode filter may also be driven by a
    /// raw seed if a caller has already computed one (e.g. a `from_bytes`
    /// round trip under test), but the binding layer only exposes this to
    /// host-hash-mode filters.
    pub fn insert_hash(&mut self, seed: u64) {
        self.blocks.insert(seed);
    }

    /// Looks up a pre-hashed seed directly. See [`Filter::insert_hash`].
    pub fn contains_hash(&self, seed: u64) -> bool {
        self.blocks.may_contain(seed)
    }

    /// Bulk insert from a lazily-iterated, possibly-fallible sequence.
    ///
    /// Iterates `items` once, inserting each successfully-resolved item.
    /// Stops at the first error and returns it; items already inserted
    /// before the failing one remain in the filter (no rollback), per the
    /// bulk-insert contract.
    pub fn extend<I, E>(&mut self, items: I) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = Result<Item<'static>, E>>,
        E: Into<FilterError>,
    {
        for item in items {
            let item = item.map_err(Into::into)?;
            self.insert(item)?;
        }
        Ok(())
    }

    /// Zeroes every bit. Does not resize or change parameters.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// `true` iff no bit is set.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `true` iff `self` and `other` could be combined with [`Filter::union`]:
    /// same capacity, fp_rate, mode, and block count.
    fn params_match(&self, other: &Filter) -> bool {
        self.capacity == other.capacity
            && self.fp_rate == other.fp_rate
            && self.mode == other.mode
            && self.block_count() == other.block_count()
    }

    /// Produces a new filter whose bits are the union of `self` and
    /// `other`'s.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilters`] if the two filters' parameters
    /// differ.
    pub fn union(&self, other: &Filter) -> Result<Filter, FilterError> {
        if !self.params_match(other) {
            tracing::debug!("union rejected: incompatible filter parameters");
            return Err(FilterError::IncompatibleFilters);
        }
        Ok(Filter {
            capacity: self.capacity,
            fp_rate: self.fp_rate,
            mode: self.mode,
            blocks: self.blocks.union(&other.blocks),
        })
    }

    /// Unions `other` into `self` in place.
    ///
    /// # Errors
    ///
    /// [`FilterError::IncompatibleFilters`] if the two filters' parameters
    /// differ.
    pub fn union_in_place(&mut self, other: &Filter) -> Result<(), FilterError> {
        if !self.params_match(other) {
            tracing::debug!("union_in_place rejected: incompatible filter parameters");
            return Err(FilterError::IncompatibleFilters);
        }
        self.blocks.union_in_place(&other.blocks);
        Ok(())
    }
}

impl PartialEq for Filter {
    /// All of `(capacity, fp_rate, mode, block_count, blocks)` must match
    /// bit-exactly. Filters in different modes are never equal, even when
    /// both are empty.
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.fp_rate == other.fp_rate
            && self.mode == other.mode
            && self.blocks == other.blocks
    }
}
impl Eq for Filter {}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("capacity", &self.capacity)
            .field("fp_rate", &self.fp_rate)
            .field("mode", &self.mode)
            .field("block_count", &self.block_count())
            .field("is_empty", &self.is_empty())
            .finish()
    }
}
