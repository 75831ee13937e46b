//! Error taxonomy for the Bloom filter engine.
//!
//! One flat enum, mirroring the small closed error sets used elsewhere in
//! this workspace (see `wal::WalError`) rather than a tree of nested error
//! types -- the engine has few distinct failure modes and callers (in
//! particular the language-binding layer) need to map each one onto a
//! specific host-language exception.

use thiserror::Error;

/// Everything that can go wrong when constructing, mutating, or
/// (de)serializing a [`crate::Filter`].
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum FilterError {
    /// `capacity == 0`, or `fp_rate` is not finite and strictly within `(0, 1)`.
    #[error("invalid parameter: capacity must be >= 1 and fp_rate must be in (0, 1)")]
    InvalidParameter,

    /// A deterministic-mode item did not match one of the three supported
    /// kinds (text, bytes, signed integer).
    #[error("unsupported item type for a deterministic-mode filter")]
    UnsupportedType,

    /// A deterministic-mode integer fell outside `i64::MIN..=i64::MAX`.
    #[error("integer out of range for a deterministic-mode filter")]
    OutOfRange,

    /// `union`/`union_in_place`/strict equality requested between filters
    /// whose `(capacity, fp_rate, mode, block_count)` differ.
    #[error("filters have incompatible parameters")]
    IncompatibleFilters,

    /// The argument handed to an operation was not of the expected shape:
    /// not a filter, not iterable, not a byte sequence, or (within the core)
    /// an [`crate::Item`] presented to a host-hash-mode filter's item-based
    /// API, which only accepts pre-hashed seeds.
    #[error("argument type mismatch")]
    TypeMismatch,

    /// `to_bytes` was called on a host-hash-mode filter.
    #[error("host-hash-mode filters cannot be serialized")]
    NotSerializable,

    /// Decoded bytes did not start with the `ABLM` magic.
    #[error("invalid file format: bad magic bytes")]
    InvalidFormat,

    /// Decoded bytes declared a version this build does not recognize.
    #[error("unsupported format version")]
    UnsupportedVersion,

    /// Decoded bytes were shorter than the fixed header, or shorter than
    /// the length implied by the header's `block_count`.
    #[error("truncated input")]
    Truncated,
}
