#![forbid(unsafe_code)]
//! # bloom
//!
//! A split-block Bloom filter (SBBF): a space-efficient probabilistic set
//! for membership testing with no false negatives and a tunable false
//! positive rate, laid out so every insert and lookup touches exactly one
//! cache line.
//!
//! ## Modes
//!
//! A filter is constructed in one of two modes, fixed for its lifetime:
//!
//! - [`Mode::Deterministic`] canonically encodes each item and hashes it
//!   with a fixed, portable hash -- two filters built from the same items
//!   in any order are bit-identical, and the filter can be serialized
//!   ([`codec`]).
//! - [`Mode::HostHash`] takes a caller-supplied 64-bit hash per item
//!   directly. Faster when the caller already has a hash it trusts, but
//!   makes no portability claim and cannot be serialized.
//!
//! ## Example
//!
//! ```
//! use bloom::{Filter, Mode, Item};
//!
//! let mut bf = Filter::new(1000, 0.01, Mode::Deterministic).unwrap();
//! bf.insert(Item::Text("hello")).unwrap();
//! assert!(bf.may_contain(&Item::Text("hello")).unwrap());
//! ```
//!
//! ## Non-goals
//!
//! Counting filters, deletion, resizing after construction, mmap-backed
//! persistence, lock-free concurrent writers, and cryptographic hashing
//! are all out of scope -- see the crate's design notes.
pub mod bits;
pub mod block;
pub mod codec;
pub mod error;
pub mod filter;
pub mod hash;
pub mod params;

pub use codec::{from_bytes, to_bytes};
pub use error::FilterError;
pub use filter::{Filter, Mode};
pub use hash::Item;
