//! Binary persistence format for deterministic-mode filters.
//!
//! ```text
//! offset  size  field
//! 0       4     magic       ASCII "ABLM"
//! 4       1     version     0x01
//! 5       8     capacity    u64 LE
//! 13      8     fp_rate     f64 LE (IEEE-754 binary64)
//! 21      8     block_count u64 LE
//! 29      32*B  blocks      raw block bytes, LE within each 32-bit lane
//! ```
//!
//! Grounded in the surrounding project's `sstable::format` footer codec:
//! magic + version + little-endian fixed fields via `byteorder`, read back
//! with an explicit version dispatch rather than assuming the newest
//! layout.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Read;

use crate::bits::Blocks;
use crate::error::FilterError;
use crate::filter::{Filter, Mode};

const MAGIC: &[u8; 4] = b"ABLM";
const VERSION: u8 = 0x01;
const HEADER_BYTES: usize = 4 + 1 + 8 + 8 + 8;

/// Serializes `filter` to its on-disk representation.
///
/// # Errors
///
/// [`FilterError::NotSerializable`] if `filter` is in host-hash mode --
/// its bit patterns carry no portable meaning across processes, so
/// persisting them would be meaningless.
pub fn to_bytes(filter: &Filter) -> Result<Vec<u8>, FilterError> {
    if filter.mode() != Mode::Deterministic {
        return Err(FilterError::NotSerializable);
    }

    let block_count = filter.block_count();
    let mut out = Vec::with_capacity(HEADER_BYTES + (block_count * 32) as usize);
    out.extend_from_slice(MAGIC);
    out.write_u8(VERSION).expect("writing to a Vec cannot fail");
    out.write_u64::<LittleEndian>(filter.capacity())
        .expect("writing to a Vec cannot fail");
    out.write_f64::<LittleEndian>(filter.fp_rate())
        .expect("writing to a Vec cannot fail");
    out.write_u64::<LittleEndian>(block_count)
        .expect("writing to a Vec cannot fail");
    out.extend_from_slice(&filter.blocks().to_le_bytes());

    debug_assert_eq!(out.len(), HEADER_BYTES + (block_count * 32) as usize);
    Ok(out)
}

/// Decodes a filter previously produced by [`to_bytes`].
///
/// The resulting filter is always in deterministic mode, regardless of the
/// mode the original filter was constructed with -- host-hash-mode filters
/// can never reach this function's input in the first place, since
/// [`to_bytes`] refuses to serialize them.
///
/// `block_count` is trusted as-is and not re-validated against
/// `(capacity, fp_rate)`; this permits forward-compatible
/// re-parametrisation at the cost of not catching a hand-crafted header
/// whose block count doesn't match what the solver would have chosen.
///
/// # Errors
///
/// - [`FilterError::Truncated`] if `bytes` is shorter than the fixed
///   header, or shorter than the length implied by the header's
///   `block_count`.
/// - [`FilterError::InvalidFormat`] if the magic bytes don't read `ABLM`.
/// - [`FilterError::UnsupportedVersion`] if the version byte isn't `0x01`.
pub fn from_bytes(bytes: &[u8]) -> Result<Filter, FilterError> {
    if bytes.len() < HEADER_BYTES {
        return Err(FilterError::Truncated);
    }

    let mut cursor = bytes;
    let mut magic = [0u8; 4];
    cursor
        .read_exact(&mut magic)
        .map_err(|_| FilterError::Truncated)?;
    if &magic != MAGIC {
        tracing::debug!("rejecting decode: bad magic");
        return Err(FilterError::InvalidFormat);
    }

    let version = cursor.read_u8().map_err(|_| FilterError::Truncated)?;
    if version != VERSION {
        tracing::debug!(version, "rejecting decode: unsupported version");
        return Err(FilterError::UnsupportedVersion);
    }

    let capacity = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| FilterError::Truncated)?;
    let fp_rate = cursor
        .read_f64::<LittleEndian>()
        .map_err(|_| FilterError::Truncated)?;
    let block_count = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| FilterError::Truncated)?;

    let expected_len = HEADER_BYTES as u64 + block_count * 32;
    if bytes.len() as u64 != expected_len {
        return Err(FilterError::Truncated);
    }

    let block_bytes = &bytes[HEADER_BYTES..];
    let blocks = Blocks::from_le_bytes(block_bytes, block_count);
    Ok(Filter::from_raw_parts(
        capacity,
        fp_rate,
        Mode::Deterministic,
        blocks,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Item;

    #[test]
    fn roundtrip_preserves_state_and_membership() {
        let mut f = Filter::new(1000, 0.01, Mode::Deterministic).unwrap();
        f.insert(Item::Text("x")).unwrap();
        f.insert(Item::Text("y")).unwrap();
        f.insert(Item::Text("z")).unwrap();

        let bytes = to_bytes(&f).unwrap();
        assert_eq!(bytes.len() as u64, HEADER_BYTES as u64 + f.block_count() * 32);

        let f2 = from_bytes(&bytes).unwrap();
        assert_eq!(f, f2);
        assert!(f2.may_contain(&Item::Text("x")).unwrap());
        assert!(f2.may_contain(&Item::Text("y")).unwrap());
        assert!(f2.may_contain(&Item::Text("z")).unwrap());
    }

    #[test]
    fn encode_is_deterministic_across_calls() {
        let mut f = Filter::new(500, 0.02, Mode::Deterministic).unwrap();
        f.insert(Item::Int(7)).unwrap();
        assert_eq!(to_bytes(&f).unwrap(), to_bytes(&f).unwrap());
    }

    #[test]
    fn host_hash_mode_is_not_serializable() {
        let f = Filter::new(1000, 0.01, Mode::HostHash).unwrap();
        assert_eq!(to_bytes(&f).unwrap_err(), FilterError::NotSerializable);
    }

    #[test]
    fn decode_rejects_truncated_header() {
        let short = vec![0u8; 10];
        assert_eq!(from_bytes(&short).unwrap_err(), FilterError::Truncated);
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut f = Filter::new(1000, 0.01, Mode::Deterministic).unwrap();
        f.insert(Item::Text("x")).unwrap();
        let mut bytes = to_bytes(&f).unwrap();
        bytes[0] = b'X';
        assert_eq!(from_bytes(&bytes).unwrap_err(), FilterError::InvalidFormat);
    }

    #[test]
    fn decode_rejects_unsupported_version() {
        let mut f = Filter::new(1000, 0.01, Mode::Deterministic).unwrap();
        f.insert(Item::Text("x")).unwrap();
        let mut bytes = to_bytes(&f).unwrap();
        bytes[4] = 0xFF;
        assert_eq!(
            from_bytes(&bytes).unwrap_err(),
            FilterError::UnsupportedVersion
        );
    }

    #[test]
    fn decode_rejects_truncated_body() {
        let mut f = Filter::new(1000, 0.01, Mode::Deterministic).unwrap();
        f.insert(Item::Text("x")).unwrap();
        let bytes = to_bytes(&f).unwrap();
        let truncated = &bytes[..20];
        assert_eq!(
            from_bytes(truncated).unwrap_err(),
            FilterError::Truncated
        );
    }

    #[test]
    fn corrupted_bytes_rejected_and_clean_bytes_roundtrip() {
        let mut f = Filter::new(1000, 0.01, Mode::Deterministic).unwrap();
        f.insert(Item::Text("x")).unwrap();
        f.insert(Item::Text("y")).unwrap();
        f.insert(Item::Text("z")).unwrap();
        let bytes = to_bytes(&f).unwrap();

        let mut corrupt_magic = bytes.clone();
        corrupt_magic[0] = b'X';
        assert_eq!(
            from_bytes(&corrupt_magic).unwrap_err(),
            FilterError::InvalidFormat
        );

        let mut corrupt_version = bytes.clone();
        corrupt_version[4] = 0xFF;
        assert_eq!(
            from_bytes(&corrupt_version).unwrap_err(),
            FilterError::UnsupportedVersion
        );

        let truncated = &bytes[..20];
        assert_eq!(from_bytes(truncated).unwrap_err(), FilterError::Truncated);

        let f2 = from_bytes(&bytes).unwrap();
        assert_eq!(f, f2);
    }

    #[test]
    fn host_hash_mode_to_bytes_is_not_serializable() {
        let f = Filter::new(1000, 0.01, Mode::HostHash).unwrap();
        assert_eq!(to_bytes(&f).unwrap_err(), FilterError::NotSerializable);
    }

    #[test]
    fn decode_trusts_stored_block_count_over_solver() {
        // A hand-crafted header whose block_count doesn't match what the
        // solver would choose for (capacity, fp_rate) must still decode --
        // the codec does not re-derive block_count, by design.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.extend_from_slice(&1000u64.to_le_bytes());
        bytes.extend_from_slice(&0.01f64.to_le_bytes());
        bytes.extend_from_slice(&4u64.to_le_bytes()); // far from the solver's real choice
        bytes.extend_from_slice(&vec![0u8; 4 * 32]);

        let f = from_bytes(&bytes).unwrap();
        assert_eq!(f.block_count(), 4);
        assert_eq!(f.capacity(), 1000);
    }
}
