//! SCALE reading helpers for Substrate signing payloads.
//!
//! Compact integers carry their mode in the two low bits of the first byte:
//! `0b00` single byte, `0b01` two bytes, `0b10` four bytes, `0b11` big integer
//! whose remaining length is `(first >> 2) + 4` bytes.

use codec::{Compact, Decode};

/// Splits a compact length prefix off `bytes`, returning the decoded value and
/// the bytes that follow it.
pub fn split_compact_prefix(bytes: &[u8]) -> Result<(u64, &[u8]), codec::Error> {
    let mut input = bytes;
    let Compact(value) = Compact::<u64>::decode(&mut input)?;
    Ok((value, input))
}

/// Decodes a little-endian `u32` from the front of `bytes`.
pub fn read_u32(bytes: &[u8]) -> Result<u32, codec::Error> {
    u32::decode(&mut &bytes[..])
}

#[cfg(test)]
mod tests {
    use codec::Encode;

    use super::*;

    #[test]
    fn single_byte_mode() {
        let (value, rest) = split_compact_prefix(&[0x04, 0xaa]).unwrap();
        assert_eq!(value, 1);
        assert_eq!(rest, &[0xaa]);
    }

    #[test]
    fn two_and_four_byte_modes() {
        let mut bytes = Compact(64u64).encode();
        assert_eq!(bytes, vec![0x01, 0x01]);
        bytes.push(0xbb);
        let (value, rest) = split_compact_prefix(&bytes).unwrap();
        assert_eq!(value, 64);
        assert_eq!(rest, &[0xbb]);

        let mut bytes = Compact(0x4000u64).encode();
        assert_eq!(bytes.len(), 4);
        bytes.push(0xcc);
        let (value, rest) = split_compact_prefix(&bytes).unwrap();
        assert_eq!(value, 0x4000);
        assert_eq!(rest, &[0xcc]);
    }

    #[test]
    fn big_integer_mode() {
        let mut bytes = Compact(1u64 << 32).encode();
        assert_eq!(bytes[0] & 0b11, 0b11);
        bytes.push(0xdd);
        let (value, rest) = split_compact_prefix(&bytes).unwrap();
        assert_eq!(value, 1 << 32);
        assert_eq!(rest, &[0xdd]);
    }

    #[test]
    fn empty_and_truncated_prefixes_fail() {
        assert!(split_compact_prefix(&[]).is_err());
        assert!(split_compact_prefix(&[0x01]).is_err());
        assert!(split_compact_prefix(&[0x02, 0x00]).is_err());
    }

    #[test]
    fn reads_little_endian_u32() {
        assert_eq!(read_u32(&[0x2c, 0x24, 0, 0]).unwrap(), 9260);
        assert!(read_u32(&[0x01, 0x02]).is_err());
    }
}
