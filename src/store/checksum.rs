//! CRC32 checksums for snapshot files
//!
//! Uses CRC32 (IEEE polynomial). A snapshot whose body does not match its
//! recorded checksum is refused on load.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected checksum.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_detects_single_bit_flip() {
        let mut body = br#"{"commit":3,"records":[]}"#.to_vec();
        let original = compute_checksum(&body);
        body[5] ^= 0x01;
        assert_ne!(original, compute_checksum(&body));
    }

    #[test]
    fn test_verify_checksum() {
        let body = b"herd snapshot";
        let checksum = compute_checksum(body);
        assert!(verify_checksum(body, checksum));
        assert!(!verify_checksum(body, checksum ^ 1));
    }
}
