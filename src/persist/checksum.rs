//! CRC32 checksum of saved documents
//!
//! Uses CRC32 (IEEE polynomial). Reported with every save so two saves of
//! the same rows can be compared without reading the file back.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
