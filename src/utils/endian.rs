//! Endian conversion helpers. Blake and SHA-2 load their message schedules
//! big-endian; Keccak and Skein load theirs little-endian. Both directions
//! are kept here so each digest picks the one it needs rather than rolling
//! its own `from_be_bytes`/`to_le_bytes` call sites.

#[inline]
pub(crate) fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes(bytes[..4].try_into().expect("read_u32_be: short slice"))
}

#[inline]
pub(crate) fn read_u64_be(bytes: &[u8]) -> u64 {
    u64::from_be_bytes(bytes[..8].try_into().expect("read_u64_be: short slice"))
}

#[inline]
pub(crate) fn write_u32_be(out: &mut [u8], value: u32) {
    out[..4].copy_from_slice(&value.to_be_bytes());
}

#[inline]
pub(crate) fn write_u64_be(out: &mut [u8], value: u64) {
    out[..8].copy_from_slice(&value.to_be_bytes());
}

#[inline]
pub(crate) fn read_u64_le(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(bytes[..8].try_into().expect("read_u64_le: short slice"))
}

#[inline]
pub(crate) fn write_u64_le(out: &mut [u8], value: u64) {
    out[..8].copy_from_slice(&value.to_le_bytes());
}

/// Increments a block-sized buffer by one, treated as a big-endian
/// multi-precision integer. Used by CTR mode's counter and by the
/// block-counter DRBG. Wraps silently at the top of the block, matching
/// spec.md's boundary behavior (`0xFF...FF` -> `0x00...00`).
pub(crate) fn increment_be(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}
