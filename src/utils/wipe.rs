//! Secure wipe: every `Destroy`/`Drop` path in the crate clears key material
//! and round keys through `zeroize` rather than a plain loop a compiler
//! might elide.

use zeroize::Zeroize;

/// Zeroizes a byte buffer in place. Thin wrapper kept so call sites read
/// `secure_wipe(&mut buf)` rather than importing `Zeroize` everywhere.
#[inline]
pub fn secure_wipe(buf: &mut [u8]) {
    buf.zeroize();
}
