//! Block-cipher modes of operation: ECB, CBC, CFB, OFB and a parallelizable
//! CTR mode, layered over any `BlockCipher` (spec.md §4.2). Every mode is
//! written against the `BlockCipher` trait from `crate::cipher` rather than
//! the concrete `Rhx` type, the same generalization the digest layer applies
//! to the MAC/KDF layers above it.

mod cbc;
mod cfb;
mod ctr;
mod ecb;
mod ofb;

pub use cbc::Cbc;
pub use cfb::Cfb;
pub use ctr::Ctr;
pub use ecb::Ecb;
pub use ofb::Ofb;

use crate::error::{CoreError, CoreResult};

/// Common contract for every mode of operation (spec.md §4.2): a fixed
/// block size and a `transform` over an explicit `(offset, length)` window
/// of input/output, so callers never need to slice their buffers first.
pub trait CipherMode {
    /// The underlying cipher's block size. ECB and CBC require `length`
    /// passed to `transform` to be a positive multiple of this; CFB, OFB
    /// and CTR accept any positive length and XOR the trailing partial
    /// block against a truncated keystream block.
    fn block_size(&self) -> usize;

    /// Encrypts or decrypts `input[in_offset..in_offset+length]` into
    /// `output[out_offset..out_offset+length]`, continuing the chaining
    /// state left over from any prior call — spec.md §5's ordering
    /// guarantee that sequential `Transform` calls equal one call over the
    /// concatenated input.
    fn transform(
        &mut self,
        input: &[u8],
        in_offset: usize,
        output: &mut [u8],
        out_offset: usize,
        length: usize,
    ) -> CoreResult<()>;
}

/// The IV must be exactly one block long (spec.md §3's "Initialization
/// invariant"); shared by every chained mode's constructor.
pub(crate) fn require_block_sized_iv(iv: &[u8], block_size: usize) -> CoreResult<()> {
    crate::error::ensure!(
        iv.len() == block_size,
        CoreError::InvalidArgument("IV must be exactly one block in length")
    );
    Ok(())
}

pub(crate) fn require_range(len: usize, offset: usize, length: usize, what: &'static str) -> CoreResult<()> {
    crate::error::ensure!(offset + length <= len, CoreError::InvalidArgument(what));
    Ok(())
}
