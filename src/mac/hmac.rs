//! HMAC (RFC 2104 / FIPS 198-1), generic over any boxed `Digest`.

use super::Mac;
use crate::digest::{Digest, DigestKind};
use crate::error::{CoreError, CoreResult};
use zeroize::Zeroize;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC keyed with an arbitrary-length key over a chosen digest. The key is
/// hashed down to the block size if it is longer than the digest's block
/// size, and zero-padded if shorter, per RFC 2104 §2.
pub struct Hmac {
    digest: alloc::boxed::Box<dyn Digest + Send>,
    kind: DigestKind,
    inner_pad: alloc::vec::Vec<u8>,
    outer_pad: alloc::vec::Vec<u8>,
}

impl Hmac {
    /// Keys a new HMAC instance. `key` may be any length.
    pub fn new(kind: DigestKind, key: &[u8]) -> CoreResult<Self> {
        let block_size = kind.block_size();
        let mut digest = kind.create();
        let mut key_block = alloc::vec![0u8; block_size];
        if key.len() > block_size {
            let mut hashed = alloc::vec![0u8; kind.output_size()];
            digest.compute_hash(key, &mut hashed)?;
            key_block[..hashed.len()].copy_from_slice(&hashed);
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut inner_pad = key_block.clone();
        for b in inner_pad.iter_mut() {
            *b ^= IPAD;
        }
        let mut outer_pad = key_block;
        for b in outer_pad.iter_mut() {
            *b ^= OPAD;
        }

        digest.block_update(&inner_pad, 0, inner_pad.len())?;

        Ok(Hmac {
            digest,
            kind,
            inner_pad,
            outer_pad,
        })
    }
}

impl Mac for Hmac {
    fn mac_size(&self) -> usize {
        self.kind.output_size()
    }

    fn block_update(&mut self, input: &[u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= input.len(),
            CoreError::InvalidArgument("block_update range out of bounds")
        );
        self.digest.block_update(input, offset, length)
    }

    fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize> {
        let inner_size = self.kind.output_size();
        crate::error::ensure!(
            out.len() >= offset + inner_size,
            CoreError::InvalidArgument("output buffer too small for HMAC tag")
        );
        let mut inner_digest = alloc::vec![0u8; inner_size];
        self.digest.do_final(&mut inner_digest, 0)?;

        self.digest.block_update(&self.outer_pad, 0, self.outer_pad.len())?;
        self.digest.block_update(&inner_digest, 0, inner_digest.len())?;
        self.digest.do_final(&mut out[offset..offset + inner_size], 0)?;

        self.reset();
        Ok(inner_size)
    }

    fn reset(&mut self) {
        self.digest.reset();
        let _ = self.digest.block_update(&self.inner_pad, 0, self.inner_pad.len());
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        self.inner_pad.zeroize();
        self.outer_pad.zeroize();
    }
}
