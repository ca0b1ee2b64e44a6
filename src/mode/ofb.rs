//! Output feedback (spec.md §4.2): `s_i = E(k, s_{i-1})`, `c_i = p_i XOR
//! s_i`, `s_{-1} = IV`. Fully serial; the keystream never depends on the
//! plaintext, so encrypt and decrypt are the same operation. Any positive
//! length is accepted, with the trailing partial block XORed against a
//! truncated keystream block without consuming it for the next call.

use super::{require_block_sized_iv, require_range, CipherMode};
use crate::cipher::BlockCipher;
use crate::error::{CoreError, CoreResult};
use crate::utils::xor::xor_in_place;
use alloc::vec::Vec;

/// OFB mode over a borrowed, already-keyed `BlockCipher`.
pub struct Ofb<'a> {
    cipher: &'a dyn BlockCipher,
    state: Vec<u8>,
}

impl<'a> Ofb<'a> {
    /// Keys a new OFB instance. `iv` must be exactly one block long. There
    /// is no `encrypt` flag: OFB's keystream generation is identical in
    /// both directions, only the final XOR target differs, and that
    /// distinction is meaningless at this layer (plaintext XOR keystream
    /// equals ciphertext either way).
    pub fn new(cipher: &'a dyn BlockCipher, iv: &[u8]) -> CoreResult<Self> {
        require_block_sized_iv(iv, cipher.block_size())?;
        Ok(Ofb {
            cipher,
            state: iv.to_vec(),
        })
    }
}

impl CipherMode for Ofb<'_> {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn transform(
        &mut self,
        input: &[u8],
        in_offset: usize,
        output: &mut [u8],
        out_offset: usize,
        length: usize,
    ) -> CoreResult<()> {
        crate::error::ensure!(length > 0, CoreError::InvalidArgument("OFB transform length must be positive"));
        require_range(input.len(), in_offset, length, "OFB input range out of bounds")?;
        require_range(output.len(), out_offset, length, "OFB output range out of bounds")?;

        let bs = self.block_size();
        let input = &input[in_offset..in_offset + length];
        let output = &mut output[out_offset..out_offset + length];

        let mut pos = 0;
        while pos < length {
            let take = bs.min(length - pos);
            let mut keystream = alloc::vec![0u8; bs];
            self.cipher.encrypt_block(&self.state, &mut keystream)?;
            if take == bs {
                self.state = keystream.clone();
            }
            output[pos..pos + take].copy_from_slice(&input[pos..pos + take]);
            xor_in_place(&mut output[pos..pos + take], &keystream[..take]);
            pos += take;
        }
        Ok(())
    }
}
