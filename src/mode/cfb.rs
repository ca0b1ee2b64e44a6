//! Cipher feedback (spec.md §4.2): `c_i = p_i XOR E(k, c_{i-1})`,
//! `c_{-1} = IV`. Decrypt runs the same `E(k, c_{i-1})` keystream
//! computation, using the *prior ciphertext* block as input regardless of
//! direction (CFB never calls the block cipher's decrypt path). Any
//! positive length is accepted; the final partial block XORs against a
//! truncated keystream block.

use super::{require_block_sized_iv, require_range, CipherMode};
use crate::cipher::BlockCipher;
use crate::error::{CoreError, CoreResult};
use crate::utils::xor::xor_in_place;
use alloc::vec::Vec;

/// CFB mode over a borrowed, already-keyed `BlockCipher`.
pub struct Cfb<'a> {
    cipher: &'a dyn BlockCipher,
    encrypt: bool,
    feedback: Vec<u8>,
}

impl<'a> Cfb<'a> {
    /// Keys a new CFB instance. `iv` must be exactly one block long.
    pub fn new(cipher: &'a dyn BlockCipher, encrypt: bool, iv: &[u8]) -> CoreResult<Self> {
        require_block_sized_iv(iv, cipher.block_size())?;
        Ok(Cfb {
            cipher,
            encrypt,
            feedback: iv.to_vec(),
        })
    }
}

impl CipherMode for Cfb<'_> {
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
        crate::error::ensure!(length > 0, CoreError::InvalidArgument("CFB transform length must be positive"));
        require_range(input.len(), in_offset, length, "CFB input range out of bounds")?;
        require_range(output.len(), out_offset, length, "CFB output range out of bounds")?;

        let bs = self.block_size();
        let input = &input[in_offset..in_offset + length];
        let output = &mut output[out_offset..out_offset + length];

        let mut pos = 0;
        while pos < length {
            let take = bs.min(length - pos);
            let mut keystream = alloc::vec![0u8; bs];
            self.cipher.encrypt_block(&self.feedback, &mut keystream)?;

            let next_feedback = if self.encrypt {
                let mut ct_block = input[pos..pos + take].to_vec();
                xor_in_place(&mut ct_block, &keystream[..take]);
                output[pos..pos + take].copy_from_slice(&ct_block);
                ct_block
            } else {
                let ct_block = input[pos..pos + take].to_vec();
                let mut pt_block = ct_block.clone();
                xor_in_place(&mut pt_block, &keystream[..take]);
                output[pos..pos + take].copy_from_slice(&pt_block);
                ct_block
            };

            // Only a full block's worth of feedback is ever consumed; a
            // trailing partial block cannot appear except as the final
            // chunk of a call, after which there is nothing left to chain.
            if take == bs {
                self.feedback = next_feedback;
            }
            pos += take;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{Direction, KeySchedule, Rhx};

    fn round_trip(pt: &[u8]) {
        let key = [0x3cu8; 16];
        let iv = [0x7eu8; 16];

        let enc_cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut enc = Cfb::new(&enc_cipher, true, &iv).unwrap();
        let mut ct = alloc::vec![0u8; pt.len()];
        enc.transform(pt, 0, &mut ct, 0, pt.len()).unwrap();

        // CFB always uses the cipher's *encrypt* path, even to decrypt.
        let dec_cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut dec = Cfb::new(&dec_cipher, false, &iv).unwrap();
        let mut rt = alloc::vec![0u8; pt.len()];
        dec.transform(&ct, 0, &mut rt, 0, pt.len()).unwrap();
        assert_eq!(rt, pt);
    }

    #[test]
    fn cfb_round_trips_full_blocks() {
        let pt: Vec<u8> = (0u8..64).collect();
        round_trip(&pt);
    }

    #[test]
    fn cfb_round_trips_partial_trailing_block() {
        let pt: Vec<u8> = (0u8..37).collect();
        round_trip(&pt);
    }

    #[test]
    fn cfb_rejects_wrong_iv_length() {
        let key = [0u8; 16];
        let cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        assert!(Cfb::new(&cipher, true, &[0u8; 8]).is_err());
    }
}
