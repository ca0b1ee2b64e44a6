//! Electronic codebook: every block is transformed independently of every
//! other (spec.md §4.2). The common `Initialize(encrypt_flag, key, iv)`
//! contract's `iv` is meaningless here since there is no chaining, so the
//! constructor omits it rather than accepting and silently ignoring one.

use super::{require_range, CipherMode};
use crate::cipher::BlockCipher;
use crate::error::{CoreError, CoreResult};

/// ECB mode over a borrowed, already-keyed `BlockCipher`.
pub struct Ecb<'a> {
    cipher: &'a dyn BlockCipher,
    encrypt: bool,
}

impl<'a> Ecb<'a> {
    /// Wraps `cipher`. `encrypt` selects the direction this instance
    /// transforms in, independent of whatever direction `cipher` itself
    /// was keyed with (every `BlockCipher` exposes both `encrypt_block`
    /// and `decrypt_block` regardless of its own configured direction).
    #[must_use]
    pub fn new(cipher: &'a dyn BlockCipher, encrypt: bool) -> Self {
        Ecb { cipher, encrypt }
    }
}

impl CipherMode for Ecb<'_> {
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
        let bs = self.block_size();
        crate::error::ensure!(
            length > 0 && length % bs == 0,
            CoreError::InvalidArgument("ECB transform length must be a positive multiple of the block size")
        );
        require_range(input.len(), in_offset, length, "ECB input range out of bounds")?;
        require_range(output.len(), out_offset, length, "ECB output range out of bounds")?;

        let mut pos = 0;
        while pos < length {
            let src = &input[in_offset + pos..in_offset + pos + bs];
            let dst = &mut output[out_offset + pos..out_offset + pos + bs];
            if self.encrypt {
                self.cipher.encrypt_block(src, dst)?;
            } else {
                self.cipher.decrypt_block(src, dst)?;
            }
            pos += bs;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{Direction, KeySchedule, Rhx};

    #[test]
    fn ecb_round_trips_two_blocks() {
        let key = [0x2bu8; 16];
        let pt: [u8; 32] = core::array::from_fn(|i| i as u8);

        let enc_cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut enc = Ecb::new(&enc_cipher, true);
        let mut ct = [0u8; 32];
        enc.transform(&pt, 0, &mut ct, 0, 32).unwrap();

        let dec_cipher = Rhx::new(Direction::Decrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut dec = Ecb::new(&dec_cipher, false);
        let mut rt = [0u8; 32];
        dec.transform(&ct, 0, &mut rt, 0, 32).unwrap();
        assert_eq!(rt, pt);

        // ECB blocks are independent: identical plaintext blocks yield identical ciphertext blocks.
        let pt2 = [pt[0..16].to_vec(), pt[0..16].to_vec()].concat();
        let mut ct2 = [0u8; 32];
        enc.transform(&pt2, 0, &mut ct2, 0, 32).unwrap();
        assert_eq!(ct2[0..16], ct2[16..32]);
    }

    #[test]
    fn ecb_rejects_non_block_multiple_length() {
        let key = [0u8; 16];
        let cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut mode = Ecb::new(&cipher, true);
        let pt = [0u8; 20];
        let mut ct = [0u8; 20];
        assert!(mode.transform(&pt, 0, &mut ct, 0, 20).is_err());
    }
}
