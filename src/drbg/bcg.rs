//! Block-counter DRBG (BCG): the block cipher run in CTR mode over a
//! 512-bit key path, self-reseeding after a configurable output interval
//! by drawing extra keystream and rekeying from it (spec.md §4.6, the
//! NIST SP 800-90A `CTR_DRBG` update construction applied to RHX rather
//! than delegating to `mode::Ctr` — BCG owns its cipher outright, and a
//! struct holding both an owned `Rhx` and a `Ctr<'_>` borrowing it would be
//! self-referential, so the counter increment is reimplemented directly
//! here against the same `utils::endian::increment_be` primitive).

use super::Drbg;
use crate::cipher::{BlockCipher, Direction, KeySchedule, Rhx};
use crate::error::{CoreError, CoreResult};
use crate::utils::endian::increment_be;
use alloc::vec::Vec;
use zeroize::Zeroize;

const KEY_SIZE: usize = 64;
const BLOCK_SIZE: usize = 16;
const MIN_SEED_LEN: usize = KEY_SIZE + BLOCK_SIZE;

/// Block-counter DRBG state. `cipher` is `None` before the first
/// `Initialize`/`Update` call and after `Destroy`.
pub struct Bcg {
    cipher: Option<Rhx>,
    counter: Vec<u8>,
    bytes_generated: u64,
    reseed_interval_bytes: u64,
}

impl Bcg {
    /// Builds an unseeded generator. `reseed_interval_bytes` bounds how much
    /// output may be drawn from one key before BCG self-reseeds by drawing
    /// extra keystream and rekeying from it.
    pub fn new(reseed_interval_bytes: u64) -> Self {
        Bcg {
            cipher: None,
            counter: Vec::new(),
            bytes_generated: 0,
            reseed_interval_bytes,
        }
    }

    /// Builds and immediately seeds a generator from `seed` (spec.md §4.6:
    /// "Initialize(seed[, nonce, info])").
    pub fn new_initialized(seed: &[u8], reseed_interval_bytes: u64) -> CoreResult<Self> {
        let mut bcg = Bcg::new(reseed_interval_bytes);
        bcg.update(seed)?;
        Ok(bcg)
    }

    fn cipher(&self) -> CoreResult<&Rhx> {
        self.cipher.as_ref().ok_or(CoreError::InvalidState("BCG generate called before Initialize"))
    }

    /// Produces one keystream block and advances the counter.
    fn next_block(&mut self) -> CoreResult<[u8; BLOCK_SIZE]> {
        let mut block = [0u8; BLOCK_SIZE];
        self.cipher()?.encrypt_block(&self.counter, &mut block)?;
        increment_be(&mut self.counter);
        Ok(block)
    }

    /// NIST SP 800-90A `CTR_DRBG`-style self-reseed: draw `KEY_SIZE +
    /// BLOCK_SIZE` bytes of fresh keystream from the current key, then
    /// rekey from it. RHX accepts any byte string as a key, so the drawn
    /// keystream can be fed straight back in as the next key without an
    /// intermediate digest step.
    fn reseed_from_keystream(&mut self) -> CoreResult<()> {
        let mut material = Vec::with_capacity(MIN_SEED_LEN);
        while material.len() < MIN_SEED_LEN {
            material.extend_from_slice(&self.next_block()?);
        }
        let (key, iv) = material.split_at(KEY_SIZE);
        self.cipher = Some(Rhx::new(Direction::Encrypt, key, BLOCK_SIZE, KeySchedule::Standard)?);
        self.counter = iv.to_vec();
        self.bytes_generated = 0;
        material.zeroize();
        Ok(())
    }
}

impl Drbg for Bcg {
    /// `seed` must be at least `KEY_SIZE + BLOCK_SIZE` (80) bytes: the first
    /// 64 become the 512-bit key, the next 16 the initial counter value.
    /// Any bytes beyond that are ignored (a caller wanting to mix in a
    /// nonce/info string concatenates it into `seed` before calling, per
    /// spec.md §4.6's bracketed `Initialize(seed[, nonce, info])`).
    fn update(&mut self, seed: &[u8]) -> CoreResult<()> {
        crate::error::ensure!(
            seed.len() >= MIN_SEED_LEN,
            CoreError::InvalidArgument("BCG seed must be at least 80 bytes (64-byte key + 16-byte counter)")
        );
        let (key, iv) = seed.split_at(KEY_SIZE);
        self.cipher = Some(Rhx::new(Direction::Encrypt, key, BLOCK_SIZE, KeySchedule::Standard)?);
        self.counter = iv[..BLOCK_SIZE].to_vec();
        self.bytes_generated = 0;
        Ok(())
    }

    fn generate(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("BCG generate range out of bounds")
        );
        self.cipher()?;

        let mut pos = 0;
        while pos < length {
            if self.bytes_generated >= self.reseed_interval_bytes {
                self.reseed_from_keystream()?;
            }
            let block = self.next_block()?;
            let take = BLOCK_SIZE.min(length - pos);
            out[offset + pos..offset + pos + take].copy_from_slice(&block[..take]);
            self.bytes_generated += take as u64;
            pos += take;
        }
        Ok(())
    }

    fn reseed_interval_bytes(&self) -> u64 {
        self.reseed_interval_bytes
    }

    fn destroy(&mut self) {
        self.counter.zeroize();
        self.counter.clear();
        self.cipher = None;
        self.bytes_generated = 0;
    }
}

impl Drop for Bcg {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> Vec<u8> {
        alloc::vec![byte; MIN_SEED_LEN]
    }

    #[test]
    fn bcg_generates_requested_length() {
        let mut bcg = Bcg::new_initialized(&seed(0x11), 1 << 20).unwrap();
        let mut out = alloc::vec![0u8; 100];
        bcg.generate(&mut out, 0, 100).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn bcg_is_deterministic_given_same_seed() {
        let mut a = Bcg::new_initialized(&seed(0x42), 1 << 20).unwrap();
        let mut b = Bcg::new_initialized(&seed(0x42), 1 << 20).unwrap();
        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.generate(&mut out_a, 0, 64).unwrap();
        b.generate(&mut out_b, 0, 64).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn bcg_self_reseeds_past_interval_without_error() {
        let mut bcg = Bcg::new_initialized(&seed(0x07), 32).unwrap();
        let mut out = alloc::vec![0u8; 256];
        bcg.generate(&mut out, 0, 256).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn bcg_rejects_short_seed() {
        let mut bcg = Bcg::new(1 << 20);
        assert!(bcg.update(&[0u8; 10]).is_err());
    }

    #[test]
    fn bcg_rejects_generate_before_initialize() {
        let mut bcg = Bcg::new(1 << 20);
        let mut out = [0u8; 16];
        assert!(bcg.generate(&mut out, 0, 16).is_err());
    }

    #[test]
    fn bcg_destroy_then_generate_errors() {
        let mut bcg = Bcg::new_initialized(&seed(0x09), 1 << 20).unwrap();
        bcg.destroy();
        let mut out = [0u8; 16];
        assert!(bcg.generate(&mut out, 0, 16).is_err());
    }
}
