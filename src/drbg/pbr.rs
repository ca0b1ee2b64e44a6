//! Passphrase-based DRBG (PBR): an internal buffer of configurable size
//! (≥64 bytes) filled by PBKDF2 over `(passphrase, salt)` at a configured
//! iteration count and digest; `generate` drains the buffer and refills it
//! by re-running PBKDF2 over a counter-extended salt once exhausted
//! (spec.md §4.6 — "refilling by advancing PBKDF2 state").

use super::Drbg;
use crate::digest::DigestKind;
use crate::error::{CoreError, CoreResult};
use crate::kdf::Pbkdf2;
use alloc::vec::Vec;
use zeroize::Zeroize;

const MIN_BUFFER_SIZE: usize = 64;

/// The minimum passphrase length spec.md §4.6 requires per digest, grounded
/// in the original's `PBR::GetMinimumSeedSize` (`CEX/PBR.cpp`) digest
/// switch.
pub fn minimum_seed_size(kind: DigestKind) -> usize {
    match kind {
        DigestKind::Blake256 => 64,
        DigestKind::Blake512 => 128,
        DigestKind::Keccak256 => 136,
        DigestKind::Keccak512 => 72,
        DigestKind::Sha256 => 55,
        DigestKind::Sha512 => 111,
        DigestKind::Skein256 => 32,
        DigestKind::Skein512 => 64,
        DigestKind::Skein1024 => 128,
    }
}

pub struct Pbr {
    kind: DigestKind,
    kdf: Pbkdf2,
    salt: Vec<u8>,
    iterations: u32,
    buffer: Vec<u8>,
    pos: usize,
    refill_counter: u64,
}

impl Pbr {
    /// Keys a new PBR instance. `passphrase` must meet `minimum_seed_size`
    /// for `kind`; `buffer_size` must be at least 64.
    pub fn new(kind: DigestKind, passphrase: &[u8], salt: &[u8], iterations: u32, buffer_size: usize) -> CoreResult<Self> {
        crate::error::ensure!(iterations >= 1, CoreError::InvalidArgument("PBR iteration count must be at least 1"));
        crate::error::ensure!(
            buffer_size >= MIN_BUFFER_SIZE,
            CoreError::InvalidArgument("PBR buffer size must be at least 64 bytes")
        );
        crate::error::ensure!(
            passphrase.len() >= minimum_seed_size(kind),
            CoreError::InvalidArgument("PBR passphrase shorter than the digest's minimum seed size")
        );

        let mut pbr = Pbr {
            kind,
            kdf: Pbkdf2::new(kind, passphrase),
            salt: salt.to_vec(),
            iterations,
            buffer: Vec::new(),
            pos: 0,
            refill_counter: 0,
        };
        pbr.refill(buffer_size)?;
        Ok(pbr)
    }

    fn refill(&mut self, buffer_size: usize) -> CoreResult<()> {
        let mut salt_ext = self.salt.clone();
        salt_ext.extend_from_slice(&self.refill_counter.to_be_bytes());
        self.buffer = self.kdf.derive(&salt_ext, self.iterations, buffer_size)?;
        self.pos = 0;
        self.refill_counter = self.refill_counter.wrapping_add(1);
        Ok(())
    }
}

impl Drbg for Pbr {
    /// Rekeys the PBKDF2 passphrase and refills the buffer from a fresh
    /// counter state, preserving the previously configured buffer size.
    fn update(&mut self, seed: &[u8]) -> CoreResult<()> {
        crate::error::ensure!(
            seed.len() >= minimum_seed_size(self.kind),
            CoreError::InvalidArgument("PBR reseed passphrase shorter than the digest's minimum seed size")
        );
        let buffer_size = self.buffer.len().max(MIN_BUFFER_SIZE);
        self.kdf = Pbkdf2::new(self.kind, seed);
        self.refill_counter = 0;
        self.refill(buffer_size)
    }

    fn generate(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("PBR generate range out of bounds")
        );
        let buffer_size = self.buffer.len();
        crate::error::ensure!(buffer_size > 0, CoreError::InvalidState("PBR generate called before Initialize"));

        let mut pos = 0;
        while pos < length {
            if self.pos >= buffer_size {
                self.refill(buffer_size)?;
            }
            let take = (buffer_size - self.pos).min(length - pos);
            out[offset + pos..offset + pos + take].copy_from_slice(&self.buffer[self.pos..self.pos + take]);
            self.pos += take;
            pos += take;
        }
        Ok(())
    }

    /// PBR has no separate reseed-interval notion distinct from its own
    /// buffer-refill cycle: it "reseeds" (re-runs PBKDF2) every
    /// `buffer_size` bytes of output by construction.
    fn reseed_interval_bytes(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn destroy(&mut self) {
        self.buffer.zeroize();
        self.buffer.clear();
        self.pos = 0;
    }
}

impl Drop for Pbr {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passphrase(kind: DigestKind) -> Vec<u8> {
        alloc::vec![0x5au8; minimum_seed_size(kind)]
    }

    #[test]
    fn pbr_generates_requested_length_across_refills() {
        let mut pbr = Pbr::new(DigestKind::Sha256, &passphrase(DigestKind::Sha256), b"salt", 1, 64).unwrap();
        let mut out = alloc::vec![0u8; 200];
        pbr.generate(&mut out, 0, 200).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn pbr_is_deterministic_given_same_inputs() {
        let pass = passphrase(DigestKind::Sha256);
        let mut a = Pbr::new(DigestKind::Sha256, &pass, b"salt", 2, 64).unwrap();
        let mut b = Pbr::new(DigestKind::Sha256, &pass, b"salt", 2, 64).unwrap();
        let mut out_a = alloc::vec![0u8; 150];
        let mut out_b = alloc::vec![0u8; 150];
        a.generate(&mut out_a, 0, 150).unwrap();
        b.generate(&mut out_b, 0, 150).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn pbr_rejects_short_passphrase() {
        assert!(Pbr::new(DigestKind::Sha256, b"short", b"salt", 1, 64).is_err());
    }

    #[test]
    fn pbr_rejects_undersized_buffer() {
        assert!(Pbr::new(DigestKind::Sha256, &passphrase(DigestKind::Sha256), b"salt", 1, 32).is_err());
    }

    #[test]
    fn pbr_rejects_zero_iterations() {
        assert!(Pbr::new(DigestKind::Sha256, &passphrase(DigestKind::Sha256), b"salt", 0, 64).is_err());
    }
}
