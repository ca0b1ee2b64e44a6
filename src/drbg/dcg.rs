//! Digest-counter DRBG (DCG): output is `H(counter ‖ V)` with internal
//! state `V` and a monotonically increasing counter; `V` is re-folded into
//! `H` with every output block (spec.md §4.6).

use super::Drbg;
use crate::digest::{Digest, DigestKind};
use crate::error::{CoreError, CoreResult};
use alloc::boxed::Box;
use alloc::vec::Vec;
use zeroize::Zeroize;

pub struct Dcg {
    kind: DigestKind,
    digest: Option<Box<dyn Digest + Send>>,
    v: Vec<u8>,
    counter: u64,
    bytes_generated: u64,
    reseed_interval_bytes: u64,
}

impl Dcg {
    pub fn new(kind: DigestKind, reseed_interval_bytes: u64) -> Self {
        Dcg {
            kind,
            digest: None,
            v: Vec::new(),
            counter: 0,
            bytes_generated: 0,
            reseed_interval_bytes,
        }
    }

    pub fn new_initialized(kind: DigestKind, seed: &[u8], reseed_interval_bytes: u64) -> CoreResult<Self> {
        let mut dcg = Dcg::new(kind, reseed_interval_bytes);
        dcg.update(seed)?;
        Ok(dcg)
    }

    fn digest_mut(&mut self) -> CoreResult<&mut (dyn Digest + Send)> {
        self.digest.as_deref_mut().ok_or(CoreError::InvalidState("DCG generate called before Initialize"))
    }

    /// Produces one `H(counter ‖ V)` block and folds it back into `V`.
    fn next_block(&mut self) -> CoreResult<Vec<u8>> {
        let output_size = self.kind.output_size();
        let counter_bytes = self.counter.to_be_bytes();
        let v = self.v.clone();

        let digest = self.digest_mut()?;
        digest.block_update(&counter_bytes, 0, counter_bytes.len())?;
        digest.block_update(&v, 0, v.len())?;
        let mut block = alloc::vec![0u8; output_size];
        digest.do_final(&mut block, 0)?;

        digest.block_update(&v, 0, v.len())?;
        digest.block_update(&block, 0, block.len())?;
        let mut new_v = alloc::vec![0u8; output_size];
        digest.do_final(&mut new_v, 0)?;

        self.v = new_v;
        self.counter = self.counter.wrapping_add(1);
        Ok(block)
    }
}

impl Drbg for Dcg {
    /// Any-length `seed` is folded into the digest-sized internal state `V`
    /// by a single hash pass; the counter resets to zero.
    fn update(&mut self, seed: &[u8]) -> CoreResult<()> {
        crate::error::ensure!(!seed.is_empty(), CoreError::InvalidArgument("DCG seed must not be empty"));
        let mut digest = self.kind.create();
        let mut v = alloc::vec![0u8; self.kind.output_size()];
        digest.compute_hash(seed, &mut v)?;

        self.digest = Some(digest);
        self.v = v;
        self.counter = 0;
        self.bytes_generated = 0;
        Ok(())
    }

    fn generate(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("DCG generate range out of bounds")
        );
        self.digest_mut()?;

        let output_size = self.kind.output_size();
        let mut pos = 0;
        while pos < length {
            if self.bytes_generated >= self.reseed_interval_bytes {
                let fold = self.v.clone();
                self.update(&fold)?;
            }
            let block = self.next_block()?;
            let take = output_size.min(length - pos);
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
        self.v.zeroize();
        self.v.clear();
        self.digest = None;
        self.counter = 0;
        self.bytes_generated = 0;
    }
}

impl Drop for Dcg {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dcg_generates_requested_length() {
        let mut dcg = Dcg::new_initialized(DigestKind::Sha256, b"seed material", 1 << 20).unwrap();
        let mut out = alloc::vec![0u8; 100];
        dcg.generate(&mut out, 0, 100).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn dcg_is_deterministic_given_same_seed() {
        let mut a = Dcg::new_initialized(DigestKind::Sha256, b"seed", 1 << 20).unwrap();
        let mut b = Dcg::new_initialized(DigestKind::Sha256, b"seed", 1 << 20).unwrap();
        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.generate(&mut out_a, 0, 64).unwrap();
        b.generate(&mut out_b, 0, 64).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn dcg_self_reseeds_past_interval_without_error() {
        let mut dcg = Dcg::new_initialized(DigestKind::Keccak256, b"seed", 20).unwrap();
        let mut out = alloc::vec![0u8; 200];
        dcg.generate(&mut out, 0, 200).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn dcg_rejects_empty_seed() {
        let mut dcg = Dcg::new(DigestKind::Sha256, 1 << 20);
        assert!(dcg.update(b"").is_err());
    }

    #[test]
    fn dcg_rejects_generate_before_initialize() {
        let mut dcg = Dcg::new(DigestKind::Sha256, 1 << 20);
        let mut out = [0u8; 16];
        assert!(dcg.generate(&mut out, 0, 16).is_err());
    }
}
