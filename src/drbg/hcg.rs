//! HMAC DRBG (HCG): NIST SP 800-90A's `Hash_DRBG`-adjacent HMAC
//! construction. State `(K, V)`; the `Update` function is `K ← HMAC(K, V ‖
//! 0x00 ‖ data)`, `V ← HMAC(K, V)`, repeated once more with `0x01` in place
//! of `0x00` whenever `data` is non-empty (spec.md §4.6).

use super::Drbg;
use crate::digest::DigestKind;
use crate::error::{CoreError, CoreResult};
use crate::mac::{Hmac, Mac};
use alloc::vec::Vec;
use zeroize::Zeroize;

pub struct Hcg {
    kind: DigestKind,
    k: Vec<u8>,
    v: Vec<u8>,
    bytes_generated: u64,
    reseed_interval_bytes: u64,
}

impl Hcg {
    pub fn new(kind: DigestKind, reseed_interval_bytes: u64) -> Self {
        Hcg {
            kind,
            k: Vec::new(),
            v: Vec::new(),
            bytes_generated: 0,
            reseed_interval_bytes,
        }
    }

    pub fn new_initialized(kind: DigestKind, seed: &[u8], reseed_interval_bytes: u64) -> CoreResult<Self> {
        let mut hcg = Hcg::new(kind, reseed_interval_bytes);
        hcg.update(seed)?;
        Ok(hcg)
    }

    /// The `HMAC_DRBG` `Update(provided_data)` primitive (NIST SP 800-90A
    /// §10.1.2.2). Called with empty `data` to refresh `V` without mixing in
    /// new material (the post-`Generate` step, and this crate's self-reseed
    /// interval trigger).
    fn hmac_drbg_update(&mut self, data: &[u8]) -> CoreResult<()> {
        let output_size = self.kind.output_size();

        let mut mac = Hmac::new(self.kind, &self.k)?;
        mac.block_update(&self.v, 0, self.v.len())?;
        mac.block_update(&[0x00], 0, 1)?;
        mac.block_update(data, 0, data.len())?;
        let mut k_next = alloc::vec![0u8; output_size];
        mac.do_final(&mut k_next, 0)?;
        self.k = k_next;

        let mut mac = Hmac::new(self.kind, &self.k)?;
        mac.block_update(&self.v, 0, self.v.len())?;
        let mut v_next = alloc::vec![0u8; output_size];
        mac.do_final(&mut v_next, 0)?;
        self.v = v_next;

        if data.is_empty() {
            return Ok(());
        }

        let mut mac = Hmac::new(self.kind, &self.k)?;
        mac.block_update(&self.v, 0, self.v.len())?;
        mac.block_update(&[0x01], 0, 1)?;
        mac.block_update(data, 0, data.len())?;
        let mut k_next = alloc::vec![0u8; output_size];
        mac.do_final(&mut k_next, 0)?;
        self.k = k_next;

        let mut mac = Hmac::new(self.kind, &self.k)?;
        mac.block_update(&self.v, 0, self.v.len())?;
        let mut v_next = alloc::vec![0u8; output_size];
        mac.do_final(&mut v_next, 0)?;
        self.v = v_next;
        Ok(())
    }
}

impl Drbg for Hcg {
    /// Instantiates `K = 0x00...00`, `V = 0x01...01` (both `output_size`
    /// bytes), then folds `seed` in via `Update`.
    fn update(&mut self, seed: &[u8]) -> CoreResult<()> {
        crate::error::ensure!(!seed.is_empty(), CoreError::InvalidArgument("HCG seed must not be empty"));
        let output_size = self.kind.output_size();
        self.k = alloc::vec![0x00u8; output_size];
        self.v = alloc::vec![0x01u8; output_size];
        self.bytes_generated = 0;
        self.hmac_drbg_update(seed)
    }

    fn generate(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("HCG generate range out of bounds")
        );
        crate::error::ensure!(!self.k.is_empty(), CoreError::InvalidState("HCG generate called before Initialize"));

        let output_size = self.kind.output_size();
        let mut pos = 0;
        while pos < length {
            if self.bytes_generated >= self.reseed_interval_bytes {
                let extra = self.v.clone();
                self.hmac_drbg_update(&extra)?;
                self.bytes_generated = 0;
            }
            let mut mac = Hmac::new(self.kind, &self.k)?;
            mac.block_update(&self.v, 0, self.v.len())?;
            let mut v_next = alloc::vec![0u8; output_size];
            mac.do_final(&mut v_next, 0)?;
            self.v = v_next;

            let take = output_size.min(length - pos);
            out[offset + pos..offset + pos + take].copy_from_slice(&self.v[..take]);
            self.bytes_generated += take as u64;
            pos += take;
        }
        // NIST SP 800-90A's post-Generate state refresh: mixes no new
        // material in (empty `data`), just re-derives K/V from the last V.
        self.hmac_drbg_update(&[])
    }

    fn reseed_interval_bytes(&self) -> u64 {
        self.reseed_interval_bytes
    }

    fn destroy(&mut self) {
        self.k.zeroize();
        self.k.clear();
        self.v.zeroize();
        self.v.clear();
        self.bytes_generated = 0;
    }
}

impl Drop for Hcg {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hcg_generates_requested_length() {
        let mut hcg = Hcg::new_initialized(DigestKind::Sha256, b"seed material", 1 << 20).unwrap();
        let mut out = alloc::vec![0u8; 100];
        hcg.generate(&mut out, 0, 100).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn hcg_is_deterministic_given_same_seed() {
        let mut a = Hcg::new_initialized(DigestKind::Sha256, b"seed", 1 << 20).unwrap();
        let mut b = Hcg::new_initialized(DigestKind::Sha256, b"seed", 1 << 20).unwrap();
        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.generate(&mut out_a, 0, 64).unwrap();
        b.generate(&mut out_b, 0, 64).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn hcg_self_reseeds_past_interval_without_error() {
        let mut hcg = Hcg::new_initialized(DigestKind::Sha512, b"seed", 20).unwrap();
        let mut out = alloc::vec![0u8; 200];
        hcg.generate(&mut out, 0, 200).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn hcg_rejects_empty_seed() {
        let mut hcg = Hcg::new(DigestKind::Sha256, 1 << 20);
        assert!(hcg.update(b"").is_err());
    }

    #[test]
    fn hcg_rejects_generate_before_initialize() {
        let mut hcg = Hcg::new(DigestKind::Sha256, 1 << 20);
        let mut out = [0u8; 16];
        assert!(hcg.generate(&mut out, 0, 16).is_err());
    }
}
