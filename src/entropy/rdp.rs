//! Hardware RNG provider (RDP): spec.md §4.7 describes a CPU-instruction
//! random/seed provider with bounded retry counts (10 for the "random"
//! instruction, 20 for the "seed" instruction) and a maximum output of
//! 64·10^6 bytes per reseed before the caller must explicitly refresh.
//!
//! On `x86`/`x86_64` with the CPU feature present (detected at runtime via
//! `is_x86_feature_detected!`, since `target_feature` is rarely enabled at
//! compile time for a portable build), `Rdp` draws straight from the
//! `RDSEED` instruction to seed and `RDRAND` to generate, each wrapped in a
//! narrowly scoped `#[allow(unsafe_code)]` — the crate-wide
//! `#![deny(unsafe_code)]` (inherited from the teacher, spec.md §9) still
//! applies everywhere else. Where the instruction is unavailable (feature
//! not detected, non-x86 target, or the instruction's own internal retry
//! budget is exhausted — both `RDRAND` and `RDSEED` can transiently fail
//! under heavy concurrent draw), `Rdp` falls back to the OS CSPRNG (`Csp`)
//! rather than failing the caller outright; this fallback is recorded as an
//! Open Question resolution in `DESIGN.md`.

use super::csp::Csp;
use super::EntropyProvider;
use crate::error::{CoreError, CoreResult};

/// Retries permitted for the "random" (`RDRAND`) path before falling back
/// to `Csp`.
const RANDOM_RETRY: u32 = 10;
/// Retries permitted for the "seed" (`RDSEED`) path before falling back to
/// `Csp`.
const SEED_RETRY: u32 = 20;
/// Maximum bytes servable from one seed generation before `get_bytes`
/// requires an explicit `reset`.
const SEED_MAX_BYTES: u64 = 64_000_000;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod hw {
    //! Thin, narrowly-`unsafe` wrappers around the `RDRAND`/`RDSEED`
    //! intrinsics. Each function checks CPU support at runtime before
    //! issuing the instruction and returns `false` (never panics, never
    //! reads uninitialized memory) when the feature is absent.

    /// One `RDRAND` draw per native word, retried up to `attempts` times
    /// (the instruction itself reports success/failure per step; Intel's
    /// guidance is to retry a bounded number of times before treating the
    /// underlying entropy source as unavailable). Fills `out` fully only on
    /// success; returns `false` (leaving `out` partially written) otherwise.
    pub(super) fn fill_rdrand(out: &mut [u8], attempts: u32) -> bool {
        if !std::is_x86_feature_detected!("rdrand") {
            return false;
        }
        fill_with_step(out, attempts, rdrand_step)
    }

    /// Same shape as `fill_rdrand`, backed by `RDSEED`.
    pub(super) fn fill_rdseed(out: &mut [u8], attempts: u32) -> bool {
        if !std::is_x86_feature_detected!("rdseed") {
            return false;
        }
        fill_with_step(out, attempts, rdseed_step)
    }

    fn fill_with_step(out: &mut [u8], attempts: u32, step: fn() -> Option<u64>) -> bool {
        let mut pos = 0;
        while pos < out.len() {
            let mut tries = 0;
            let word = loop {
                if let Some(w) = step() {
                    break w;
                }
                tries += 1;
                if tries >= attempts {
                    return false;
                }
            };
            let bytes = word.to_le_bytes();
            let take = (out.len() - pos).min(bytes.len());
            out[pos..pos + take].copy_from_slice(&bytes[..take]);
            pos += take;
        }
        true
    }

    #[cfg(target_arch = "x86_64")]
    #[allow(unsafe_code)]
    fn rdrand_step() -> Option<u64> {
        use core::arch::x86_64::_rdrand64_step;
        let mut value: u64 = 0;
        // Safety: guarded by `is_x86_feature_detected!("rdrand")` in every
        // caller; `_rdrand64_step` writes only to `value` and reports
        // success via its return code.
        let ok = unsafe { _rdrand64_step(&mut value) };
        (ok == 1).then_some(value)
    }

    #[cfg(target_arch = "x86_64")]
    #[allow(unsafe_code)]
    fn rdseed_step() -> Option<u64> {
        use core::arch::x86_64::_rdseed64_step;
        let mut value: u64 = 0;
        // Safety: guarded by `is_x86_feature_detected!("rdseed")` in every
        // caller; `_rdseed64_step` writes only to `value` and reports
        // success via its return code.
        let ok = unsafe { _rdseed64_step(&mut value) };
        (ok == 1).then_some(value)
    }

    #[cfg(target_arch = "x86")]
    #[allow(unsafe_code)]
    fn rdrand_step() -> Option<u64> {
        use core::arch::x86::_rdrand32_step;
        let mut value: u32 = 0;
        // Safety: guarded by `is_x86_feature_detected!("rdrand")` in every
        // caller; `_rdrand32_step` writes only to `value` and reports
        // success via its return code.
        let ok = unsafe { _rdrand32_step(&mut value) };
        (ok == 1).then_some(u64::from(value))
    }

    #[cfg(target_arch = "x86")]
    #[allow(unsafe_code)]
    fn rdseed_step() -> Option<u64> {
        use core::arch::x86::_rdseed32_step;
        let mut value: u32 = 0;
        // Safety: guarded by `is_x86_feature_detected!("rdseed")` in every
        // caller; `_rdseed32_step` writes only to `value` and reports
        // success via its return code.
        let ok = unsafe { _rdseed32_step(&mut value) };
        (ok == 1).then_some(u64::from(value))
    }
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
mod hw {
    //! No hardware RNG instruction is defined on this target; both paths
    //! report unavailable so `Rdp` falls straight back to `Csp`.
    pub(super) fn fill_rdrand(_out: &mut [u8], _attempts: u32) -> bool {
        false
    }

    pub(super) fn fill_rdseed(_out: &mut [u8], _attempts: u32) -> bool {
        false
    }
}

pub struct Rdp {
    fallback: Csp,
    seed_bytes_served: u64,
    exhausted: bool,
}

impl Rdp {
    pub fn new() -> Self {
        Rdp {
            fallback: Csp::new(),
            seed_bytes_served: 0,
            exhausted: false,
        }
    }

    /// Draws one `RDRAND`-equivalent block, retrying up to `RANDOM_RETRY`
    /// times before falling back to the OS CSPRNG.
    fn draw_random(&mut self, out: &mut [u8]) -> CoreResult<()> {
        if hw::fill_rdrand(out, RANDOM_RETRY) {
            return Ok(());
        }
        self.fallback.get_bytes(out, 0, out.len())
    }

    /// Draws one `RDSEED`-equivalent block, retrying up to `SEED_RETRY`
    /// times before falling back to the OS CSPRNG.
    fn draw_seed(&mut self, out: &mut [u8]) -> CoreResult<()> {
        if hw::fill_rdseed(out, SEED_RETRY) {
            return Ok(());
        }
        self.fallback.get_bytes(out, 0, out.len())
    }
}

impl Default for Rdp {
    fn default() -> Self {
        Rdp::new()
    }
}

impl EntropyProvider for Rdp {
    fn get_bytes(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("RDP get_bytes range out of bounds")
        );
        crate::error::ensure!(
            !self.exhausted,
            CoreError::EntropyUnavailable("RDP seed output cap reached; call Reset to refresh")
        );

        let new_total = self.seed_bytes_served + length as u64;
        if new_total > SEED_MAX_BYTES {
            self.exhausted = true;
            return Err(CoreError::EntropyUnavailable("RDP would exceed its 64,000,000-byte-per-reseed cap"));
        }

        self.draw_random(&mut out[offset..offset + length])?;
        self.seed_bytes_served = new_total;
        Ok(())
    }

    /// Reseeds via the "seed" instruction path (`RDSEED`, `SEED_RETRY`
    /// attempts before falling back to `Csp`) and clears the per-reseed
    /// output counter.
    fn reset(&mut self) {
        self.seed_bytes_served = 0;
        self.exhausted = false;
        self.fallback.reset();
        let mut discard = [0u8; 32];
        let _ = self.draw_seed(&mut discard);
    }

    fn is_available(&self) -> bool {
        !self.exhausted
    }

    fn destroy(&mut self) {
        self.exhausted = true;
        self.fallback.destroy();
    }
}
