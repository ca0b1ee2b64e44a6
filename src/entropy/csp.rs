//! OS CSPRNG provider (CSP): reads the platform cryptographic RNG directly
//! via `rand_core::OsRng` (spec.md §4.7 "OS CSPRNG provider"). Requires the
//! `std` feature, the same way the teacher gates its own `OsRng` usage
//! behind `rand_core/getrandom`.

use super::EntropyProvider;
use crate::error::{CoreError, CoreResult};
use rand_core::{OsRng, RngCore};

/// Stateless wrapper around `rand_core::OsRng`. Holds no buffers of its own
/// to wipe on `destroy`; `is_available` always reports `true` since a
/// failure surfaces as an error from the underlying `getrandom` call rather
/// than a sticky unavailable state (unlike RDP's retry-budget exhaustion).
#[derive(Default)]
pub struct Csp {
    destroyed: bool,
}

impl Csp {
    pub fn new() -> Self {
        Csp { destroyed: false }
    }
}

impl EntropyProvider for Csp {
    fn get_bytes(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("CSP get_bytes range out of bounds")
        );
        crate::error::ensure!(!self.destroyed, CoreError::InvalidState("CSP used after Destroy"));

        OsRng
            .try_fill_bytes(&mut out[offset..offset + length])
            .map_err(|_| CoreError::EntropyUnavailable("OS CSPRNG provider failed"))
    }

    fn reset(&mut self) {}

    fn is_available(&self) -> bool {
        !self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csp_fills_requested_length() {
        let mut csp = Csp::new();
        let mut out = [0u8; 32];
        csp.get_bytes(&mut out, 0, 32).unwrap();
        // Not a statistical test, just a sanity check that something was
        // written rather than leaving the buffer untouched.
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn csp_unavailable_after_destroy() {
        let mut csp = Csp::new();
        csp.destroy();
        assert!(!csp.is_available());
        let mut out = [0u8; 4];
        assert!(csp.get_bytes(&mut out, 0, 4).is_err());
    }
}
