//! Message authentication codes: HMAC (generic over any `Digest`) and CMAC
//! (NIST SP 800-38B, keyed by RHX). Spec.md §4.4.

mod cmac;
mod hmac;

pub use cmac::Cmac;
pub use hmac::Hmac;

use crate::error::CoreResult;
use subtle::ConstantTimeEq;

/// Common contract for both MAC constructions: `Update`, `DoFinal`, `Reset`,
/// matching `Digest`'s shape so callers can treat "a keyed authenticator"
/// uniformly regardless of whether it is hash- or cipher-based.
pub trait Mac {
    /// Output tag size in bytes.
    fn mac_size(&self) -> usize;
    /// Absorbs `input[offset..offset+length]`.
    fn block_update(&mut self, input: &[u8], offset: usize, length: usize) -> CoreResult<()>;
    /// Finalizes the tag into `out[offset..offset+mac_size]`, then resets
    /// back to the just-keyed state (spec.md §3: a MAC's finalize
    /// implicitly re-primes with the same key, not a fresh unkeyed state).
    fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize>;
    /// Restores the just-keyed state without producing a tag.
    fn reset(&mut self);

    /// Finalizes the tag and compares it against `expected` in constant
    /// time (spec.md §5: "final equality comparisons of MAC tags must be
    /// timing-independent"). A length mismatch is rejected by `ct_eq`'s
    /// own length check without comparing any byte content.
    fn verify(&mut self, expected: &[u8]) -> CoreResult<bool> {
        let mut tag = alloc::vec![0u8; self.mac_size()];
        self.do_final(&mut tag, 0)?;
        Ok(bool::from(tag.as_slice().ct_eq(expected)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestKind;

    #[test]
    fn verify_accepts_matching_tag() {
        let mut reference = Hmac::new(DigestKind::Sha256, b"key").unwrap();
        reference.block_update(b"message", 0, 7).unwrap();
        let mut tag = [0u8; 32];
        reference.do_final(&mut tag, 0).unwrap();

        let mut mac = Hmac::new(DigestKind::Sha256, b"key").unwrap();
        mac.block_update(b"message", 0, 7).unwrap();
        assert!(mac.verify(&tag).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_length() {
        let mut mac = Hmac::new(DigestKind::Sha256, b"key").unwrap();
        mac.block_update(b"message", 0, 7).unwrap();
        assert!(!mac.verify(&[0u8; 4]).unwrap());
    }

    #[test]
    fn verify_rejects_tampered_tag() {
        let mut mac = Hmac::new(DigestKind::Sha256, b"key").unwrap();
        mac.block_update(b"message", 0, 7).unwrap();
        let mut bad_tag = [0u8; 32];
        bad_tag[0] = 0xff;
        assert!(!mac.verify(&bad_tag).unwrap());
    }
}
