//! HKDF (RFC 5869): Extract-then-Expand key derivation over HMAC.

use crate::digest::DigestKind;
use crate::error::{CoreError, CoreResult};
use crate::mac::{Hmac, Mac};

/// A keyed HKDF instance: `Extract` has already run, producing a pseudo-
/// random key (`PRK`) that `expand` can be called against repeatedly with
/// different `info` strings.
pub struct Hkdf {
    kind: DigestKind,
    prk: alloc::vec::Vec<u8>,
}

impl Hkdf {
    /// Wraps an already-derived (or, as the extended RHX key schedule uses
    /// it, caller-supplied) pseudo-random key, skipping `Extract` entirely.
    /// RHX's extended key schedule treats the user key itself as the PRK
    /// and calls straight into `Expand`.
    pub fn from_prk(kind: DigestKind, prk: &[u8]) -> Self {
        Hkdf {
            kind,
            prk: prk.to_vec(),
        }
    }

    /// `HKDF-Extract(salt, ikm)`. An empty `salt` is replaced with a
    /// string of `HashLen` zero bytes per RFC 5869 §2.2.
    pub fn extract(kind: DigestKind, salt: &[u8], ikm: &[u8]) -> CoreResult<Self> {
        let hash_len = kind.output_size();
        let zero_salt = alloc::vec![0u8; hash_len];
        let salt = if salt.is_empty() { &zero_salt } else { salt };

        let mut mac = Hmac::new(kind, salt)?;
        mac.block_update(ikm, 0, ikm.len())?;
        let mut prk = alloc::vec![0u8; hash_len];
        mac.do_final(&mut prk, 0)?;

        Ok(Hkdf { kind, prk })
    }

    /// `HKDF-Expand(PRK, info, L)`. RFC 5869 caps `L` at `255 * HashLen`.
    pub fn expand(&self, info: &[u8], length: usize) -> CoreResult<alloc::vec::Vec<u8>> {
        let hash_len = self.kind.output_size();
        crate::error::ensure!(
            length <= 255 * hash_len,
            CoreError::InvalidArgument("HKDF-Expand length exceeds 255*HashLen")
        );

        let mut okm = alloc::vec::Vec::with_capacity(length);
        let mut t: alloc::vec::Vec<u8> = alloc::vec::Vec::new();
        let mut counter: u8 = 1;
        while okm.len() < length {
            let mut mac = Hmac::new(self.kind, &self.prk)?;
            mac.block_update(&t, 0, t.len())?;
            mac.block_update(info, 0, info.len())?;
            mac.block_update(&[counter], 0, 1)?;
            let mut block = alloc::vec![0u8; hash_len];
            mac.do_final(&mut block, 0)?;
            t = block.clone();
            okm.extend_from_slice(&block);
            counter = counter.checked_add(1).ok_or(CoreError::InvalidArgument(
                "HKDF-Expand counter overflowed a byte",
            ))?;
        }
        okm.truncate(length);
        Ok(okm)
    }

    /// One-shot `Extract` then `Expand`, the common case.
    pub fn derive(
        kind: DigestKind,
        salt: &[u8],
        ikm: &[u8],
        info: &[u8],
        length: usize,
    ) -> CoreResult<alloc::vec::Vec<u8>> {
        Hkdf::extract(kind, salt, ikm)?.expand(info, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 5869 test case 1 (SHA-256).
    #[test]
    fn hkdf_sha256_rfc5869_case1() {
        let ikm = hex::decode("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b").unwrap();
        let ikm = &ikm[..22];
        let salt = hex::decode("000102030405060708090a0b0c").unwrap();
        let info = hex::decode("f0f1f2f3f4f5f6f7f8f9").unwrap();
        let okm = Hkdf::derive(DigestKind::Sha256, &salt, ikm, &info, 42).unwrap();
        assert_eq!(
            hex::encode(okm),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
        );
    }

    #[test]
    fn hkdf_expand_rejects_excessive_length() {
        let hk = Hkdf::extract(DigestKind::Sha256, b"salt", b"ikm").unwrap();
        assert!(hk.expand(b"info", 255 * 32 + 1).is_err());
    }
}
