//! PBKDF2 (RFC 2898 / PKCS#5 v2.1), generic over HMAC.

use crate::digest::DigestKind;
use crate::error::{CoreError, CoreResult};
use crate::mac::{Hmac, Mac};
use crate::utils::xor::xor_in_place;

/// PBKDF2-HMAC-<digest>. Carries the password and a cached HMAC keyed with
/// it, so repeated `derive` calls against different salts don't re-key.
pub struct Pbkdf2 {
    kind: DigestKind,
    password: alloc::vec::Vec<u8>,
}

impl Pbkdf2 {
    pub fn new(kind: DigestKind, password: &[u8]) -> Self {
        Pbkdf2 {
            kind,
            password: password.to_vec(),
        }
    }

    /// `PBKDF2(P, S, c, dkLen)`. `iterations == 0` is rejected; RFC 2898
    /// requires a positive iteration count, and silently treating it as 1
    /// would mask a caller's configuration mistake rather than derive a
    /// key from an unauthenticated single hash pass.
    pub fn derive(
        &self,
        salt: &[u8],
        iterations: u32,
        dk_len: usize,
    ) -> CoreResult<alloc::vec::Vec<u8>> {
        crate::error::ensure!(
            iterations > 0,
            CoreError::InvalidArgument("PBKDF2 iteration count must be nonzero")
        );
        let hash_len = self.kind.output_size();
        crate::error::ensure!(
            dk_len as u64 <= (u32::MAX as u64) * (hash_len as u64),
            CoreError::InvalidArgument("PBKDF2 derived key length too large")
        );

        let mut dk = alloc::vec::Vec::with_capacity(dk_len);
        let mut block_index: u32 = 1;
        while dk.len() < dk_len {
            let block = self.f(salt, iterations, block_index)?;
            dk.extend_from_slice(&block);
            block_index += 1;
        }
        dk.truncate(dk_len);
        Ok(dk)
    }

    /// `F(P, S, c, i) = U_1 ^ U_2 ^ ... ^ U_c`, where `U_1 = PRF(P, S || INT(i))`
    /// and `U_j = PRF(P, U_{j-1})` for `j > 1`.
    fn f(&self, salt: &[u8], iterations: u32, block_index: u32) -> CoreResult<alloc::vec::Vec<u8>> {
        let mut mac = Hmac::new(self.kind, &self.password)?;
        mac.block_update(salt, 0, salt.len())?;
        mac.block_update(&block_index.to_be_bytes(), 0, 4)?;

        let hash_len = self.kind.output_size();
        let mut u = alloc::vec![0u8; hash_len];
        mac.do_final(&mut u, 0)?;
        let mut result = u.clone();

        for _ in 1..iterations {
            mac.block_update(&u, 0, u.len())?;
            let mut next = alloc::vec![0u8; hash_len];
            mac.do_final(&mut next, 0)?;
            xor_in_place(&mut result, &next);
            u = next;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pbkdf2_sha256_one_iteration() {
        let kdf = Pbkdf2::new(DigestKind::Sha256, b"password");
        let dk = kdf.derive(b"salt", 1, 32).unwrap();
        assert_eq!(
            hex::encode(dk),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn pbkdf2_sha256_4096_iterations() {
        let kdf = Pbkdf2::new(DigestKind::Sha256, b"password");
        let dk = kdf.derive(b"salt", 4096, 32).unwrap();
        assert_eq!(
            hex::encode(dk),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );
    }

    #[test]
    fn pbkdf2_rejects_zero_iterations() {
        let kdf = Pbkdf2::new(DigestKind::Sha256, b"password");
        assert!(kdf.derive(b"salt", 0, 32).is_err());
    }
}
