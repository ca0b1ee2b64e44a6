//! CMAC (NIST SP 800-38B), keyed by any `BlockCipher`. Subkeys `K1`/`K2`
//! are derived once at construction from `E(K, 0)` by a conditional
//! left-shift and a constant XOR drawn from the block size's irreducible
//! polynomial in GF(2^n); the final (possibly padded) block is XORed with
//! `K1` when the message is a full multiple of the block size, `K2`
//! otherwise.

use super::Mac;
use crate::cipher::BlockCipher;
use crate::error::{CoreError, CoreResult};
use crate::utils::xor::xor_in_place;
use alloc::vec::Vec;
use zeroize::Zeroize;

/// The constant used for the GF(2^n) reduction of the left-shift overflow
/// bit, indexed by block size in bytes. NIST SP 800-38B only defines
/// 128-bit-block CMAC (`Rb = 0x87`); the 64-bit (`0x1b`) and 256-bit
/// (`0x0425`) constants are the standard irreducible-polynomial reduction
/// values for those field sizes, needed here because RHX also supports a
/// 32-byte block.
fn reduction_constant(block_size: usize) -> u16 {
    match block_size {
        8 => 0x1b,
        16 => 0x87,
        32 => 0x0425,
        _ => 0x87,
    }
}

/// Left-shifts `block` by one bit in place (big-endian bit order across the
/// whole buffer), returning the bit shifted out of the most significant
/// position.
fn shift_left_one(block: &mut [u8]) -> u8 {
    let mut carry = 0u8;
    for byte in block.iter_mut().rev() {
        let new_carry = (*byte >> 7) & 1;
        *byte = (*byte << 1) | carry;
        carry = new_carry;
    }
    carry
}

/// Derives a single subkey from `base` by the SP 800-38B left-shift rule.
fn derive_subkey(base: &[u8]) -> Vec<u8> {
    let mut subkey = base.to_vec();
    let overflow = shift_left_one(&mut subkey);
    if overflow == 1 {
        let rb = reduction_constant(base.len());
        let rb_bytes = rb.to_be_bytes();
        let n = subkey.len();
        subkey[n - 1] ^= rb_bytes[1];
        if n >= 2 {
            subkey[n - 2] ^= rb_bytes[0];
        }
    }
    subkey
}

/// CMAC state keyed over a borrowed, already-keyed `BlockCipher`. The
/// cipher must be configured for encryption: CMAC only ever calls
/// `encrypt_block`, both to derive the subkeys and to run the CBC-MAC
/// chain itself.
pub struct Cmac<'a> {
    cipher: &'a dyn BlockCipher,
    k1: Vec<u8>,
    k2: Vec<u8>,
    chain: Vec<u8>,
    buffer: Vec<u8>,
}

impl<'a> Cmac<'a> {
    /// Derives `K1`/`K2` from the cipher's `E(K, 0)` and primes an empty
    /// chaining state.
    pub fn new(cipher: &'a dyn BlockCipher) -> CoreResult<Self> {
        let bs = cipher.block_size();
        let zero = alloc::vec![0u8; bs];
        let mut l = alloc::vec![0u8; bs];
        cipher.encrypt_block(&zero, &mut l)?;

        let k1 = derive_subkey(&l);
        let k2 = derive_subkey(&k1);
        l.zeroize();

        Ok(Cmac {
            cipher,
            k1,
            k2,
            chain: alloc::vec![0u8; bs],
            buffer: Vec::new(),
        })
    }

    fn block_size_inner(&self) -> usize {
        self.cipher.block_size()
    }

    /// Absorbs one full block into the CBC-MAC chain: `chain = E(K, chain
    /// XOR block)`.
    fn absorb_block(&mut self, block: &[u8]) -> CoreResult<()> {
        let mut buf = self.chain.clone();
        xor_in_place(&mut buf, block);
        self.cipher.encrypt_block(&buf, &mut self.chain)?;
        Ok(())
    }
}

impl Mac for Cmac<'_> {
    fn mac_size(&self) -> usize {
        self.block_size_inner()
    }

    fn block_update(&mut self, input: &[u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= input.len(),
            CoreError::InvalidArgument("block_update range out of bounds")
        );
        self.buffer.extend_from_slice(&input[offset..offset + length]);

        let bs = self.block_size_inner();
        // Buffer must always hold back at least one full block so the final
        // `do_final` can tell whether the message ended on a block boundary
        // (K1 path) or needed padding (K2 path).
        while self.buffer.len() > bs {
            let block: Vec<u8> = self.buffer.drain(..bs).collect();
            self.absorb_block(&block)?;
        }
        Ok(())
    }

    fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize> {
        let bs = self.block_size_inner();
        crate::error::ensure!(
            out.len() >= offset + bs,
            CoreError::InvalidArgument("output buffer too small for CMAC tag")
        );

        let mut last = self.buffer.clone();
        let subkey = if last.len() == bs {
            &self.k1
        } else {
            last.push(0x80);
            last.resize(bs, 0x00);
            &self.k2
        };
        xor_in_place(&mut last, subkey);

        let mut tag = alloc::vec![0u8; bs];
        let mut buf = self.chain.clone();
        xor_in_place(&mut buf, &last);
        self.cipher.encrypt_block(&buf, &mut tag)?;

        out[offset..offset + bs].copy_from_slice(&tag);
        tag.zeroize();
        self.reset();
        Ok(bs)
    }

    fn reset(&mut self) {
        self.chain.zeroize();
        self.chain = alloc::vec![0u8; self.block_size_inner()];
        self.buffer.zeroize();
        self.buffer.clear();
    }
}

impl Drop for Cmac<'_> {
    fn drop(&mut self) {
        self.k1.zeroize();
        self.k2.zeroize();
        self.chain.zeroize();
        self.buffer.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{Direction, KeySchedule, Rhx};

    // NIST SP 800-38B AES-128 CMAC test vectors (Appendix D.1).
    const KEY: [u8; 16] = hex_literal::hex!("2b7e151628aed2a6abf7158809cf4f3c");
    const MSG: [u8; 64] = hex_literal::hex!(
        "6bc1bee22e409f96e93d7e117393172a\
         ae2d8a571e03ac9c9eb76fac45af8e51\
         30c81c46a35ce411e5fbc1191a0a52ef\
         f69f2445df4f9b17ad2b417be66c3710"
    );

    fn new_cmac() -> Rhx {
        Rhx::new(Direction::Encrypt, &KEY, 16, KeySchedule::Standard).unwrap()
    }

    #[test]
    fn cmac_aes128_empty_message() {
        let cipher = new_cmac();
        let mut mac = Cmac::new(&cipher).unwrap();
        let mut tag = [0u8; 16];
        mac.do_final(&mut tag, 0).unwrap();
        assert_eq!(hex::encode(tag), "bb1d6929e95937287fa37d129b756746");
    }

    #[test]
    fn cmac_aes128_one_block() {
        let cipher = new_cmac();
        let mut mac = Cmac::new(&cipher).unwrap();
        mac.block_update(&MSG, 0, 16).unwrap();
        let mut tag = [0u8; 16];
        mac.do_final(&mut tag, 0).unwrap();
        assert_eq!(hex::encode(tag), "070a16b46b4d4144f79bdd9dd04a287c");
    }

    #[test]
    fn cmac_aes128_partial_final_block() {
        let cipher = new_cmac();
        let mut mac = Cmac::new(&cipher).unwrap();
        mac.block_update(&MSG, 0, 40).unwrap();
        let mut tag = [0u8; 16];
        mac.do_final(&mut tag, 0).unwrap();
        assert_eq!(hex::encode(tag), "dfa66747de9ae63030ca32611497c827");
    }

    #[test]
    fn cmac_aes128_four_blocks() {
        let cipher = new_cmac();
        let mut mac = Cmac::new(&cipher).unwrap();
        mac.block_update(&MSG, 0, 64).unwrap();
        let mut tag = [0u8; 16];
        mac.do_final(&mut tag, 0).unwrap();
        assert_eq!(hex::encode(tag), "51f0bebf7e3b9d92fc49741779363cfe");
    }

    #[test]
    fn cmac_reset_after_finalize_is_rekeyed_not_unkeyed() {
        let cipher = new_cmac();
        let mut mac = Cmac::new(&cipher).unwrap();
        mac.block_update(&MSG, 0, 16).unwrap();
        let mut tag1 = [0u8; 16];
        mac.do_final(&mut tag1, 0).unwrap();

        mac.block_update(&MSG, 0, 16).unwrap();
        let mut tag2 = [0u8; 16];
        mac.do_final(&mut tag2, 0).unwrap();
        assert_eq!(tag1, tag2);
    }

    #[test]
    fn cmac_streamed_updates_match_single_update() {
        let cipher_a = new_cmac();
        let mut mac_a = Cmac::new(&cipher_a).unwrap();
        mac_a.block_update(&MSG, 0, 40).unwrap();
        let mut tag_a = [0u8; 16];
        mac_a.do_final(&mut tag_a, 0).unwrap();

        let cipher_b = new_cmac();
        let mut mac_b = Cmac::new(&cipher_b).unwrap();
        mac_b.block_update(&MSG, 0, 16).unwrap();
        mac_b.block_update(&MSG, 16, 16).unwrap();
        mac_b.block_update(&MSG, 32, 8).unwrap();
        let mut tag_b = [0u8; 16];
        mac_b.do_final(&mut tag_b, 0).unwrap();

        assert_eq!(tag_a, tag_b);
    }
}
