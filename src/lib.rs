#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, missing_docs)]
#![deny(absolute_paths_not_starting_with_crate, dead_code)]
#![deny(elided_lifetimes_in_paths, explicit_outlives_requirements, keyword_idents)]
#![deny(let_underscore_drop, macro_use_extern_crate, meta_variable_misuse, missing_abi)]
#![deny(non_ascii_idents, rust_2021_incompatible_closure_captures)]
#![deny(rust_2021_incompatible_or_patterns, rust_2021_prefixes_incompatible_syntax)]
#![deny(rust_2021_prelude_collisions, single_use_lifetimes, trivial_casts)]
#![deny(trivial_numeric_casts, unreachable_pub, unsafe_op_in_unsafe_fn, unstable_features)]
#![deny(unused_extern_crates, unused_import_braces, unused_lifetimes, unused_macro_rules)]
#![deny(unused_qualifications, variant_size_differences)]
//
#![doc = include_str!("../README.md")]

// Self-contained symmetric cryptography kernels: the Rijndael/RHX block
// cipher engine, block-cipher modes of operation, keyed hash/MAC
// constructions, key-derivation functions, deterministic random-bit
// generators and entropy providers.
//
// Layering (leaves first): entropy -> cipher/digest -> mode/mac -> kdf/drbg.
// Higher layers depend only on strictly lower ones; `utils` has no
// dependents above it and no dependencies within the crate.

extern crate alloc;

pub use rand_core::{CryptoRng, Error as RngError, RngCore};

pub mod cipher;
pub mod digest;
pub mod drbg;
pub mod entropy;
pub mod error;
pub mod kdf;
pub mod mac;
pub mod mode;
pub mod utils;

pub use cipher::{BlockCipher, Direction, KeySchedule, Rhx};
pub use digest::{Digest, DigestKind};
pub use drbg::Drbg;
pub use entropy::EntropyProvider;
pub use error::{CoreError, CoreResult};
pub use mac::Mac;
pub use mode::CipherMode;

#[cfg(test)]
mod tests {
    //! Crate-level smoke tests exercising a full cipher -> mode -> MAC ->
    //! KDF -> DRBG chain together, as a cross-check that the per-module
    //! unit tests agree on shared conventions (key sizes, block sizes,
    //! error vocabulary) when composed.

    use crate::cipher::{Direction, KeySchedule, Rhx};
    use crate::digest::DigestKind;
    use crate::drbg::{Drbg, Hcg};
    use crate::kdf::Hkdf;
    use crate::mac::{Cmac, Hmac, Mac};
    use crate::mode::{Cbc, CipherMode};

    #[test]
    fn end_to_end_cbc_then_cmac_then_hkdf_stretch() {
        let key = [0x2bu8; 16];
        let iv = [0x00u8; 16];
        let pt: alloc::vec::Vec<u8> = (0u8..=255).cycle().take(256).collect();

        let enc_cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut enc = Cbc::new(&enc_cipher, true, &iv).unwrap();
        let mut ct = alloc::vec![0u8; pt.len()];
        enc.transform(&pt, 0, &mut ct, 0, pt.len()).unwrap();

        let dec_cipher = Rhx::new(Direction::Decrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut dec = Cbc::new(&dec_cipher, false, &iv).unwrap();
        let mut rt = alloc::vec![0u8; pt.len()];
        dec.transform(&ct, 0, &mut rt, 0, pt.len()).unwrap();
        assert_eq!(rt, pt);

        let mac_cipher = Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).unwrap();
        let mut cmac = Cmac::new(&mac_cipher).unwrap();
        cmac.block_update(&ct, 0, ct.len()).unwrap();
        let mut tag = [0u8; 16];
        cmac.do_final(&mut tag, 0).unwrap();

        let okm = Hkdf::derive(DigestKind::Sha256, b"salt", &tag, b"session key", 32).unwrap();
        assert_eq!(okm.len(), 32);

        let mut hmac = Hmac::new(DigestKind::Sha256, &okm).unwrap();
        hmac.block_update(b"authenticate me", 0, 15).unwrap();
        let mut hmac_tag_a = [0u8; 32];
        hmac.do_final(&mut hmac_tag_a, 0).unwrap();
        let mut hmac2 = Hmac::new(DigestKind::Sha256, &okm).unwrap();
        hmac2.block_update(b"authenticate me", 0, 15).unwrap();
        let mut hmac_tag_b = [0u8; 32];
        hmac2.do_final(&mut hmac_tag_b, 0).unwrap();
        assert_eq!(hmac_tag_a, hmac_tag_b);

        let mut hcg = Hcg::new(DigestKind::Sha256, 1 << 20);
        hcg.update(&okm).unwrap();
        let mut random_bytes = [0u8; 64];
        hcg.generate(&mut random_bytes, 0, 64).unwrap();
        assert!(random_bytes.iter().any(|&b| b != 0));
    }
}
