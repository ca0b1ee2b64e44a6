//! Message digests: Blake-256/512, Keccak-256/512, SHA-256/512 and
//! Skein-256/512/1024 (spec.md §4.3). Every digest implements the same
//! `Digest` trait so the MAC, KDF and DRBG layers above can be generic over
//! "whichever hash the caller configured" — mirroring how the teacher keeps
//! its three ML-KEM parameter sets generic over a single `functionality!`
//! macro rather than triplicating logic.

mod blake;
mod keccak;
mod sha2;
mod skein;

use crate::error::CoreResult;

pub use blake::{Blake256, Blake512};
pub use keccak::{Keccak256, Keccak512};
pub use sha2::{Sha256, Sha512};
pub use skein::{Skein256, Skein512, Skein1024};

/// Common contract for every digest: `BlockUpdate`, `Update`, `DoFinal`,
/// `ComputeHash`, `Reset` from spec.md §4.3. `DoFinal` implicitly resets, per
/// spec.md §3's invariant ("After Finalize/DoFinal, a digest is
/// automatically reset to its initial chaining values").
pub trait Digest {
    /// Bytes consumed per internal compression step.
    fn block_size(&self) -> usize;
    /// Bytes produced by `do_final`.
    fn digest_size(&self) -> usize;
    /// Absorbs `input[offset..offset+length]` into the running hash state.
    fn block_update(&mut self, input: &[u8], offset: usize, length: usize) -> CoreResult<()>;
    /// Absorbs a single byte.
    fn update(&mut self, input: u8);
    /// Finalizes the digest into `out[offset..offset+digest_size]` and
    /// resets the internal chaining state back to its initial values.
    fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize>;
    /// One-shot digest of `input` into `out` (which must be exactly
    /// `digest_size` bytes): equivalent to `block_update` then `do_final`.
    fn compute_hash(&mut self, input: &[u8], out: &mut [u8]) -> CoreResult<usize> {
        self.block_update(input, 0, input.len())?;
        self.do_final(out, 0)
    }
    /// Restores the initial chaining values without producing output.
    fn reset(&mut self);
}

/// Enumerant selecting a digest implementation at runtime, used by
/// extended-mode RHX key schedules, HMAC/HKDF generics over "whatever digest
/// the caller configured", and the passphrase-based DRBG. Grounded in the
/// original's `Enumeration::Digests` switch (`CEX/PBR.cpp`
/// `GetMinimumSeedSize`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigestKind {
    /// Blake-256, 32-byte output, 64-byte block.
    Blake256,
    /// Blake-512, 64-byte output, 128-byte block.
    Blake512,
    /// Keccak-256 (original Keccak padding, not FIPS-202), 32-byte output, 136-byte rate.
    Keccak256,
    /// Keccak-512 (original Keccak padding, not FIPS-202), 64-byte output, 72-byte rate.
    Keccak512,
    /// SHA-256, 32-byte output, 64-byte block.
    Sha256,
    /// SHA-512, 64-byte output, 128-byte block.
    Sha512,
    /// Skein-256, 32-byte output, 32-byte block (Threefish-256 state).
    Skein256,
    /// Skein-512, 64-byte output, 64-byte block (Threefish-512 state).
    Skein512,
    /// Skein-1024, 128-byte output, 128-byte block (Threefish-1024 state).
    Skein1024,
}

impl DigestKind {
    /// The digest output size in bytes for this enumerant, used by
    /// `drbg::pbr`'s minimum-seed-size table and by HKDF's `L <= 255*H` check.
    #[must_use]
    pub fn output_size(self) -> usize {
        match self {
            DigestKind::Blake256 => 32,
            DigestKind::Blake512 => 64,
            DigestKind::Keccak256 => 32,
            DigestKind::Keccak512 => 64,
            DigestKind::Sha256 => 32,
            DigestKind::Sha512 => 64,
            DigestKind::Skein256 => 32,
            DigestKind::Skein512 => 64,
            DigestKind::Skein1024 => 128,
        }
    }

    /// The digest's internal block (compression) size in bytes.
    #[must_use]
    pub fn block_size(self) -> usize {
        match self {
            DigestKind::Blake256 => 64,
            DigestKind::Blake512 => 128,
            DigestKind::Keccak256 => 136,
            DigestKind::Keccak512 => 72,
            DigestKind::Sha256 => 64,
            DigestKind::Sha512 => 128,
            DigestKind::Skein256 => 32,
            DigestKind::Skein512 => 64,
            DigestKind::Skein1024 => 128,
        }
    }

    /// Builds a fresh, owned digest instance of this kind, boxed behind the
    /// `Digest` trait object so generic consumers (HMAC, HKDF, the extended
    /// RHX key schedule) can hold "a digest" without a type parameter.
    #[must_use]
    pub fn create(self) -> alloc::boxed::Box<dyn Digest + Send> {
        match self {
            DigestKind::Blake256 => alloc::boxed::Box::new(Blake256::new()),
            DigestKind::Blake512 => alloc::boxed::Box::new(Blake512::new()),
            DigestKind::Keccak256 => alloc::boxed::Box::new(Keccak256::new()),
            DigestKind::Keccak512 => alloc::boxed::Box::new(Keccak512::new()),
            DigestKind::Sha256 => alloc::boxed::Box::new(Sha256::new()),
            DigestKind::Sha512 => alloc::boxed::Box::new(Sha512::new()),
            DigestKind::Skein256 => alloc::boxed::Box::new(Skein256::new()),
            DigestKind::Skein512 => alloc::boxed::Box::new(Skein512::new()),
            DigestKind::Skein1024 => alloc::boxed::Box::new(Skein1024::new()),
        }
    }
}
