//! Block ciphers: the parametric Rijndael/RHX engine (spec.md §4.1-4.2).
//! `rhx` is the only implementation today, but modes and MACs are written
//! against the `BlockCipher` trait rather than the concrete type so a
//! second block cipher could be added without touching them.

mod tables;
pub mod rhx;

pub use rhx::{KeySchedule, Rhx};

use crate::error::CoreResult;

/// Which transform a keyed cipher instance is configured to perform.
/// `Rhx` itself exposes both `encrypt_block`/`decrypt_block` regardless of
/// this value — `direction` only selects what `transform` dispatches to,
/// matching spec.md §3's `BlockCipherState` shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Common contract for a keyed block cipher: fixed block size,
/// direction-dispatched `transform`, and explicit encrypt/decrypt entry
/// points usable regardless of the configured direction (CMAC, for
/// instance, always needs `encrypt_block` even when wrapping a
/// decryption-configured mode elsewhere in the same session).
///
/// `Sync` is a supertrait so that `mode::Ctr`/`mode::Cbc` can share a
/// `&dyn BlockCipher` across the worker threads their `parallel` feature
/// spawns (spec.md §5): the round-key schedule is read-only after
/// construction, so sharing it across threads is sound.
pub trait BlockCipher: Sync {
    /// Block size in bytes (16 for standard Rijndael, 32 for Rijndael-256).
    fn block_size(&self) -> usize;
    /// Encrypts exactly one block from `input` into `output`.
    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> CoreResult<()>;
    /// Decrypts exactly one block from `input` into `output`.
    fn decrypt_block(&self, input: &[u8], output: &mut [u8]) -> CoreResult<()>;
    /// Encrypts or decrypts one block according to this instance's
    /// configured `Direction`.
    fn transform(&self, input: &[u8], output: &mut [u8]) -> CoreResult<()>;
    /// The direction this instance was configured with.
    fn direction(&self) -> Direction;
}
