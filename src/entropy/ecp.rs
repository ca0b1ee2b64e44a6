//! Entropy-collection provider (ECP): gathers several low-entropy system
//! samples into a buffer (default 1024 bytes, spec.md §4.7), compresses the
//! buffer via a Keccak sponge down to a 512-bit seed, and seeds an
//! extended-schedule RHX instance run in CTR mode — keyed with that seed
//! and a separately generated 16-byte counter — to produce output.
//!
//! **[SUPPLEMENT] scope note:** the original's sample set spans drive,
//! memory, network, process, processor, system, time and user caches
//! (`CEX/ECP.h` remarks). Drive/network/processor statistics require
//! platform-specific FFI with no portable `std` equivalent; this
//! implementation gathers the caches `std` can express portably — a
//! high-resolution timer delta, the process id, and a stack-address sample
//! (a standard low-cost ASLR-dependent entropy source) — padded out to the
//! configured buffer size with OS-provider output, then compressed the same
//! way the original does. Recorded as a deliberate scope reduction in
//! `DESIGN.md`, not a dropped module.

use super::csp::Csp;
use super::EntropyProvider;
use crate::cipher::{BlockCipher, Direction, KeySchedule, Rhx};
use crate::digest::{Digest, DigestKind};
use crate::error::{CoreError, CoreResult};
use crate::utils::endian::increment_be;
use alloc::vec::Vec;
use zeroize::Zeroize;

const DEFAULT_BUFFER_SIZE: usize = 1024;
/// Round count for the extended-schedule cipher ECP seeds, matching the
/// 512-bit-key-class round count `cipher::rhx` uses for standard-schedule
/// 64-byte keys.
const EXTENDED_ROUNDS: usize = 22;
const SEED_SIZE: usize = 64;
const BLOCK_SIZE: usize = 16;

pub struct Ecp {
    cipher: Option<Rhx>,
    counter: Vec<u8>,
    buffer_size: usize,
}

impl Ecp {
    pub fn new() -> CoreResult<Self> {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> CoreResult<Self> {
        crate::error::ensure!(buffer_size > 0, CoreError::InvalidArgument("ECP buffer size must be positive"));

        let samples = Self::collect_samples(buffer_size)?;
        let mut digest = DigestKind::Keccak512.create();
        let mut seed = alloc::vec![0u8; SEED_SIZE];
        digest.compute_hash(&samples, &mut seed)?;

        let mut csp = Csp::new();
        let mut counter = alloc::vec![0u8; BLOCK_SIZE];
        csp.get_bytes(&mut counter, 0, BLOCK_SIZE)?;

        let cipher = Rhx::new(
            Direction::Encrypt,
            &seed,
            BLOCK_SIZE,
            KeySchedule::Extended {
                digest: DigestKind::Sha256,
                rounds: EXTENDED_ROUNDS,
            },
        )?;
        seed.zeroize();

        Ok(Ecp {
            cipher: Some(cipher),
            counter,
            buffer_size,
        })
    }

    fn collect_samples(buffer_size: usize) -> CoreResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(buffer_size);

        let t0 = std::time::Instant::now();
        let t1 = std::time::Instant::now();
        buf.extend_from_slice(&(t1.duration_since(t0).as_nanos() as u64).to_le_bytes());

        buf.extend_from_slice(&(std::process::id() as u64).to_le_bytes());

        let stack_marker: u8 = 0;
        let stack_address = &stack_marker as *const u8 as usize as u64;
        buf.extend_from_slice(&stack_address.to_le_bytes());

        let mut csp = Csp::new();
        let remaining = buffer_size.saturating_sub(buf.len());
        if remaining > 0 {
            let mut filler = alloc::vec![0u8; remaining];
            csp.get_bytes(&mut filler, 0, remaining)?;
            buf.extend_from_slice(&filler);
        }
        buf.truncate(buffer_size);
        Ok(buf)
    }

    fn cipher(&self) -> CoreResult<&Rhx> {
        self.cipher.as_ref().ok_or(CoreError::InvalidState("ECP used after Destroy"))
    }

    fn next_block(&mut self) -> CoreResult<[u8; BLOCK_SIZE]> {
        let mut block = [0u8; BLOCK_SIZE];
        self.cipher()?.encrypt_block(&self.counter, &mut block)?;
        increment_be(&mut self.counter);
        Ok(block)
    }
}

impl EntropyProvider for Ecp {
    fn get_bytes(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= out.len(),
            CoreError::InvalidArgument("ECP get_bytes range out of bounds")
        );
        self.cipher()?;

        let mut pos = 0;
        while pos < length {
            let block = self.next_block()?;
            let take = BLOCK_SIZE.min(length - pos);
            out[offset + pos..offset + pos + take].copy_from_slice(&block[..take]);
            pos += take;
        }
        Ok(())
    }

    /// Re-collects samples and reseeds from scratch. If re-collection fails
    /// (an OS-provider hiccup filling the padding), the existing state is
    /// left untouched rather than leaving `self` half-reseeded — `reset`
    /// has no `Result` in the shared `EntropyProvider` contract, so a
    /// transient failure here degrades to "unchanged" rather than panicking.
    fn reset(&mut self) {
        if let Ok(fresh) = Ecp::with_buffer_size(self.buffer_size) {
            *self = fresh;
        }
    }

    fn is_available(&self) -> bool {
        self.cipher.is_some()
    }

    fn destroy(&mut self) {
        self.counter.zeroize();
        self.counter.clear();
        self.cipher = None;
    }
}
