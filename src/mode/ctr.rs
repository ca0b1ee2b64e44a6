//! Counter mode (spec.md §4.2): `c_i = p_i XOR E(k, counter_i)`, with
//! `counter_{i+1} = counter_i + 1` treated as a big-endian multi-precision
//! integer over the whole block. CTR is parallelizable: the requested
//! range can be subdivided into `parallel_block_size`-aligned chunks, each
//! computing its own counter offset from the shared base counter
//! (spec.md §5), independently of every other chunk.

use super::{require_range, CipherMode};
use crate::cipher::BlockCipher;
use crate::error::{CoreError, CoreResult};
use crate::utils::endian::increment_be;
use crate::utils::xor::xor_in_place;
use alloc::vec::Vec;

/// CTR mode over a borrowed, already-keyed `BlockCipher`.
pub struct Ctr<'a> {
    cipher: &'a dyn BlockCipher,
    counter: Vec<u8>,
    /// Chunk size hint for `transform`'s internal partitioning under the
    /// `parallel` feature. Defaults to one block (spec.md §9: "the source
    /// does not specify a minimum above the block size... default to one
    /// cache line per worker" — approximated here as 64 bytes, a typical
    /// cache line, rounded down to a block multiple).
    parallel_block_size: usize,
}

impl<'a> Ctr<'a> {
    /// Keys a new CTR instance. `iv` (the initial counter value) must be
    /// exactly one block long.
    pub fn new(cipher: &'a dyn BlockCipher, iv: &[u8]) -> CoreResult<Self> {
        super::require_block_sized_iv(iv, cipher.block_size())?;
        let bs = cipher.block_size();
        let default_parallel = (64 / bs).max(1) * bs;
        Ok(Ctr {
            cipher,
            counter: iv.to_vec(),
            parallel_block_size: default_parallel,
        })
    }

    /// Sets the chunk size (bytes, rounded down to a block multiple, never
    /// below one block) used to subdivide a `transform` call's work.
    /// Purely a performance hint: every setting must produce byte-identical
    /// output (spec.md §8's CTR-parallel determinism property).
    pub fn set_parallel_block_size(&mut self, bytes: usize) {
        let bs = self.block_size();
        self.parallel_block_size = (bytes / bs).max(1) * bs;
    }

    /// Derives the counter value `base + blocks_ahead` (big-endian,
    /// wrapping at the block boundary), without touching `self.counter`.
    fn counter_at(base: &[u8], blocks_ahead: u64) -> Vec<u8> {
        let mut c = base.to_vec();
        for _ in 0..blocks_ahead {
            increment_be(&mut c);
        }
        c
    }

    fn process_chunk(cipher: &dyn BlockCipher, mut counter: Vec<u8>, input: &[u8], output: &mut [u8]) -> CoreResult<()> {
        let bs = cipher.block_size();
        let mut pos = 0;
        while pos < input.len() {
            let take = bs.min(input.len() - pos);
            let mut keystream = alloc::vec![0u8; bs];
            cipher.encrypt_block(&counter, &mut keystream)?;
            output[pos..pos + take].copy_from_slice(&input[pos..pos + take]);
            xor_in_place(&mut output[pos..pos + take], &keystream[..take]);
            increment_be(&mut counter);
            pos += take;
        }
        Ok(())
    }

    fn transform_serial(&mut self, input: &[u8], output: &mut [u8]) -> CoreResult<()> {
        let base = self.counter.clone();
        Self::process_chunk(self.cipher, base, input, output)?;
        let bs = self.block_size();
        let blocks = ((input.len() + bs - 1) / bs) as u64;
        self.counter = Self::counter_at(&self.counter, blocks);
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn transform_parallel(&mut self, input: &[u8], output: &mut [u8]) -> CoreResult<()> {
        let bs = self.block_size();
        let chunk = self.parallel_block_size;
        let base = self.counter.clone();

        std::thread::scope(|scope| -> CoreResult<()> {
            let mut out_rest: &mut [u8] = output;
            let mut in_pos = 0usize;
            let mut handles = Vec::new();
            while in_pos < input.len() {
                let take = chunk.min(input.len() - in_pos);
                let (out_chunk, rest) = out_rest.split_at_mut(take);
                out_rest = rest;
                let in_chunk = &input[in_pos..in_pos + take];
                let blocks_ahead = (in_pos / bs) as u64;
                let chunk_counter = Self::counter_at(&base, blocks_ahead);
                let cipher = self.cipher;
                handles.push(scope.spawn(move || Self::process_chunk(cipher, chunk_counter, in_chunk, out_chunk)));
                in_pos += take;
            }
            for handle in handles {
                handle.join().map_err(|_| CoreError::Internal("CTR worker thread panicked"))??;
            }
            Ok(())
        })?;

        let blocks = ((input.len() + bs - 1) / bs) as u64;
        self.counter = Self::counter_at(&base, blocks);
        Ok(())
    }
}

impl CipherMode for Ctr<'_> {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn transform(
        &mut self,
        input: &[u8],
        in_offset: usize,
        output: &mut [u8],
        out_offset: usize,
        length: usize,
    ) -> CoreResult<()> {
        crate::error::ensure!(length > 0, CoreError::InvalidArgument("CTR transform length must be positive"));
        require_range(input.len(), in_offset, length, "CTR input range out of bounds")?;
        require_range(output.len(), out_offset, length, "CTR output range out of bounds")?;

        let input = &input[in_offset..in_offset + length];
        let output = &mut output[out_offset..out_offset + length];

        #[cfg(feature = "parallel")]
        {
            if length > self.parallel_block_size {
                return self.transform_parallel(input, output);
            }
        }
        self.transform_serial(input, output)
    }
}
