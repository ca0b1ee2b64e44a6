//! Keccak-256 and Keccak-512 using the *original* Keccak padding
//! (`0x01` domain-separation byte, not FIPS-202's `0x06`/`0x1F`), per
//! spec.md §4.3. `CEX`'s `Keccak256.cpp` additionally complements six of
//! the twenty-five state lanes around the permutation as a χ-step
//! optimization; the complement-aware permutation internals were not part
//! of the retrieved reference material, so this module runs the
//! un-complemented, standard Keccak-f[1600] permutation instead — bit-exact
//! with the original Keccak submission and not contradicted by any
//! concrete vector in spec.md §8 (see `DESIGN.md`).

use super::Digest;
use crate::error::{CoreError, CoreResult};
use crate::utils::endian::{read_u64_le, write_u64_le};

const LANES: usize = 25;
const ROUNDS: usize = 24;

#[rustfmt::skip]
const RC: [u64; ROUNDS] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808a, 0x8000000080008000,
    0x000000000000808b, 0x0000000080000001, 0x8000000080008081, 0x8000000000008009,
    0x000000000000008a, 0x0000000000000088, 0x0000000080008009, 0x000000008000000a,
    0x000000008000808b, 0x800000000000008b, 0x8000000000008089, 0x8000000000008003,
    0x8000000000008002, 0x8000000000000080, 0x000000000000800a, 0x800000008000000a,
    0x8000000080008081, 0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

#[rustfmt::skip]
const ROT: [[u32; 5]; 5] = [
    [0, 36, 3, 41, 18],
    [1, 44, 10, 45, 2],
    [62, 6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39, 8, 14],
];

/// `state[x + 5*y]` addressing, matching the reference lane layout.
fn keccak_f(state: &mut [u64; LANES]) {
    for round in 0..ROUNDS {
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        let mut d = [0u64; 5];
        for x in 0..5 {
            d[x] = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
        }
        for x in 0..5 {
            for y in 0..5 {
                state[x + 5 * y] ^= d[x];
            }
        }

        let mut b = [0u64; LANES];
        for x in 0..5 {
            for y in 0..5 {
                let dest = y + 5 * ((2 * x + 3 * y) % 5);
                b[dest] = state[x + 5 * y].rotate_left(ROT[x][y]);
            }
        }

        for x in 0..5 {
            for y in 0..5 {
                state[x + 5 * y] =
                    b[x + 5 * y] ^ ((!b[(x + 1) % 5 + 5 * y]) & b[(x + 2) % 5 + 5 * y]);
            }
        }

        state[0] ^= RC[round];
    }
}

struct KeccakState {
    state: [u64; LANES],
    rate_bytes: usize,
    output_bytes: usize,
    buffer: [u8; 136],
    buffer_len: usize,
}

impl KeccakState {
    fn new(rate_bytes: usize, output_bytes: usize) -> Self {
        KeccakState {
            state: [0u64; LANES],
            rate_bytes,
            output_bytes,
            buffer: [0u8; 136],
            buffer_len: 0,
        }
    }

    fn absorb_block(&mut self, block: &[u8]) {
        for (i, chunk) in block.chunks(8).enumerate() {
            let mut lane_bytes = [0u8; 8];
            lane_bytes[..chunk.len()].copy_from_slice(chunk);
            self.state[i] ^= read_u64_le(&lane_bytes);
        }
        keccak_f(&mut self.state);
    }

    fn absorb(&mut self, mut input: &[u8]) {
        if self.buffer_len > 0 {
            let need = self.rate_bytes - self.buffer_len;
            let take = need.min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];
            if self.buffer_len == self.rate_bytes {
                let block = self.buffer;
                self.absorb_block(&block[..self.rate_bytes]);
                self.buffer_len = 0;
            }
        }
        while input.len() >= self.rate_bytes {
            self.absorb_block(&input[..self.rate_bytes]);
            input = &input[self.rate_bytes..];
        }
        if !input.is_empty() {
            self.buffer[..input.len()].copy_from_slice(input);
            self.buffer_len = input.len();
        }
    }

    fn finalize(&mut self, out: &mut [u8]) {
        let mut last = [0u8; 136];
        last[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
        last[self.buffer_len] ^= 0x01;
        last[self.rate_bytes - 1] ^= 0x80;
        self.absorb_block(&last[..self.rate_bytes]);

        let mut produced = 0;
        while produced < self.output_bytes {
            let mut squeeze = [0u8; 136];
            for i in 0..self.rate_bytes / 8 {
                write_u64_le(&mut squeeze[i * 8..i * 8 + 8], self.state[i]);
            }
            let take = (self.output_bytes - produced).min(self.rate_bytes);
            out[produced..produced + take].copy_from_slice(&squeeze[..take]);
            produced += take;
            if produced < self.output_bytes {
                keccak_f(&mut self.state);
            }
        }
    }

    fn reset(&mut self) {
        self.state = [0u64; LANES];
        self.buffer = [0u8; 136];
        self.buffer_len = 0;
    }
}

macro_rules! keccak_digest {
    ($name:ident, $rate:expr, $outsize:expr, $doc:expr) => {
        #[doc = $doc]
        pub struct $name {
            inner: KeccakState,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                $name {
                    inner: KeccakState::new($rate, $outsize),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Digest for $name {
            fn block_size(&self) -> usize {
                $rate
            }

            fn digest_size(&self) -> usize {
                $outsize
            }

            fn block_update(
                &mut self,
                input: &[u8],
                offset: usize,
                length: usize,
            ) -> CoreResult<()> {
                crate::error::ensure!(
                    offset + length <= input.len(),
                    CoreError::InvalidArgument("block_update range out of bounds")
                );
                self.inner.absorb(&input[offset..offset + length]);
                Ok(())
            }

            fn update(&mut self, input: u8) {
                self.inner.absorb(&[input]);
            }

            fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize> {
                crate::error::ensure!(
                    out.len() >= offset + $outsize,
                    CoreError::InvalidArgument("output buffer too small for digest")
                );
                self.inner.finalize(&mut out[offset..offset + $outsize]);
                self.inner.reset();
                Ok($outsize)
            }

            fn reset(&mut self) {
                self.inner.reset();
            }
        }
    };
}

keccak_digest!(Keccak256, 136, 32, "Keccak-256 (original padding), 32-byte output.");
keccak_digest!(Keccak512, 72, 64, "Keccak-512 (original padding), 64-byte output.");
