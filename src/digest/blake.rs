//! Blake-256 and Blake-512, the SHA-3-finalist ChaCha-derived digests
//! (spec.md §4.3). Constants (`C32`/`C64`) and the ten-row message
//! permutation table are grounded in `CEX`'s `Blake256.cpp`
//! (`m_C32`, `m_ftSigma`); the ChaCha-style `G` mixing function, ten-bit
//! round schedule and dual-padding-byte finalization follow the published
//! Blake algorithm the constants belong to.

use super::Digest;
use crate::error::{CoreError, CoreResult};
use crate::utils::endian::{read_u32_be, read_u64_be, write_u32_be, write_u64_be};

#[rustfmt::skip]
const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

#[rustfmt::skip]
const C32: [u32; 16] = [
    0x243F_6A88, 0x85A3_08D3, 0x1319_8A2E, 0x0370_7344,
    0xA409_3822, 0x299F_31D0, 0x082E_FA98, 0xEC4E_6C89,
    0x4528_21E6, 0x38D0_1377, 0xBE54_66CF, 0x34E9_0C6C,
    0xC0AC_29B7, 0xC97C_50DD, 0x3F84_D5B5, 0xB547_0917,
];

#[rustfmt::skip]
const C64: [u64; 16] = [
    0x243F_6A88_85A3_08D3, 0x1319_8A2E_0370_7344, 0xA409_3822_299F_31D0, 0x082E_FA98_EC4E_6C89,
    0x4528_21E6_38D0_1377, 0xBE54_66CF_34E9_0C6C, 0xC0AC_29B7_C97C_50DD, 0x3F84_D5B5_B547_0917,
    0x9216_D5D9_8979_FB1B, 0xD131_0BA6_98DF_B5AC, 0x2FFD_72DB_D01A_DFB7, 0xB8E1_AFED_6A26_7E96,
    0xBA7C_9045_F12C_7F99, 0x24A1_9947_B391_6CF7, 0x0801_F2E2_858E_FC16, 0x6369_20D8_7157_4E69,
];

const IV32: [u32; 8] = [
    0x6a09_e667, 0xbb67_ae85, 0x3c6e_f372, 0xa54f_f53a, 0x510e_527f, 0x9b05_688c, 0x1f83_d9ab,
    0x5be0_cd19,
];

const IV64: [u64; 8] = [
    0x6a09_e667_f3bc_c908, 0xbb67_ae85_84ca_a73b, 0x3c6e_f372_fe94_f82b, 0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1, 0x9b05_688c_2b3e_6c1f, 0x1f83_d9ab_fb41_bd6b, 0x5be0_cd19_137e_2179,
];

#[inline]
fn g32(v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32, cx: u32, cy: u32) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(mx ^ cy);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(12);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(my ^ cx);
    v[d] = (v[d] ^ v[a]).rotate_right(8);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(7);
}

#[inline]
fn g64(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, mx: u64, my: u64, cx: u64, cy: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(mx ^ cy);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(25);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(my ^ cx);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(11);
}

macro_rules! round_step {
    ($g:ident, $v:expr, $m:expr, $c:expr, $sg:expr) => {{
        $g($v, 0, 4, 8, 12, $m[$sg[0]], $m[$sg[1]], $c[$sg[0]], $c[$sg[1]]);
        $g($v, 1, 5, 9, 13, $m[$sg[2]], $m[$sg[3]], $c[$sg[2]], $c[$sg[3]]);
        $g($v, 2, 6, 10, 14, $m[$sg[4]], $m[$sg[5]], $c[$sg[4]], $c[$sg[5]]);
        $g($v, 3, 7, 11, 15, $m[$sg[6]], $m[$sg[7]], $c[$sg[6]], $c[$sg[7]]);
        $g($v, 0, 5, 10, 15, $m[$sg[8]], $m[$sg[9]], $c[$sg[8]], $c[$sg[9]]);
        $g($v, 1, 6, 11, 12, $m[$sg[10]], $m[$sg[11]], $c[$sg[10]], $c[$sg[11]]);
        $g($v, 2, 7, 8, 13, $m[$sg[12]], $m[$sg[13]], $c[$sg[12]], $c[$sg[13]]);
        $g($v, 3, 4, 9, 14, $m[$sg[14]], $m[$sg[15]], $c[$sg[14]], $c[$sg[15]]);
    }};
}

/// Blake-256.
pub struct Blake256 {
    h: [u32; 8],
    salt: [u32; 4],
    buffer: [u8; 64],
    buffer_len: usize,
    t: u64,
}

impl Blake256 {
    #[must_use]
    pub fn new() -> Self {
        Blake256 {
            h: IV32,
            salt: [0u32; 4],
            buffer: [0u8; 64],
            buffer_len: 0,
            t: 0,
        }
    }

    fn compress(&mut self, block: &[u8], t: u64, null_t: bool) {
        let mut m = [0u32; 16];
        for i in 0..16 {
            m[i] = read_u32_be(&block[i * 4..i * 4 + 4]);
        }
        let mut v = [0u32; 16];
        v[0..8].copy_from_slice(&self.h);
        for i in 0..4 {
            v[8 + i] = self.salt[i] ^ C32[i];
        }
        v[12] = C32[4];
        v[13] = C32[5];
        v[14] = C32[6];
        v[15] = C32[7];
        if !null_t {
            let t_lo = t as u32;
            let t_hi = (t >> 32) as u32;
            v[12] ^= t_lo;
            v[13] ^= t_lo;
            v[14] ^= t_hi;
            v[15] ^= t_hi;
        }
        for round in 0..14 {
            let sg = &SIGMA[round % 10];
            round_step!(g32, &mut v, m, C32, sg);
        }
        for i in 0..8 {
            self.h[i] ^= v[i] ^ v[i + 8] ^ self.salt[i % 4];
        }
    }

    fn absorb(&mut self, mut input: &[u8]) {
        if self.buffer_len > 0 {
            let need = 64 - self.buffer_len;
            let take = need.min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];
            if self.buffer_len == 64 {
                self.t = self.t.wrapping_add(512);
                let block = self.buffer;
                self.compress(&block, self.t, false);
                self.buffer_len = 0;
            }
        }
        while input.len() >= 64 {
            self.t = self.t.wrapping_add(512);
            let t = self.t;
            self.compress(&input[..64], t, false);
            input = &input[64..];
        }
        if !input.is_empty() {
            self.buffer[self.buffer_len..self.buffer_len + input.len()].copy_from_slice(input);
            self.buffer_len += input.len();
        }
    }

    fn finalize_into(&mut self, out: &mut [u8]) {
        let total_bits = self.t.wrapping_add((self.buffer_len as u64) * 8);
        let buf_len = self.buffer_len;
        let mut len_bytes = [0u8; 8];
        write_u64_be(&mut len_bytes, total_bits);

        if buf_len == 55 {
            let mut block = [0u8; 64];
            block[..55].copy_from_slice(&self.buffer[..55]);
            block[55] = 0x81;
            block[56..64].copy_from_slice(&len_bytes);
            self.compress(&block, total_bits, false);
        } else if buf_len < 55 {
            let mut block = [0u8; 64];
            block[..buf_len].copy_from_slice(&self.buffer[..buf_len]);
            block[buf_len] = 0x80;
            block[55] = 0x01;
            block[56..64].copy_from_slice(&len_bytes);
            let null_t = buf_len == 0;
            self.compress(&block, total_bits, null_t);
        } else {
            let mut block1 = [0u8; 64];
            block1[..buf_len].copy_from_slice(&self.buffer[..buf_len]);
            block1[buf_len] = 0x80;
            self.compress(&block1, total_bits, false);

            let mut block2 = [0u8; 64];
            block2[55] = 0x01;
            block2[56..64].copy_from_slice(&len_bytes);
            self.compress(&block2, total_bits, true);
        }

        for (i, word) in self.h.iter().enumerate() {
            write_u32_be(&mut out[i * 4..i * 4 + 4], *word);
        }
    }
}

impl Default for Blake256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Blake256 {
    fn block_size(&self) -> usize {
        64
    }

    fn digest_size(&self) -> usize {
        32
    }

    fn block_update(&mut self, input: &[u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= input.len(),
            CoreError::InvalidArgument("block_update range out of bounds")
        );
        self.absorb(&input[offset..offset + length]);
        Ok(())
    }

    fn update(&mut self, input: u8) {
        self.absorb(&[input]);
    }

    fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize> {
        crate::error::ensure!(
            out.len() >= offset + 32,
            CoreError::InvalidArgument("output buffer too small for Blake-256 digest")
        );
        self.finalize_into(&mut out[offset..offset + 32]);
        self.reset();
        Ok(32)
    }

    fn reset(&mut self) {
        self.h = IV32;
        self.buffer = [0u8; 64];
        self.buffer_len = 0;
        self.t = 0;
    }
}

/// Blake-512.
pub struct Blake512 {
    h: [u64; 8],
    salt: [u64; 4],
    buffer: [u8; 128],
    buffer_len: usize,
    t: u128,
}

impl Blake512 {
    #[must_use]
    pub fn new() -> Self {
        Blake512 {
            h: IV64,
            salt: [0u64; 4],
            buffer: [0u8; 128],
            buffer_len: 0,
            t: 0,
        }
    }

    fn compress(&mut self, block: &[u8], t: u128, null_t: bool) {
        let mut m = [0u64; 16];
        for i in 0..16 {
            m[i] = read_u64_be(&block[i * 8..i * 8 + 8]);
        }
        let mut v = [0u64; 16];
        v[0..8].copy_from_slice(&self.h);
        for i in 0..4 {
            v[8 + i] = self.salt[i] ^ C64[i];
        }
        v[12] = C64[4];
        v[13] = C64[5];
        v[14] = C64[6];
        v[15] = C64[7];
        if !null_t {
            let t_lo = t as u64;
            let t_hi = (t >> 64) as u64;
            v[12] ^= t_lo;
            v[13] ^= t_lo;
            v[14] ^= t_hi;
            v[15] ^= t_hi;
        }
        for round in 0..16 {
            let sg = &SIGMA[round % 10];
            round_step!(g64, &mut v, m, C64, sg);
        }
        for i in 0..8 {
            self.h[i] ^= v[i] ^ v[i + 8] ^ self.salt[i % 4];
        }
    }

    fn absorb(&mut self, mut input: &[u8]) {
        if self.buffer_len > 0 {
            let need = 128 - self.buffer_len;
            let take = need.min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];
            if self.buffer_len == 128 {
                self.t = self.t.wrapping_add(1024);
                let block = self.buffer;
                self.compress(&block, self.t, false);
                self.buffer_len = 0;
            }
        }
        while input.len() >= 128 {
            self.t = self.t.wrapping_add(1024);
            let t = self.t;
            self.compress(&input[..128], t, false);
            input = &input[128..];
        }
        if !input.is_empty() {
            self.buffer[self.buffer_len..self.buffer_len + input.len()].copy_from_slice(input);
            self.buffer_len += input.len();
        }
    }

    fn finalize_into(&mut self, out: &mut [u8]) {
        let total_bits: u128 = self.t.wrapping_add((self.buffer_len as u128) * 8);
        let buf_len = self.buffer_len;
        let mut len_bytes = [0u8; 16];
        write_u64_be(&mut len_bytes[0..8], (total_bits >> 64) as u64);
        write_u64_be(&mut len_bytes[8..16], total_bits as u64);

        if buf_len == 111 {
            let mut block = [0u8; 128];
            block[..111].copy_from_slice(&self.buffer[..111]);
            block[111] = 0x81;
            block[112..128].copy_from_slice(&len_bytes);
            self.compress(&block, total_bits, false);
        } else if buf_len < 111 {
            let mut block = [0u8; 128];
            block[..buf_len].copy_from_slice(&self.buffer[..buf_len]);
            block[buf_len] = 0x80;
            block[111] = 0x01;
            block[112..128].copy_from_slice(&len_bytes);
            let null_t = buf_len == 0;
            self.compress(&block, total_bits, null_t);
        } else {
            let mut block1 = [0u8; 128];
            block1[..buf_len].copy_from_slice(&self.buffer[..buf_len]);
            block1[buf_len] = 0x80;
            self.compress(&block1, total_bits, false);

            let mut block2 = [0u8; 128];
            block2[111] = 0x01;
            block2[112..128].copy_from_slice(&len_bytes);
            self.compress(&block2, total_bits, true);
        }

        for (i, word) in self.h.iter().enumerate() {
            write_u64_be(&mut out[i * 8..i * 8 + 8], *word);
        }
    }
}

impl Default for Blake512 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Blake512 {
    fn block_size(&self) -> usize {
        128
    }

    fn digest_size(&self) -> usize {
        64
    }

    fn block_update(&mut self, input: &[u8], offset: usize, length: usize) -> CoreResult<()> {
        crate::error::ensure!(
            offset + length <= input.len(),
            CoreError::InvalidArgument("block_update range out of bounds")
        );
        self.absorb(&input[offset..offset + length]);
        Ok(())
    }

    fn update(&mut self, input: u8) {
        self.absorb(&[input]);
    }

    fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize> {
        crate::error::ensure!(
            out.len() >= offset + 64,
            CoreError::InvalidArgument("output buffer too small for Blake-512 digest")
        );
        self.finalize_into(&mut out[offset..offset + 64]);
        self.reset();
        Ok(64)
    }

    fn reset(&mut self) {
        self.h = IV64;
        self.buffer = [0u8; 128];
        self.buffer_len = 0;
        self.t = 0;
    }
}
