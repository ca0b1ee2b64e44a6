//! Skein-256/512/1024: the Threefish tweakable block cipher run through the
//! Unique Block Iteration (UBI) chaining construction (spec.md §4.3).
//! Grounded in the published Skein v1.3 specification (Ferguson et al.),
//! which `CEX`'s own Skein family implements; round counts, rotation
//! constants and the UBI tweak/type encoding below follow that spec.

use super::Digest;
use crate::error::{CoreError, CoreResult};
use crate::utils::endian::{read_u64_le, write_u64_le};

const C240: u64 = 0x1BD1_1BDA_A9FC_1A22;

const TYPE_CONFIG: u64 = 4;
const TYPE_MESSAGE: u64 = 48;
const TYPE_OUTPUT: u64 = 63;

/// Builds the 128-bit UBI tweak as `(t0, t1)`.
fn tweak(position: u64, first: bool, last: bool, block_type: u64) -> (u64, u64) {
    let mut t1 = block_type << 56;
    if first {
        t1 |= 1u64 << 62;
    }
    if last {
        t1 |= 1u64 << 63;
    }
    (position, t1)
}

macro_rules! threefish_impl {
    ($mod_name:ident, $nw:expr, $nrounds:expr, $rot:expr, $perm:expr) => {
        mod $mod_name {
            use super::rotl;

            pub(super) const NW: usize = $nw;
            const ROUNDS: usize = $nrounds;
            const ROT: [[u32; $nw / 2]; 8] = $rot;
            const PERM: [usize; $nw] = $perm;

            fn key_schedule(key: &[u64; NW], tweak: (u64, u64)) -> [[u64; NW]; ROUNDS / 4 + 1] {
                let mut ek = [0u64; NW + 1];
                ek[..NW].copy_from_slice(key);
                let mut x = super::C240;
                for k in key {
                    x ^= k;
                }
                ek[NW] = x;
                let t = [tweak.0, tweak.1, tweak.0 ^ tweak.1];

                let mut subkeys = [[0u64; NW]; ROUNDS / 4 + 1];
                for i in 0..=ROUNDS / 4 {
                    let mut sk = [0u64; NW];
                    for j in 0..NW - 3 {
                        sk[j] = ek[(i + j) % (NW + 1)];
                    }
                    sk[NW - 3] = ek[(i + NW - 3) % (NW + 1)].wrapping_add(t[i % 3]);
                    sk[NW - 2] = ek[(i + NW - 2) % (NW + 1)].wrapping_add(t[(i + 1) % 3]);
                    sk[NW - 1] = ek[(i + NW - 1) % (NW + 1)].wrapping_add(i as u64);
                    subkeys[i] = sk;
                }
                subkeys
            }

            /// Encrypts `block` in place under `key`/`tweak`.
            pub(super) fn encrypt(key: &[u64; NW], tweak: (u64, u64), block: &mut [u64; NW]) {
                let subkeys = key_schedule(key, tweak);
                for d in 0..ROUNDS {
                    if d % 4 == 0 {
                        let sk = &subkeys[d / 4];
                        for i in 0..NW {
                            block[i] = block[i].wrapping_add(sk[i]);
                        }
                    }
                    let rot = &ROT[d % 8];
                    let mut mixed = [0u64; NW];
                    for pair in 0..NW / 2 {
                        let (a, b) = (block[2 * pair], block[2 * pair + 1]);
                        let y0 = a.wrapping_add(b);
                        let y1 = rotl(b, rot[pair]) ^ y0;
                        mixed[2 * pair] = y0;
                        mixed[2 * pair + 1] = y1;
                    }
                    for i in 0..NW {
                        block[i] = mixed[PERM[i]];
                    }
                }
                let sk = &subkeys[ROUNDS / 4];
                for i in 0..NW {
                    block[i] = block[i].wrapping_add(sk[i]);
                }
            }
        }
    };
}

#[inline]
fn rotl(x: u64, n: u32) -> u64 {
    x.rotate_left(n)
}

#[rustfmt::skip]
threefish_impl!(
    tf256, 4, 72,
    [[14, 16], [52, 57], [23, 40], [5, 37], [25, 33], [46, 12], [58, 22], [32, 32]],
    [0, 3, 2, 1]
);

#[rustfmt::skip]
threefish_impl!(
    tf512, 8, 72,
    [
        [46, 36, 19, 37], [33, 27, 14, 42], [17, 49, 36, 39], [44, 9, 54, 56],
        [39, 30, 34, 24], [13, 50, 10, 17], [25, 29, 39, 43], [8, 35, 56, 22],
    ],
    [2, 1, 4, 7, 6, 5, 0, 3]
);

#[rustfmt::skip]
threefish_impl!(
    tf1024, 16, 80,
    [
        [24, 13, 8, 47, 8, 17, 22, 37], [38, 19, 10, 55, 49, 18, 23, 52],
        [33, 4, 51, 13, 34, 41, 59, 17], [5, 20, 48, 41, 47, 28, 16, 25],
        [41, 9, 37, 31, 12, 47, 44, 30], [16, 34, 56, 51, 4, 53, 42, 41],
        [31, 44, 47, 46, 19, 42, 44, 25], [9, 48, 35, 52, 23, 31, 37, 20],
    ],
    [0, 9, 2, 13, 6, 11, 4, 15, 10, 7, 12, 3, 14, 5, 8, 1]
);

/// Generic UBI-chained Skein state over `NW` 64-bit words (`NW*8` bytes of
/// block/output size). `NW` is 4, 8 or 16 for Skein-256/512/1024.
struct SkeinState<const NW: usize> {
    chain: [u64; NW],
    buffer: [u8; 128],
    buffer_len: usize,
    position: u64,
    encrypt: fn(&[u64; NW], (u64, u64), &mut [u64; NW]),
}

impl<const NW: usize> SkeinState<NW> {
    fn block_bytes(&self) -> usize {
        NW * 8
    }

    fn ubi_block(&mut self, block_bytes: &[u8], first: bool, last: bool, block_type: u64) {
        let nb = self.block_bytes();
        let mut words = [0u64; NW];
        for i in 0..NW {
            words[i] = read_u64_le(&block_bytes[i * 8..i * 8 + 8]);
        }
        let t = tweak(self.position, first, last, block_type);
        let key = self.chain;
        let mut cipher_out = words;
        (self.encrypt)(&key, t, &mut cipher_out);
        for i in 0..NW {
            self.chain[i] = cipher_out[i] ^ words[i];
        }
        let _ = nb;
    }

    fn run_ubi(&mut self, mut message: &[u8], block_type: u64) {
        let nb = self.block_bytes();
        self.position = 0;
        if message.is_empty() {
            let block = [0u8; 128];
            self.ubi_block(&block[..nb], true, true, block_type);
            return;
        }
        let mut first = true;
        while message.len() > nb {
            self.position += nb as u64;
            let mut block = [0u8; 128];
            block[..nb].copy_from_slice(&message[..nb]);
            self.ubi_block(&block[..nb], first, false, block_type);
            first = false;
            message = &message[nb..];
        }
        self.position += message.len() as u64;
        let mut block = [0u8; 128];
        block[..message.len()].copy_from_slice(message);
        self.ubi_block(&block[..nb], first, true, block_type);
    }
}

macro_rules! skein_digest {
    ($name:ident, $nw:expr, $encrypt_fn:path, $outsize:expr, $doc:expr) => {
        #[doc = $doc]
        pub struct $name {
            state: SkeinState<$nw>,
            message: alloc::vec::Vec<u8>,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                let mut s = $name {
                    state: SkeinState {
                        chain: [0u64; $nw],
                        buffer: [0u8; 128],
                        buffer_len: 0,
                        position: 0,
                        encrypt: $encrypt_fn,
                    },
                    message: alloc::vec::Vec::new(),
                };
                s.init_chain();
                s
            }

            fn init_chain(&mut self) {
                let nb = $nw * 8;
                let mut config = [0u8; 128];
                config[0] = 0x53;
                config[1] = 0x48;
                config[2] = 0x41;
                config[3] = 0x33;
                config[4] = 1;
                config[5] = 0;
                let out_bits = ($outsize as u64) * 8;
                write_u64_le(&mut config[8..16], out_bits);
                self.state.chain = [0u64; $nw];
                self.state.run_ubi(&config[..nb], TYPE_CONFIG);
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Digest for $name {
            fn block_size(&self) -> usize {
                $nw * 8
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
                self.message.extend_from_slice(&input[offset..offset + length]);
                Ok(())
            }

            fn update(&mut self, input: u8) {
                self.message.push(input);
            }

            fn do_final(&mut self, out: &mut [u8], offset: usize) -> CoreResult<usize> {
                crate::error::ensure!(
                    out.len() >= offset + $outsize,
                    CoreError::InvalidArgument("output buffer too small for Skein digest")
                );
                self.state.run_ubi(&self.message, TYPE_MESSAGE);

                let mut produced = 0usize;
                let mut counter = 0u64;
                let nb = $nw * 8;
                while produced < $outsize {
                    let mut ctr_block = [0u8; 128];
                    write_u64_le(&mut ctr_block[0..8], counter);
                    let saved_chain = self.state.chain;
                    self.state.run_ubi(&ctr_block[..nb], TYPE_OUTPUT);
                    let mut out_bytes = [0u8; 128];
                    for i in 0..$nw {
                        write_u64_le(&mut out_bytes[i * 8..i * 8 + 8], self.state.chain[i]);
                    }
                    let take = ($outsize - produced).min(nb);
                    out[offset + produced..offset + produced + take]
                        .copy_from_slice(&out_bytes[..take]);
                    produced += take;
                    self.state.chain = saved_chain;
                    counter += 1;
                }
                self.reset();
                Ok($outsize)
            }

            fn reset(&mut self) {
                self.message.clear();
                self.state.buffer = [0u8; 128];
                self.state.buffer_len = 0;
                self.state.position = 0;
                self.init_chain();
            }
        }
    };
}

skein_digest!(Skein256, 4, tf256::encrypt, 32, "Skein-256, 32-byte output.");
skein_digest!(Skein512, 8, tf512::encrypt, 64, "Skein-512, 64-byte output.");
skein_digest!(Skein1024, 16, tf1024::encrypt, 128, "Skein-1024, 128-byte output.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skein256_deterministic_and_sized() {
        let mut d = Skein256::new();
        let mut out1 = [0u8; 32];
        d.compute_hash(b"abc", &mut out1).unwrap();
        let mut d2 = Skein256::new();
        let mut out2 = [0u8; 32];
        d2.compute_hash(b"abc", &mut out2).unwrap();
        assert_eq!(out1, out2);
    }

    #[test]
    fn skein_variants_distinguish_inputs() {
        let mut d = Skein512::new();
        let mut a = [0u8; 64];
        d.compute_hash(b"abc", &mut a).unwrap();
        let mut d2 = Skein512::new();
        let mut b = [0u8; 64];
        d2.compute_hash(b"abd", &mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn skein1024_output_size() {
        let mut d = Skein1024::new();
        let mut out = [0u8; 128];
        let n = d.compute_hash(b"", &mut out).unwrap();
        assert_eq!(n, 128);
    }

    #[test]
    fn threefish256_round_trips_are_internally_consistent() {
        // Threefish itself is not exposed publicly; this exercises it
        // indirectly through two UBI calls with the same key/tweak/message
        // producing identical output, confirming determinism end to end.
        let mut d1 = Skein256::new();
        let mut d2 = Skein256::new();
        let mut o1 = [0u8; 32];
        let mut o2 = [0u8; 32];
        d1.compute_hash(b"The quick brown fox", &mut o1).unwrap();
        d2.compute_hash(b"The quick brown fox", &mut o2).unwrap();
        assert_eq!(o1, o2);
    }
}
