//! RHX: a parametric Rijndael engine with an optional HKDF-driven extended
//! key schedule (spec.md §4.1). Block width is 16 or 32 bytes (`Nb` of 4 or
//! 8 32-bit words); standard-mode key sizes are 16/24/32/64 bytes with
//! round counts {10,12,14,22} following the general Rijndael formula
//! `Nr = max(Nk, Nb) + 6`; extended mode replaces the SubWord/RotWord/Rcon
//! recurrence with HKDF-Expand over the user key, at a caller-chosen even
//! round count in `[10, 38]`.

use super::tables::{gmul, rcon, INV_SBOX, SBOX};
use super::{BlockCipher, Direction};
use crate::digest::DigestKind;
use crate::error::{CoreError, CoreResult};
use crate::kdf::Hkdf;
use alloc::vec::Vec;
use zeroize::Zeroize;

/// Part of the wire contract (spec.md §9, "Info byte strings"): changing
/// this breaks interoperability with any ciphertext produced under the
/// extended key schedule.
const EXTENDED_SCHEDULE_INFO: &[u8] = b"information string RHX version 1";

const MIN_EXTENDED_ROUNDS: usize = 10;
const MAX_EXTENDED_ROUNDS: usize = 38;

/// Selects which of the two key-schedule constructions `Rhx::new` uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySchedule {
    /// Rijndael's own schedule. Round count is derived from `(Nk, Nb)`.
    Standard,
    /// HKDF-Expand over the user key, with a caller-chosen round count.
    Extended { digest: DigestKind, rounds: usize },
}

/// A single round key column: 4 bytes, one per state row.
type Word = [u8; 4];

/// A keyed Rijndael/RHX instance. Holds both the forward round-key
/// schedule and, lazily, the equivalent-inverse schedule used by
/// `decrypt_block` (FIPS-197 Figure 15): the round keys `dw` are the
/// forward keys in reverse order with `InvMixColumns` applied to every
/// interior key, letting decryption apply `InvSubBytes → InvShiftRows →
/// InvMixColumns → AddRoundKey` in that order instead of reversing the
/// encryption round function operation-by-operation.
pub struct Rhx {
    round_keys: Vec<Word>,
    inv_round_keys: Vec<Word>,
    block_size: usize,
    nb: usize,
    rounds: usize,
    direction: Direction,
}

impl Rhx {
    /// Keys a new instance. `block_size` must be 16 or 32; `key` must lie
    /// in the legal-sizes set for the chosen schedule.
    pub fn new(direction: Direction, key: &[u8], block_size: usize, schedule: KeySchedule) -> CoreResult<Self> {
        crate::error::ensure!(
            block_size == 16 || block_size == 32,
            CoreError::UnsupportedConfiguration("RHX block size must be 16 or 32 bytes")
        );
        let nb = block_size / 4;

        let (rounds, round_keys) = match schedule {
            KeySchedule::Standard => {
                crate::error::ensure!(
                    matches!(key.len(), 16 | 24 | 32 | 64),
                    CoreError::InvalidArgument("standard RHX key must be 16, 24, 32 or 64 bytes")
                );
                standard_key_schedule(key, nb)
            }
            KeySchedule::Extended { digest, rounds } => {
                crate::error::ensure!(
                    rounds % 2 == 0 && (MIN_EXTENDED_ROUNDS..=MAX_EXTENDED_ROUNDS).contains(&rounds),
                    CoreError::UnsupportedConfiguration("extended RHX round count must be even and in [10, 38]")
                );
                let hash_size = digest.output_size();
                crate::error::ensure!(
                    legal_extended_key_size(key.len(), hash_size),
                    CoreError::InvalidArgument("extended RHX key length outside {16,24,32,64,64+H,64+2H,...}")
                );
                let round_keys = extended_key_schedule(key, nb, rounds, digest)?;
                (rounds, round_keys)
            }
        };

        let inv_round_keys = equivalent_inverse_schedule(&round_keys, nb, rounds);

        Ok(Rhx {
            round_keys,
            inv_round_keys,
            block_size,
            nb,
            rounds,
            direction,
        })
    }
}

/// `64, 64+H, 64+2H, ...` in addition to the three fixed standard sizes.
fn legal_extended_key_size(len: usize, hash_size: usize) -> bool {
    matches!(len, 16 | 24 | 32) || (len >= 64 && (len - 64) % hash_size == 0)
}

fn standard_key_schedule(key: &[u8], nb: usize) -> (usize, Vec<Word>) {
    let nk = key.len() / 4;
    let rounds = core::cmp::max(nk, nb) + 6;
    let total_words = nb * (rounds + 1);

    let mut w: Vec<Word> = Vec::with_capacity(total_words);
    for i in 0..nk {
        w.push([key[4 * i], key[4 * i + 1], key[4 * i + 2], key[4 * i + 3]]);
    }
    for i in nk..total_words {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = [temp[1], temp[2], temp[3], temp[0]];
            for b in temp.iter_mut() {
                *b = SBOX[*b as usize];
            }
            temp[0] ^= rcon(i / nk);
        } else if nk > 6 && i % nk == 4 {
            for b in temp.iter_mut() {
                *b = SBOX[*b as usize];
            }
        }
        let prev = w[i - nk];
        w.push([
            prev[0] ^ temp[0],
            prev[1] ^ temp[1],
            prev[2] ^ temp[2],
            prev[3] ^ temp[3],
        ]);
    }
    (rounds, w)
}

fn extended_key_schedule(key: &[u8], nb: usize, rounds: usize, digest: DigestKind) -> CoreResult<Vec<Word>> {
    let total_words = nb * (rounds + 1);
    let hkdf = Hkdf::from_prk(digest, key);
    let bytes = hkdf.expand(EXTENDED_SCHEDULE_INFO, total_words * 4)?;
    let mut w = Vec::with_capacity(total_words);
    for chunk in bytes.chunks_exact(4) {
        w.push([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(w)
}

/// FIPS-197 Figure 15's equivalent inverse cipher key schedule: the last
/// forward round key is kept as-is, the first is kept as-is, and every
/// round key in between has `InvMixColumns` applied to it (one column at a
/// time, since `MixColumns`/`InvMixColumns` operate per-column).
fn equivalent_inverse_schedule(w: &[Word], nb: usize, rounds: usize) -> Vec<Word> {
    let mut dw: Vec<Word> = Vec::with_capacity(nb * (rounds + 1));
    dw.extend_from_slice(&w[rounds * nb..rounds * nb + nb]);
    for rnd in 1..rounds {
        let cols = &w[(rounds - rnd) * nb..(rounds - rnd) * nb + nb];
        for col in cols {
            let [c0, c1, c2, c3] = *col;
            dw.push([
                gmul(c0, 14) ^ gmul(c1, 11) ^ gmul(c2, 13) ^ gmul(c3, 9),
                gmul(c0, 9) ^ gmul(c1, 14) ^ gmul(c2, 11) ^ gmul(c3, 13),
                gmul(c0, 13) ^ gmul(c1, 9) ^ gmul(c2, 14) ^ gmul(c3, 11),
                gmul(c0, 11) ^ gmul(c1, 13) ^ gmul(c2, 9) ^ gmul(c3, 14),
            ]);
        }
    }
    dw.extend_from_slice(&w[0..nb]);
    dw
}

/// Row-shift amounts for `ShiftRows`/`InvShiftRows`, indexed by row. Rows 2
/// and 3 shift by `1,3,4` rather than `1,2,3` once the state grows past
/// four columns (Rijndael-256), per the official shift-offset table.
fn shift_offsets(nb: usize) -> [usize; 4] {
    match nb {
        4 => [0, 1, 2, 3],
        8 => [0, 1, 3, 4],
        _ => unreachable!("block size validated to 16 or 32 bytes at construction"),
    }
}

/// `4 x Nb` state, column-major: byte at row `r`, column `c` lives at
/// `state[r][c]`. `Nb` never exceeds 8, so a fixed `[[u8; 8]; 4]` backing
/// array covers both supported block sizes without allocating per block.
type State = [[u8; 8]; 4];

fn bytes_to_state(data: &[u8], nb: usize) -> State {
    let mut state = [[0u8; 8]; 4];
    for c in 0..nb {
        for r in 0..4 {
            state[r][c] = data[4 * c + r];
        }
    }
    state
}

fn state_to_bytes(state: &State, nb: usize, out: &mut [u8]) {
    for c in 0..nb {
        for r in 0..4 {
            out[4 * c + r] = state[r][c];
        }
    }
}

fn add_round_key(state: &mut State, w: &[Word], round: usize, nb: usize) {
    for c in 0..nb {
        let word = w[round * nb + c];
        for r in 0..4 {
            state[r][c] ^= word[r];
        }
    }
}

fn sub_bytes(state: &mut State, nb: usize) {
    for row in state.iter_mut() {
        for b in row.iter_mut().take(nb) {
            *b = SBOX[*b as usize];
        }
    }
}

fn inv_sub_bytes(state: &mut State, nb: usize) {
    for row in state.iter_mut() {
        for b in row.iter_mut().take(nb) {
            *b = INV_SBOX[*b as usize];
        }
    }
}

fn shift_rows(state: &mut State, nb: usize) {
    let offsets = shift_offsets(nb);
    for r in 1..4 {
        state[r][0..nb].rotate_left(offsets[r]);
    }
}

fn inv_shift_rows(state: &mut State, nb: usize) {
    let offsets = shift_offsets(nb);
    for r in 1..4 {
        state[r][0..nb].rotate_right(offsets[r]);
    }
}

fn mix_columns(state: &mut State, nb: usize) {
    for c in 0..nb {
        let col = [state[0][c], state[1][c], state[2][c], state[3][c]];
        state[0][c] = gmul(col[0], 2) ^ gmul(col[1], 3) ^ col[2] ^ col[3];
        state[1][c] = col[0] ^ gmul(col[1], 2) ^ gmul(col[2], 3) ^ col[3];
        state[2][c] = col[0] ^ col[1] ^ gmul(col[2], 2) ^ gmul(col[3], 3);
        state[3][c] = gmul(col[0], 3) ^ col[1] ^ col[2] ^ gmul(col[3], 2);
    }
}

fn inv_mix_columns(state: &mut State, nb: usize) {
    for c in 0..nb {
        let col = [state[0][c], state[1][c], state[2][c], state[3][c]];
        state[0][c] = gmul(col[0], 14) ^ gmul(col[1], 11) ^ gmul(col[2], 13) ^ gmul(col[3], 9);
        state[1][c] = gmul(col[0], 9) ^ gmul(col[1], 14) ^ gmul(col[2], 11) ^ gmul(col[3], 13);
        state[2][c] = gmul(col[0], 13) ^ gmul(col[1], 9) ^ gmul(col[2], 14) ^ gmul(col[3], 11);
        state[3][c] = gmul(col[0], 11) ^ gmul(col[1], 13) ^ gmul(col[2], 9) ^ gmul(col[3], 14);
    }
}

impl BlockCipher for Rhx {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> CoreResult<()> {
        crate::error::ensure!(
            input.len() >= self.block_size && output.len() >= self.block_size,
            CoreError::InvalidArgument("block buffer shorter than the configured block size")
        );
        let mut state = bytes_to_state(input, self.nb);
        add_round_key(&mut state, &self.round_keys, 0, self.nb);
        for rnd in 1..self.rounds {
            sub_bytes(&mut state, self.nb);
            shift_rows(&mut state, self.nb);
            mix_columns(&mut state, self.nb);
            add_round_key(&mut state, &self.round_keys, rnd, self.nb);
        }
        sub_bytes(&mut state, self.nb);
        shift_rows(&mut state, self.nb);
        add_round_key(&mut state, &self.round_keys, self.rounds, self.nb);
        state_to_bytes(&state, self.nb, output);
        Ok(())
    }

    fn decrypt_block(&self, input: &[u8], output: &mut [u8]) -> CoreResult<()> {
        crate::error::ensure!(
            input.len() >= self.block_size && output.len() >= self.block_size,
            CoreError::InvalidArgument("block buffer shorter than the configured block size")
        );
        let mut state = bytes_to_state(input, self.nb);
        add_round_key(&mut state, &self.inv_round_keys, 0, self.nb);
        for rnd in 1..self.rounds {
            inv_sub_bytes(&mut state, self.nb);
            inv_shift_rows(&mut state, self.nb);
            inv_mix_columns(&mut state, self.nb);
            add_round_key(&mut state, &self.inv_round_keys, rnd, self.nb);
        }
        inv_sub_bytes(&mut state, self.nb);
        inv_shift_rows(&mut state, self.nb);
        add_round_key(&mut state, &self.inv_round_keys, self.rounds, self.nb);
        state_to_bytes(&state, self.nb, output);
        Ok(())
    }

    fn transform(&self, input: &[u8], output: &mut [u8]) -> CoreResult<()> {
        match self.direction {
            Direction::Encrypt => self.encrypt_block(input, output),
            Direction::Decrypt => self.decrypt_block(input, output),
        }
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

impl Drop for Rhx {
    fn drop(&mut self) {
        for word in self.round_keys.iter_mut().chain(self.inv_round_keys.iter_mut()) {
            word.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rhx_std(direction: Direction, key: &[u8], block_size: usize) -> Rhx {
        Rhx::new(direction, key, block_size, KeySchedule::Standard).unwrap()
    }

    // FIPS-197 Appendix B: AES-128.
    #[test]
    fn aes128_fips197_vector() {
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let pt = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let cipher = rhx_std(Direction::Encrypt, &key, 16);
        let mut ct = [0u8; 16];
        cipher.encrypt_block(&pt, &mut ct).unwrap();
        assert_eq!(hex::encode(ct), "69c4e0d86a7b0430d8cdb78070b4c55a");

        let mut dec = [0u8; 16];
        cipher.decrypt_block(&ct, &mut dec).unwrap();
        assert_eq!(dec, pt[..]);
    }

    // FIPS-197 Appendix C.1: AES-192.
    #[test]
    fn aes192_fips197_vector() {
        let key = hex::decode("000102030405060708090a0b0c0d0e0f1011121314151617").unwrap();
        let pt = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let cipher = rhx_std(Direction::Encrypt, &key, 16);
        let mut ct = [0u8; 16];
        cipher.encrypt_block(&pt, &mut ct).unwrap();
        assert_eq!(hex::encode(ct), "dda97ca4864cdfe06eaf70a0ec0d7191");
    }

    // FIPS-197 Appendix C.3: AES-256.
    #[test]
    fn aes256_fips197_vector() {
        let key = hex::decode("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f").unwrap();
        let pt = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let cipher = rhx_std(Direction::Encrypt, &key, 16);
        let mut ct = [0u8; 16];
        cipher.encrypt_block(&pt, &mut ct).unwrap();
        assert_eq!(hex::encode(ct), "8ea2b7ca516745bfeafc49904b496089");

        let mut dec = [0u8; 16];
        cipher.decrypt_block(&ct, &mut dec).unwrap();
        assert_eq!(dec, pt[..]);
    }

    #[test]
    fn standard_64_byte_key_uses_22_rounds() {
        let key = [7u8; 64];
        let pt = [0u8; 16];
        let cipher = rhx_std(Direction::Encrypt, &key, 16);
        assert_eq!(cipher.rounds, 22);
        let mut ct = [0u8; 16];
        cipher.encrypt_block(&pt, &mut ct).unwrap();
        let mut dec = [0u8; 16];
        cipher.decrypt_block(&ct, &mut dec).unwrap();
        assert_eq!(dec, pt);
    }

    #[test]
    fn rijndael_256_round_trips() {
        let key: Vec<u8> = (0u8..32).collect();
        let pt: Vec<u8> = (0u8..32).collect();
        let cipher = rhx_std(Direction::Encrypt, &key, 32);
        let mut ct = [0u8; 32];
        cipher.encrypt_block(&pt, &mut ct).unwrap();
        assert_eq!(
            hex::encode(ct),
            "623d2bd4ca3796dc3d02ecf2f37fb637fd3da58509cebb67ab9265b04db51e7d"
        );
        let mut dec = [0u8; 32];
        cipher.decrypt_block(&ct, &mut dec).unwrap();
        assert_eq!(dec[..], pt[..]);
    }

    #[test]
    fn extended_schedule_round_trips_and_respects_round_bounds() {
        let key = [0x42u8; 32];
        let cipher = Rhx::new(
            Direction::Encrypt,
            &key,
            16,
            KeySchedule::Extended {
                digest: DigestKind::Sha256,
                rounds: 14,
            },
        )
        .unwrap();
        let pt = [0xabu8; 16];
        let mut ct = [0u8; 16];
        cipher.encrypt_block(&pt, &mut ct).unwrap();
        let mut dec = [0u8; 16];
        cipher.decrypt_block(&ct, &mut dec).unwrap();
        assert_eq!(dec, pt);

        assert!(Rhx::new(
            Direction::Encrypt,
            &key,
            16,
            KeySchedule::Extended {
                digest: DigestKind::Sha256,
                rounds: 11,
            }
        )
        .is_err());
        assert!(Rhx::new(
            Direction::Encrypt,
            &key,
            16,
            KeySchedule::Extended {
                digest: DigestKind::Sha256,
                rounds: 40,
            }
        )
        .is_err());
    }

    #[test]
    fn extended_schedule_rejects_illegal_key_sizes() {
        // H=32 for SHA-256, so 64+32=96 is legal but 70 is not.
        let legal = [0x11u8; 96];
        assert!(Rhx::new(
            Direction::Encrypt,
            &legal,
            16,
            KeySchedule::Extended {
                digest: DigestKind::Sha256,
                rounds: 14,
            }
        )
        .is_ok());

        let illegal = [0x11u8; 70];
        assert!(Rhx::new(
            Direction::Encrypt,
            &illegal,
            16,
            KeySchedule::Extended {
                digest: DigestKind::Sha256,
                rounds: 14,
            }
        )
        .is_err());
    }

    #[test]
    fn rejects_unsupported_block_size() {
        let key = [0u8; 16];
        assert!(Rhx::new(Direction::Encrypt, &key, 24, KeySchedule::Standard).is_err());
    }

    #[test]
    fn rejects_illegal_standard_key_size() {
        let key = [0u8; 20];
        assert!(Rhx::new(Direction::Encrypt, &key, 16, KeySchedule::Standard).is_err());
    }
}
