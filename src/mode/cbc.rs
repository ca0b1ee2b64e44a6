//! Cipher block chaining (spec.md §4.2): `c_i = E(k, p_i XOR c_{i-1})` on
//! encrypt, `p_i = D(k, c_i) XOR c_{i-1}` on decrypt, `c_{-1} = IV`.
//! Encryption is strictly serial; decryption has no inter-block dependency
//! on the plaintext and may be parallelized (spec.md §5).

use super::{require_block_sized_iv, require_range, CipherMode};
use crate::cipher::BlockCipher;
use crate::error::{CoreError, CoreResult};
use crate::utils::xor::{xor_in_place, xor_into};
use alloc::vec::Vec;

/// CBC mode over a borrowed, already-keyed `BlockCipher`.
pub struct Cbc<'a> {
    cipher: &'a dyn BlockCipher,
    encrypt: bool,
    iv: Vec<u8>,
    /// Hint for `decrypt`'s chunk size under the `parallel` feature
    /// (spec.md §5 "Parallel CBC-decrypt"). Defaults to one block; a
    /// caller processing large buffers can widen it.
    parallel_block_size: usize,
}

impl<'a> Cbc<'a> {
    /// Keys a new CBC instance. `iv` must be exactly one block long.
    pub fn new(cipher: &'a dyn BlockCipher, encrypt: bool, iv: &[u8]) -> CoreResult<Self> {
        require_block_sized_iv(iv, cipher.block_size())?;
        Ok(Cbc {
            cipher,
            encrypt,
            iv: iv.to_vec(),
            parallel_block_size: cipher.block_size(),
        })
    }

    /// Sets the chunk size (in bytes, a multiple of the block size) used to
    /// partition a decrypt call's work across worker threads when the
    /// `parallel` feature is enabled. Has no effect on output, only on how
    /// it is computed (spec.md §5: "Output is defined to be identical to
    /// serial execution").
    pub fn set_parallel_block_size(&mut self, bytes: usize) {
        self.parallel_block_size = bytes.max(self.cipher.block_size());
    }

    fn encrypt_serial(&mut self, input: &[u8], output: &mut [u8], length: usize) -> CoreResult<()> {
        let bs = self.block_size();
        let mut prev = self.iv.clone();
        let mut pos = 0;
        while pos < length {
            let mut buf = vec_block(bs);
            xor_into(&mut buf, &input[pos..pos + bs], &prev);
            self.cipher.encrypt_block(&buf, &mut output[pos..pos + bs])?;
            prev.copy_from_slice(&output[pos..pos + bs]);
            pos += bs;
        }
        self.iv = prev;
        Ok(())
    }

    /// CBC decrypt of one block given the preceding ciphertext block as
    /// chaining input; stateless with respect to `self`, so independent
    /// blocks can be handed to separate workers.
    fn decrypt_block_chained(cipher: &dyn BlockCipher, ct: &[u8], prev_ct: &[u8], out: &mut [u8]) -> CoreResult<()> {
        cipher.decrypt_block(ct, out)?;
        xor_in_place(out, prev_ct);
        Ok(())
    }

    fn decrypt_serial(&mut self, input: &[u8], output: &mut [u8], length: usize) -> CoreResult<()> {
        let bs = self.block_size();
        let mut prev = self.iv.clone();
        let mut pos = 0;
        while pos < length {
            let ct_block = input[pos..pos + bs].to_vec();
            Self::decrypt_block_chained(self.cipher, &ct_block, &prev, &mut output[pos..pos + bs])?;
            prev = ct_block;
            pos += bs;
        }
        self.iv = prev;
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn decrypt_parallel(&mut self, input: &[u8], output: &mut [u8], length: usize) -> CoreResult<()> {
        let bs = self.block_size();
        let chunk = (self.parallel_block_size / bs).max(1) * bs;
        let next_iv = input[length - bs..length].to_vec();

        std::thread::scope(|scope| -> CoreResult<()> {
            let mut out_rest: &mut [u8] = output;
            let mut in_pos = 0usize;
            let mut handles = Vec::new();
            while in_pos < length {
                let take = chunk.min(length - in_pos);
                let (out_chunk, rest) = out_rest.split_at_mut(take);
                out_rest = rest;
                let prev = if in_pos == 0 {
                    self.iv.clone()
                } else {
                    input[in_pos - bs..in_pos].to_vec()
                };
                let in_chunk = &input[in_pos..in_pos + take];
                let cipher = self.cipher;
                handles.push(scope.spawn(move || -> CoreResult<()> {
                    let mut prev = prev;
                    let mut off = 0usize;
                    while off < in_chunk.len() {
                        let ct_block = &in_chunk[off..off + bs];
                        Self::decrypt_block_chained(cipher, ct_block, &prev, &mut out_chunk[off..off + bs])?;
                        prev = ct_block.to_vec();
                        off += bs;
                    }
                    Ok(())
                }));
                in_pos += take;
            }
            for handle in handles {
                handle.join().map_err(|_| CoreError::Internal("CBC-decrypt worker thread panicked"))??;
            }
            Ok(())
        })?;

        self.iv = next_iv;
        Ok(())
    }
}

fn vec_block(bs: usize) -> Vec<u8> {
    alloc::vec![0u8; bs]
}

impl CipherMode for Cbc<'_> {
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
        let bs = self.block_size();
        crate::error::ensure!(
            length > 0 && length % bs == 0,
            CoreError::InvalidArgument("CBC transform length must be a positive multiple of the block size")
        );
        require_range(input.len(), in_offset, length, "CBC input range out of bounds")?;
        require_range(output.len(), out_offset, length, "CBC output range out of bounds")?;

        let input = &input[in_offset..in_offset + length];
        let output = &mut output[out_offset..out_offset + length];

        if self.encrypt {
            self.encrypt_serial(input, output, length)
        } else {
            #[cfg(feature = "parallel")]
            {
                if length > self.block_size() {
                    return self.decrypt_parallel(input, output, length);
                }
            }
            self.decrypt_serial(input, output, length)
        }
    }
}
