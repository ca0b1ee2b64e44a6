use criterion::{criterion_group, criterion_main, Criterion};
use rhx_core::cipher::{BlockCipher, Direction, KeySchedule, Rhx};
use rhx_core::digest::{Blake256, Digest, Sha256};
use rhx_core::kdf::Pbkdf2;
use rhx_core::mac::{Hmac, Mac};
use rhx_core::mode::{Cbc, CipherMode, Ctr};
use rhx_core::DigestKind;

const KEY_128: [u8; 16] = [0x2bu8; 16];
const IV_128: [u8; 16] = [0x3cu8; 16];

pub fn criterion_benchmark(c: &mut Criterion) {
    let cipher = Rhx::new(Direction::Encrypt, &KEY_128, 16, KeySchedule::Standard).unwrap();
    let plaintext = [0u8; 16];
    let mut ciphertext = [0u8; 16];
    c.bench_function("RHX AES-128 EncryptBlock", |b| {
        b.iter(|| cipher.encrypt_block(&plaintext, &mut ciphertext))
    });

    let one_mb: Vec<u8> = (0u8..=255).cycle().take(1 << 20).collect();

    c.bench_function("CTR serial Transform 1 MiB", |b| {
        b.iter(|| {
            let cipher = Rhx::new(Direction::Encrypt, &KEY_128, 16, KeySchedule::Standard).unwrap();
            let mut mode = Ctr::new(&cipher, &IV_128).unwrap();
            mode.set_parallel_block_size(one_mb.len());
            let mut out = vec![0u8; one_mb.len()];
            mode.transform(&one_mb, 0, &mut out, 0, one_mb.len()).unwrap();
        })
    });

    c.bench_function("CTR parallel Transform 1 MiB", |b| {
        b.iter(|| {
            let cipher = Rhx::new(Direction::Encrypt, &KEY_128, 16, KeySchedule::Standard).unwrap();
            let mut mode = Ctr::new(&cipher, &IV_128).unwrap();
            mode.set_parallel_block_size(4096);
            let mut out = vec![0u8; one_mb.len()];
            mode.transform(&one_mb, 0, &mut out, 0, one_mb.len()).unwrap();
        })
    });

    c.bench_function("CBC Encrypt 1 MiB", |b| {
        b.iter(|| {
            let cipher = Rhx::new(Direction::Encrypt, &KEY_128, 16, KeySchedule::Standard).unwrap();
            let mut mode = Cbc::new(&cipher, true, &IV_128).unwrap();
            let mut out = vec![0u8; one_mb.len()];
            mode.transform(&one_mb, 0, &mut out, 0, one_mb.len()).unwrap();
        })
    });

    c.bench_function("SHA-256 ComputeHash 1 MiB", |b| {
        b.iter(|| {
            let mut digest = Sha256::new();
            let mut out = [0u8; 32];
            digest.compute_hash(&one_mb, &mut out)
        })
    });

    c.bench_function("Blake-256 ComputeHash 1 MiB", |b| {
        b.iter(|| {
            let mut digest = Blake256::new();
            let mut out = [0u8; 32];
            digest.compute_hash(&one_mb, &mut out)
        })
    });

    c.bench_function("HMAC-SHA256 DoFinal 1 MiB", |b| {
        b.iter(|| {
            let mut mac = Hmac::new(DigestKind::Sha256, b"benchmark-key").unwrap();
            mac.block_update(&one_mb, 0, one_mb.len()).unwrap();
            let mut tag = [0u8; 32];
            mac.do_final(&mut tag, 0)
        })
    });

    c.bench_function("PBKDF2-SHA256 4096 iterations", |b| {
        b.iter(|| {
            let kdf = Pbkdf2::new(DigestKind::Sha256, b"password");
            kdf.derive(b"salt", 4096, 32)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
