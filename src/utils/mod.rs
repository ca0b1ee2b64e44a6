//! Shared utilities: endian conversion, constant-time XOR, and secure wipe.
//! Bit rotation is covered by `u32::rotate_left`/`rotate_right` directly at
//! each call site (a single instruction on every target this crate cares
//! about), so there is no separate rotate helper module. These back every
//! primitive, mode, MAC, KDF and DRBG in the crate and carry no
//! algorithm-specific knowledge of their own.

pub(crate) mod endian;
pub(crate) mod wipe;
pub(crate) mod xor;

pub use wipe::secure_wipe;
