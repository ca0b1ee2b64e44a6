//! Key derivation: HKDF (RFC 5869) and PBKDF2 (RFC 2898 / PKCS#5 v2.1).
//! spec.md §4.5. Both are expressed over HMAC rather than a raw digest, the
//! same layering `CEX`'s own KDF family uses.

mod hkdf;
mod pbkdf2;

pub use hkdf::Hkdf;
pub use pbkdf2::Pbkdf2;
