//! Entropy providers: an OS CSPRNG provider (CSP), a hardware-RNG provider
//! (RDP), and an entropy-collection-and-condition provider (ECP). Spec.md
//! §4.7.

#[cfg(feature = "std")]
mod csp;
#[cfg(feature = "std")]
mod ecp;
#[cfg(feature = "std")]
mod rdp;

#[cfg(feature = "std")]
pub use csp::Csp;
#[cfg(feature = "std")]
pub use ecp::Ecp;
#[cfg(feature = "std")]
pub use rdp::Rdp;

use crate::error::CoreResult;

/// Common contract for every entropy provider (spec.md §4.7):
/// `GetBytes`/`Next`/`Reset`/`IsAvailable`/`Destroy`.
pub trait EntropyProvider {
    /// Fills `out[offset..offset+length]` with provider output.
    fn get_bytes(&mut self, out: &mut [u8], offset: usize, length: usize) -> CoreResult<()>;
    /// Draws a single `u32` worth of entropy.
    fn next_u32(&mut self) -> CoreResult<u32> {
        let mut buf = [0u8; 4];
        self.get_bytes(&mut buf, 0, 4)?;
        Ok(u32::from_le_bytes(buf))
    }
    /// Restores the provider to a freshly constructed state, where that is
    /// meaningful (ECP re-collects its samples; CSP and RDP, which hold no
    /// accumulated state, treat this as a no-op).
    fn reset(&mut self);
    /// Whether the provider is currently able to produce output (spec.md
    /// §4.7: a hardware RNG provider may become unavailable after its
    /// per-reseed output cap is hit).
    fn is_available(&self) -> bool;
    /// Releases any sensitive internal buffers. Idempotent.
    fn destroy(&mut self);
}
