//! RFC 5869 HKDF over SHA-256 (component A).
//!
//! A thin wrapper over the `hkdf` crate rather than a hand-rolled HMAC loop —
//! every other primitive in this crate (AES-GCM, the ECDH backend) likewise
//! leans on an audited implementation instead of reinventing one.

use crate::secret::Secret;
use hkdf::Hkdf;
use sha2::Sha256;

/// An extracted pseudorandom key, ready to be expanded any number of times with
/// different `info` strings (the key schedule expands it once for the content key
/// and once for the nonce base).
pub struct Prk {
    inner: Hkdf<Sha256>,
}

impl Prk {
    /// `HKDF-Extract(salt, ikm)`.
    pub fn extract(salt: &[u8], ikm: &[u8]) -> Self {
        let (_prk, inner) = Hkdf::<Sha256>::extract(Some(salt), ikm);
        Prk { inner }
    }

    /// `HKDF-Expand(prk, info, len)`.
    ///
    /// `len` is always 12, 16, or 32 bytes in this crate, far under the RFC 5869
    /// ceiling of `255 * 32` bytes, so the only failure mode `hkdf::expand` defines
    /// cannot occur here.
    pub fn expand(&self, info: &[u8], len: usize) -> Secret {
        let mut okm = vec![0u8; len];
        self.inner
            .expand(info, &mut okm)
            .expect("HKDF output length requested by this crate never exceeds 255*32 bytes");
        Secret::new(okm)
    }
}
