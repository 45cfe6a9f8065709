//! A byte buffer that zeroes itself on drop.
//!
//! Used for IKM, the HKDF-derived content-encryption key and nonce base, and ECDH
//! shared secrets — everywhere §5 of the design calls for sensitive intermediates
//! to be cleared rather than left for the allocator to reuse unzeroed.

use zeroize::Zeroize;

/// Secret byte material, zeroed when dropped.
///
/// Deliberately does not derive `Debug` or `Display`: a stray `{:?}` in a log
/// statement or panic message cannot leak the bytes it holds.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Secret(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::ops::Deref for Secret {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}
