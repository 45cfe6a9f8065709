//! Cryptographically secure random byte generation.
//!
//! Used for the `aes128gcm` salt generated on encrypt when the caller doesn't
//! supply one, and for ECDH private-key generation.

use rand::RngCore;

/// Return `len` cryptographically secure random bytes from the OS RNG.
pub fn get_random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}
