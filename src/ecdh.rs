//! P-256 ECDH key agreement backend (component J).
//!
//! Used when a `Params.dh` peer public key is supplied instead of (or alongside)
//! an explicit key or `keyid` lookup — the IKM for the key schedule then becomes
//! the raw ECDH shared secret (the X-coordinate of the agreed point), per
//! SEC1/ANSI-X9.63 convention rather than a KDF'd value; the HKDF step in
//! [`crate::subtle::key_schedule`] supplies all the domain separation.

use crate::error::{Error, Result};
use crate::secret::Secret;
use elliptic_curve::sec1::ToEncodedPoint;
use p256::ecdh::diffie_hellman;
use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;

/// A local P-256 key pair used for one ECDH exchange.
#[derive(Clone)]
pub struct EcdhPrivateKey {
    secret: SecretKey,
}

impl EcdhPrivateKey {
    /// Generate a fresh, uniformly random key pair.
    pub fn generate() -> Self {
        EcdhPrivateKey {
            secret: SecretKey::random(&mut OsRng),
        }
    }

    /// Reconstruct a key pair from a raw 32-byte scalar, as stored by the keystore.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_be_bytes(bytes).map_err(|_| Error::EcdhFailure)?;
        Ok(EcdhPrivateKey { secret })
    }

    /// The raw 32-byte scalar, for persisting this key pair in a keystore.
    pub fn to_bytes(&self) -> Secret {
        Secret::new(self.secret.to_be_bytes().to_vec())
    }

    /// The uncompressed SEC1 public key (`0x04 || X || Y`, 65 bytes) to send to the peer.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    /// Run ECDH against `peer_public` (uncompressed or compressed SEC1) and return
    /// the shared secret (the agreed point's X-coordinate).
    pub fn compute_shared_secret(&self, peer_public: &[u8]) -> Result<Secret> {
        let peer_key = PublicKey::from_sec1_bytes(peer_public).map_err(|_| Error::EcdhFailure)?;
        let shared = diffie_hellman(&self.secret.to_nonzero_scalar(), peer_key.as_affine());
        Ok(Secret::new(shared.raw_secret_bytes().to_vec()))
    }
}
