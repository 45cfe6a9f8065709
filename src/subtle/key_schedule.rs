//! Resolves header parameters into a content-encryption key and nonce base
//! (component C).

use super::context;
use super::hkdf::Prk;
use crate::ecdh::EcdhPrivateKey;
use crate::error::{Error, Result};
use crate::keystore::{KeyEntry, KeyStore};
use crate::secret::Secret;
use crate::variant::{Mode, Variant, KEY_LEN, NONCE_LEN};

/// The two values a key schedule run produces.
pub struct Resolved {
    pub key: Secret,
    pub nonce_base: Secret,
}

/// Input keying material plus whatever local key state is needed to build the
/// ECDH DH context blob, if this exchange uses one.
struct Ikm {
    bytes: Secret,
    dh_context: Vec<u8>,
}

/// Run the full key schedule: resolve IKM, optionally mix in `auth_secret`,
/// extract a PRK, then expand it into the content key and nonce base.
#[allow(clippy::too_many_arguments)]
pub fn derive(
    variant: Variant,
    mode: Mode,
    salt: &[u8],
    key: Option<&[u8]>,
    dh: Option<&[u8]>,
    keyid: Option<&str>,
    auth_secret: Option<&[u8]>,
    store: &dyn KeyStore,
) -> Result<Resolved> {
    let ikm = resolve_ikm(variant, mode, key, dh, keyid, store)?;
    let ikm_bytes: Secret = match auth_secret {
        Some(auth) => {
            let prk = Prk::extract(auth, ikm.bytes.as_ref());
            prk.expand(b"Content-Encoding: auth\0", 32)
        }
        None => ikm.bytes,
    };

    let prk = Prk::extract(salt, ikm_bytes.as_ref());
    let key_info = context::info(variant, variant.key_info_base(), &ikm.dh_context);
    let nonce_info = context::info(variant, variant.nonce_info_base(), &ikm.dh_context);

    Ok(Resolved {
        key: prk.expand(&key_info, KEY_LEN),
        nonce_base: prk.expand(&nonce_info, NONCE_LEN),
    })
}

fn resolve_ikm(
    variant: Variant,
    mode: Mode,
    key: Option<&[u8]>,
    dh: Option<&[u8]>,
    keyid: Option<&str>,
    store: &dyn KeyStore,
) -> Result<Ikm> {
    if let Some(key) = key {
        if key.len() != KEY_LEN {
            return Err(Error::BadKeyLength(key.len()));
        }
        return Ok(Ikm {
            bytes: Secret::new(key.to_vec()),
            dh_context: Vec::new(),
        });
    }

    if let Some(peer_public) = dh {
        let id = keyid.ok_or(Error::MissingKeyMaterial)?;
        let entry = store.lookup(id)?;
        let (local_private, label) = match entry {
            KeyEntry::Ecdh { private, label } => (private, label),
            KeyEntry::Raw(_) => return Err(Error::MissingKeyMaterial),
        };

        let shared = local_private.compute_shared_secret(peer_public)?;
        let dh_context = build_dh_context(variant, mode, &local_private, &label, peer_public, id)?;
        return Ok(Ikm {
            bytes: shared,
            dh_context,
        });
    }

    if let Some(id) = keyid {
        let entry = store.lookup(id)?;
        return match entry {
            KeyEntry::Raw(bytes) => Ok(Ikm {
                bytes: Secret::new(bytes),
                dh_context: Vec::new(),
            }),
            KeyEntry::Ecdh { .. } => Err(Error::MissingKeyMaterial),
        };
    }

    Err(Error::MissingKeyMaterial)
}

/// Only `aesgcm` carries a DH context blob in its `info` strings (§4.2); for
/// every other variant (including `aes128gcm`, which also permits ECDH-derived
/// IKM) the blob is empty.
fn build_dh_context(
    variant: Variant,
    mode: Mode,
    local_private: &EcdhPrivateKey,
    label: &Option<Vec<u8>>,
    peer_public: &[u8],
    keyid: &str,
) -> Result<Vec<u8>> {
    if variant != Variant::Aesgcm {
        return Ok(Vec::new());
    }
    let label = label
        .as_ref()
        .ok_or_else(|| Error::MissingDhLabel(keyid.to_string()))?;
    let local_public = local_private.public_bytes();

    let (recipient_pub, sender_pub) = match mode {
        Mode::Encrypt => (peer_public, local_public.as_slice()),
        Mode::Decrypt => (local_public.as_slice(), peer_public),
    };
    Ok(context::dh_context(label, recipient_pub, sender_pub))
}
