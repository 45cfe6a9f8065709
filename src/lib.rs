//! Encrypted Content-Encoding for HTTP.
//!
//! Implements the three content-coding schemes used to encrypt an HTTP message
//! body: `aesgcm128` and `aesgcm` (the drafts Web Push was built against, header
//! parameters carried out of band) and `aes128gcm` (RFC 8188, header carried
//! in-band at the front of the body). All three share the same core: derive a
//! content-encryption key and nonce base with HKDF-SHA256, then AES-128-GCM-seal
//! a sequence of padded, fixed-size records.
//!
//! ```
//! use ece::{encrypt, decrypt, Params, Variant};
//!
//! let params = Params::new(Variant::Aesgcm128)
//!     .with_salt(vec![0x42u8; 16])
//!     .with_key(vec![0x11u8; 16]);
//!
//! let ciphertext = encrypt(b"I am the walrus", &params).unwrap();
//! let plaintext = decrypt(&ciphertext, &params).unwrap();
//! assert_eq!(plaintext, b"I am the walrus");
//! ```

mod base64url;
mod ecdh;
mod error;
mod keystore;
mod secret;
mod subtle;
mod variant;

pub use base64url::{decode as decode_base64url, encode as encode_base64url};
pub use ecdh::EcdhPrivateKey;
pub use error::{Error, Result};
pub use keystore::{KeyEntry, KeyStore, MemoryKeyStore};
pub use variant::{Mode, Variant};

use subtle::{framing, header::Header, key_schedule, random, record};
use variant::{DEFAULT_RECORD_SIZE, SALT_LEN, TAG_LEN};

/// The input bundle shared by `encrypt` and `decrypt`.
///
/// `variant` is always explicit — it is never inferred from which optional
/// fields happen to be populated (§9's redesign note).
#[derive(Clone)]
pub struct Params {
    variant: Variant,
    salt: Option<Vec<u8>>,
    rs: u32,
    key: Option<Vec<u8>>,
    keyid: Option<String>,
    dh: Option<Vec<u8>>,
    auth_secret: Option<Vec<u8>>,
    pad: u32,
}

impl Params {
    /// Start a parameter set for `variant`, with the default record size and
    /// no other fields set.
    pub fn new(variant: Variant) -> Self {
        Params {
            variant,
            salt: None,
            rs: DEFAULT_RECORD_SIZE,
            key: None,
            keyid: None,
            dh: None,
            auth_secret: None,
            pad: 0,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Set the 16-byte HKDF salt directly. Required for `aesgcm`/`aesgcm128`;
    /// optional for `aes128gcm`, which generates one at encrypt time if absent.
    pub fn with_salt(mut self, salt: Vec<u8>) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Set the salt from its base64url (no padding) form (component K).
    pub fn with_salt_base64(mut self, salt: &str) -> Result<Self> {
        self.salt = Some(base64url::decode(salt)?);
        Ok(self)
    }

    /// Override the default record size. Must exceed the variant's padding-field
    /// width.
    pub fn with_rs(mut self, rs: u32) -> Self {
        self.rs = rs;
        self
    }

    /// Set an explicit 16-byte content key. Mutually exclusive with `dh` in
    /// practice, though nothing here enforces that — the key schedule simply
    /// prefers `key` over `dh`/`keyid` when more than one is set.
    pub fn with_key(mut self, key: Vec<u8>) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_key_base64(mut self, key: &str) -> Result<Self> {
        self.key = Some(base64url::decode(key)?);
        Ok(self)
    }

    /// Identify the keystore entry to use, either as the sole key source or
    /// (alongside `dh`) as the local ECDH key pair.
    pub fn with_keyid(mut self, keyid: impl Into<String>) -> Self {
        self.keyid = Some(keyid.into());
        self
    }

    /// Set the peer's uncompressed P-256 public key for ECDH key agreement.
    pub fn with_dh(mut self, dh: Vec<u8>) -> Self {
        self.dh = Some(dh);
        self
    }

    pub fn with_dh_base64(mut self, dh: &str) -> Result<Self> {
        self.dh = Some(base64url::decode(dh)?);
        Ok(self)
    }

    /// Set the auth secret mixed in before HKDF (typically 16 bytes, Web Push's
    /// `authSecret`).
    pub fn with_auth_secret(mut self, auth_secret: Vec<u8>) -> Self {
        self.auth_secret = Some(auth_secret);
        self
    }

    pub fn with_auth_secret_base64(mut self, auth_secret: &str) -> Result<Self> {
        self.auth_secret = Some(base64url::decode(auth_secret)?);
        Ok(self)
    }

    /// Set the total padding budget to distribute across records (encrypt only).
    pub fn with_pad(mut self, pad: u32) -> Self {
        self.pad = pad;
        self
    }
}

/// Register `key_material` under `id` in the default, process-wide keystore.
///
/// `dh_label` marks this as an ECDH private key (`key_material` is its raw
/// 32-byte scalar) and supplies the NUL-terminated label used in the `aesgcm`
/// DH context blob; without it, `key_material` is stored as raw content-key
/// bytes.
pub fn save_key(id: &str, key_material: &[u8], dh_label: Option<&[u8]>) -> Result<()> {
    save_key_in(keystore::global(), id, key_material, dh_label)
}

/// Like [`save_key`], but against a caller-supplied keystore instead of the
/// default global one.
pub fn save_key_in(
    store: &dyn KeyStore,
    id: &str,
    key_material: &[u8],
    dh_label: Option<&[u8]>,
) -> Result<()> {
    let entry = match dh_label {
        Some(label) => KeyEntry::Ecdh {
            private: EcdhPrivateKey::from_bytes(key_material)?,
            label: Some(label.to_vec()),
        },
        None => KeyEntry::Raw(key_material.to_vec()),
    };
    store.save(id, entry);
    Ok(())
}

/// Encrypt `plaintext` under `params`, using the default process-wide keystore
/// for any `keyid`/`dh` lookups.
pub fn encrypt(plaintext: &[u8], params: &Params) -> Result<Vec<u8>> {
    encrypt_with_keystore(plaintext, params, keystore::global())
}

/// Decrypt `ciphertext` under `params`, using the default process-wide keystore.
pub fn decrypt(ciphertext: &[u8], params: &Params) -> Result<Vec<u8>> {
    decrypt_with_keystore(ciphertext, params, keystore::global())
}

/// Encrypt against an explicit keystore instead of the default global one.
pub fn encrypt_with_keystore(
    plaintext: &[u8],
    params: &Params,
    store: &dyn KeyStore,
) -> Result<Vec<u8>> {
    let variant = params.variant;
    let pad_size = variant.pad_size();

    if params.rs <= variant.min_rs() {
        return Err(Error::BadRecordSize {
            rs: params.rs as u64,
            pad_size,
        });
    }
    if variant.has_inband_header() {
        if let Some(keyid) = &params.keyid {
            if keyid.len() > 255 {
                return Err(Error::KeyIdTooLong(keyid.len()));
            }
        }
    }

    let salt = match (&params.salt, variant.has_inband_header()) {
        (Some(salt), _) => salt.clone(),
        (None, true) => random::get_random_bytes(SALT_LEN),
        (None, false) => return Err(Error::MissingSalt),
    };
    if salt.len() != SALT_LEN {
        return Err(Error::BadSaltLength(salt.len()));
    }

    tracing::debug!(%variant, rs = params.rs, "encrypt dispatch starting");

    let resolved = key_schedule::derive(
        variant,
        Mode::Encrypt,
        &salt,
        params.key.as_deref(),
        params.dh.as_deref(),
        params.keyid.as_deref(),
        params.auth_secret.as_deref(),
        store,
    )
    .map_err(|e| {
        tracing::warn!(%variant, error = %e, "encrypt dispatch failed resolving key material");
        e
    })?;

    let cipher = record::Cipher::new(resolved.key.as_ref());
    let nonce_base = resolved.nonce_base.as_ref();

    let body = if variant.has_inband_header() {
        framing::encrypt_records(
            &cipher,
            nonce_base,
            2,
            true,
            params.rs as usize - TAG_LEN,
            params.pad,
            plaintext,
        )
    } else {
        framing::encrypt_records(
            &cipher,
            nonce_base,
            pad_size,
            false,
            params.rs as usize,
            params.pad,
            plaintext,
        )
    }
    .map_err(|e| {
        tracing::warn!(%variant, error = %e, "encrypt dispatch failed framing records");
        e
    })?;

    let out = if variant.has_inband_header() {
        let keyid_bytes = params
            .keyid
            .as_ref()
            .map(|k| k.as_bytes().to_vec())
            .unwrap_or_default();
        let header = Header {
            salt,
            rs: params.rs,
            keyid: keyid_bytes,
        }
        .serialize()?;
        let mut out = header;
        out.extend_from_slice(&body);
        out
    } else {
        body
    };

    tracing::debug!(%variant, ciphertext_len = out.len(), "encrypt dispatch complete");
    Ok(out)
}

/// Decrypt against an explicit keystore instead of the default global one.
pub fn decrypt_with_keystore(
    ciphertext: &[u8],
    params: &Params,
    store: &dyn KeyStore,
) -> Result<Vec<u8>> {
    let variant = params.variant;
    let pad_size = variant.pad_size();

    tracing::debug!(%variant, ciphertext_len = ciphertext.len(), "decrypt dispatch starting");

    let (salt, rs, keyid, body): (Vec<u8>, u32, Option<String>, &[u8]) = if variant
        .has_inband_header()
    {
        let (header, consumed) = Header::parse(ciphertext)?;
        let keyid = if header.keyid.is_empty() {
            params.keyid.clone()
        } else {
            Some(String::from_utf8_lossy(&header.keyid).into_owned())
        };
        (header.salt, header.rs, keyid, &ciphertext[consumed..])
    } else {
        let salt = params.salt.clone().ok_or(Error::MissingSalt)?;
        (salt, params.rs, params.keyid.clone(), ciphertext)
    };

    if salt.len() != SALT_LEN {
        return Err(Error::BadSaltLength(salt.len()));
    }
    if rs <= variant.min_rs() {
        return Err(Error::BadRecordSize {
            rs: rs as u64,
            pad_size,
        });
    }

    let resolved = key_schedule::derive(
        variant,
        Mode::Decrypt,
        &salt,
        params.key.as_deref(),
        params.dh.as_deref(),
        keyid.as_deref(),
        params.auth_secret.as_deref(),
        store,
    )
    .map_err(|e| {
        tracing::warn!(%variant, error = %e, "decrypt dispatch failed resolving key material");
        e
    })?;

    let cipher = record::Cipher::new(resolved.key.as_ref());
    let nonce_base = resolved.nonce_base.as_ref();

    let plaintext = if variant.has_inband_header() {
        framing::decrypt_aes128gcm_records(&cipher, nonce_base, rs, body)
    } else {
        framing::decrypt_legacy_records(&cipher, nonce_base, pad_size, rs, body)
    }
    .map_err(|e| {
        tracing::warn!(%variant, error = %e, "decrypt dispatch failed walking records");
        e
    })?;

    tracing::debug!(%variant, plaintext_len = plaintext.len(), "decrypt dispatch complete");
    Ok(plaintext)
}
