//! The three content-coding wire variants and the constants each implies.

use crate::error::Error;

/// The size in bytes of the AES-128-GCM authentication tag appended to every record.
pub const TAG_LEN: usize = 16;
/// The size in bytes of the derived content-encryption key.
pub const KEY_LEN: usize = 16;
/// The size in bytes of the derived nonce base.
pub const NONCE_LEN: usize = 12;
/// The size in bytes of the HKDF salt.
pub const SALT_LEN: usize = 16;
/// Default record size when the caller does not specify one.
pub const DEFAULT_RECORD_SIZE: u32 = 4096;

/// Which content-encoding scheme a record stream uses.
///
/// Chosen once, explicitly, by the caller (it is a required field of [`crate::Params`])
/// — never inferred at dispatch time from which optional fields happen to be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `aesgcm128` — earliest draft. 1-byte padding-length field, no in-band header.
    Aesgcm128,
    /// `aesgcm` — draft used by Web Push. 2-byte padding-length field, no in-band header.
    Aesgcm,
    /// `aes128gcm` — RFC 8188. 2-byte padding-length field with a last-record delimiter
    /// bit, 21-byte-minimum in-band header.
    Aes128Gcm,
}

impl Variant {
    /// Width, in bytes, of the per-record padding-length field.
    pub fn pad_size(self) -> u8 {
        match self {
            Variant::Aesgcm128 => 1,
            Variant::Aesgcm | Variant::Aes128Gcm => 2,
        }
    }

    /// Whether this variant carries its header (salt, rs, keyid) in-band on the wire
    /// rather than out of band (e.g. in HTTP headers).
    pub fn has_inband_header(self) -> bool {
        matches!(self, Variant::Aes128Gcm)
    }

    /// Whether the last record's leading padding byte carries a high-bit delimiter flag.
    pub fn has_delimiter_bit(self) -> bool {
        matches!(self, Variant::Aes128Gcm)
    }

    /// The literal prefix of the HKDF `info` string used to derive the content-encryption
    /// key, before any DH context blob is appended.
    pub(crate) fn key_info_base(self) -> &'static [u8] {
        match self {
            Variant::Aesgcm128 => b"Content-Encoding: aesgcm128",
            Variant::Aesgcm => b"Content-Encoding: aesgcm\0",
            Variant::Aes128Gcm => b"Content-Encoding: aes128gcm\0",
        }
    }

    /// The literal prefix of the HKDF `info` string used to derive the nonce base,
    /// before any DH context blob is appended.
    pub(crate) fn nonce_info_base(self) -> &'static [u8] {
        match self {
            Variant::Aesgcm128 => b"Content-Encoding: nonce",
            Variant::Aesgcm | Variant::Aes128Gcm => b"Content-Encoding: nonce\0",
        }
    }

    /// Whether this variant's `info` strings may be followed by an ECDH context blob
    /// (the short-form `aesgcm128` strings never take one).
    pub(crate) fn supports_dh_context(self) -> bool {
        !matches!(self, Variant::Aesgcm128)
    }

    /// The smallest `rs` that still leaves room for at least one byte of data.
    ///
    /// For `aesgcm`/`aesgcm128`, `rs` counts only the padded-plaintext side of a
    /// record (the tag is added on top), so it must merely exceed `padSize`. For
    /// `aes128gcm`, `rs` counts the whole on-the-wire record (tag included), so it
    /// must exceed `padSize + tagLength` as well — a caller-supplied `rs` that
    /// only clears the smaller legacy bound would otherwise underflow when the
    /// tag length is subtracted back out to recover the per-record data budget.
    pub(crate) fn min_rs(self) -> u32 {
        let pad_size = self.pad_size() as u32;
        if self.has_inband_header() {
            pad_size + TAG_LEN as u32
        } else {
            pad_size
        }
    }

    /// Parse the on-the-wire/HTTP-header content-coding token.
    pub fn parse(tag: &str) -> Result<Self, Error> {
        match tag {
            "aesgcm128" => Ok(Variant::Aesgcm128),
            "aesgcm" => Ok(Variant::Aesgcm),
            "aes128gcm" => Ok(Variant::Aes128Gcm),
            other => Err(Error::UnknownVariant(other.to_string())),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Variant::Aesgcm128 => "aesgcm128",
            Variant::Aesgcm => "aesgcm",
            Variant::Aes128Gcm => "aes128gcm",
        };
        f.write_str(tag)
    }
}

/// Which direction an operation runs, since key-schedule role assignment
/// (sender/recipient inside the ECDH context blob) swaps with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}
