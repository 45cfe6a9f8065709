//! The error type shared by every fallible operation in this crate.

use thiserror::Error;

/// Everything that can go wrong while encrypting or decrypting a content-encoded
/// body, or while managing the keystore.
///
/// Every variant is fatal to the call that produced it; nothing here is retryable
/// at this layer. No variant carries key material, derived keys, shared secrets,
/// or plaintext/ciphertext bytes — only the non-secret context needed to diagnose
/// the failure.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("no salt was supplied for this variant")]
    MissingSalt,

    #[error("salt must be 16 bytes, got {0}")]
    BadSaltLength(usize),

    #[error("explicit key must be 16 bytes, got {0}")]
    BadKeyLength(usize),

    #[error("none of key, dh, or keyid resolved to usable key material")]
    MissingKeyMaterial,

    #[error("unknown keyid {0:?}")]
    UnknownKeyId(String),

    #[error("ECDH key agreement requested for keyid {0:?} without a registered DH label")]
    MissingDhLabel(String),

    #[error("record size must exceed the {pad_size}-byte padding field (got {rs})")]
    BadRecordSize { rs: u64, pad_size: u8 },

    #[error("keyid is {0} bytes, exceeds the 255-byte limit for aes128gcm")]
    KeyIdTooLong(usize),

    #[error("payload ended on a record boundary without the expected terminator")]
    TruncatedPayload,

    #[error("record of {0} bytes does not exceed the {1}-byte AEAD tag")]
    BlockTooSmall(usize, usize),

    #[error("AEAD authentication failed")]
    AeadFailure,

    #[error("invalid record padding")]
    InvalidPadding,

    #[error("could not fit the requested pad budget into the available records")]
    PadBudgetExhausted,

    #[error("unrecognized content-coding variant {0:?}")]
    UnknownVariant(String),

    #[error("invalid base64url encoding")]
    InvalidBase64,

    #[error("ECDH key agreement failed")]
    EcdhFailure,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
