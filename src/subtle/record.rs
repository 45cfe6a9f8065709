//! Encrypts and decrypts a single padded record with AES-128-GCM (component E).
//!
//! A record's plaintext is `padding-length field || zero padding || data`. The
//! padding-length field is `pad_size` big-endian bytes wide (1 for `aesgcm128`,
//! 2 for `aesgcm` and `aes128gcm`). For `aes128gcm` the top bit of that field is
//! a delimiter flag (1 iff this is the last record in the stream) rather than
//! part of the length, halving the representable padding range.

use crate::error::{Error, Result};
use crate::variant::{NONCE_LEN, TAG_LEN};
use aes_gcm::aead::{Aead, NewAead};
use aes_gcm::Aes128Gcm;
use generic_array::GenericArray;

/// An AES-128-GCM key bound to a single record stream.
pub struct Cipher(Aes128Gcm);

impl Cipher {
    /// `key` must be exactly [`crate::variant::KEY_LEN`] bytes; callers always pass
    /// HKDF-Expand output of that length, so this never fails in practice.
    pub fn new(key: &[u8]) -> Self {
        Cipher(Aes128Gcm::new(GenericArray::from_slice(key)))
    }

    /// Build the padded plaintext for one record and seal it under `nonce`.
    ///
    /// `delimiter` is `None` for variants with no last-record bit, or `Some(is_last)`
    /// for `aes128gcm`.
    pub fn seal_record(
        &self,
        nonce: &[u8; NONCE_LEN],
        pad_size: u8,
        pad: u32,
        delimiter: Option<bool>,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let header = build_padding(pad_size, pad, delimiter)?;
        let mut plaintext = Vec::with_capacity(header.len() + data.len());
        plaintext.extend_from_slice(&header);
        plaintext.extend_from_slice(data);
        self.0
            .encrypt(GenericArray::from_slice(nonce), plaintext.as_slice())
            .map_err(|_| Error::AeadFailure)
    }

    /// Authenticate and decrypt one record, then strip and validate its padding.
    ///
    /// Returns `Some(is_last)` as the first element when `has_delimiter` is set,
    /// otherwise `None`; the second element is the record's data payload.
    pub fn open_record(
        &self,
        nonce: &[u8; NONCE_LEN],
        pad_size: u8,
        has_delimiter: bool,
        record: &[u8],
    ) -> Result<(Option<bool>, Vec<u8>)> {
        if record.len() <= TAG_LEN {
            return Err(Error::BlockTooSmall(record.len(), TAG_LEN));
        }
        let plaintext = self
            .0
            .decrypt(GenericArray::from_slice(nonce), record)
            .map_err(|_| Error::AeadFailure)?;
        parse_padding(pad_size, has_delimiter, &plaintext)
    }
}

/// The largest `pad` value the `pad_size`-byte field can hold, reserving the top
/// bit for the delimiter flag when the variant has one.
pub fn max_pad(pad_size: u8, has_delimiter: bool) -> u64 {
    let bits = 8 * u32::from(pad_size) - u32::from(has_delimiter);
    (1u64 << bits) - 1
}

fn build_padding(pad_size: u8, pad: u32, delimiter: Option<bool>) -> Result<Vec<u8>> {
    if u64::from(pad) > max_pad(pad_size, delimiter.is_some()) {
        return Err(Error::PadBudgetExhausted);
    }
    let mut field = u64::from(pad);
    if delimiter == Some(true) {
        field |= 1u64 << (8 * u32::from(pad_size) - 1);
    }
    let field_bytes = field.to_be_bytes();
    let width = pad_size as usize;

    let mut out = Vec::with_capacity(width + pad as usize);
    out.extend_from_slice(&field_bytes[8 - width..]);
    out.resize(width + pad as usize, 0);
    Ok(out)
}

fn parse_padding(
    pad_size: u8,
    has_delimiter: bool,
    plaintext: &[u8],
) -> Result<(Option<bool>, Vec<u8>)> {
    let width = pad_size as usize;
    if plaintext.len() < width {
        return Err(Error::InvalidPadding);
    }

    let mut field: u64 = 0;
    for &b in &plaintext[..width] {
        field = (field << 8) | u64::from(b);
    }

    let is_last = if has_delimiter {
        let flag = 1u64 << (8 * u32::from(pad_size) - 1);
        let last = field & flag != 0;
        field &= flag - 1;
        Some(last)
    } else {
        None
    };

    let pad = field as usize;
    if width + pad > plaintext.len() {
        return Err(Error::InvalidPadding);
    }
    if plaintext[width..width + pad].iter().any(|&b| b != 0) {
        return Err(Error::InvalidPadding);
    }
    Ok((is_last, plaintext[width + pad..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_zero_pad() {
        let cipher = Cipher::new(&[0x42u8; 16]);
        let nonce = [0u8; NONCE_LEN];
        let sealed = cipher
            .seal_record(&nonce, 2, 0, None, b"hello world")
            .unwrap();
        let (is_last, data) = cipher.open_record(&nonce, 2, false, &sealed).unwrap();
        assert_eq!(is_last, None);
        assert_eq!(data, b"hello world");
    }

    #[test]
    fn round_trips_with_padding() {
        let cipher = Cipher::new(&[0x11u8; 16]);
        let nonce = [7u8; NONCE_LEN];
        let sealed = cipher.seal_record(&nonce, 2, 40, None, b"hi").unwrap();
        let (_, data) = cipher.open_record(&nonce, 2, false, &sealed).unwrap();
        assert_eq!(data, b"hi");
    }

    #[test]
    fn delimiter_bit_round_trips() {
        let cipher = Cipher::new(&[0x22u8; 16]);
        let nonce = [3u8; NONCE_LEN];
        let sealed = cipher
            .seal_record(&nonce, 2, 0, Some(true), b"last")
            .unwrap();
        let (is_last, data) = cipher.open_record(&nonce, 2, true, &sealed).unwrap();
        assert_eq!(is_last, Some(true));
        assert_eq!(data, b"last");

        let sealed = cipher
            .seal_record(&nonce, 2, 0, Some(false), b"mid")
            .unwrap();
        let (is_last, data) = cipher.open_record(&nonce, 2, true, &sealed).unwrap();
        assert_eq!(is_last, Some(false));
        assert_eq!(data, b"mid");
    }

    #[test]
    fn tamper_evident() {
        let cipher = Cipher::new(&[0x33u8; 16]);
        let nonce = [9u8; NONCE_LEN];
        let mut sealed = cipher.seal_record(&nonce, 2, 0, None, b"payload").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert_eq!(
            cipher.open_record(&nonce, 2, false, &sealed).unwrap_err(),
            Error::AeadFailure
        );
    }

    #[test]
    fn non_zero_padding_byte_is_rejected() {
        let cipher = Cipher::new(&[0x44u8; 16]);
        let nonce = [1u8; NONCE_LEN];
        // Hand-construct a record with pad=3 but a non-zero byte inside the pad run.
        let mut plaintext = vec![0u8, 3u8]; // pad_size=2, pad=3
        plaintext.extend_from_slice(&[0, 1, 0]); // middle pad byte is non-zero
        plaintext.extend_from_slice(b"x");
        let sealed = aes_gcm::aead::Aead::encrypt(
            &Aes128Gcm::new(GenericArray::from_slice(&[0x44u8; 16])),
            GenericArray::from_slice(&nonce),
            plaintext.as_slice(),
        )
        .unwrap();
        assert_eq!(
            cipher.open_record(&nonce, 2, false, &sealed).unwrap_err(),
            Error::InvalidPadding
        );
    }

    #[test]
    fn block_too_small_is_rejected() {
        let cipher = Cipher::new(&[0x55u8; 16]);
        let nonce = [2u8; NONCE_LEN];
        let short = vec![0u8; TAG_LEN];
        assert_eq!(
            cipher.open_record(&nonce, 2, false, &short).unwrap_err(),
            Error::BlockTooSmall(TAG_LEN, TAG_LEN)
        );
    }
}
