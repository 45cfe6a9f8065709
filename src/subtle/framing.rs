//! Splits plaintext into records on encrypt, and walks ciphertext on decrypt
//! (component F).
//!
//! One routine, [`encrypt_records`], drives all three variants: the only thing
//! that differs between `aesgcm128`/`aesgcm` and `aes128gcm` is the per-record
//! plaintext budget (`rs` itself for the legacy pair, `rs - tagLen` for
//! `aes128gcm`, since its `rs` counts the on-wire record including the tag) and
//! whether a delimiter bit is available. Decoding differs enough between "final
//! record is whichever one came up short" (legacy) and "final record is whichever
//! one has the delimiter bit set" (`aes128gcm`) that it gets two routines.

use super::nonce;
use super::record::{max_pad, Cipher};
use crate::error::{Error, Result};
use crate::variant::TAG_LEN;

/// Build the complete record stream for one message.
///
/// `record_cap` is the plaintext-side budget per record, padding field included:
/// `rs` itself for `aesgcm`/`aesgcm128`, `rs - tagLen` for `aes128gcm`.
pub fn encrypt_records(
    cipher: &Cipher,
    nonce_base: &[u8],
    pad_size: u8,
    has_delimiter: bool,
    record_cap: usize,
    mut pad_budget: u32,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    if record_cap <= pad_size as usize {
        return Err(Error::BadRecordSize {
            rs: record_cap as u64,
            pad_size,
        });
    }

    let mut out = Vec::with_capacity(plaintext.len() + TAG_LEN * 2 + pad_budget as usize);
    let mut start = 0usize;
    let mut counter = 0u64;

    loop {
        let remaining_data = plaintext.len() - start;
        let available_cap = (record_cap - pad_size as usize) as u32;
        // Reserve at least one byte of data capacity per record so a future
        // data byte always has somewhere to go — but only while there still
        // is a future data byte. Once the plaintext itself is exhausted, the
        // whole remaining cap is free for pad-only records, or this loop
        // could strand leftover `pad_budget` forever.
        let cap_for_pad = if remaining_data > 0 {
            available_cap.saturating_sub(1)
        } else {
            available_cap
        };
        let record_pad = pad_budget
            .min(cap_for_pad)
            .min(max_pad(pad_size, has_delimiter) as u32);
        pad_budget -= record_pad;

        let data_cap = record_cap - pad_size as usize - record_pad as usize;
        let chunk_len = data_cap.min(remaining_data);
        // The terminal record is the one that leaves both the data and the pad
        // budget fully drained — a short/empty record otherwise, per the
        // framing rule that the last record is the only one allowed to be
        // less than full.
        let is_last = chunk_len < data_cap && pad_budget == 0;
        let delimiter = if has_delimiter { Some(is_last) } else { None };

        let nonce = nonce::derive(nonce_base, counter);
        let sealed = cipher.seal_record(
            &nonce,
            pad_size,
            record_pad,
            delimiter,
            &plaintext[start..start + chunk_len],
        )?;
        out.extend_from_slice(&sealed);

        start += chunk_len;
        counter += 1;
        if is_last {
            break;
        }
    }

    if pad_budget > 0 {
        return Err(Error::PadBudgetExhausted);
    }
    Ok(out)
}

/// Walk a legacy (`aesgcm`/`aesgcm128`) record stream: each record is exactly
/// `rs + tagLen` bytes on the wire except the final, necessarily shorter, one.
/// A stream that ends exactly on a full-size record boundary is ambiguous —
/// the decoder cannot tell "done" from "truncated" — and is rejected.
pub fn decrypt_legacy_records(
    cipher: &Cipher,
    nonce_base: &[u8],
    pad_size: u8,
    rs: u32,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let full_wire_len = rs as usize + TAG_LEN;
    let mut out = Vec::with_capacity(ciphertext.len());
    let mut pos = 0usize;
    let mut counter = 0u64;

    loop {
        if pos >= ciphertext.len() {
            return Err(Error::TruncatedPayload);
        }
        let remaining = ciphertext.len() - pos;
        let take = full_wire_len.min(remaining);
        let record = &ciphertext[pos..pos + take];

        let nonce = nonce::derive(nonce_base, counter);
        let (_, data) = cipher.open_record(&nonce, pad_size, false, record)?;
        out.extend_from_slice(&data);

        pos += take;
        counter += 1;
        if take < full_wire_len {
            break;
        }
    }
    Ok(out)
}

/// Walk an `aes128gcm` record stream: every record is exactly `rs` bytes on the
/// wire (tag included) except the final one, which is identified by the
/// delimiter bit in its first padding byte rather than by being short.
pub fn decrypt_aes128gcm_records(
    cipher: &Cipher,
    nonce_base: &[u8],
    rs: u32,
    body: &[u8],
) -> Result<Vec<u8>> {
    const PAD_SIZE: u8 = 2;
    let wire_len = rs as usize;
    let mut out = Vec::with_capacity(body.len());
    let mut pos = 0usize;
    let mut counter = 0u64;

    loop {
        if pos >= body.len() {
            return Err(Error::TruncatedPayload);
        }
        let remaining = body.len() - pos;
        let take = wire_len.min(remaining);
        let record = &body[pos..pos + take];
        let at_buffer_end = pos + take == body.len();

        let nonce = nonce::derive(nonce_base, counter);
        let (is_last, data) = cipher.open_record(&nonce, PAD_SIZE, true, record)?;
        let is_last = is_last.expect("aes128gcm records always carry a delimiter bit");

        if at_buffer_end && !is_last {
            return Err(Error::TruncatedPayload);
        }
        if !at_buffer_end && is_last {
            return Err(Error::InvalidPadding);
        }

        out.extend_from_slice(&data);
        pos += take;
        counter += 1;
        if is_last {
            break;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtle::record::Cipher;
    use crate::variant::NONCE_LEN;

    fn cipher() -> Cipher {
        Cipher::new(&[0x5Au8; 16])
    }

    #[test]
    fn legacy_round_trip_small_message() {
        let c = cipher();
        let nonce_base = [0x01u8; NONCE_LEN];
        let plaintext = b"I am the walrus";
        let wire = encrypt_records(&c, &nonce_base, 1, false, 25, 0, plaintext).unwrap();
        let out = decrypt_legacy_records(&c, &nonce_base, 1, 25, &wire).unwrap();
        assert_eq!(out, plaintext);
    }

    #[test]
    fn legacy_multi_record_message() {
        let c = cipher();
        let nonce_base = [0x02u8; NONCE_LEN];
        let plaintext: Vec<u8> = (0u8..41).collect();
        let wire = encrypt_records(&c, &nonce_base, 1, false, 25, 0, &plaintext).unwrap();
        let out = decrypt_legacy_records(&c, &nonce_base, 1, 25, &wire).unwrap();
        assert_eq!(out, plaintext);
    }

    #[test]
    fn legacy_pad_is_ignored_by_decoder() {
        let c = cipher();
        let nonce_base = [0x03u8; NONCE_LEN];
        let plaintext = b"short message";
        let no_pad = encrypt_records(&c, &nonce_base, 2, false, 4096, 0, plaintext).unwrap();
        let padded = encrypt_records(&c, &nonce_base, 2, false, 4096, 500, plaintext).unwrap();
        assert_ne!(no_pad, padded);
        assert_eq!(
            decrypt_legacy_records(&c, &nonce_base, 2, 4096, &no_pad).unwrap(),
            plaintext
        );
        assert_eq!(
            decrypt_legacy_records(&c, &nonce_base, 2, 4096, &padded).unwrap(),
            plaintext
        );
    }

    #[test]
    fn legacy_large_pad_budget_spans_several_records() {
        let c = cipher();
        let nonce_base = [0x04u8; NONCE_LEN];
        let plaintext = b"hi";
        let wire = encrypt_records(&c, &nonce_base, 2, false, 25, 10_000, plaintext).unwrap();
        // rs=25 leaves at most 22 pad bytes/record, so 10000 bytes of pad needs
        // several records purely to burn down the budget.
        assert!(wire.len() > (25 + TAG_LEN) * 100);
        assert_eq!(
            decrypt_legacy_records(&c, &nonce_base, 2, 25, &wire).unwrap(),
            plaintext
        );
    }

    #[test]
    fn legacy_truncated_payload_is_rejected() {
        let c = cipher();
        let nonce_base = [0x05u8; NONCE_LEN];
        let plaintext: Vec<u8> = (0u8..41).collect();
        let mut wire = encrypt_records(&c, &nonce_base, 1, false, 25, 0, &plaintext).unwrap();
        // Drop the final (short) record, leaving only full-size records.
        wire.truncate(25 + TAG_LEN);
        assert_eq!(
            decrypt_legacy_records(&c, &nonce_base, 1, 25, &wire).unwrap_err(),
            Error::TruncatedPayload
        );
    }

    #[test]
    fn legacy_tamper_evidence() {
        let c = cipher();
        let nonce_base = [0x06u8; NONCE_LEN];
        let mut wire = encrypt_records(&c, &nonce_base, 2, false, 4096, 0, b"tamper me").unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0x80;
        assert_eq!(
            decrypt_legacy_records(&c, &nonce_base, 2, 4096, &wire).unwrap_err(),
            Error::AeadFailure
        );
    }

    #[test]
    fn aes128gcm_round_trip_single_record() {
        let c = cipher();
        let nonce_base = [0x07u8; NONCE_LEN];
        let plaintext = b"I am the walrus";
        // record_cap passed to encrypt_records is rs - tagLen for aes128gcm.
        let wire = encrypt_records(&c, &nonce_base, 2, true, 4096 - TAG_LEN, 0, plaintext).unwrap();
        let out = decrypt_aes128gcm_records(&c, &nonce_base, 4096, &wire).unwrap();
        assert_eq!(out, plaintext);
    }

    #[test]
    fn aes128gcm_round_trip_with_padding() {
        let c = cipher();
        let nonce_base = [0x08u8; NONCE_LEN];
        let plaintext = vec![0x99u8; 50];
        let wire =
            encrypt_records(&c, &nonce_base, 2, true, 4096 - TAG_LEN, 100, &plaintext).unwrap();
        assert_eq!(wire.len(), 50 + 100 + 2 + TAG_LEN);
        let out = decrypt_aes128gcm_records(&c, &nonce_base, 4096, &wire).unwrap();
        assert_eq!(out, plaintext);
    }

    #[test]
    fn aes128gcm_multi_record_message() {
        let c = cipher();
        let nonce_base = [0x09u8; NONCE_LEN];
        let plaintext: Vec<u8> = (0u8..=250).collect();
        let rs = 30u32;
        let wire =
            encrypt_records(&c, &nonce_base, 2, true, rs as usize - TAG_LEN, 0, &plaintext)
                .unwrap();
        let out = decrypt_aes128gcm_records(&c, &nonce_base, rs, &wire).unwrap();
        assert_eq!(out, plaintext);
    }

    #[test]
    fn aes128gcm_truncated_payload_is_rejected() {
        let c = cipher();
        let nonce_base = [0x0Au8; NONCE_LEN];
        let plaintext: Vec<u8> = (0u8..=250).collect();
        let rs = 30u32;
        let mut wire =
            encrypt_records(&c, &nonce_base, 2, true, rs as usize - TAG_LEN, 0, &plaintext)
                .unwrap();
        wire.truncate(rs as usize);
        assert_eq!(
            decrypt_aes128gcm_records(&c, &nonce_base, rs, &wire).unwrap_err(),
            Error::TruncatedPayload
        );
    }

    #[test]
    fn aes128gcm_misplaced_delimiter_bit_is_rejected() {
        let c = cipher();
        let nonce_base = [0x0Bu8; NONCE_LEN];
        let rs = 30u32;
        // Hand-build two records where the first (non-final) one wrongly claims
        // to be last.
        let nonce0 = nonce::derive(&nonce_base, 0);
        let first = c
            .seal_record(&nonce0, 2, 0, Some(true), &[1u8; 10])
            .unwrap();
        let nonce1 = nonce::derive(&nonce_base, 1);
        let second = c
            .seal_record(&nonce1, 2, 0, Some(true), &[2u8; 5])
            .unwrap();
        let mut wire = first;
        wire.extend_from_slice(&second);
        assert_eq!(
            decrypt_aes128gcm_records(&c, &nonce_base, rs, &wire).unwrap_err(),
            Error::InvalidPadding
        );
    }
}
