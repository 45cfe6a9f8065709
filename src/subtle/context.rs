//! Builds the `info` argument passed to HKDF-Expand (component B).

use crate::variant::Variant;

/// A 2-byte big-endian length prefix followed by the bytes themselves, as used
/// inside the `aesgcm` ECDH context blob.
fn push_len_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// Build the ECDH context blob for the `aesgcm` variant:
/// `label || lenPrefix(recipient_pub) || lenPrefix(sender_pub)`.
///
/// Roles swap with the operation's direction: on encrypt the sender is the local
/// key and the recipient is the peer (`dh`); on decrypt the sender is the peer and
/// the recipient is the local key. The caller picks which public key goes in which
/// slot before calling this.
pub fn dh_context(label: &[u8], recipient_pub: &[u8], sender_pub: &[u8]) -> Vec<u8> {
    let mut ctx = Vec::with_capacity(label.len() + 4 + recipient_pub.len() + sender_pub.len());
    ctx.extend_from_slice(label);
    push_len_prefixed(&mut ctx, recipient_pub);
    push_len_prefixed(&mut ctx, sender_pub);
    ctx
}

/// Build the full HKDF `info` string: the variant's literal prefix, followed by
/// the context blob (empty unless this is an ECDH `aesgcm` exchange).
pub fn info(variant: Variant, base: &'static [u8], context_blob: &[u8]) -> Vec<u8> {
    debug_assert!(
        context_blob.is_empty() || variant.supports_dh_context(),
        "aesgcm128 has no context blob"
    );
    let mut out = Vec::with_capacity(base.len() + context_blob.len());
    out.extend_from_slice(base);
    out.extend_from_slice(context_blob);
    out
}
