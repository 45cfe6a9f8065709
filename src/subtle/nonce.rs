//! Per-record nonce construction (component D).

use crate::variant::NONCE_LEN;

/// Derive the nonce for record `counter` by XORing it, big-endian, into the last
/// 6 bytes of `nonce_base`.
///
/// `counter` must fit in 48 bits (the size of the field it's XORed into); callers
/// never produce more than a few million records per message, so this is not a
/// practical limit. A native `u64` and byte-wise XOR are used here rather than the
/// split 24-bit-half arithmetic of the legacy source — the observable output is
/// identical, the code is not.
pub fn derive(nonce_base: &[u8], counter: u64) -> [u8; NONCE_LEN] {
    debug_assert_eq!(nonce_base.len(), NONCE_LEN);
    debug_assert!(counter < (1u64 << 48), "record counter must fit in 48 bits");

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_base);

    let counter_bytes = counter.to_be_bytes();
    // `counter_bytes` is 8 bytes; only the low 6 are meaningful (48-bit counter).
    for i in 0..6 {
        nonce[NONCE_LEN - 6 + i] ^= counter_bytes[8 - 6 + i];
    }
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_zero_leaves_base_unchanged() {
        let base = [0xAAu8; NONCE_LEN];
        assert_eq!(derive(&base, 0), base);
    }

    #[test]
    fn counter_only_touches_last_six_bytes() {
        let base = [0u8; NONCE_LEN];
        let nonce = derive(&base, 1);
        assert_eq!(&nonce[..6], &[0u8; 6]);
        assert_eq!(&nonce[6..], &[0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn distinct_counters_yield_distinct_nonces() {
        let base = [0x11u8; NONCE_LEN];
        assert_ne!(derive(&base, 0), derive(&base, 1));
        assert_ne!(derive(&base, 255), derive(&base, 256));
    }
}
