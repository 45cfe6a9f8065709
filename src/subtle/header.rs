//! Serializes and parses the `aes128gcm` in-band header (component G):
//! `[16-byte salt][4-byte rs BE][1-byte idlen][keyid]`.

use crate::error::{Error, Result};
use crate::variant::SALT_LEN;

pub struct Header {
    pub salt: Vec<u8>,
    pub rs: u32,
    pub keyid: Vec<u8>,
}

impl Header {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.keyid.len() > 255 {
            return Err(Error::KeyIdTooLong(self.keyid.len()));
        }
        if self.salt.len() != SALT_LEN {
            return Err(Error::BadSaltLength(self.salt.len()));
        }
        let mut out = Vec::with_capacity(SALT_LEN + 4 + 1 + self.keyid.len());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.rs.to_be_bytes());
        out.push(self.keyid.len() as u8);
        out.extend_from_slice(&self.keyid);
        Ok(out)
    }

    /// Parse the header from the front of `buf`, returning it alongside the
    /// number of bytes consumed so the caller can begin framing past it.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize)> {
        const MIN_LEN: usize = SALT_LEN + 4 + 1;
        if buf.len() < MIN_LEN {
            return Err(Error::BlockTooSmall(buf.len(), MIN_LEN));
        }
        let salt = buf[..SALT_LEN].to_vec();
        let rs = u32::from_be_bytes(buf[SALT_LEN..SALT_LEN + 4].try_into().unwrap());
        let idlen = buf[SALT_LEN + 4] as usize;
        let consumed = MIN_LEN + idlen;
        if buf.len() < consumed {
            return Err(Error::BlockTooSmall(buf.len(), consumed));
        }
        let keyid = buf[MIN_LEN..consumed].to_vec();
        Ok((Header { salt, rs, keyid }, consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_keyid() {
        let header = Header {
            salt: vec![0x11u8; SALT_LEN],
            rs: 4096,
            keyid: b"sub-key-1".to_vec(),
        };
        let wire = header.serialize().unwrap();
        let (parsed, consumed) = Header::parse(&wire).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(parsed.salt, header.salt);
        assert_eq!(parsed.rs, header.rs);
        assert_eq!(parsed.keyid, header.keyid);
    }

    #[test]
    fn round_trips_with_empty_keyid() {
        let header = Header {
            salt: vec![0x22u8; SALT_LEN],
            rs: 100,
            keyid: Vec::new(),
        };
        let wire = header.serialize().unwrap();
        assert_eq!(wire.len(), SALT_LEN + 4 + 1);
        let (parsed, consumed) = Header::parse(&wire).unwrap();
        assert_eq!(consumed, wire.len());
        assert!(parsed.keyid.is_empty());
    }

    #[test]
    fn reports_bytes_consumed_leaving_trailing_records_untouched() {
        let header = Header {
            salt: vec![0x33u8; SALT_LEN],
            rs: 50,
            keyid: b"id".to_vec(),
        };
        let mut wire = header.serialize().unwrap();
        wire.extend_from_slice(b"first record goes here");
        let (_, consumed) = Header::parse(&wire).unwrap();
        assert_eq!(&wire[consumed..], b"first record goes here");
    }

    #[test]
    fn keyid_at_255_bytes_is_accepted() {
        let header = Header {
            salt: vec![0x44u8; SALT_LEN],
            rs: 4096,
            keyid: vec![0x7Au8; 255],
        };
        let wire = header.serialize().unwrap();
        assert_eq!(wire[SALT_LEN + 4], 255);
        let (parsed, consumed) = Header::parse(&wire).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(parsed.keyid, header.keyid);
    }

    #[test]
    fn keyid_over_255_bytes_is_rejected() {
        let header = Header {
            salt: vec![0u8; SALT_LEN],
            rs: 100,
            keyid: vec![0u8; 256],
        };
        assert_eq!(
            header.serialize().unwrap_err(),
            Error::KeyIdTooLong(256)
        );
    }

    #[test]
    fn truncated_header_is_rejected() {
        let short = vec![0u8; SALT_LEN + 2];
        assert!(Header::parse(&short).is_err());
    }

    #[test]
    fn header_claiming_more_keyid_than_buffer_holds_is_rejected() {
        let mut buf = vec![0u8; SALT_LEN + 4];
        buf.push(10); // idlen = 10 but no keyid bytes follow
        assert!(Header::parse(&buf).is_err());
    }
}
