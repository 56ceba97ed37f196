//! Snapshot file framing.
//!
//! Layout on disk:
//! [ magic: u32 ][ version: u16 ][ codec: u8 ][ reserved: u8 ]
//! [ uncompressed_len: u64 ][ compressed_len: u64 ]
//! [ payload bytes … ]
//! [ blake3 checksum: 32 bytes ]
//!
//! The checksum covers (header || payload).

use crate::codec::Codec;
use crate::error::{Error, Result};

pub const MAGIC: u32 = 0x47414C52; // "RLAG" little-endian
pub const VERSION: u16 = 1;
pub const HEADER_LEN: usize = 4 + 2 + 1 + 1 + 8 + 8;
pub const CHECKSUM_LEN: usize = 32;

/// Upper bound on a decoded payload.
pub const MAX_PAYLOAD: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHeader {
    pub magic: u32,
    pub version: u16,
    pub codec: Codec,
    pub uncompressed_len: u64,
    pub compressed_len: u64,
}

impl SegmentHeader {
    pub fn new(codec: Codec, uncompressed_len: u64, compressed_len: u64) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            codec,
            uncompressed_len,
            compressed_len,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(&self.magic.to_le_bytes());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.push(self.codec.tag());
        out.push(0u8); // reserved
        out.extend_from_slice(&self.uncompressed_len.to_le_bytes());
        out.extend_from_slice(&self.compressed_len.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Snapshot("short header".into()));
        }
        let magic = u32::from_le_bytes(le(&bytes[0..4]));
        let version = u16::from_le_bytes(le(&bytes[4..6]));
        let codec = Codec::from_tag(bytes[6])?;
        // bytes[7] reserved
        let uncompressed_len = u64::from_le_bytes(le(&bytes[8..16]));
        let compressed_len = u64::from_le_bytes(le(&bytes[16..24]));

        if magic != MAGIC || version != VERSION {
            return Err(Error::Snapshot("bad magic/version".into()));
        }

        Ok(Self {
            magic,
            version,
            codec,
            uncompressed_len,
            compressed_len,
        })
    }

    /// Reject sizes that are implausible or exceed `max`.
    pub fn validate_sizes(&self, max: u64) -> Result<()> {
        if self.uncompressed_len > max || self.compressed_len > max {
            return Err(Error::Snapshot(format!(
                "payload of {}/{} bytes exceeds max {max}",
                self.compressed_len, self.uncompressed_len
            )));
        }
        if self.codec == Codec::None && self.compressed_len != self.uncompressed_len {
            return Err(Error::Snapshot(
                "uncompressed payload with differing lengths".into(),
            ));
        }
        Ok(())
    }
}

/// Copy a fixed-width little-endian field; callers slice exact widths.
fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

/// Frame `payload`: compress, prepend the header, append the checksum.
pub fn encode(codec: Codec, payload: &[u8]) -> Result<Vec<u8>> {
    let compressed = codec.compress(payload)?;
    let header = SegmentHeader::new(codec, payload.len() as u64, compressed.len() as u64);

    let mut out = Vec::with_capacity(HEADER_LEN + compressed.len() + CHECKSUM_LEN);
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&compressed);
    let checksum = blake3::hash(&out);
    out.extend_from_slice(checksum.as_bytes());
    Ok(out)
}

/// Verify and unframe bytes produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(Error::Snapshot("segment too short".into()));
    }
    let (body, trailer) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if blake3::hash(body).as_bytes() != trailer {
        return Err(Error::ChecksumMismatch);
    }

    let header = SegmentHeader::from_bytes(&body[..HEADER_LEN])?;
    header.validate_sizes(MAX_PAYLOAD)?;
    let compressed = &body[HEADER_LEN..];
    if compressed.len() as u64 != header.compressed_len {
        return Err(Error::Snapshot(format!(
            "payload is {} bytes, header says {}",
            compressed.len(),
            header.compressed_len
        )));
    }

    // validate_sizes bounds the length by MAX_PAYLOAD.
    let len = usize::try_from(header.uncompressed_len)
        .map_err(|_| Error::Snapshot("payload length overflows usize".into()))?;
    header.codec.decompress(compressed, len)
}
