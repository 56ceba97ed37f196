//! Payload compression for snapshots.
//!
//! The snapshot header records the codec tag and the uncompressed length, so
//! payloads are stored without any framing of their own and decompression
//! allocates exactly what the header announced. `Zstd` and `Lz4` need the
//! matching cargo feature.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Codec {
    #[default]
    None,
    /// The level only matters when writing; decoding ignores it.
    Zstd { level: i32 },
    Lz4,
}

impl Codec {
    pub fn zstd() -> Self {
        Codec::Zstd {
            level: DEFAULT_ZSTD_LEVEL,
        }
    }

    /// Tag byte stored in the snapshot header.
    pub fn tag(self) -> u8 {
        match self {
            Codec::None => 0,
            Codec::Zstd { .. } => 1,
            Codec::Lz4 => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Codec::None),
            1 => Ok(Codec::zstd()),
            2 => Ok(Codec::Lz4),
            _ => Err(Error::CodecUnsupported("unknown")),
        }
    }

    pub fn compress(self, payload: &[u8]) -> Result<Vec<u8>> {
        match self {
            Codec::None => Ok(payload.to_vec()),
            Codec::Zstd { level } => zstd_compress(payload, level),
            Codec::Lz4 => lz4_compress(payload),
        }
    }

    /// Inverse of [`Codec::compress`]; `len` is the uncompressed length from
    /// the header and must match exactly.
    pub fn decompress(self, bytes: &[u8], len: usize) -> Result<Vec<u8>> {
        let out = match self {
            Codec::None => bytes.to_vec(),
            Codec::Zstd { .. } => zstd_decompress(bytes, len)?,
            Codec::Lz4 => lz4_decompress(bytes, len)?,
        };
        if out.len() != len {
            return Err(Error::Codec(format!(
                "{self} payload inflated to {} bytes, expected {len}",
                out.len()
            )));
        }
        Ok(out)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::None => f.write_str("none"),
            Codec::Zstd { level } => write!(f, "zstd:{level}"),
            Codec::Lz4 => f.write_str("lz4"),
        }
    }
}

/// `none`, `lz4`, `zstd` or `zstd:<level>` with a level in 1..=22.
impl FromStr for Codec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        let (name, level) = match s.split_once(':') {
            Some((name, level)) => (name, Some(level)),
            None => (s.as_str(), None),
        };
        match (name, level) {
            ("" | "none", None) => Ok(Codec::None),
            ("lz4", None) => Ok(Codec::Lz4),
            ("zstd", None) => Ok(Codec::zstd()),
            ("zstd", Some(level)) => match level.parse::<i32>() {
                Ok(level) if (1..=22).contains(&level) => Ok(Codec::Zstd { level }),
                _ => Err(Error::Config(format!("invalid zstd level '{level}'"))),
            },
            _ => Err(Error::Config(format!("unknown codec '{s}'"))),
        }
    }
}

#[cfg(feature = "zstd")]
fn zstd_compress(payload: &[u8], level: i32) -> Result<Vec<u8>> {
    zstd::bulk::compress(payload, level).map_err(|e| Error::Codec(format!("zstd: {e}")))
}

#[cfg(not(feature = "zstd"))]
fn zstd_compress(_payload: &[u8], _level: i32) -> Result<Vec<u8>> {
    Err(Error::CodecUnsupported("zstd"))
}

#[cfg(feature = "zstd")]
fn zstd_decompress(bytes: &[u8], len: usize) -> Result<Vec<u8>> {
    zstd::bulk::decompress(bytes, len).map_err(|e| Error::Codec(format!("zstd: {e}")))
}

#[cfg(not(feature = "zstd"))]
fn zstd_decompress(_bytes: &[u8], _len: usize) -> Result<Vec<u8>> {
    Err(Error::CodecUnsupported("zstd"))
}

#[cfg(feature = "lz4")]
fn lz4_compress(payload: &[u8]) -> Result<Vec<u8>> {
    Ok(lz4_flex::block::compress(payload))
}

#[cfg(not(feature = "lz4"))]
fn lz4_compress(_payload: &[u8]) -> Result<Vec<u8>> {
    Err(Error::CodecUnsupported("lz4"))
}

#[cfg(feature = "lz4")]
fn lz4_decompress(bytes: &[u8], len: usize) -> Result<Vec<u8>> {
    lz4_flex::block::decompress(bytes, len).map_err(|e| Error::Codec(format!("lz4: {e}")))
}

#[cfg(not(feature = "lz4"))]
fn lz4_decompress(_bytes: &[u8], _len: usize) -> Result<Vec<u8>> {
    Err(Error::CodecUnsupported("lz4"))
}
