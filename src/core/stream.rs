//! Big-endian binary stream used by the cache file.
//!
//! [`StreamWriter`] appends to an in-memory buffer and [`StreamReader`] reads
//! back from a byte slice. Integers are big-endian; strings are a `u32` byte
//! length followed by UTF-16BE code units, with `0xFFFFFFFF` marking a null
//! string. The whole buffer travels inside a length-prefixed zlib envelope
//! built by [`compress`] and opened by [`decompress`].

use crate::core::error::{RevCacheError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

const NULL_STRING: u32 = u32::MAX;

/// Upper bound for capacity reserved from untrusted length fields.
const MAX_PREALLOC: usize = 1 << 20;

#[derive(Debug, Default)]
pub struct StreamWriter {
    buf: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_u32((units.len() * 2) as u32);
        for unit in units {
            self.buf.extend_from_slice(&unit.to_be_bytes());
        }
    }

    /// Count-prefixed sequence of `i32`
    pub fn write_indices(&mut self, values: &[u32]) {
        self.write_u32(values.len() as u32);
        for &value in values {
            self.write_i32(value as i32);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

pub struct StreamReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                RevCacheError::cache_corrupted(format!(
                    "unexpected end of stream reading {what} at offset {}",
                    self.pos
                ))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4, "u32")?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4, "i32")?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a non-negative `i32` count
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| RevCacheError::cache_corrupted(format!("negative count {count}")))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        if len == NULL_STRING {
            return Ok(String::new());
        }
        if len % 2 != 0 {
            return Err(RevCacheError::cache_corrupted(format!(
                "odd UTF-16 byte length {len}"
            )));
        }
        let bytes = self.take(len as usize, "string")?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units)
            .map_err(|e| RevCacheError::cache_corrupted(format!("invalid UTF-16 string: {e}")))
    }

    pub fn read_indices(&mut self) -> Result<Vec<u32>> {
        let count = self.read_u32()? as usize;
        let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            let value = self.read_i32()?;
            let value = u32::try_from(value).map_err(|_| {
                RevCacheError::cache_corrupted(format!("negative table index {value}"))
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

/// Compress `data` into the cache envelope: `u32` uncompressed length, then zlib.
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 4 + 4);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let mut encoder = ZlibEncoder::new(out, Compression::new(level));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Open an envelope produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 {
        return Err(RevCacheError::cache_corrupted("missing length header"));
    }
    let expected = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let mut out = Vec::with_capacity(expected.min(MAX_PREALLOC * 16));
    ZlibDecoder::new(&data[4..])
        .read_to_end(&mut out)
        .map_err(|e| RevCacheError::cache_corrupted(format!("decompression failed: {e}")))?;
    if out.len() != expected {
        return Err(RevCacheError::cache_corrupted(format!(
            "decompressed {} bytes, header announced {expected}",
            out.len()
        )));
    }
    Ok(out)
}
