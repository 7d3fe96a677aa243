//! Binary transforms: zlib deflate/inflate and base64
//!
//! The encoder writes zlib streams (deflate with a zlib header) at maximum
//! compression. The decoder also accepts gzip streams.

use crate::error::{CodecError, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::{self, Read, Write};

/// Gzip member magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Output produced per inflate call.
const INFLATE_CHUNK: usize = 8 * 1024;

/// Decoder tolerant of missing padding and non-zero trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Compress `data` into a zlib stream at `level` (clamped to 0..=9).
pub fn deflate(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data).map_err(CodecError::Compression)?;
    encoder.finish().map_err(CodecError::Compression)
}

/// Inflate a zlib or gzip stream, refusing output larger than `max_output`.
pub fn inflate(data: &[u8], max_output: usize) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(corrupt("empty payload"));
    }
    if data.starts_with(&GZIP_MAGIC) {
        inflate_gzip(data, max_output)
    } else {
        inflate_zlib(data, max_output)
    }
}

fn inflate_zlib(data: &[u8], max_output: usize) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::new();
    let mut chunk = [0u8; INFLATE_CHUNK];

    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        // The whole stream is already in memory; `None` lets the inflater
        // stop on a full chunk and resume on the next call.
        let status = inflater
            .decompress(&data[consumed..], &mut chunk, FlushDecompress::None)
            .map_err(|e| CodecError::Decompression(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        let written = (inflater.total_out() - produced) as usize;
        out.extend_from_slice(&chunk[..written]);

        if out.len() > max_output {
            return Err(too_large(max_output));
        }
        if status == Status::StreamEnd {
            return Ok(out);
        }
        if written == 0 && inflater.total_in() as usize == consumed {
            return Err(corrupt("truncated deflate stream"));
        }
    }
}

fn inflate_gzip(data: &[u8], max_output: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .take(max_output as u64 + 1)
        .read_to_end(&mut out)
        .map_err(CodecError::Decompression)?;
    if out.len() > max_output {
        return Err(too_large(max_output));
    }
    Ok(out)
}

/// Standard, padded base64.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64, ignoring ASCII whitespace and missing padding.
pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT.decode(cleaned).map_err(CodecError::Encoding)
}

fn corrupt(reason: &str) -> CodecError {
    CodecError::Decompression(io::Error::new(io::ErrorKind::InvalidData, reason.to_string()))
}

fn too_large(max_output: usize) -> CodecError {
    CodecError::Decompression(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("inflated payload exceeds {} bytes", max_output),
    ))
}
