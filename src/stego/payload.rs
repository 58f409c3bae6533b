// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Message serialization and compression.
//!
//! The payload is what gets encrypted:
//!
//! ```text
//! [1 byte ] flags
//! [M bytes] message (raw or Brotli-compressed depending on flags)
//! ```
//!
//! Compression is only kept when it is strictly smaller than the raw message,
//! so short or already-dense messages never grow by more than the flags byte.

use std::io::{Read, Write};

use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// Compression algorithm flags (bits 0-1 of flags byte).
const COMPRESS_NONE: u8 = 0b00;
const COMPRESS_BROTLI: u8 = 0b01;
const COMPRESS_MASK: u8 = 0b11;

/// Bytes the payload adds on top of the message.
pub const PAYLOAD_OVERHEAD: usize = 1;

/// Brotli quality (0-11). Messages are small, max quality is still fast.
const BROTLI_QUALITY: u32 = 11;

/// Brotli LG_WINDOW_SIZE. 22 is the default (4 MB window).
const BROTLI_LG_WINDOW_SIZE: u32 = 22;

/// Decompressed size limit, guards against decompression bombs.
pub const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;

/// Encode a message into bytes ready for encryption.
///
/// With `compress` set, Brotli is tried and kept only if it is smaller.
pub fn encode_payload(message: &[u8], compress: bool) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    if compress && !message.is_empty() {
        let compressed = compress_brotli(message)?;
        if compressed.len() < message.len() {
            return Ok(with_flags(COMPRESS_BROTLI, &compressed));
        }
    }
    Ok(with_flags(COMPRESS_NONE, message))
}

/// Decode a decrypted payload back into the message.
///
/// The payload has already passed authentication, so any malformation means
/// it was not produced by this codec; that is reported the same way as a
/// failed tag.
pub fn decode_payload(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let (&flags, body) = data.split_first().ok_or(StegoError::WrongPasswordOrCorrupt)?;

    match flags & COMPRESS_MASK {
        COMPRESS_NONE => Ok(body.to_vec()),
        COMPRESS_BROTLI => decompress_brotli(body),
        _ => Err(StegoError::WrongPasswordOrCorrupt),
    }
}

fn with_flags(flags: u8, body: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(PAYLOAD_OVERHEAD + body.len()));
    out.push(flags);
    out.extend_from_slice(body);
    out
}

/// Compress data with Brotli.
fn compress_brotli(data: &[u8]) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    let mut output = Zeroizing::new(Vec::new());
    {
        let mut compressor = brotli::CompressorWriter::new(
            &mut *output,
            4096, // buffer size
            BROTLI_QUALITY,
            BROTLI_LG_WINDOW_SIZE,
        );
        compressor
            .write_all(data)
            .map_err(|_| StegoError::InternalConsistency("Brotli compression failed"))?;
        // CompressorWriter flushes on drop
    }
    Ok(output)
}

/// Decompress Brotli data, refusing anything over [`MAX_DECOMPRESSED_BYTES`].
fn decompress_brotli(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut output = Vec::new();
    let decompressor = brotli::Decompressor::new(data, 4096);
    decompressor
        .take(MAX_DECOMPRESSED_BYTES as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|_| StegoError::WrongPasswordOrCorrupt)?;
    if output.len() > MAX_DECOMPRESSED_BYTES {
        return Err(StegoError::WrongPasswordOrCorrupt);
    }
    Ok(output)
}
