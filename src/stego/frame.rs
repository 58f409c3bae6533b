// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload frame construction and parsing.
//!
//! The frame wraps a cipher blob so extraction knows exactly where the hidden
//! data ends, regardless of how much spare capacity the carrier has:
//!
//! ```text
//! [4 bytes ] blob length in bytes (big-endian u32)
//! [4 bytes ] CRC-32 of the 4 length bytes (big-endian)
//! [N bytes ] cipher blob: nonce(12) ‖ ciphertext ‖ tag(16)
//! ```
//!
//! Bits are taken MSB first within each byte. The length prefix replaces
//! delimiter scanning, so ciphertext can never terminate a frame early. The
//! header CRC only answers "is there a frame here"; integrity of the blob is
//! left to the AEAD tag.

use thiserror::Error;

use crate::stego::crypto::BLOB_OVERHEAD;
use crate::stego::error::StegoError;

/// Header size: length(4) + crc(4).
pub const HEADER_BYTES: usize = 8;

/// Header size in bits. Always the first bits of a frame.
pub const HEADER_BITS: usize = HEADER_BYTES * 8;

/// Smallest blob a valid frame can carry (empty plaintext: nonce + tag).
pub const MIN_BLOB_BYTES: usize = BLOB_OVERHEAD;

/// Largest blob a frame can carry. The whole frame, in bits, must stay
/// addressable by `u32` sample indices.
pub const MAX_BLOB_BYTES: usize = u32::MAX as usize / 8 - HEADER_BYTES;

/// Why a bitstream did not yield a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The bits ran out before the declared end of the frame.
    #[error("bitstream ended before the frame was complete")]
    Incomplete,
    /// The header failed its CRC or declares an impossible blob length.
    #[error("frame header is corrupt")]
    Corrupt,
}

/// Total frame length in bits for a blob of `blob_len` bytes.
pub fn frame_bit_len(blob_len: usize) -> usize {
    (HEADER_BYTES + blob_len) * 8
}

/// Build the 8-byte header for a blob of `blob_len` bytes.
fn build_header(blob_len: u32) -> [u8; HEADER_BYTES] {
    let len_bytes = blob_len.to_be_bytes();
    let crc = crc32fast::hash(&len_bytes);
    let mut header = [0u8; HEADER_BYTES];
    header[..4].copy_from_slice(&len_bytes);
    header[4..].copy_from_slice(&crc.to_be_bytes());
    header
}

/// Parse a header, returning the declared blob length in bytes.
fn parse_header(header: &[u8]) -> Result<usize, FrameError> {
    let len_bytes = [header[0], header[1], header[2], header[3]];
    let stored_crc = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    if crc32fast::hash(&len_bytes) != stored_crc {
        return Err(FrameError::Corrupt);
    }

    let blob_len = u32::from_be_bytes(len_bytes) as usize;
    if !(MIN_BLOB_BYTES..=MAX_BLOB_BYTES).contains(&blob_len) {
        return Err(FrameError::Corrupt);
    }
    Ok(blob_len)
}

/// Frame a cipher blob and return it as a bit vector (one bit per `u8`).
///
/// # Errors
/// [`StegoError::InternalConsistency`] if the blob is shorter than nonce + tag
/// or longer than [`MAX_BLOB_BYTES`]. The cipher never produces such a blob.
pub fn frame(blob: &[u8]) -> Result<Vec<u8>, StegoError> {
    if !(MIN_BLOB_BYTES..=MAX_BLOB_BYTES).contains(&blob.len()) {
        return Err(StegoError::InternalConsistency("cipher blob length outside frame limits"));
    }
    let header = build_header(blob.len() as u32);

    let mut bits = Vec::with_capacity(frame_bit_len(blob.len()));
    bits.extend(bytes_to_bits(&header));
    bits.extend(bytes_to_bits(blob));
    Ok(bits)
}

/// Decode a frame from the start of `bits`.
///
/// `bits` may be longer than the frame; trailing bits are ignored and exactly
/// the original blob is returned.
pub fn unframe(bits: &[u8]) -> Result<Vec<u8>, FrameError> {
    let mut reader = FrameReader::new();
    for &bit in bits {
        if reader.push_bit(bit)? == FrameStatus::Complete {
            break;
        }
    }
    reader.finish()
}

/// Progress of an incremental frame read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// More bits are required.
    NeedMore,
    /// The frame is complete; call [`FrameReader::finish`].
    Complete,
}

/// Incremental frame decoder fed one bit at a time.
///
/// Lets extraction stop reading the carrier as soon as the frame ends.
#[derive(Debug, Default)]
pub struct FrameReader {
    bits: Vec<u8>,
    blob_len: Option<usize>,
    corrupt: bool,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next bit. Bits pushed after completion are ignored.
    ///
    /// Returns [`FrameError::Corrupt`] once the header has been read and
    /// found invalid; the reader stays corrupt from then on.
    pub fn push_bit(&mut self, bit: u8) -> Result<FrameStatus, FrameError> {
        if self.corrupt {
            return Err(FrameError::Corrupt);
        }
        if self.is_complete() {
            return Ok(FrameStatus::Complete);
        }

        self.bits.push(bit & 1);
        if self.bits.len() == HEADER_BITS {
            match parse_header(&bits_to_bytes(&self.bits)) {
                Ok(len) => self.blob_len = Some(len),
                Err(e) => {
                    self.corrupt = true;
                    return Err(e);
                }
            }
        }

        Ok(if self.is_complete() { FrameStatus::Complete } else { FrameStatus::NeedMore })
    }

    /// Blob length declared by the header, once the header has been read.
    pub fn declared_blob_len(&self) -> Option<usize> {
        self.blob_len
    }

    /// Total frame length in bits, once the header has been read.
    pub fn total_bits(&self) -> Option<usize> {
        self.blob_len.map(frame_bit_len)
    }

    pub fn is_complete(&self) -> bool {
        self.total_bits().is_some_and(|total| self.bits.len() >= total)
    }

    /// Return the blob, or [`FrameError::Incomplete`] if the frame has not ended.
    pub fn finish(self) -> Result<Vec<u8>, FrameError> {
        if self.corrupt {
            return Err(FrameError::Corrupt);
        }
        if !self.is_complete() {
            return Err(FrameError::Incomplete);
        }
        Ok(bits_to_bytes(&self.bits[HEADER_BITS..]))
    }
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 + 11) as u8).collect()
    }

    #[test]
    fn frame_unframe_roundtrip() {
        let b = blob(40);
        let bits = frame(&b).unwrap();
        assert_eq!(bits.len(), frame_bit_len(40));
        assert_eq!(unframe(&bits).unwrap(), b);
    }

    #[test]
    fn superset_of_bits_yields_exact_blob() {
        let b = blob(MIN_BLOB_BYTES);
        let mut bits = frame(&b).unwrap();
        bits.extend(std::iter::repeat(1u8).take(1000));
        assert_eq!(unframe(&bits).unwrap(), b);
    }

    #[test]
    fn header_layout() {
        let bits = frame(&blob(30)).unwrap();
        let bytes = bits_to_bytes(&bits);
        assert_eq!(&bytes[..4], &[0, 0, 0, 30]);
        let crc = crc32fast::hash(&[0, 0, 0, 30]);
        assert_eq!(&bytes[4..8], &crc.to_be_bytes());
    }

    #[test]
    fn truncated_is_incomplete() {
        let bits = frame(&blob(40)).unwrap();
        assert_eq!(unframe(&bits[..bits.len() - 1]), Err(FrameError::Incomplete));
        assert_eq!(unframe(&bits[..HEADER_BITS - 1]), Err(FrameError::Incomplete));
        assert_eq!(unframe(&[]), Err(FrameError::Incomplete));
    }

    #[test]
    fn any_header_bit_flip_is_corrupt() {
        let bits = frame(&blob(40)).unwrap();
        for i in 0..HEADER_BITS {
            let mut bad = bits.clone();
            bad[i] ^= 1;
            assert_eq!(unframe(&bad), Err(FrameError::Corrupt), "header bit {i}");
        }
    }

    #[test]
    fn body_flip_is_not_a_framing_error() {
        let b = blob(40);
        let mut bits = frame(&b).unwrap();
        bits[HEADER_BITS + 5] ^= 1;
        let out = unframe(&bits).unwrap();
        assert_eq!(out.len(), b.len());
        assert_ne!(out, b);
    }

    #[test]
    fn implausible_length_is_corrupt() {
        // Valid CRC but shorter than nonce + tag.
        let header = build_header((MIN_BLOB_BYTES - 1) as u32);
        assert_eq!(unframe(&bytes_to_bits(&header)), Err(FrameError::Corrupt));

        let header = build_header(u32::MAX);
        assert_eq!(unframe(&bytes_to_bits(&header)), Err(FrameError::Corrupt));
    }

    #[test]
    fn frame_rejects_short_blob() {
        assert!(matches!(frame(&[0u8; 3]), Err(StegoError::InternalConsistency(_))));
    }

    #[test]
    fn reader_reports_progress() {
        let b = blob(MIN_BLOB_BYTES);
        let bits = frame(&b).unwrap();
        let mut reader = FrameReader::new();
        for (i, &bit) in bits.iter().enumerate() {
            let status = reader.push_bit(bit).unwrap();
            if i + 1 < bits.len() {
                assert_eq!(status, FrameStatus::NeedMore);
            } else {
                assert_eq!(status, FrameStatus::Complete);
            }
            if i + 1 >= HEADER_BITS {
                assert_eq!(reader.declared_blob_len(), Some(MIN_BLOB_BYTES));
            } else {
                assert_eq!(reader.declared_blob_len(), None);
            }
        }
        assert_eq!(reader.push_bit(1).unwrap(), FrameStatus::Complete);
        assert_eq!(reader.finish().unwrap(), b);
    }

    #[test]
    fn reader_stays_corrupt() {
        let mut reader = FrameReader::new();
        for _ in 0..HEADER_BITS - 1 {
            reader.push_bit(1).unwrap();
        }
        assert_eq!(reader.push_bit(1), Err(FrameError::Corrupt));
        assert_eq!(reader.push_bit(0), Err(FrameError::Corrupt));
        assert_eq!(reader.finish(), Err(FrameError::Corrupt));
    }

    #[test]
    fn bits_to_bytes_partial_byte() {
        // 10110_000 = 0xB0
        assert_eq!(bits_to_bytes(&[1, 0, 1, 1, 0]), vec![0xB0]);
    }
}
