// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Capacity planning.
//!
//! One payload bit goes into each eligible sample, so the maximum frame size
//! in bits is the number of eligible samples, less the salt bits when the salt
//! is stored inside the carrier. The check runs before key derivation and
//! before any sample is touched.

use crate::pcm::Carrier;
use crate::stego::config::StegoConfig;
use crate::stego::crypto::{BLOB_OVERHEAD, SALT_LEN};
use crate::stego::energy;
use crate::stego::error::StegoError;
use crate::stego::frame::{frame_bit_len, HEADER_BYTES};
use crate::stego::payload::{self, PAYLOAD_OVERHEAD};

/// Bits reserved for an embedded salt.
pub const SALT_BITS: usize = SALT_LEN * 8;

/// Bytes a message grows by on its way into a frame:
/// header(8) + nonce(12) + tag(16) + flags(1) = 37.
pub const MESSAGE_OVERHEAD: usize = HEADER_BYTES + BLOB_OVERHEAD + PAYLOAD_OVERHEAD;

/// Where the per-message salt is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaltPlacement {
    /// Returned to the caller, who stores it next to the stego carrier.
    #[default]
    External,
    /// Written into the LSBs of the first [`SALT_BITS`] eligible samples.
    Embedded,
}

impl SaltPlacement {
    /// Eligible positions this placement takes away from the frame.
    pub fn reserved_bits(self) -> usize {
        match self {
            Self::External => 0,
            Self::Embedded => SALT_BITS,
        }
    }
}

/// Maximum frame length in bits the carrier can hold.
pub fn max_bits(carrier: &Carrier, placement: SaltPlacement, config: &StegoConfig) -> usize {
    let eligible = energy::eligible(carrier, &config.energy).len();
    eligible.saturating_sub(placement.reserved_bits())
}

/// Check that a frame of `bit_len` bits fits the carrier.
///
/// # Errors
/// [`StegoError::InsufficientCapacity`] with the needed and available bit counts.
pub fn check_fits(
    carrier: &Carrier,
    bit_len: usize,
    placement: SaltPlacement,
    config: &StegoConfig,
) -> Result<(), StegoError> {
    fits(bit_len, max_bits(carrier, placement, config))
}

pub(crate) fn fits(needed: usize, available: usize) -> Result<(), StegoError> {
    if needed > available {
        return Err(StegoError::InsufficientCapacity { needed, available });
    }
    Ok(())
}

/// Exact frame length in bits that hiding `message` would produce.
///
/// Runs the same compression decision as the hide path, so the result
/// reflects Brotli savings when compression is enabled.
pub fn framed_bit_len(message: &[u8], config: &StegoConfig) -> Result<usize, StegoError> {
    let payload = payload::encode_payload(message, config.compress)?;
    Ok(frame_bit_len(payload.len() + BLOB_OVERHEAD))
}

/// Largest uncompressed message, in bytes, that is guaranteed to fit.
///
/// Compressible messages may be considerably larger.
pub fn estimate_capacity(carrier: &Carrier, placement: SaltPlacement, config: &StegoConfig) -> usize {
    (max_bits(carrier, placement, config) / 8).saturating_sub(MESSAGE_OVERHEAD)
}
