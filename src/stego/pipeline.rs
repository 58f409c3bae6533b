// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Hide/reveal pipeline.
//!
//! Hide walks `Validating → Embedding → Written`:
//! 1. Enforce the password policy, encode (and maybe compress) the message
//! 2. Classify sample energy and check the frame fits, before any KDF work
//! 3. Argon2id → encryption key + sequencing seed (fresh random salt)
//! 4. Seal with AES-256-GCM-SIV, frame with a length header
//! 5. Header bits go to positions keyed by the public locator seed, blob bits
//!    to positions keyed by the secret sequencing seed
//! 6. Write each bit into the LSB of its sample in a private copy of the
//!    carrier and return the copy with the salt
//!
//! Reveal walks `Extracting → Decrypting → Revealed`. The header is read and
//! checked first, so a carrier without a frame for this salt is reported as
//! [`StegoError::NotFound`] without spending time on the KDF. Blob positions
//! are drawn lazily and reading stops at the end of the frame. A frame that is
//! found but does not authenticate is [`StegoError::WrongPasswordOrCorrupt`].
//!
//! The input carrier is only ever borrowed immutably; on any error the caller
//! still holds the untouched original.

use tracing::debug;

use crate::pcm::Carrier;
use crate::stego::capacity::{self, SaltPlacement};
use crate::stego::config::StegoConfig;
use crate::stego::crypto::{self, Salt, BLOB_OVERHEAD, SALT_LEN};
use crate::stego::energy;
use crate::stego::error::StegoError;
use crate::stego::frame::{self, FrameReader, HEADER_BITS};
use crate::stego::payload;
use crate::stego::permute::{self, PositionSequencer};

/// Codec states. Any intermediate state can end in a failure, see
/// [`StegoError::failed_stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Hide: password policy, payload encoding and capacity check.
    Validating,
    /// Hide: key derivation, encryption and LSB writes.
    Embedding,
    /// Hide finished.
    Written,
    /// Reveal: locating the frame and reading its bits.
    Extracting,
    /// Reveal: authenticating and decoding the payload.
    Decrypting,
    /// Reveal finished.
    Revealed,
}

/// Result of a successful hide: the stego carrier and the salt needed to
/// reveal it. Losing the salt makes the message unrecoverable.
#[derive(Debug, Clone)]
pub struct HideOutput {
    pub carrier: Carrier,
    pub salt: Salt,
}

/// Hide `message` in `carrier` with the default configuration.
///
/// # Errors
/// - [`StegoError::WeakPassword`] if the password is blank or too short.
/// - [`StegoError::InsufficientCapacity`] if the frame does not fit.
pub fn hide(carrier: &Carrier, message: &[u8], password: &str) -> Result<HideOutput, StegoError> {
    hide_with_config(carrier, message, password, &StegoConfig::default())
}

/// Hide `message` in `carrier`.
pub fn hide_with_config(
    carrier: &Carrier,
    message: &[u8],
    password: &str,
    config: &StegoConfig,
) -> Result<HideOutput, StegoError> {
    config.validate()?;
    let salt = crypto::generate_salt();
    let carrier = embed(carrier, message, password, &salt, SaltPlacement::External, config)?;
    Ok(HideOutput { carrier, salt })
}

/// Reveal a message with the default configuration.
///
/// # Errors
/// - [`StegoError::NotFound`] if no frame exists for this salt.
/// - [`StegoError::WrongPasswordOrCorrupt`] if the frame does not authenticate.
pub fn reveal(carrier: &Carrier, password: &str, salt: &Salt) -> Result<Vec<u8>, StegoError> {
    reveal_with_config(carrier, password, salt, &StegoConfig::default())
}

/// Reveal a message.
pub fn reveal_with_config(
    carrier: &Carrier,
    password: &str,
    salt: &Salt,
    config: &StegoConfig,
) -> Result<Vec<u8>, StegoError> {
    config.validate()?;
    let eligible = energy::eligible(carrier, &config.energy);
    extract(carrier, &eligible, password, salt, config)
}

/// Reveal a message and decode it as UTF-8.
pub fn reveal_text(carrier: &Carrier, password: &str, salt: &Salt) -> Result<String, StegoError> {
    String::from_utf8(reveal(carrier, password, salt)?).map_err(|_| StegoError::InvalidUtf8)
}

/// Hide `message` and store the salt inside the carrier itself.
///
/// The salt takes the LSBs of the first 128 eligible samples (ascending
/// index order); the frame uses the rest.
pub fn hide_self_contained(carrier: &Carrier, message: &[u8], password: &str) -> Result<Carrier, StegoError> {
    hide_self_contained_with_config(carrier, message, password, &StegoConfig::default())
}

pub fn hide_self_contained_with_config(
    carrier: &Carrier,
    message: &[u8],
    password: &str,
    config: &StegoConfig,
) -> Result<Carrier, StegoError> {
    config.validate()?;
    let salt = crypto::generate_salt();
    embed(carrier, message, password, &salt, SaltPlacement::Embedded, config)
}

/// Reveal a message hidden with [`hide_self_contained`].
pub fn reveal_self_contained(carrier: &Carrier, password: &str) -> Result<Vec<u8>, StegoError> {
    reveal_self_contained_with_config(carrier, password, &StegoConfig::default())
}

pub fn reveal_self_contained_with_config(
    carrier: &Carrier,
    password: &str,
    config: &StegoConfig,
) -> Result<Vec<u8>, StegoError> {
    config.validate()?;
    let eligible = energy::eligible(carrier, &config.energy);
    if eligible.len() < capacity::SALT_BITS {
        return Err(StegoError::NotFound);
    }
    let (reserved, pool) = eligible.split_at(capacity::SALT_BITS);

    let salt_bits: Vec<u8> = reserved.iter().map(|&idx| carrier.lsb(idx)).collect();
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&frame::bits_to_bytes(&salt_bits));

    extract(carrier, pool, password, &salt, config)
}

/// Order of sample indices receiving the frame bits.
///
/// The first [`HEADER_BITS`] entries are drawn with the salt's locator seed,
/// the rest with the secret `seed` from the pool minus the header positions.
pub(crate) fn embedding_plan(
    pool: &[usize],
    salt: &Salt,
    seed: &[u8; 32],
    frame_bits: usize,
) -> Result<Vec<usize>, StegoError> {
    if frame_bits < HEADER_BITS {
        return Err(StegoError::InternalConsistency("frame shorter than its header"));
    }
    let mut plan = permute::sequence(pool, &crypto::locator_seed(salt), HEADER_BITS)?;
    let body_pool = permute::exclude(pool, &plan);
    plan.extend(permute::sequence(&body_pool, seed, frame_bits - HEADER_BITS)?);
    Ok(plan)
}

fn set_lsb(sample: &mut i32, bit: u8) {
    *sample = (*sample & !1) | (bit & 1) as i32;
}

fn embed(
    carrier: &Carrier,
    message: &[u8],
    password: &str,
    salt: &Salt,
    placement: SaltPlacement,
    config: &StegoConfig,
) -> Result<Carrier, StegoError> {
    debug!(stage = ?Stage::Validating, samples = carrier.sample_count(), message_bytes = message.len(), "hide");
    config.check_password(password)?;

    let payload = payload::encode_payload(message, config.compress)?;
    let needed = frame::frame_bit_len(payload.len() + BLOB_OVERHEAD);

    let eligible = energy::eligible(carrier, &config.energy);
    let reserved_len = placement.reserved_bits().min(eligible.len());
    let (reserved, pool) = eligible.split_at(reserved_len);
    capacity::fits(needed, pool.len())?;

    debug!(stage = ?Stage::Embedding, frame_bits = needed, available = pool.len(), "hide");
    let material = crypto::derive(password, salt, &config.kdf)?;
    let blob = crypto::seal(&payload, material.encryption_key())?;
    let bits = frame::frame(&blob)?;
    if bits.len() != needed {
        return Err(StegoError::InternalConsistency("frame length differs from capacity plan"));
    }
    let plan = embedding_plan(pool, salt, material.sequencing_seed(), bits.len())?;

    let mut samples = carrier.samples().to_vec();
    if placement == SaltPlacement::Embedded {
        for (&idx, bit) in reserved.iter().zip(frame::bytes_to_bits(salt)) {
            set_lsb(&mut samples[idx], bit);
        }
    }
    for (&idx, &bit) in plan.iter().zip(&bits) {
        set_lsb(&mut samples[idx], bit);
    }

    debug!(stage = ?Stage::Written, "hide");
    Ok(carrier.with_samples(samples))
}

fn extract(
    carrier: &Carrier,
    pool: &[usize],
    password: &str,
    salt: &Salt,
    config: &StegoConfig,
) -> Result<Vec<u8>, StegoError> {
    debug!(stage = ?Stage::Extracting, samples = carrier.sample_count(), available = pool.len(), "reveal");
    if pool.len() < HEADER_BITS {
        return Err(StegoError::NotFound);
    }

    let header_positions = permute::sequence(pool, &crypto::locator_seed(salt), HEADER_BITS)?;
    let mut reader = FrameReader::new();
    for &idx in &header_positions {
        reader.push_bit(carrier.lsb(idx)).map_err(|_| StegoError::NotFound)?;
    }
    let total = reader
        .total_bits()
        .ok_or(StegoError::InternalConsistency("frame header not parsed after header bits"))?;
    if total > pool.len() {
        debug!(frame_bits = total, available = pool.len(), "declared frame exceeds capacity");
        return Err(StegoError::NotFound);
    }

    let material = crypto::derive(password, salt, &config.kdf)?;
    let body_pool = permute::exclude(pool, &header_positions);
    let mut positions = PositionSequencer::new(body_pool, material.sequencing_seed())?;
    while !reader.is_complete() {
        let idx = positions.next().ok_or(StegoError::NotFound)?;
        reader.push_bit(carrier.lsb(idx)).map_err(|_| StegoError::NotFound)?;
    }
    let blob = reader.finish().map_err(|_| StegoError::NotFound)?;

    debug!(stage = ?Stage::Decrypting, frame_bits = total, "reveal");
    let plaintext = crypto::open(&blob, material.encryption_key())?;
    let message = payload::decode_payload(&plaintext)?;

    debug!(stage = ?Stage::Revealed, message_bytes = message.len(), "reveal");
    Ok(message)
}
