// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers every failure mode from carrier validation through
//! frame extraction and decryption. The display text of
//! [`StegoError::WrongPasswordOrCorrupt`] is intentionally the same for a wrong
//! password and for a tampered carrier.

use thiserror::Error;

use crate::pcm::PcmError;
use crate::stego::pipeline::Stage;

/// Errors that can occur during hiding or revealing.
#[derive(Error, Debug)]
pub enum StegoError {
    /// The framed payload needs more eligible samples than the carrier has.
    #[error("message too large for this carrier: needs {needed} bits, {available} available")]
    InsufficientCapacity { needed: usize, available: usize },

    /// Authentication failed while opening the payload.
    #[error("wrong password or corrupted carrier")]
    WrongPasswordOrCorrupt,

    /// No valid frame header was found within the carrier's capacity.
    #[error("no hidden message found")]
    NotFound,

    /// A precondition the codec itself should have guaranteed was violated.
    #[error("internal consistency error: {0}")]
    InternalConsistency(&'static str),

    /// The password does not meet the configured minimum length.
    #[error("password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The carrier could not be parsed or is malformed.
    #[error("invalid carrier: {0}")]
    InvalidCarrier(#[from] PcmError),

    /// The revealed message is not valid UTF-8.
    #[error("revealed message is not valid UTF-8")]
    InvalidUtf8,
}

impl StegoError {
    /// The codec stage a failure terminates, if it belongs to one.
    ///
    /// Capacity and password checks fail in [`Stage::Validating`], a missing
    /// frame in [`Stage::Extracting`] and authentication in
    /// [`Stage::Decrypting`]. Configuration and carrier errors happen before
    /// the state machine starts and return `None`.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::InsufficientCapacity { .. } | Self::WeakPassword { .. } => Some(Stage::Validating),
            Self::NotFound => Some(Stage::Extracting),
            Self::WrongPasswordOrCorrupt | Self::InvalidUtf8 => Some(Stage::Decrypting),
            Self::InternalConsistency(_) | Self::InvalidConfig(_) | Self::InvalidCarrier(_) => None,
        }
    }
}
