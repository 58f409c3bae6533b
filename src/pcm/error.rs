// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for PCM carrier construction and WAV I/O.

use thiserror::Error;

/// Errors that can occur while building or (de)serializing a PCM carrier.
#[derive(Error, Debug)]
pub enum PcmError {
    /// Only 8, 16, 24 and 32-bit integer PCM is supported.
    #[error("unsupported bit depth: {0} (expected 8, 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// The carrier declares zero channels.
    #[error("carrier must have at least one channel")]
    NoChannels,

    /// The sample count is not a whole number of frames.
    #[error("{samples} samples do not divide evenly into {channels} channels")]
    RaggedFrames { samples: usize, channels: u16 },

    /// A sample lies outside the signed range of the declared bit depth.
    #[error("sample {index} = {value} is out of range for {bits}-bit PCM")]
    SampleOutOfRange { index: usize, value: i32, bits: u16 },

    /// Sample indices must fit in `u32` for portable position sequencing.
    #[error("carrier has {0} samples, more than the supported maximum")]
    TooManySamples(usize),

    /// The WAV stream uses a sample format other than integer PCM.
    #[error("unsupported WAV format: {0}")]
    UnsupportedFormat(String),

    /// The WAV container could not be read or written.
    #[cfg(feature = "wav")]
    #[error("WAV codec error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, PcmError>;
