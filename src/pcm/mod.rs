// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Uncompressed PCM carrier representation.
//!
//! A [`Carrier`] is an already-parsed sample buffer: channel count, bit depth,
//! sample rate and interleaved signed integer samples. The steganography layer
//! only ever reads a carrier and hands back a new one; the shape (channels,
//! bit depth, sample rate, sample count) of a carrier never changes through a
//! hide or reveal.
//!
//! Container parsing is kept separate. The optional [`wav`] module (feature
//! `wav`) converts RIFF/WAV bytes to and from a [`Carrier`].

pub mod error;
#[cfg(feature = "wav")]
pub mod wav;

pub use error::{PcmError, Result};

/// Bit depths accepted for integer PCM carriers.
pub const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// Maximum number of interleaved samples in a carrier.
///
/// Embedding positions are shuffled with `u32` ranges so that native and
/// 32-bit targets agree; every sample index therefore has to fit in a `u32`.
pub const MAX_SAMPLES: usize = u32::MAX as usize;

/// An uncompressed PCM audio buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    channels: u16,
    bits_per_sample: u16,
    sample_rate: u32,
    /// Interleaved samples: frame 0 channel 0, frame 0 channel 1, ...
    samples: Vec<i32>,
}

impl Carrier {
    /// Build a carrier from interleaved samples, validating its shape.
    ///
    /// # Errors
    /// - [`PcmError::UnsupportedBitDepth`] unless `bits_per_sample` is 8/16/24/32.
    /// - [`PcmError::NoChannels`] if `channels == 0`.
    /// - [`PcmError::RaggedFrames`] if the sample count is not a multiple of `channels`.
    /// - [`PcmError::TooManySamples`] if the buffer exceeds [`MAX_SAMPLES`].
    /// - [`PcmError::SampleOutOfRange`] if a sample does not fit the bit depth.
    pub fn new(
        channels: u16,
        bits_per_sample: u16,
        sample_rate: u32,
        samples: Vec<i32>,
    ) -> Result<Self> {
        if !SUPPORTED_BIT_DEPTHS.contains(&bits_per_sample) {
            return Err(PcmError::UnsupportedBitDepth(bits_per_sample));
        }
        if channels == 0 {
            return Err(PcmError::NoChannels);
        }
        if samples.len() % channels as usize != 0 {
            return Err(PcmError::RaggedFrames { samples: samples.len(), channels });
        }
        if samples.len() > MAX_SAMPLES {
            return Err(PcmError::TooManySamples(samples.len()));
        }

        let (min, max) = sample_range(bits_per_sample);
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, &s)| (s as i64) < min || (s as i64) > max)
        {
            return Err(PcmError::SampleOutOfRange { index, value, bits: bits_per_sample });
        }

        Ok(Self { channels, bits_per_sample, sample_rate, samples })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Consume the carrier and return its interleaved samples.
    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    /// Total number of interleaved samples (frames × channels).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Playback duration in seconds. Returns 0.0 for a zero sample rate.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Least-significant bit of the sample at `index`.
    pub fn lsb(&self, index: usize) -> u8 {
        (self.samples[index] & 1) as u8
    }

    /// Same-shaped carrier around a new sample buffer.
    ///
    /// Only used by the embedder, which changes nothing but LSBs, so the
    /// range invariants established by [`Carrier::new`] still hold.
    pub(crate) fn with_samples(&self, samples: Vec<i32>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            channels: self.channels,
            bits_per_sample: self.bits_per_sample,
            sample_rate: self.sample_rate,
            samples,
        }
    }
}

/// Inclusive signed range for a PCM bit depth.
fn sample_range(bits: u16) -> (i64, i64) {
    let half = 1i64 << (bits - 1);
    (-half, half - 1)
}
