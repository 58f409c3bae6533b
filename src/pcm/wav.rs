// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! RIFF/WAV adapter for [`Carrier`].
//!
//! Integer PCM only (8/16/24/32-bit, any channel count). 8-bit WAV data is
//! stored unsigned on disk; `hound` maps it to the signed range on read and
//! back on write, so the carrier always sees signed samples.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::error::{PcmError, Result};
use super::Carrier;

impl Carrier {
    /// Parse a carrier from in-memory WAV bytes.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_wav_reader(WavReader::new(Cursor::new(bytes))?)
    }

    /// Read a carrier from a WAV file.
    pub fn open_wav<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_wav_reader(WavReader::open(path)?)
    }

    fn from_wav_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(PcmError::UnsupportedFormat(format!(
                "{}-bit floating point; only integer PCM can carry LSB payloads",
                spec.bits_per_sample
            )));
        }

        let samples = reader
            .into_samples::<i32>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::trace!(
            channels = spec.channels,
            bits = spec.bits_per_sample,
            samples = samples.len(),
            "parsed WAV carrier"
        );

        Carrier::new(spec.channels, spec.bits_per_sample, spec.sample_rate, samples)
    }

    /// WAV header parameters matching this carrier.
    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels(),
            sample_rate: self.sample_rate(),
            bits_per_sample: self.bits_per_sample(),
            sample_format: SampleFormat::Int,
        }
    }

    /// Serialize the carrier as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let writer = WavWriter::new(Cursor::new(&mut bytes), self.wav_spec())?;
            self.write_samples(writer)?;
        }
        Ok(bytes)
    }

    /// Write the carrier to a WAV file, replacing any existing file.
    pub fn save_wav<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = WavWriter::create(path, self.wav_spec())?;
        self.write_samples(writer)
    }

    fn write_samples<W: std::io::Write + Seek>(&self, mut writer: WavWriter<W>) -> Result<()> {
        for &sample in self.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}
