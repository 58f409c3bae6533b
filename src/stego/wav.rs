// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! WAV-level entry points.
//!
//! These wrap the carrier pipeline for callers that hold WAV bytes or files.
//! The salt is stored inside the carrier (self-contained placement), so the
//! stego WAV plus the password is all that is needed to reveal.

use std::path::Path;

use crate::pcm::Carrier;
use crate::stego::capacity::{self, SaltPlacement};
use crate::stego::config::StegoConfig;
use crate::stego::error::StegoError;
use crate::stego::pipeline;

/// Hide `message` in a WAV file given as bytes, returning the stego WAV bytes.
pub fn hide_wav(wav: &[u8], message: &[u8], password: &str) -> Result<Vec<u8>, StegoError> {
    hide_wav_with_config(wav, message, password, &StegoConfig::default())
}

pub fn hide_wav_with_config(
    wav: &[u8],
    message: &[u8],
    password: &str,
    config: &StegoConfig,
) -> Result<Vec<u8>, StegoError> {
    let carrier = Carrier::from_wav_bytes(wav)?;
    let stego = pipeline::hide_self_contained_with_config(&carrier, message, password, config)?;
    Ok(stego.to_wav_bytes()?)
}

/// Reveal a message from stego WAV bytes produced by [`hide_wav`].
pub fn reveal_wav(wav: &[u8], password: &str) -> Result<Vec<u8>, StegoError> {
    reveal_wav_with_config(wav, password, &StegoConfig::default())
}

pub fn reveal_wav_with_config(wav: &[u8], password: &str, config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    let carrier = Carrier::from_wav_bytes(wav)?;
    pipeline::reveal_self_contained_with_config(&carrier, password, config)
}

/// Largest uncompressed message, in bytes, that [`hide_wav`] is guaranteed
/// to fit into this WAV.
pub fn wav_capacity(wav: &[u8]) -> Result<usize, StegoError> {
    wav_capacity_with_config(wav, &StegoConfig::default())
}

pub fn wav_capacity_with_config(wav: &[u8], config: &StegoConfig) -> Result<usize, StegoError> {
    config.validate()?;
    let carrier = Carrier::from_wav_bytes(wav)?;
    Ok(capacity::estimate_capacity(&carrier, SaltPlacement::Embedded, config))
}

/// Hide `message` in the WAV file at `input` and write the result to `output`.
///
/// `output` is only created once hiding has succeeded.
pub fn hide_wav_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    message: &[u8],
    password: &str,
    config: &StegoConfig,
) -> Result<(), StegoError> {
    let carrier = Carrier::open_wav(input)?;
    let stego = pipeline::hide_self_contained_with_config(&carrier, message, password, config)?;
    stego.save_wav(output)?;
    Ok(())
}

/// Reveal a message from a stego WAV file.
pub fn reveal_wav_file<P: AsRef<Path>>(path: P, password: &str, config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    let carrier = Carrier::open_wav(path)?;
    pipeline::reveal_self_contained_with_config(&carrier, password, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::PcmError;
    use crate::stego::crypto::KdfParams;

    fn fast_config() -> StegoConfig {
        StegoConfig {
            kdf: KdfParams { m_cost_kib: 1024, t_cost: 1, p_cost: 1 },
            ..StegoConfig::default()
        }
    }

    fn chirp_wav(bits: u16) -> Vec<u8> {
        let max = ((1i64 << (bits - 1)) - 1) as f64;
        let samples = (0..12_000)
            .map(|i| {
                let t = i as f64 / 22_050.0;
                ((2.0 * std::f64::consts::PI * (200.0 + 400.0 * t) * t).sin() * 0.4 * max) as i32
            })
            .collect();
        Carrier::new(1, bits, 22_050, samples).unwrap().to_wav_bytes().unwrap()
    }

    #[test]
    fn bytes_roundtrip() {
        let cfg = fast_config();
        let wav = chirp_wav(16);
        let stego = hide_wav_with_config(&wav, b"meet me at the pier", "correct-horse", &cfg).unwrap();
        assert_eq!(stego.len(), wav.len());
        assert_eq!(
            reveal_wav_with_config(&stego, "correct-horse", &cfg).unwrap(),
            b"meet me at the pier"
        );
    }

    #[test]
    fn every_bit_depth() {
        let cfg = fast_config();
        for bits in [8u16, 16, 24, 32] {
            let wav = chirp_wav(bits);
            let stego = hide_wav_with_config(&wav, b"depth", "correct-horse", &cfg).unwrap();
            assert_eq!(reveal_wav_with_config(&stego, "correct-horse", &cfg).unwrap(), b"depth", "{bits}-bit");
        }
    }

    #[test]
    fn capacity_is_honest() {
        let cfg = StegoConfig { compress: false, ..fast_config() };
        let wav = chirp_wav(16);
        let cap = wav_capacity_with_config(&wav, &cfg).unwrap();
        assert!(cap > 0);
        assert!(hide_wav_with_config(&wav, &vec![7u8; cap], "correct-horse", &cfg).is_ok());
        assert!(matches!(
            hide_wav_with_config(&wav, &vec![7u8; cap + 1], "correct-horse", &cfg),
            Err(StegoError::InsufficientCapacity { .. })
        ));
    }

    #[test]
    fn garbage_is_invalid_carrier() {
        assert!(matches!(
            reveal_wav(b"definitely not RIFF", "correct-horse"),
            Err(StegoError::InvalidCarrier(PcmError::Wav(_)))
        ));
    }

    #[test]
    fn clean_wav_has_nothing_hidden() {
        let cfg = fast_config();
        assert!(matches!(
            reveal_wav_with_config(&chirp_wav(16), "correct-horse", &cfg),
            Err(StegoError::NotFound)
        ));
    }
}
