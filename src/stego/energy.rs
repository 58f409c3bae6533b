// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Energy-based sample eligibility (adaptive LSB).
//!
//! LSB flips are least noticeable, both to the ear and to first-order
//! statistics, where the signal is loud. Each sample is scored by the mean
//! magnitude of its neighbourhood in the same channel, and only the loudest
//! part of the carrier is used:
//!
//! 1. Mask the LSB, so scores are identical before and after embedding.
//! 2. Normalize to a 32-bit full scale (`|s & !1| << (32 - bits)`), making the
//!    classifier independent of bit depth.
//! 3. Window energy = integer mean of normalized magnitudes over
//!    `±window_radius` frames of the same channel (clamped at the edges).
//! 4. Threshold = the window energy at rank `percentile` of all samples.
//! 5. Eligible = window energy ≥ threshold and the sample's own magnitude is
//!    at least `silence_floor` of full scale, so digital silence and
//!    near-silent samples are never touched.
//!
//! Everything after the threshold rank is integer arithmetic on public data.
//! The result does not depend on the password, and reveal recomputes it
//! identically from the stego carrier.

use serde::{Deserialize, Serialize};

use crate::pcm::Carrier;
use crate::stego::error::StegoError;

/// Largest accepted window radius, in frames.
pub const MAX_WINDOW_RADIUS: usize = 1024;

/// Normalized full scale: magnitudes live in `0..=FULL_SCALE`.
const FULL_SCALE: u64 = 1 << 31;

/// Tuning for [`eligible`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyParams {
    /// Neighbourhood half-width in frames.
    pub window_radius: usize,
    /// Fraction of samples ranked below the eligibility threshold, in `[0, 1)`.
    pub percentile: f64,
    /// Minimum own magnitude as a fraction of full scale, in `[0, 1)`.
    pub silence_floor: f64,
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            window_radius: 2,
            percentile: 0.6,
            // ≈ -60 dBFS
            silence_floor: 1.0 / 1024.0,
        }
    }
}

impl EnergyParams {
    pub fn validate(&self) -> Result<(), StegoError> {
        if !(0.0..1.0).contains(&self.percentile) {
            return Err(StegoError::InvalidConfig("energy percentile must be in [0, 1)"));
        }
        if !(0.0..1.0).contains(&self.silence_floor) {
            return Err(StegoError::InvalidConfig("silence floor must be in [0, 1)"));
        }
        if self.window_radius > MAX_WINDOW_RADIUS {
            return Err(StegoError::InvalidConfig("energy window radius too large"));
        }
        Ok(())
    }

    fn floor_magnitude(&self) -> u64 {
        (self.silence_floor * FULL_SCALE as f64).ceil() as u64
    }

    fn threshold_rank(&self, n: usize) -> usize {
        ((n as f64 * self.percentile) as usize).min(n.saturating_sub(1))
    }
}

/// LSB-masked magnitude of every sample on the 32-bit full scale.
fn normalized_magnitudes(carrier: &Carrier) -> Vec<u64> {
    let shift = 32 - carrier.bits_per_sample() as u32;
    carrier
        .samples()
        .iter()
        .map(|&s| ((s & !1) as i64).unsigned_abs() << shift)
        .collect()
}

/// Windowed mean magnitude of every sample, per channel.
pub fn window_energies(carrier: &Carrier, params: &EnergyParams) -> Vec<u64> {
    let magnitudes = normalized_magnitudes(carrier);
    let channels = carrier.channels() as usize;
    let frames = carrier.frame_count();
    let radius = params.window_radius;

    let mut energies = vec![0u64; magnitudes.len()];
    let mut prefix = vec![0u64; frames + 1];
    for ch in 0..channels {
        for f in 0..frames {
            prefix[f + 1] = prefix[f] + magnitudes[f * channels + ch];
        }
        for f in 0..frames {
            let lo = f.saturating_sub(radius);
            let hi = (f + radius + 1).min(frames);
            energies[f * channels + ch] = (prefix[hi] - prefix[lo]) / (hi - lo) as u64;
        }
    }
    energies
}

/// Ascending indices of samples eligible for embedding.
///
/// Deterministic in the carrier's sample values above the LSB and in
/// `params`; independent of any secret.
pub fn eligible(carrier: &Carrier, params: &EnergyParams) -> Vec<usize> {
    let n = carrier.sample_count();
    if n == 0 {
        return Vec::new();
    }

    let energies = window_energies(carrier, params);
    let shift = 32 - carrier.bits_per_sample() as u32;
    let floor = params.floor_magnitude();

    let mut ranked = energies.clone();
    let rank = params.threshold_rank(n);
    let (_, &mut threshold, _) = ranked.select_nth_unstable(rank);

    let positions: Vec<usize> = carrier
        .samples()
        .iter()
        .zip(&energies)
        .enumerate()
        .filter(|&(_, (&s, &energy))| {
            let own = ((s & !1) as i64).unsigned_abs() << shift;
            energy >= threshold && own >= floor
        })
        .map(|(i, _)| i)
        .collect();

    tracing::trace!(samples = n, threshold, eligible = positions.len(), "classified carrier energy");
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frames: usize, channels: u16, bits: u16, amplitude: f64) -> Carrier {
        let max = ((1i64 << (bits - 1)) - 1) as f64;
        let samples = (0..frames)
            .flat_map(|f| {
                (0..channels).map(move |ch| {
                    let t = f as f64 / 44_100.0;
                    let phase = ch as f64 * 0.7;
                    ((2.0 * std::f64::consts::PI * 440.0 * t + phase).sin() * amplitude * max) as i32
                })
            })
            .collect();
        Carrier::new(channels, bits, 44_100, samples).unwrap()
    }

    #[test]
    fn deterministic() {
        let c = sine(4000, 2, 16, 0.5);
        let p = EnergyParams::default();
        assert_eq!(eligible(&c, &p), eligible(&c, &p));
    }

    #[test]
    fn roughly_top_forty_percent() {
        let c = sine(10_000, 1, 16, 0.25);
        let e = eligible(&c, &EnergyParams::default());
        assert!(e.len() >= 3_900 && e.len() <= 4_200, "eligible = {}", e.len());
        assert!(e.windows(2).all(|w| w[0] < w[1]), "indices must be ascending");
    }

    #[test]
    fn lsb_changes_do_not_move_eligibility() {
        let c = sine(3000, 1, 16, 0.3);
        let flipped: Vec<i32> = c.samples().iter().map(|&s| s ^ 1).collect();
        let f = Carrier::new(1, 16, 44_100, flipped).unwrap();
        let p = EnergyParams::default();
        assert_eq!(eligible(&c, &p), eligible(&f, &p));
    }

    #[test]
    fn bit_depth_independent() {
        // The same waveform (LSB already clear) at 16 and 24 bits.
        let even: Vec<i32> = sine(5000, 1, 16, 0.4).samples().iter().map(|&s| s & !1).collect();
        let c16 = Carrier::new(1, 16, 44_100, even.clone()).unwrap();
        let c24 = Carrier::new(1, 24, 44_100, even.iter().map(|&s| s << 8).collect()).unwrap();
        let p = EnergyParams::default();
        assert_eq!(eligible(&c16, &p), eligible(&c24, &p));
    }

    #[test]
    fn silence_is_never_eligible() {
        let mut samples = vec![0i32; 1000];
        for s in samples.iter_mut().take(300) {
            *s = 12_000;
        }
        let c = Carrier::new(1, 16, 8000, samples).unwrap();
        let e = eligible(&c, &EnergyParams::default());
        assert_eq!(e, (0..300).collect::<Vec<_>>());
    }

    #[test]
    fn all_silent_carrier_has_no_positions() {
        let c = Carrier::new(2, 16, 8000, vec![1; 2000]).unwrap();
        assert!(eligible(&c, &EnergyParams::default()).is_empty());
    }

    #[test]
    fn empty_carrier() {
        let c = Carrier::new(1, 16, 8000, vec![]).unwrap();
        assert!(eligible(&c, &EnergyParams::default()).is_empty());
    }

    #[test]
    fn window_energy_is_per_channel() {
        // Left channel loud, right silent: only left samples may qualify.
        let samples: Vec<i32> = (0..2000).map(|i| if i % 2 == 0 { 20_000 } else { 0 }).collect();
        let c = Carrier::new(2, 16, 8000, samples).unwrap();
        let energies = window_energies(&c, &EnergyParams::default());
        assert!(energies.iter().skip(1).step_by(2).all(|&e| e == 0));
        let e = eligible(&c, &EnergyParams::default());
        assert_eq!(e.len(), 1000);
        assert!(e.iter().all(|i| i % 2 == 0));
    }

    #[test]
    fn extremes_do_not_overflow() {
        let samples: Vec<i32> = (0..64).map(|i| if i % 2 == 0 { i32::MIN } else { i32::MAX }).collect();
        let c = Carrier::new(1, 32, 8000, samples).unwrap();
        let e = eligible(&c, &EnergyParams { window_radius: MAX_WINDOW_RADIUS, ..EnergyParams::default() });
        assert_eq!(e.len(), 64);
    }

    #[test]
    fn params_validation() {
        assert!(EnergyParams::default().validate().is_ok());
        assert!(EnergyParams { percentile: 1.0, ..EnergyParams::default() }.validate().is_err());
        assert!(EnergyParams { silence_floor: -0.1, ..EnergyParams::default() }.validate().is_err());
        assert!(EnergyParams { window_radius: MAX_WINDOW_RADIUS + 1, ..EnergyParams::default() }.validate().is_err());
    }
}
