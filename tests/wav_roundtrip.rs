// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! WAV file round-trips through the filesystem.

#![cfg(feature = "wav")]

use sonic_core::stego::wav::{hide_wav_file, reveal_wav_file};
use sonic_core::{hide, reveal, Carrier, KdfParams, StegoConfig, StegoError};

fn fast_config() -> StegoConfig {
    StegoConfig {
        kdf: KdfParams { m_cost_kib: 1024, t_cost: 1, p_cost: 1 },
        ..StegoConfig::default()
    }
}

fn stereo_wav(bits: u16) -> Carrier {
    let max = ((1i64 << (bits - 1)) - 1) as f64;
    let samples = (0..8_000)
        .flat_map(|f| {
            let t = f as f64 / 32_000.0;
            let left = (2.0 * std::f64::consts::PI * 300.0 * t).sin() * 0.5 * max;
            let right = (2.0 * std::f64::consts::PI * 450.0 * t).cos() * 0.35 * max;
            [left as i32, right as i32]
        })
        .collect();
    Carrier::new(2, bits, 32_000, samples).unwrap()
}

#[test]
fn file_roundtrip_all_depths() {
    let cfg = fast_config();
    let dir = tempfile::tempdir().unwrap();
    for bits in [8u16, 16, 24, 32] {
        let cover_path = dir.path().join(format!("cover-{bits}.wav"));
        let stego_path = dir.path().join(format!("stego-{bits}.wav"));
        stereo_wav(bits).save_wav(&cover_path).unwrap();

        hide_wav_file(&cover_path, &stego_path, b"under the bridge", "correct-horse", &cfg).unwrap();
        let msg = reveal_wav_file(&stego_path, "correct-horse", &cfg).unwrap();
        assert_eq!(msg, b"under the bridge", "{bits}-bit");

        let cover = Carrier::open_wav(&cover_path).unwrap();
        let stego = Carrier::open_wav(&stego_path).unwrap();
        assert_eq!(stego.bits_per_sample(), bits);
        assert_eq!(stego.channels(), 2);
        assert!(cover
            .samples()
            .iter()
            .zip(stego.samples())
            .all(|(a, b)| a & !1 == b & !1));
    }
}

#[test]
fn failed_hide_writes_nothing() {
    let cfg = StegoConfig { compress: false, ..fast_config() };
    let dir = tempfile::tempdir().unwrap();
    let cover_path = dir.path().join("cover.wav");
    let stego_path = dir.path().join("stego.wav");
    stereo_wav(16).save_wav(&cover_path).unwrap();

    let err = hide_wav_file(&cover_path, &stego_path, &vec![1u8; 100_000], "correct-horse", &cfg).unwrap_err();
    assert!(matches!(err, StegoError::InsufficientCapacity { .. }));
    assert!(!stego_path.exists());
}

#[test]
fn external_salt_survives_wav_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stego.wav");

    let out = hide(&stereo_wav(24), b"salt kept aside", "correct-horse").unwrap();
    out.carrier.save_wav(&path).unwrap();

    let reloaded = Carrier::open_wav(&path).unwrap();
    assert_eq!(reloaded, out.carrier);
    assert_eq!(reveal(&reloaded, "correct-horse", &out.salt).unwrap(), b"salt kept aside");
}

#[test]
fn missing_file_is_invalid_carrier() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        reveal_wav_file(dir.path().join("nope.wav"), "correct-horse", &fast_config()),
        Err(StegoError::InvalidCarrier(_))
    ));
}
