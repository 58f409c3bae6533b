// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # sonic-core
//!
//! Pure-Rust steganography engine for hiding encrypted messages in PCM audio.
//!
//! Messages are sealed with AES-256-GCM-SIV under an Argon2id key and written
//! into the least significant bits of the loudest samples, in a keyed
//! pseudo-random order. Only the LSBs of the chosen samples ever change.
//!
//! The `pcm` module holds the container-agnostic [`Carrier`]; with the
//! default `wav` feature it also reads and writes RIFF/WAV through `hound`.
//! The `stego` module holds the codec.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use sonic_core::{hide, reveal, Carrier};
//!
//! let cover = Carrier::open_wav("voice.wav").unwrap();
//! let out = hide(&cover, b"meet at noon", "correct-horse").unwrap();
//! out.carrier.save_wav("voice-stego.wav").unwrap();
//!
//! // The salt travels next to the stego file.
//! let stego = Carrier::open_wav("voice-stego.wav").unwrap();
//! assert_eq!(reveal(&stego, "correct-horse", &out.salt).unwrap(), b"meet at noon");
//! ```
//!
//! The library never installs a `tracing` subscriber. Stage transitions are
//! emitted at `debug` level; keys, passwords and plaintext are never logged.

pub mod pcm;
pub mod stego;

pub use pcm::{Carrier, PcmError};
pub use stego::{hide, hide_with_config, reveal, reveal_with_config, reveal_text, HideOutput, Stage, StegoError};
pub use stego::{hide_self_contained, reveal_self_contained, estimate_capacity, SaltPlacement};
pub use stego::{EnergyParams, KdfParams, Salt, StegoConfig};
#[cfg(feature = "wav")]
pub use stego::wav::{hide_wav, reveal_wav, wav_capacity};
