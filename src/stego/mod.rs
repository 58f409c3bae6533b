// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic hide and reveal for PCM audio.
//!
//! Adaptive LSB embedding: the message is compressed when that helps,
//! encrypted with AES-256-GCM-SIV under an Argon2id key, framed with a length
//! header and spread over the LSBs of the loudest samples in an order only the
//! password holder can reproduce.
//!
//! [`hide`] / [`reveal`] keep the per-message salt outside the carrier.
//! [`hide_self_contained`] / [`reveal_self_contained`] store it inside, at the
//! cost of 128 bits of capacity.

pub mod error;
pub mod config;
pub mod crypto;
pub mod frame;
pub mod payload;
pub mod energy;
pub mod permute;
pub mod capacity;
mod pipeline;
#[cfg(feature = "wav")]
pub mod wav;

pub use error::StegoError;
pub use config::StegoConfig;
pub use crypto::{KdfParams, Salt};
pub use energy::EnergyParams;
pub use capacity::{estimate_capacity, SaltPlacement};
pub use pipeline::{
    hide, hide_with_config, reveal, reveal_with_config, reveal_text,
    hide_self_contained, hide_self_contained_with_config,
    reveal_self_contained, reveal_self_contained_with_config,
    HideOutput, Stage,
};
