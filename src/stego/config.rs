// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Codec configuration.
//!
//! Every field has a production default, and `#[serde(default)]` lets a
//! caller override only the fields it cares about when loading from JSON,
//! TOML or any other serde format. Both sides of a hide/reveal pair must use
//! the same [`KdfParams`] and [`EnergyParams`], otherwise the derived key or
//! the eligible positions differ and the message cannot be found.

use serde::{Deserialize, Serialize};

use crate::stego::crypto::KdfParams;
use crate::stego::energy::EnergyParams;
use crate::stego::error::StegoError;

/// Minimum password length enforced on hide by default.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

/// Options that control how a message is hidden and revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Argon2id cost parameters.
    pub kdf: KdfParams,
    /// Sample eligibility tuning.
    pub energy: EnergyParams,
    /// Minimum password length in characters (0 disables the check).
    pub min_password_len: usize,
    /// Try Brotli compression of the message before encryption.
    pub compress: bool,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            energy: EnergyParams::default(),
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
            compress: true,
        }
    }
}

impl StegoConfig {
    /// Check every parameter before any work is done.
    pub fn validate(&self) -> Result<(), StegoError> {
        self.kdf.validate()?;
        self.energy.validate()
    }

    /// Enforce the password policy. Blank passwords are always rejected.
    pub fn check_password(&self, password: &str) -> Result<(), StegoError> {
        let min_len = self.min_password_len.max(1);
        if password.trim().is_empty() || password.chars().count() < min_len {
            return Err(StegoError::WeakPassword { min_len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        StegoConfig::default().validate().unwrap();
    }

    #[test]
    fn password_policy() {
        let cfg = StegoConfig::default();
        assert!(cfg.check_password("correct-horse").is_ok());
        assert!(matches!(cfg.check_password("short"), Err(StegoError::WeakPassword { min_len: 8 })));
        assert!(cfg.check_password("        ").is_err());

        let relaxed = StegoConfig { min_password_len: 0, ..StegoConfig::default() };
        assert!(relaxed.check_password("x").is_ok());
        assert!(relaxed.check_password("").is_err());
    }

    #[test]
    fn password_length_counts_chars_not_bytes() {
        let cfg = StegoConfig::default();
        // 8 characters, 16 bytes.
        assert!(cfg.check_password("пароль12").is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: StegoConfig = serde_json::from_str(r#"{"compress": false}"#).unwrap();
        assert!(!cfg.compress);
        assert_eq!(cfg.kdf, KdfParams::default());
        assert_eq!(cfg.energy, EnergyParams::default());
        assert_eq!(cfg.min_password_len, DEFAULT_MIN_PASSWORD_LEN);
    }

    #[test]
    fn json_roundtrip() {
        let cfg = StegoConfig {
            min_password_len: 12,
            energy: EnergyParams { percentile: 0.5, ..EnergyParams::default() },
            ..StegoConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: StegoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn invalid_energy_rejected() {
        let cfg = StegoConfig {
            energy: EnergyParams { percentile: 1.5, ..EnergyParams::default() },
            ..StegoConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(StegoError::InvalidConfig(_))));
    }
}
