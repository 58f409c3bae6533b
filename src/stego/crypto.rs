// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Key derivation and authenticated encryption.
//!
//! One Argon2id call per operation turns `(password, salt)` into 64 bytes:
//!
//! - bytes `0..32`: AES-256-GCM-SIV encryption key
//! - bytes `32..64`: sequencing seed for the embedding-position shuffle
//!
//! The salt is fresh per hide, so neither the key nor the embedding order is
//! ever reused across messages, even for the same password. A separate,
//! public locator seed (SHA-256 over the salt) orders the frame-header
//! positions so reveal can find a frame before spending time on the KDF.
//!
//! Cipher blobs are self-describing: `nonce(12) ‖ ciphertext ‖ tag(16)`.
//! AES-256-GCM-SIV is used for its nonce-misuse resistance.

use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes256GcmSiv, Key, KeyInit, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// Argon2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Encryption key length in bytes.
pub const KEY_LEN: usize = 32;
/// Sequencing seed length in bytes (ChaCha20 seed).
pub const SEED_LEN: usize = 32;
/// Bytes a cipher blob adds on top of its plaintext.
pub const BLOB_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Domain tag for the public header locator seed.
const LOCATOR_DOMAIN: &[u8] = b"sonic-locator-v1";

/// Per-message random salt.
pub type Salt = [u8; SALT_LEN];

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub m_cost_kib: u32,
    /// Number of passes.
    pub t_cost: u32,
    /// Lanes.
    pub p_cost: u32,
}

impl Default for KdfParams {
    /// The `argon2` crate defaults (19 MiB, 2 passes, 1 lane).
    fn default() -> Self {
        Self {
            m_cost_kib: Params::DEFAULT_M_COST,
            t_cost: Params::DEFAULT_T_COST,
            p_cost: Params::DEFAULT_P_COST,
        }
    }
}

impl KdfParams {
    fn argon2(&self) -> Result<Argon2<'static>, StegoError> {
        let params = Params::new(
            self.m_cost_kib,
            self.t_cost,
            self.p_cost,
            Some(KEY_LEN + SEED_LEN),
        )
        .map_err(|_| StegoError::InvalidConfig("Argon2 parameters out of range"))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    pub fn validate(&self) -> Result<(), StegoError> {
        self.argon2().map(|_| ())
    }
}

/// Key material for one hide or reveal. Zeroized on drop.
pub struct DerivedMaterial {
    encryption_key: Zeroizing<[u8; KEY_LEN]>,
    sequencing_seed: Zeroizing<[u8; SEED_LEN]>,
}

impl DerivedMaterial {
    pub fn encryption_key(&self) -> &[u8; KEY_LEN] {
        &self.encryption_key
    }

    pub fn sequencing_seed(&self) -> &[u8; SEED_LEN] {
        &self.sequencing_seed
    }
}

/// Generate a fresh random salt.
pub fn generate_salt() -> Salt {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Derive the encryption key and sequencing seed from `(password, salt)`.
///
/// Deterministic for identical inputs. Fails only on KDF parameters that
/// Argon2 rejects.
pub fn derive(password: &str, salt: &Salt, params: &KdfParams) -> Result<DerivedMaterial, StegoError> {
    let mut output = Zeroizing::new([0u8; KEY_LEN + SEED_LEN]);
    params
        .argon2()?
        .hash_password_into(password.as_bytes(), salt, &mut *output)
        .map_err(|_| StegoError::InvalidConfig("Argon2 rejected the derivation inputs"))?;

    let mut encryption_key = Zeroizing::new([0u8; KEY_LEN]);
    let mut sequencing_seed = Zeroizing::new([0u8; SEED_LEN]);
    encryption_key.copy_from_slice(&output[..KEY_LEN]);
    sequencing_seed.copy_from_slice(&output[KEY_LEN..]);

    Ok(DerivedMaterial { encryption_key, sequencing_seed })
}

/// Public seed that orders the frame-header positions.
///
/// Depends on the salt alone, so a reveal can locate and check the frame
/// header before deriving the key. It carries no secret.
pub fn locator_seed(salt: &Salt) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(LOCATOR_DOMAIN);
    hasher.update(salt);
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hasher.finalize());
    seed
}

fn cipher(key: &[u8; KEY_LEN]) -> Aes256GcmSiv {
    Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(key))
}

/// Encrypt `plaintext` into a self-describing blob `nonce ‖ ciphertext ‖ tag`.
pub fn seal(plaintext: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>, StegoError> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher(key)
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| StegoError::InternalConsistency("AES-GCM-SIV refused the plaintext"))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt and authenticate a blob produced by [`seal`].
///
/// Fails closed: a short blob, a wrong key or any modified bit all return
/// [`StegoError::WrongPasswordOrCorrupt`] and no plaintext.
pub fn open(blob: &[u8], key: &[u8; KEY_LEN]) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    if blob.len() < BLOB_OVERHEAD {
        return Err(StegoError::WrongPasswordOrCorrupt);
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    cipher(key)
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| StegoError::WrongPasswordOrCorrupt)
}
