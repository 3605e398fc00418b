// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use hearth_core::HearthError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

/// Length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, HearthError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| HearthError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, returning `nonce || ciphertext || tag` as one buffer.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, HearthError> {
    let key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| HearthError::Internal("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| HearthError::Internal("AES-256-GCM encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

/// Decrypt a buffer produced by [`seal`].
///
/// Fails with [`HearthError::Decryption`] on a wrong key, tampered data,
/// or a buffer too short to hold a nonce and tag.
pub fn open(key: &[u8; 32], sealed: &[u8]) -> Result<Vec<u8>, HearthError> {
    if sealed.len() < NONCE_LEN + TAG_LEN {
        return Err(HearthError::Decryption(format!(
            "ciphertext too short ({} bytes)",
            sealed.len()
        )));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| HearthError::Decryption("malformed nonce".to_string()))?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = aead_key(key)?
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            HearthError::Decryption("wrong key or corrupted ciphertext".to_string())
        })?;

    Ok(plaintext.to_vec())
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
pub fn generate_random_key() -> Result<[u8; 32], HearthError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| HearthError::Internal("failed to generate random key".to_string()))?;
    Ok(key)
}
