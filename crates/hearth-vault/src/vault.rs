// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide credential vault.
//!
//! The key is loaded once at startup and never changes for the lifetime of
//! the process. Ciphertexts are text tokens, base64 of
//! `nonce || ciphertext || tag`, so they can live in a TEXT column.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hearth_config::model::VaultConfig;
use hearth_core::HearthError;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto;

/// Environment variable consulted when `vault.encryption_key` is unset.
pub const KEY_ENV_VAR: &str = "HEARTH_ENCRYPTION_KEY";

/// Symmetric encrypt/decrypt of credential blobs at rest.
///
/// Stateless apart from the key; safe to share across tasks behind an `Arc`.
/// Debug output omits the key.
pub struct CredentialVault {
    key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl CredentialVault {
    /// Builds a vault from raw key bytes.
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Builds a vault from a base64-encoded 32-byte key.
    pub fn from_base64_key(encoded: &str) -> Result<Self, HearthError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| HearthError::Config(format!("encryption key is not base64: {e}")))?,
        );
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            HearthError::Config(format!(
                "encryption key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::new(key))
    }

    /// Builds a vault from configuration, falling back to [`KEY_ENV_VAR`].
    pub fn from_config(config: &VaultConfig) -> Result<Self, HearthError> {
        if let Some(key) = config.encryption_key.as_deref()
            && !key.trim().is_empty()
        {
            return Self::from_base64_key(key);
        }
        let key = std::env::var(KEY_ENV_VAR).map_err(|_| {
            HearthError::Config(format!(
                "no encryption key: set vault.encryption_key or {KEY_ENV_VAR} (generate one with `hearth keygen`)"
            ))
        })?;
        debug!("vault key loaded from environment");
        Self::from_base64_key(&key)
    }

    /// Encrypts arbitrary bytes into a text token.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, HearthError> {
        Ok(STANDARD.encode(crypto::seal(&self.key, plaintext)?))
    }

    /// Decrypts a token produced by [`CredentialVault::encrypt`] under the same key.
    ///
    /// Any failure is a [`HearthError::Decryption`] and is not worth retrying.
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>, HearthError> {
        let sealed = STANDARD
            .decode(token.trim())
            .map_err(|e| HearthError::Decryption(format!("ciphertext is not base64: {e}")))?;
        crypto::open(&self.key, &sealed)
    }

    /// Encrypts a credential envelope.
    pub fn encrypt_json(&self, value: &serde_json::Value) -> Result<String, HearthError> {
        self.encrypt(serde_json::to_string(value)?.as_bytes())
    }

    /// Decrypts a credential envelope.
    pub fn decrypt_json(&self, token: &str) -> Result<serde_json::Value, HearthError> {
        let plaintext = Zeroizing::new(self.decrypt(token)?);
        serde_json::from_slice(&plaintext).map_err(|e| {
            HearthError::Decryption(format!("decrypted credentials are not JSON: {e}"))
        })
    }
}

/// Generates a fresh base64-encoded key for `vault.encryption_key`.
pub fn generate_key() -> Result<String, HearthError> {
    let key = Zeroizing::new(crypto::generate_random_key()?);
    Ok(STANDARD.encode(key.as_slice()))
}
