// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM credential vault for the Hearth services hub.
//!
//! Connection credentials are encrypted before they reach storage and only
//! decrypted in memory when a connector needs to authenticate.

pub mod crypto;
pub mod vault;

pub use vault::{CredentialVault, KEY_ENV_VAR, generate_key};
