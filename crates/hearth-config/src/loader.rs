// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hearth.toml` > `~/.config/hearth/hearth.toml` > `/etc/hearth/hearth.toml`
//! with environment variable overrides via `HEARTH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HearthConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hearth/hearth.toml` (system-wide)
/// 3. `~/.config/hearth/hearth.toml` (user XDG config)
/// 4. `./hearth.toml` (local directory)
/// 5. `HEARTH_*` environment variables
pub fn load_config() -> Result<HearthConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HearthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HearthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for standard config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::file("/etc/hearth/hearth.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hearth/hearth.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hearth.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// keys survive: `HEARTH_VAULT_ENCRYPTION_KEY` maps to `vault.encryption_key`,
/// not `vault.encryption.key`. `HEARTH_ENCRYPTION_KEY` is accepted as a
/// shorthand for the same key.
fn env_provider() -> Env {
    Env::prefixed("HEARTH_").map(|key| {
        // Keys arrive in their original (upper) case.
        let key_str = key.as_str().to_ascii_lowercase();
        if key_str == "encryption_key" {
            return "vault.encryption_key".into();
        }
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("vault_", "vault.", 1)
            .replacen("connector_", "connector.", 1)
            .replacen("aggregation_", "aggregation.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_maps_sections_without_splitting_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HEARTH_VAULT_ENCRYPTION_KEY", "from-env");
            jail.set_env("HEARTH_AGGREGATION_INTERVAL_SECS", "42");
            let config = load_config()?;
            assert_eq!(config.vault.encryption_key.as_deref(), Some("from-env"));
            assert_eq!(config.aggregation.interval_secs, 42);
            Ok(())
        });
    }

    #[test]
    fn upper_case_env_reaches_every_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HEARTH_AGENT_LOG_LEVEL", "debug");
            jail.set_env("HEARTH_STORAGE_DATABASE_PATH", "/tmp/hearth-env.db");
            jail.set_env("HEARTH_CONNECTOR_TIMEOUT_SECS", "7");
            let config = load_config()?;
            assert_eq!(config.agent.log_level, "debug");
            assert_eq!(config.storage.database_path, "/tmp/hearth-env.db");
            assert_eq!(config.connector.timeout_secs, 7);
            Ok(())
        });
    }

    #[test]
    fn encryption_key_shorthand_is_accepted() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HEARTH_ENCRYPTION_KEY", "short");
            let config = load_config()?;
            assert_eq!(config.vault.encryption_key.as_deref(), Some("short"));
            Ok(())
        });
    }

    #[test]
    fn local_file_is_read_from_working_directory() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "hearth.toml",
                r#"
[connector]
timeout_secs = 5
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.connector.timeout_secs, 5);
            Ok(())
        });
    }
}
