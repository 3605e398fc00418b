// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::diagnostic::ConfigError;
use crate::model::HearthConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &HearthConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.agent.log_level
        ));
    }

    if config.agent.max_tool_rounds == 0 {
        fail("agent.max_tool_rounds must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if let Some(key) = &config.vault.encryption_key {
        match STANDARD.decode(key.trim()) {
            Ok(bytes) if bytes.len() == 32 => {}
            Ok(bytes) => fail(format!(
                "vault.encryption_key must decode to 32 bytes, got {}",
                bytes.len()
            )),
            Err(e) => fail(format!("vault.encryption_key is not valid base64: {e}")),
        }
    }

    if config.connector.timeout_secs == 0 {
        fail("connector.timeout_secs must be at least 1".to_string());
    }

    for (key, path) in [
        ("connector.login_path", &config.connector.login_path),
        ("connector.health_path", &config.connector.health_path),
    ] {
        if !path.starts_with('/') {
            fail(format!("{key} must start with `/`, got `{path}`"));
        }
    }

    if config.aggregation.interval_secs == 0 {
        fail("aggregation.interval_secs must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &HearthConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&HearthConfig::default()).is_ok());
    }

    #[test]
    fn short_encryption_key_fails_validation() {
        let mut config = HearthConfig::default();
        config.vault.encryption_key = Some(STANDARD.encode([7u8; 16]));
        let errs = messages(&config);
        assert!(errs.iter().any(|m| m.contains("32 bytes, got 16")), "{errs:?}");
    }

    #[test]
    fn non_base64_encryption_key_fails_validation() {
        let mut config = HearthConfig::default();
        config.vault.encryption_key = Some("not base64!!".to_string());
        let errs = messages(&config);
        assert!(errs.iter().any(|m| m.contains("not valid base64")));
    }

    #[test]
    fn valid_encryption_key_passes() {
        let mut config = HearthConfig::default();
        config.vault.encryption_key = Some(STANDARD.encode([1u8; 32]));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_rounds_and_zero_interval_both_reported() {
        let mut config = HearthConfig::default();
        config.agent.max_tool_rounds = 0;
        config.aggregation.interval_secs = 0;
        let errs = messages(&config);
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn relative_login_path_fails_validation() {
        let mut config = HearthConfig::default();
        config.connector.login_path = "api/auth/login".to_string();
        let errs = messages(&config);
        assert!(errs[0].contains("connector.login_path"));
    }

    #[test]
    fn health_path_from_file_is_checked() {
        let toml_str = r#"
            [connector]
            health_path = "health"
        "#;
        let config: HearthConfig = toml::from_str(toml_str).unwrap();
        let errs = messages(&config);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("connector.health_path"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = HearthConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errs = messages(&config);
        assert!(errs[0].contains("agent.log_level"));
    }
}
