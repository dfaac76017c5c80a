// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express, such as
//! the endpoint scheme, a non-zero timeout, and a non-empty canned reply list.

use crate::diagnostic::ConfigError;
use crate::model::NilaConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error
/// (does not fail fast).
pub fn validate_config(config: &NilaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let endpoint = config.responder.endpoint.trim();
    if endpoint.is_empty() {
        fail("responder.endpoint must not be empty".to_string());
    } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        fail(format!(
            "responder.endpoint `{endpoint}` must start with http:// or https://"
        ));
    }

    if config.responder.timeout_secs == 0 {
        fail("responder.timeout_secs must be at least 1".to_string());
    }

    for (i, keyword) in config.guard.extra_keywords.iter().enumerate() {
        if keyword.trim().is_empty() {
            fail(format!("guard.extra_keywords[{i}] must not be blank"));
        }
    }

    if config.fallback.canned_replies.is_empty() {
        fail("fallback.canned_replies must contain at least one reply".to_string());
    }
    for (i, reply) in config.fallback.canned_replies.iter().enumerate() {
        if reply.trim().is_empty() {
            fail(format!("fallback.canned_replies[{i}] must not be blank"));
        }
    }
    for (i, sentinel) in config.fallback.degraded_sentinels.iter().enumerate() {
        if sentinel.trim().is_empty() {
            // A blank sentinel would match nearly every reply.
            fail(format!("fallback.degraded_sentinels[{i}] must not be blank"));
        }
    }

    if config.fallback.error_reply.trim().is_empty() {
        fail("fallback.error_reply must not be empty".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }
    if config.storage.history_key.trim().is_empty() {
        fail("storage.history_key must not be empty".to_string());
    }
    if config.storage.user_id_key.trim().is_empty() {
        fail("storage.user_id_key must not be empty".to_string());
    }
    if config.storage.history_key == config.storage.user_id_key {
        fail(format!(
            "storage.history_key and storage.user_id_key must differ, both are `{}`",
            config.storage.history_key
        ));
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

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&NilaConfig::default()).is_ok());
    }

    #[test]
    fn non_http_endpoint_fails_validation() {
        let mut config = NilaConfig::default();
        config.responder.endpoint = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("responder.endpoint")));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = NilaConfig::default();
        config.responder.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("timeout_secs")));
    }

    #[test]
    fn empty_canned_replies_fail_validation() {
        let mut config = NilaConfig::default();
        config.fallback.canned_replies.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("canned_replies")));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = NilaConfig::default();
        config.responder.timeout_secs = 0;
        config.fallback.error_reply = "  ".to_string();
        config.guard.extra_keywords = vec!["".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn blank_sentinel_fails_validation() {
        let mut config = NilaConfig::default();
        config.fallback.degraded_sentinels = vec!["Error".to_string(), " ".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("degraded_sentinels[1]"));
    }

    #[test]
    fn clashing_storage_keys_fail_validation() {
        let mut config = NilaConfig::default();
        config.storage.user_id_key = config.storage.history_key.clone();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("must differ")));
    }
}
