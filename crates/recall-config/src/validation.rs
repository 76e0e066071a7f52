// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL syntax, score ranges and known sector names.

use recall_core::Sector;

use crate::diagnostic::ConfigError;
use crate::model::RecallConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RecallConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let api_url = config.backend.api_url.trim();
    match url::Url::parse(api_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ConfigError::Validation {
            message: format!(
                "backend.api_url must use http or https, got scheme `{}`",
                url.scheme()
            ),
        }),
        Err(e) => errors.push(ConfigError::Validation {
            message: format!("backend.api_url `{api_url}` is not a valid URL: {e}"),
        }),
    }

    if let Some(key) = &config.backend.api_key
        && key.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "backend.api_key must not be empty when set".to_string(),
        });
    }

    let memory = &config.memory;
    for (name, value) in [
        ("memory.max_memories", memory.max_memories),
        ("memory.max_project_memories", memory.max_project_memories),
        ("memory.max_profile_items", memory.max_profile_items),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be at least 1"),
            });
        }
    }

    for (name, value) in [
        ("memory.min_salience", memory.min_salience),
        ("memory.similarity_threshold", memory.similarity_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be between 0.0 and 1.0, got {value}"),
            });
        }
    }

    let prefix = memory.container_tag_prefix.trim();
    if prefix.is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.container_tag_prefix must not be empty".to_string(),
        });
    } else if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.container_tag_prefix `{prefix}` may only contain ASCII letters, digits, `-` and `.`"
            ),
        });
    }

    if memory.default_sector.parse::<Sector>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.default_sector `{}` is not one of episodic, semantic, procedural, emotional, reflective",
                memory.default_sector
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
