// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Recall memory adapter.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Recall configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecallConfig {
    /// Memory store endpoint settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Retrieval limits and scope routing.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Write-path privacy filtering.
    #[serde(default)]
    pub privacy: PrivacyConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Memory store endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key sent as a bearer token. `None` sends no auth header.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

/// Retrieval limits and scope routing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// User-scope search results injected on the first turn.
    #[serde(default = "default_max_memories")]
    pub max_memories: usize,

    /// Project-scope memories listed on the first turn.
    #[serde(default = "default_max_project_memories")]
    pub max_project_memories: usize,

    /// Cap applied to each profile bucket (static and dynamic).
    #[serde(default = "default_max_profile_items")]
    pub max_profile_items: usize,

    /// Default salience floor for searches (0.0-1.0).
    #[serde(default = "default_min_salience")]
    pub min_salience: f64,

    /// Search results scoring below this are dropped (0.0-1.0).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Prefix of every backend-visible scope identifier.
    #[serde(default = "default_container_tag_prefix")]
    pub container_tag_prefix: String,

    /// Sector assumed for new memories when the caller gives none.
    #[serde(default = "default_sector")]
    pub default_sector: String,

    /// Include the "User Profile" and "Recent Context" sections on injection.
    #[serde(default = "default_inject_profile")]
    pub inject_profile: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_memories: default_max_memories(),
            max_project_memories: default_max_project_memories(),
            max_profile_items: default_max_profile_items(),
            min_salience: default_min_salience(),
            similarity_threshold: default_similarity_threshold(),
            container_tag_prefix: default_container_tag_prefix(),
            default_sector: default_sector(),
            inject_profile: default_inject_profile(),
        }
    }
}

fn default_max_memories() -> usize {
    5
}

fn default_max_project_memories() -> usize {
    10
}

fn default_max_profile_items() -> usize {
    5
}

fn default_min_salience() -> f64 {
    0.3
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_container_tag_prefix() -> String {
    "recall".to_string()
}

fn default_sector() -> String {
    "semantic".to_string()
}

fn default_inject_profile() -> bool {
    true
}

/// Write-path privacy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyConfig {
    /// Mask API keys and bearer tokens in memory content before storing.
    #[serde(default = "default_redact_secrets")]
    pub redact_secrets: bool,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            redact_secrets: default_redact_secrets(),
        }
    }
}

fn default_redact_secrets() -> bool {
    true
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
