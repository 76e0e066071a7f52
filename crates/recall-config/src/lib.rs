// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Recall memory adapter.
//!
//! Layered TOML configuration with strict keys (`deny_unknown_fields`), an
//! XDG file hierarchy, `RECALL_*` environment variable overrides, and
//! diagnostic error rendering with typo suggestions. Configuration is resolved
//! once at process start and treated as read-only afterwards.
//!
//! # Usage
//!
//! ```no_run
//! use recall_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("backend: {}", config.backend.api_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{config_files, load_config, load_config_from_path, load_config_from_str};
pub use model::RecallConfig;

use std::path::Path;

/// Load configuration from the standard locations and validate it.
///
/// Returns either a valid `RecallConfig` or every diagnostic found.
pub fn load_and_validate() -> Result<RecallConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        config_files().iter().filter_map(|p| read_source(p)).collect()
    })
}

/// Parse and validate an inline TOML document (no files, no env).
pub fn load_and_validate_str(toml_content: &str) -> Result<RecallConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load one explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<RecallConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Validate an extracted config, or turn the figment error into diagnostics
/// resolved against the TOML `sources` (read only on failure).
fn checked(
    extracted: Result<RecallConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<RecallConfig, Vec<ConfigError>> {
    match extracted {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// `(display path, contents)` for a readable TOML file.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let shown = if path.is_relative() {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    Some((shown.display().to_string(), content))
}
