// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Privacy gate for memory writes.
//!
//! Callers mark private spans with `<private>...</private>`. Before any write
//! those spans are replaced with `[REDACTED]`; a payload that is private in
//! its entirety is rejected instead of being stored as an empty fragment.
//! An unterminated `<private>` tag hides everything after it.

use std::sync::LazyLock;

use recall_core::RecallError;
use regex::Regex;
use tracing::debug;

use crate::redact::{redact, REDACTED};

static PRIVATE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<private>.*?</private>|<private>.*$").unwrap()
});

/// Replace every private span with the redaction placeholder.
pub fn strip_private(content: &str) -> String {
    PRIVATE_SPAN.replace_all(content, REDACTED).into_owned()
}

/// True when nothing but private spans and whitespace remains.
pub fn is_fully_private(content: &str) -> bool {
    PRIVATE_SPAN.is_match(content) && PRIVATE_SPAN.replace_all(content, "").trim().is_empty()
}

/// Filters content on its way to the memory store.
#[derive(Debug, Clone, Copy)]
pub struct PrivacyGate {
    redact_secrets: bool,
}

impl Default for PrivacyGate {
    fn default() -> Self {
        Self {
            redact_secrets: true,
        }
    }
}

impl PrivacyGate {
    pub fn new(redact_secrets: bool) -> Self {
        Self { redact_secrets }
    }

    /// Returns the content safe to store, or a validation error when the
    /// whole payload is private, secret or empty.
    ///
    /// Secrets are masked first, so the rejection sees what would be stored.
    pub fn filter(&self, content: &str) -> Result<String, RecallError> {
        if content.trim().is_empty() {
            return Err(RecallError::Validation(
                "memory content must not be empty".into(),
            ));
        }

        let masked = if self.redact_secrets {
            redact(content, &[])
        } else {
            content.to_string()
        };
        if is_fully_private(&masked) {
            return Err(RecallError::Validation(
                "cannot store memory: content is entirely marked <private>".into(),
            ));
        }

        let filtered = strip_private(&masked);
        if filtered.replace(REDACTED, "").trim().is_empty() {
            return Err(RecallError::Validation(
                "cannot store memory: nothing remains after redaction".into(),
            ));
        }
        if filtered != content {
            debug!(
                original_len = content.len(),
                filtered_len = filtered.len(),
                "redacted memory content before write"
            );
        }
        Ok(filtered)
    }
}
