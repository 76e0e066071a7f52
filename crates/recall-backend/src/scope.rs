// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope identity: hashed user and project ids, and their backend-visible tag.
//!
//! The user id hashes the most durable identity signal available: the
//! configured git email, else the login name from the environment, else a
//! fixed anonymous token. The project id hashes the working directory path.
//! Raw emails and paths never leave this module.

use std::path::Path;
use std::process::Command;

use recall_core::ScopeContext;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Identity used when no signal is available.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Joins prefix, user id and project id into one scope tag.
pub const SCOPE_DELIMITER: char = '_';

/// Hex characters kept from the SHA-256 digest.
const HASH_LEN: usize = 16;

/// Stable, truncated SHA-256 of `input` in lowercase hex.
pub fn identity_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_LEN);
    hex
}

/// Raw identity signals, gathered once per call from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySignals {
    pub git_email: Option<String>,
    pub user_name: Option<String>,
}

impl IdentitySignals {
    /// Read `git config user.email` (run in `dir`) and `USER`/`USERNAME`.
    pub fn detect(dir: &Path) -> Self {
        let git_email = Command::new("git")
            .args(["config", "--get", "user.email"])
            .current_dir(dir)
            .output()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| String::from_utf8(out.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let user_name = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        debug!(
            has_git_email = git_email.is_some(),
            has_user_name = user_name.is_some(),
            "identity signals detected"
        );

        Self {
            git_email,
            user_name,
        }
    }

    /// The strongest available signal.
    pub fn identity(&self) -> &str {
        self.git_email
            .as_deref()
            .or(self.user_name.as_deref())
            .unwrap_or(ANONYMOUS_USER)
    }
}

/// Derive a scope from signals and an optional project directory.
///
/// Pure: identical inputs always give identical ids.
pub fn derive_scope(signals: &IdentitySignals, project_dir: Option<&Path>) -> ScopeContext {
    ScopeContext {
        user_id: identity_hash(signals.identity()),
        project_id: project_dir.map(|dir| identity_hash(&dir.to_string_lossy())),
    }
}

/// Detect signals and derive the project scope for `dir`.
pub fn detect_scope(dir: &Path) -> ScopeContext {
    let signals = IdentitySignals::detect(dir);
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    derive_scope(&signals, Some(&dir))
}

/// The opaque identifier the backend sees for `scope`.
///
/// `<prefix>_<user>` for user scope, `<prefix>_<user>_<project>` for project
/// scope. Ids are fixed-length hex, so distinct scopes never share a tag.
pub fn scope_tag(prefix: &str, scope: &ScopeContext) -> String {
    match &scope.project_id {
        Some(project) => format!(
            "{prefix}{SCOPE_DELIMITER}{}{SCOPE_DELIMITER}{project}",
            scope.user_id
        ),
        None => format!("{prefix}{SCOPE_DELIMITER}{}", scope.user_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn signals(email: Option<&str>, user: Option<&str>) -> IdentitySignals {
        IdentitySignals {
            git_email: email.map(String::from),
            user_name: user.map(String::from),
        }
    }

    #[test]
    fn hash_is_sixteen_hex_chars() {
        let h = identity_hash("dev@example.com");
        assert_eq!(h.len(), 16);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(identity_hash("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn identity_falls_back_in_order() {
        assert_eq!(
            signals(Some("a@b.c"), Some("alice")).identity(),
            "a@b.c"
        );
        assert_eq!(signals(None, Some("alice")).identity(), "alice");
        assert_eq!(signals(None, None).identity(), ANONYMOUS_USER);
    }

    #[test]
    fn no_project_dir_means_user_scope() {
        let scope = derive_scope(&signals(Some("a@b.c"), None), None);
        assert!(scope.project_id.is_none());
        assert_eq!(scope.user_id, identity_hash("a@b.c"));
    }

    #[test]
    fn tags_compose_prefix_user_project() {
        let scope = ScopeContext::project("u1", "p1");
        assert_eq!(scope_tag("recall", &scope), "recall_u1_p1");
        assert_eq!(scope_tag("recall", &scope.to_user_scope()), "recall_u1");
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(
            email in "[a-z]{1,10}@[a-z]{1,8}\\.com",
            dir in "/[a-z]{1,12}(/[a-z]{1,12}){0,3}",
        ) {
            let s = signals(Some(&email), None);
            let path = PathBuf::from(&dir);
            let first = derive_scope(&s, Some(&path));
            let second = derive_scope(&s.clone(), Some(&PathBuf::from(&dir)));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn distinct_projects_never_share_a_tag(
            email in "[a-z]{1,10}@[a-z]{1,8}\\.com",
            a in "/[a-z]{1,12}/[a-z]{1,12}",
            b in "/[a-z]{1,12}/[a-z]{1,12}",
        ) {
            prop_assume!(a != b);
            let s = signals(Some(&email), None);
            let pa = derive_scope(&s, Some(Path::new(&a)));
            let pb = derive_scope(&s, Some(Path::new(&b)));
            prop_assert_ne!(scope_tag("recall", &pa), scope_tag("recall", &pb));
            prop_assert_ne!(scope_tag("recall", &pa), scope_tag("recall", &pa.to_user_scope()));
        }

        #[test]
        fn distinct_users_never_share_a_tag(
            a in "[a-z]{1,10}@[a-z]{1,8}\\.com",
            b in "[a-z]{1,10}@[a-z]{1,8}\\.com",
        ) {
            prop_assume!(a != b);
            let ua = derive_scope(&signals(Some(&a), None), None);
            let ub = derive_scope(&signals(Some(&b), None), None);
            prop_assert_ne!(scope_tag("recall", &ua), scope_tag("recall", &ub));
        }
    }
}
