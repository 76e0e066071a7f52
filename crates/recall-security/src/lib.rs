// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Privacy enforcement for the Recall memory adapter.
//!
//! - [`privacy`]: the gate every memory write passes through (`<private>`
//!   span removal and full-block rejection).
//! - [`redact`]: secret pattern redaction for stored content and log output.

pub mod privacy;
pub mod redact;

pub use privacy::{is_fully_private, strip_private, PrivacyGate};
pub use redact::{redact, RedactingWriter};
