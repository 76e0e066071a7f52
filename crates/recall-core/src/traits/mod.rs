// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between Recall and the outside world.
//!
//! [`MemoryBackend`] is the one contract both transports implement;
//! [`ToolCaller`] is the dispatcher the host injects for the RPC transport.

pub mod backend;
pub mod caller;

pub use backend::{MemoryBackend, DEFAULT_REINFORCE_BOOST};
pub use caller::ToolCaller;
