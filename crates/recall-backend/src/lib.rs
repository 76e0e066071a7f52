// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory store adapters for Recall.
//!
//! Two transports implement [`recall_core::MemoryBackend`]:
//!
//! - **ToolCallAdapter**: named remote procedures through a host-injected
//!   [`recall_core::ToolCaller`]. Cannot delete.
//! - **RestAdapter**: JSON over HTTP with optional bearer auth.
//!
//! [`BackendSelector`] prefers the tool-call transport and falls back to REST
//! whenever no dispatcher is installed, re-checking on every call.
//! [`TemporalFactClient`] adds bitemporal fact operations over the same REST
//! transport. Every network-bound call is bounded by [`REQUEST_TIMEOUT`].

pub mod deadline;
pub mod http;
pub mod normalize;
pub mod profile;
pub mod rest;
pub mod scope;
pub mod selector;
pub mod temporal;
pub mod tool_call;

pub use deadline::REQUEST_TIMEOUT;
pub use http::RestTransport;
pub use rest::RestAdapter;
pub use scope::{derive_scope, detect_scope, identity_hash, scope_tag, IdentitySignals};
pub use selector::BackendSelector;
pub use temporal::{diff_snapshots, TemporalFactClient};
pub use tool_call::ToolCallAdapter;
