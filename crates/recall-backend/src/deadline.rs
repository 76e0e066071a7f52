// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call time bound shared by both transports.

use std::future::Future;
use std::time::Duration;

use recall_core::RecallError;

/// Upper bound on every backend call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Race `fut` against `limit`; the timer winning yields [`RecallError::Timeout`].
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, RecallError>
where
    F: Future<Output = Result<T, RecallError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(RecallError::Timeout { duration: limit }),
    }
}
