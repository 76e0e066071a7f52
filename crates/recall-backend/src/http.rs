// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-over-HTTP transport shared by [`crate::RestAdapter`] and
//! [`crate::TemporalFactClient`].
//!
//! Handles bearer authentication, URL construction, status mapping and the
//! per-call time bound. Response bodies are returned as raw JSON; mapping
//! into domain types is the caller's job.

use std::time::Duration;

use recall_config::model::BackendConfig;
use recall_core::RecallError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::deadline::{bounded, REQUEST_TIMEOUT};

/// HTTP client bound to one memory backend base URL.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl RestTransport {
    /// Creates a transport for `api_url`, sending `Authorization: Bearer`
    /// when `api_key` is present.
    pub fn new(api_url: &str, api_key: Option<&str>) -> Result<Self, RecallError> {
        let base_url = Url::parse(api_url)
            .map_err(|e| RecallError::Config(format!("invalid backend url {api_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RecallError::Config(format!(
                "backend url {api_url:?} cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                RecallError::Config(format!("invalid API key header value: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RecallError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout: REQUEST_TIMEOUT,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, RecallError> {
        Self::new(&config.api_url, config.api_key.as_deref())
    }

    /// Overrides the per-call bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, RecallError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RecallError::Config("backend url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value, RecallError> {
        let url = self.url(segments, query)?;
        self.execute(Method::GET, url, None, false)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Like [`get`](Self::get), but a 404 yields `Ok(None)`.
    pub async fn get_optional(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Option<Value>, RecallError> {
        let url = self.url(segments, query)?;
        self.execute(Method::GET, url, None, true).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, RecallError> {
        let url = self.url(segments, &[])?;
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, url, Some(body), false)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, RecallError> {
        let url = self.url(segments, &[])?;
        let body = serde_json::to_value(body)?;
        self.execute(Method::PATCH, url, Some(body), false)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn delete(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, RecallError> {
        let url = self.url(segments, query)?;
        self.execute(Method::DELETE, url, None, false)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        allow_missing: bool,
    ) -> Result<Option<Value>, RecallError> {
        let path = url.path().to_string();
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        bounded(self.timeout, async move {
            let response = request.send().await.map_err(|e| RecallError::Transport {
                message: format!("HTTP request failed: {e}"),
                status: None,
            })?;

            let status = response.status();
            debug!(method = %method, path = %path, status = %status, "backend response received");

            if allow_missing && status == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            let text = response.text().await.map_err(|e| RecallError::Transport {
                message: format!("failed to read response body: {e}"),
                status: Some(status.as_u16()),
            })?;

            if !status.is_success() {
                return Err(RecallError::http_status(status.as_u16(), &text));
            }
            if text.trim().is_empty() {
                return Ok(Some(Value::Null));
            }
            serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| RecallError::Decode(format!("{method} {path}: {e}")))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_appended_and_encoded() {
        let transport = RestTransport::new("http://localhost:8080/api/", None).unwrap();
        let url = transport
            .url(&["memory", "a b/c"], &[("user_id", "recall_u".into())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/memory/a%20b%2Fc?user_id=recall_u"
        );
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let transport = RestTransport::new("http://localhost:8080", None).unwrap();
        let url = transport.url(&["api", "temporal", "stats"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/temporal/stats");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = RestTransport::new("not a url", None).unwrap_err();
        assert!(matches!(err, RecallError::Config(_)));
    }
}
