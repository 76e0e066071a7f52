// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-call adapter and selector behavior with a scripted dispatcher.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use recall_backend::{BackendSelector, RestAdapter, RestTransport, ToolCallAdapter};
use recall_config::model::{MemoryConfig, RecallConfig};
use recall_core::{
    AddOptions, BackendKind, ListOptions, MemoryBackend, RecallError, ScopeContext,
    SearchOptions, Sector,
};
use recall_test_utils::MockToolCaller;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scope() -> ScopeContext {
    ScopeContext::project("u1", "p1")
}

fn configured(caller: Arc<MockToolCaller>) -> ToolCallAdapter {
    let adapter = ToolCallAdapter::new(&MemoryConfig::default());
    adapter.set_caller(caller);
    adapter
}

#[tokio::test]
async fn unconfigured_adapter_fails_fast_with_config_error() {
    let adapter = ToolCallAdapter::new(&MemoryConfig::default());
    assert!(!adapter.is_configured());

    let err = adapter
        .search_memories("q", &scope(), &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RecallError::Config(_)), "got: {err:?}");

    let err = adapter.get_profile(&scope(), None).await.unwrap_err();
    assert!(matches!(err, RecallError::Config(_)));
}

#[tokio::test]
async fn search_passes_scope_tag_and_normalizes() {
    let caller = Arc::new(MockToolCaller::new());
    caller
        .respond(
            "memory_query",
            json!({
                "content": [{
                    "type": "text",
                    "text": "{\"matches\": [{\"memory_id\": \"x1\", \"content\": \"uses just\", \"score\": 0.8, \"sector\": \"procedural\"}]}"
                }]
            }),
        )
        .await;

    let adapter = configured(caller.clone());
    let response = adapter
        .search_memories("task runner", &scope(), &SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].id, "x1");
    assert_eq!(response.results[0].sector, Sector::Procedural);

    let args = caller.last_args("memory_query").await.unwrap();
    assert_eq!(args["user_id"], "recall_u1_p1");
    assert_eq!(args["query"], "task runner");
}

#[tokio::test]
async fn delete_is_unsupported_and_points_to_reinforce() {
    let caller = Arc::new(MockToolCaller::new());
    let adapter = configured(caller.clone());

    let err = adapter.delete_memory("m1", &scope()).await.unwrap_err();
    match &err {
        RecallError::Unsupported { backend, .. } => assert_eq!(*backend, BackendKind::ToolCall),
        other => panic!("expected unsupported, got {other:?}"),
    }
    assert!(err.to_string().contains("negative boost"));
    assert!(caller.calls().await.is_empty());
}

#[tokio::test]
async fn store_and_reinforce_call_named_tools() {
    let caller = Arc::new(MockToolCaller::new());
    caller
        .respond("memory_store", json!({"id": "new-1", "primary_sector": "episodic"}))
        .await;
    let adapter = configured(caller.clone());

    let options = AddOptions {
        memory_type: Some("decision".into()),
        tags: vec!["arch".into()],
        metadata: None,
    };
    let added = adapter.add_memory("chose axum", &scope(), &options).await.unwrap();
    assert_eq!(added.id.as_deref(), Some("new-1"));
    assert_eq!(added.sector, Some(Sector::Episodic));

    adapter.reinforce_memory("new-1", -0.2).await.unwrap();
    let args = caller.last_args("memory_reinforce").await.unwrap();
    assert_eq!(args, json!({"id": "new-1", "boost": -0.2}));

    let store_args = caller.last_args("memory_store").await.unwrap();
    assert_eq!(store_args["type"], "decision");
    assert_eq!(store_args["tags"], json!(["arch"]));
}

#[tokio::test]
async fn list_maps_items() {
    let caller = Arc::new(MockToolCaller::new());
    caller
        .respond(
            "memory_list",
            json!({"items": [{"id": "a", "content": "x", "salience": 0.5}], "total": 9}),
        )
        .await;
    let response = configured(caller)
        .list_memories(&scope(), &ListOptions::default())
        .await
        .unwrap();
    assert_eq!(response.memories.len(), 1);
    assert_eq!(response.total, Some(9));
}

#[tokio::test]
async fn profile_partitions_by_salience() {
    let caller = Arc::new(MockToolCaller::new());
    let seen = |hours: i64| (Utc::now() - ChronoDuration::hours(hours)).to_rfc3339();
    caller
        .respond(
            "memory_query",
            json!({"matches": [
                {"id": "1", "content": "prefers vim", "salience": 0.9},
                {"id": "2", "content": "older task", "salience": 0.3, "last_seen_at": seen(10)},
                {"id": "3", "content": "current task", "salience": 0.4, "last_seen_at": seen(1)}
            ]}),
        )
        .await;

    let adapter = configured(caller.clone());
    let profile = adapter.get_profile(&scope(), Some("editor")).await.unwrap();
    assert_eq!(profile.static_facts, vec!["prefers vim"]);
    assert_eq!(profile.dynamic_facts, vec!["current task", "older task"]);

    let args = caller.last_args("memory_query").await.unwrap();
    assert_eq!(args["user_id"], "recall_u1");
    assert_eq!(args["k"], 10);
}

#[tokio::test]
async fn dispatcher_failure_propagates() {
    let caller = Arc::new(MockToolCaller::new());
    caller.fail("memory_list", "rpc unavailable").await;
    let err = configured(caller)
        .list_memories(&scope(), &ListOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("rpc unavailable"));
}

#[tokio::test]
async fn slow_dispatcher_times_out() {
    let caller = Arc::new(MockToolCaller::new().with_delay(Duration::from_secs(5)));
    let adapter =
        ToolCallAdapter::new(&MemoryConfig::default()).with_timeout(Duration::from_millis(50));
    adapter.set_caller(caller);

    let err = adapter
        .list_memories(&scope(), &ListOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn selector_falls_back_to_rest_until_caller_is_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/memory/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "rest-1", "content": "from rest"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rest = RestAdapter::new(
        RestTransport::new(&server.uri(), None).unwrap(),
        &MemoryConfig::default(),
    );
    let selector = BackendSelector::new(RecallConfig::default()).with_rest(rest);
    assert_eq!(selector.kind(), BackendKind::Rest);

    let first = selector
        .list_memories(&scope(), &ListOptions::default())
        .await
        .unwrap();
    assert_eq!(first.memories[0].id, "rest-1");

    let caller = Arc::new(MockToolCaller::new());
    caller
        .respond("memory_list", json!({"items": [{"id": "rpc-1", "content": "from rpc"}]}))
        .await;
    selector.set_caller(caller);
    assert_eq!(selector.kind(), BackendKind::ToolCall);

    let second = selector
        .list_memories(&scope(), &ListOptions::default())
        .await
        .unwrap();
    assert_eq!(second.memories[0].id, "rpc-1");
}
