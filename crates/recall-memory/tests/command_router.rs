// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command routing against a scripted backend.

use std::sync::Arc;

use recall_config::model::MemoryConfig;
use recall_core::{BackendKind, MemoryItem, ScopeContext, ScopeKind};
use recall_memory::CommandRouter;
use recall_security::PrivacyGate;
use recall_test_utils::MockBackend;
use serde_json::{json, Value};

fn scope() -> ScopeContext {
    ScopeContext::project("u1", "p1")
}

fn item(id: &str, score: f64) -> MemoryItem {
    MemoryItem {
        id: id.into(),
        content: format!("memory {id}"),
        score: Some(score),
        ..Default::default()
    }
}

fn router(backend: Arc<MockBackend>) -> CommandRouter {
    CommandRouter::new(backend, PrivacyGate::default(), &MemoryConfig::default())
}

async fn run(router: &CommandRouter, mode: &str, args: Value) -> Value {
    let out = router.execute_json(mode, args, &scope()).await;
    serde_json::from_str(&out).expect("envelope is valid JSON")
}

#[tokio::test]
async fn unscoped_search_merges_and_ranks_both_scopes() {
    let backend = Arc::new(
        MockBackend::new()
            .with_search(ScopeKind::User, vec![item("user-hit", 0.9)])
            .with_search(ScopeKind::Project, vec![item("project-hit", 0.95)]),
    );
    let out = run(&router(backend.clone()), "search", json!({"query": "build"})).await;

    assert_eq!(out["success"], true);
    assert_eq!(out["results"][0]["id"], "project-hit");
    assert_eq!(out["results"][1]["id"], "user-hit");
    assert_eq!(out["total"], 2);

    let searches = backend.searches().await;
    assert_eq!(searches.len(), 2);
    assert!(searches.iter().all(|s| s.limit == Some(10)));
}

#[tokio::test]
async fn unscoped_search_without_project_queries_user_scope_once() {
    let backend = Arc::new(MockBackend::new().with_search(ScopeKind::User, vec![item("u", 0.9)]));
    let out = router(backend.clone())
        .execute_json("search", json!({"query": "q"}), &ScopeContext::user("u1"))
        .await;
    let out: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(out["total"], 1);
    assert_eq!(out["results"].as_array().unwrap().len(), 1);
    let searches = backend.searches().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].scope, ScopeContext::user("u1"));
}

#[tokio::test]
async fn unscoped_search_fails_if_either_scope_fails() {
    let backend = Arc::new(
        MockBackend::new()
            .with_search(ScopeKind::User, vec![item("user-hit", 0.9)])
            .failing_search(ScopeKind::Project),
    );
    let out = run(&router(backend), "search", json!({"query": "build"})).await;
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn scoped_search_queries_one_scope_and_truncates() {
    let backend = Arc::new(MockBackend::new().with_search(
        ScopeKind::User,
        vec![item("a", 0.9), item("b", 0.8), item("c", 0.7)],
    ));
    let out = run(
        &router(backend.clone()),
        "search",
        json!({"query": "x", "scope": "user", "limit": 2}),
    )
    .await;
    assert_eq!(out["results"].as_array().unwrap().len(), 2);
    assert_eq!(backend.searches().await.len(), 1);
}

#[tokio::test]
async fn missing_arguments_fail_before_any_backend_call() {
    let backend = Arc::new(MockBackend::new());
    let router = router(backend.clone());

    for (mode, args) in [
        ("add", json!({})),
        ("add", json!({"content": "   "})),
        ("search", json!({})),
        ("forget", json!({})),
        ("reinforce", json!({"boost": 0.5})),
        ("list", json!({"limit": 0})),
    ] {
        let out = run(&router, mode, args).await;
        assert_eq!(out["success"], false, "{mode} should fail");
        assert!(out["error"].is_string());
    }
    assert_eq!(backend.call_count().await, 0);
}

#[tokio::test]
async fn unknown_mode_is_a_uniform_failure() {
    let out = run(&router(Arc::new(MockBackend::new())), "explode", Value::Null).await;
    assert_eq!(out, json!({"success": false, "error": "Unknown mode: explode"}));
}

#[tokio::test]
async fn add_defaults_to_project_scope_and_strips_private_spans() {
    let backend = Arc::new(MockBackend::new());
    let out = run(
        &router(backend.clone()),
        "add",
        json!({
            "content": "deploy key lives in vault <private>hunter2</private>",
            "type": "fact",
            "tags": ["ops"]
        }),
    )
    .await;
    assert_eq!(out["success"], true);
    assert_eq!(out["scope"], "project");
    assert_eq!(out["id"], "mem-1");

    let adds = backend.adds().await;
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].content, "deploy key lives in vault [REDACTED]");
    assert_eq!(adds[0].scope, scope());
    assert_eq!(adds[0].memory_type.as_deref(), Some("fact"));
    assert_eq!(adds[0].tags, vec!["ops"]);
}

#[tokio::test]
async fn fully_private_add_is_rejected_without_a_write() {
    let backend = Arc::new(MockBackend::new());
    let out = run(
        &router(backend.clone()),
        "add",
        json!({"content": "<private>all of it</private>"}),
    )
    .await;
    assert_eq!(out["success"], false);
    assert!(backend.adds().await.is_empty());
}

#[tokio::test]
async fn add_in_user_scope_drops_project_id() {
    let backend = Arc::new(MockBackend::new());
    run(
        &router(backend.clone()),
        "add",
        json!({"content": "prefers dark mode", "scope": "user"}),
    )
    .await;
    assert_eq!(backend.adds().await[0].scope, ScopeContext::user("u1"));
}

#[tokio::test]
async fn reinforce_defaults_boost() {
    let backend = Arc::new(MockBackend::new());
    let out = run(&router(backend.clone()), "reinforce", json!({"memoryId": "m7"})).await;
    assert_eq!(out["success"], true);
    assert_eq!(backend.reinforced().await, vec![("m7".to_string(), 0.1)]);
}

#[tokio::test]
async fn forget_and_list() {
    let backend = Arc::new(
        MockBackend::new()
            .with_kind(BackendKind::Rest)
            .with_list(ScopeKind::Project, vec![item("p1", 0.5)]),
    );
    let router = router(backend.clone());

    let out = run(&router, "forget", json!({"memory_id": "p1"})).await;
    assert_eq!(out["success"], true);
    assert_eq!(backend.deleted().await, vec!["p1"]);

    let out = run(&router, "list", Value::Null).await;
    assert_eq!(out["memories"][0]["id"], "p1");
    assert_eq!(out["scope"], "project");
    assert_eq!(backend.lists().await[0].1, Some(20));
}

#[tokio::test]
async fn profile_and_help() {
    let backend = Arc::new(MockBackend::new());
    let router = router(backend);

    let out = run(&router, "profile", Value::Null).await;
    assert_eq!(out["success"], true);
    assert_eq!(out["profile"], json!({"static": [], "dynamic": []}));

    let out = run(&router, "help", Value::Null).await;
    assert_eq!(out["success"], true);
    assert_eq!(out["commands"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn malformed_arguments_are_reported() {
    let out = run(
        &router(Arc::new(MockBackend::new())),
        "search",
        json!({"query": "x", "limit": "many"}),
    )
    .await;
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().starts_with("invalid arguments"));
}
