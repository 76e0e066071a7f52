// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `recall fact ...`: bitemporal fact operations over the REST transport.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use recall_backend::TemporalFactClient;
use recall_core::{CommandResult, FactQuery, NewFact, RecallError};
use serde_json::{json, Value};

/// Timestamps are RFC 3339, e.g. `2026-03-01T00:00:00Z`.
#[derive(Subcommand, Debug)]
pub enum FactCommand {
    /// Record a new fact version.
    Create {
        subject: String,
        predicate: String,
        object: String,
        #[arg(long)]
        valid_from: Option<DateTime<Utc>>,
        #[arg(long)]
        confidence: Option<f64>,
        /// JSON object stored alongside the fact.
        #[arg(long, value_parser = parse_metadata)]
        metadata: Option<Value>,
    },
    /// Facts matching the filters, optionally as of an instant.
    Query {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        predicate: Option<String>,
        #[arg(long)]
        object: Option<String>,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long)]
        min_confidence: Option<f64>,
    },
    /// The open-ended version of a relation.
    Current { subject: String, predicate: String },
    /// Every version of a subject's relations, oldest first.
    Timeline {
        subject: String,
        #[arg(long)]
        predicate: Option<String>,
    },
    /// Close a fact's validity interval (default: now).
    Invalidate {
        id: String,
        #[arg(long)]
        valid_to: Option<DateTime<Utc>>,
    },
    /// Fact store counts.
    Stats,
    /// Diff what was true about a subject at two instants.
    Compare {
        subject: String,
        t1: DateTime<Utc>,
        t2: DateTime<Utc>,
    },
}

/// `--metadata` must be a JSON object.
fn parse_metadata(raw: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("metadata must be a JSON object".to_string()),
        Err(e) => Err(format!("metadata is not valid JSON: {e}")),
    }
}

pub async fn run(client: &TemporalFactClient, command: FactCommand) -> CommandResult {
    execute(client, command).await.into()
}

async fn execute(client: &TemporalFactClient, command: FactCommand) -> Result<Value, RecallError> {
    match command {
        FactCommand::Create {
            subject,
            predicate,
            object,
            valid_from,
            confidence,
            metadata,
        } => {
            let fact = client
                .create_fact(&NewFact {
                    subject,
                    predicate,
                    object,
                    valid_from,
                    confidence,
                    metadata,
                })
                .await?;
            Ok(json!({ "fact": fact }))
        }
        FactCommand::Query {
            subject,
            predicate,
            object,
            at,
            min_confidence,
        } => {
            let facts = client
                .query_facts(&FactQuery {
                    subject,
                    predicate,
                    object,
                    at,
                    min_confidence,
                })
                .await?;
            Ok(json!({ "total": facts.len(), "facts": facts }))
        }
        FactCommand::Current { subject, predicate } => {
            let fact = client.get_current_fact(&subject, &predicate).await?;
            Ok(json!({ "fact": fact }))
        }
        FactCommand::Timeline { subject, predicate } => {
            let timeline = client.get_timeline(&subject, predicate.as_deref()).await?;
            Ok(json!({ "subject": subject, "timeline": timeline }))
        }
        FactCommand::Invalidate { id, valid_to } => {
            let valid_to = client.invalidate_fact(&id, valid_to).await?;
            Ok(json!({ "id": id, "valid_to": valid_to }))
        }
        FactCommand::Stats => {
            let stats = client.get_stats().await?;
            Ok(json!({ "stats": stats }))
        }
        FactCommand::Compare { subject, t1, t2 } => {
            let diff = client.compare_facts(&subject, t1, t2).await?;
            Ok(json!({ "subject": subject, "diff": diff }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_backend::RestTransport;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TemporalFactClient {
        TemporalFactClient::new(RestTransport::new(&server.uri(), None).unwrap())
    }

    #[tokio::test]
    async fn current_without_a_fact_is_a_null_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temporal/fact/current"))
            .and(query_param("subject", "alice"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let out = run(
            &client(&server),
            FactCommand::Current {
                subject: "alice".into(),
                predicate: "works_at".into(),
            },
        )
        .await
        .to_value();
        assert_eq!(out, json!({"success": true, "fact": null}));
    }

    #[tokio::test]
    async fn stats_are_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temporal/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_facts": 3, "active_facts": 2, "historical_facts": 1
            })))
            .mount(&server)
            .await;

        let out = run(&client(&server), FactCommand::Stats).await.to_value();
        assert_eq!(out["stats"]["active_facts"], 2);
    }

    #[tokio::test]
    async fn backend_failure_becomes_an_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temporal/timeline"))
            .respond_with(ResponseTemplate::new(500).set_body_string("store offline"))
            .mount(&server)
            .await;

        let out = run(
            &client(&server),
            FactCommand::Timeline {
                subject: "alice".into(),
                predicate: None,
            },
        )
        .await
        .to_value();
        assert_eq!(out["success"], false);
        let error = out["error"].as_str().unwrap();
        assert!(error.contains("500") && error.contains("store offline"), "{error}");
    }

    #[test]
    fn timestamps_and_metadata_parse_from_arguments() {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(subcommand)]
            fact: FactCommand,
        }

        let parsed = Harness::try_parse_from([
            "fact",
            "create",
            "alice",
            "works_at",
            "Globex",
            "--valid-from",
            "2026-01-01T00:00:00Z",
            "--metadata",
            r#"{"source":"hr"}"#,
        ])
        .unwrap();
        let FactCommand::Create {
            valid_from,
            metadata,
            ..
        } = parsed.fact
        else {
            panic!("expected create");
        };
        assert_eq!(valid_from.unwrap().to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert_eq!(metadata.unwrap()["source"], "hr");

        assert!(Harness::try_parse_from(["fact", "compare", "alice", "yesterday", "today"]).is_err());

        for bad in [r#""hr""#, "[1,2]", "{not json"] {
            let parsed = Harness::try_parse_from([
                "fact", "create", "alice", "works_at", "Globex", "--metadata", bad,
            ]);
            assert!(parsed.is_err(), "{bad} should be rejected");
        }
    }
}
