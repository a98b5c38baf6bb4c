//! End-to-end tests for explicit transactions against RecordingClient.

use age_rs::cypher::query_builder;
use age_rs::{Error, Graph, PropertyMap, RecordingClient, TxMode, TxState};

const ADA: &str = r#"{"id": 1, "label": "Person", "properties": {"name": "Ada"}}::vertex"#;

#[tokio::test]
async fn test_commit_sequence() {
    let client = RecordingClient::new();
    let graph = Graph::new(client.clone(), "g").unwrap();
    client.push_single_column([ADA]);

    let mut tx = graph.begin(TxMode::ReadWrite).await.unwrap();
    assert_eq!(tx.state(), TxState::Active);
    tx.create_vertex("Person", &PropertyMap::new().with("name", "Ada")).await.unwrap();
    tx.commit().await.unwrap();

    let stmts = client.statements();
    assert_eq!(stmts.len(), 3);
    assert_eq!(stmts[0], "BEGIN;");
    assert!(stmts[1].starts_with("SELECT * FROM ag_catalog.cypher('g', $$ CREATE (v:Person"));
    assert_eq!(stmts[2], "COMMIT;");
}

#[tokio::test]
async fn test_read_only_rollback() {
    let client = RecordingClient::new();
    let graph = Graph::new(client.clone(), "g").unwrap();

    let mut tx = graph.begin(TxMode::ReadOnly).await.unwrap();
    assert_eq!(tx.mode(), TxMode::ReadOnly);
    let result = tx.run(&query_builder().match_("(n)").return_("n")).await.unwrap();
    assert!(result.is_empty());
    tx.rollback().await.unwrap();

    assert_eq!(
        client.statements(),
        vec![
            "BEGIN TRANSACTION READ ONLY;",
            "SELECT * FROM ag_catalog.cypher('g', $$ MATCH (n) RETURN n $$) as (result ag_catalog.agtype);",
            "ROLLBACK;",
        ]
    );
}

#[tokio::test]
async fn test_begin_failure() {
    let client = RecordingClient::new();
    client.fail_on("BEGIN");
    let graph = Graph::new(client.clone(), "g").unwrap();
    assert!(matches!(graph.begin(TxMode::ReadWrite).await, Err(Error::Client(_))));
}

#[tokio::test]
async fn test_dropped_tx_sends_nothing() {
    let client = RecordingClient::new();
    let graph = Graph::new(client.clone(), "g").unwrap();
    {
        let _tx = graph.begin(TxMode::ReadWrite).await.unwrap();
    }
    assert_eq!(client.statements(), vec!["BEGIN;"]);
}
