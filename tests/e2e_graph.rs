//! End-to-end tests for the Graph handle.
//!
//! Each test exercises: Graph -> build_host_query -> RecordingClient -> agtype decode.

use age_rs::cypher::query_builder;
use age_rs::{
    AgValue, AgeConfig, Edge, Error, Graph, GraphId, Path, PropertyMap, RecordingClient, Value,
    Vertex,
};

const ADA: &str = r#"{"id": 844424930131969, "label": "Person", "properties": {"name": "Ada"}}::vertex"#;
const BOB: &str = r#"{"id": 844424930131970, "label": "Person", "properties": {"name": "Bob"}}::vertex"#;
const KNOWS: &str = r#"{"id": 1125899906842625, "label": "KNOWS", "end_id": 844424930131970, "start_id": 844424930131969, "properties": {"since": 2020}}::edge"#;

fn graph() -> (Graph<RecordingClient>, RecordingClient) {
    let client = RecordingClient::new();
    let graph = Graph::new(client.clone(), "social").unwrap();
    (graph, client)
}

// ============================================================================
// 1. Session setup
// ============================================================================

#[tokio::test]
async fn test_setup_default_config() {
    let (graph, client) = graph();
    graph.setup().await.unwrap();
    assert_eq!(
        client.statements(),
        vec!["LOAD 'age';", r#"SET search_path = ag_catalog, "$user", public;"#]
    );
}

#[tokio::test]
async fn test_setup_from_config_creates_graph() {
    let client = RecordingClient::new();
    let config = AgeConfig::from_json(
        r#"{"graph_name": "social", "load_extension": false, "create_graph": true}"#,
    )
    .unwrap();
    let graph = Graph::from_config(client.clone(), config).unwrap();
    graph.setup().await.unwrap();
    assert_eq!(
        client.statements(),
        vec![
            r#"SET search_path = ag_catalog, "$user", public;"#,
            "SELECT * FROM ag_catalog.create_graph('social');",
        ]
    );
}

#[tokio::test]
async fn test_drop_graph() {
    let (graph, client) = graph();
    graph.drop_graph(true).await.unwrap();
    assert_eq!(
        client.last_statement().unwrap(),
        "SELECT * FROM ag_catalog.drop_graph('social', true);"
    );
}

#[test]
fn test_invalid_config_name() {
    let err = Graph::from_config(RecordingClient::new(), AgeConfig::new("bad name"));
    assert!(matches!(err, Err(Error::InvalidName(_))));
}

// ============================================================================
// 2. Queries
// ============================================================================

#[tokio::test]
async fn test_run_builder_sends_wrapped_sql() {
    let (graph, client) = graph();
    client.push_single_column([ADA, BOB]);

    let q = query_builder().match_("(n:Person)").where_("n.name <> 'Eve'").return_("n");
    let result = graph.run(&q).await.unwrap();

    assert_eq!(
        client.last_statement().unwrap(),
        "SELECT * FROM ag_catalog.cypher('social', $$ MATCH (n:Person) WHERE n.name <> ''Eve'' RETURN n $$) as (result ag_catalog.agtype);"
    );
    let people: Vec<Vertex> = result.column("result").unwrap();
    let names: Vec<_> = people.iter().map(|v| v.get("name").cloned()).collect();
    assert_eq!(names, vec![Some(Value::from("Ada")), Some(Value::from("Bob"))]);
}

#[tokio::test]
async fn test_query_columns() {
    let (graph, client) = graph();
    client.push_response(vec![vec![ADA.to_string(), KNOWS.to_string(), BOB.to_string()]]);

    let result = graph
        .query_columns("MATCH (a)-[r]->(b) RETURN a, r, b", &["a", "r", "b"])
        .await
        .unwrap();
    assert_eq!(result.columns, vec!["a", "r", "b"]);
    let row = &result.rows[0];
    let r: Edge = row.get("r").unwrap();
    let b: Vertex = row.get("b").unwrap();
    assert_eq!(r.end_id, b.id.unwrap());
    assert_eq!(r.get("since"), Some(&Value::Int(2020)));
}

#[tokio::test]
async fn test_path_result() {
    let (graph, client) = graph();
    client.push_single_column([format!("[{ADA}, {KNOWS}, {BOB}]::path")]);
    let result = graph.query("MATCH p = (:Person)-[:KNOWS]->(:Person) RETURN p").await.unwrap();
    let p: Path = result.single("result").unwrap();
    assert_eq!(p.len(), 1);
    assert_eq!(p.start().unwrap().get("name"), Some(&Value::from("Ada")));
}

#[tokio::test]
async fn test_scalar_results() {
    let (graph, client) = graph();
    client.push_single_column(["3", "2.5::numeric", "null"]);
    let result = graph.query("UNWIND [3, 2.5, null] AS x RETURN x").await.unwrap();
    assert_eq!(result.rows[0].get::<i64>("result").unwrap(), 3);
    assert_eq!(result.rows[1].get::<f64>("result").unwrap(), 2.5);
    assert_eq!(result.rows[2].get::<Option<i64>>("result").unwrap(), None);
    assert!(matches!(result.rows[2].get::<AgValue>("result").unwrap(), AgValue::Null));
}

#[tokio::test]
async fn test_malformed_result_is_an_error() {
    let (graph, client) = graph();
    client.push_single_column(["{broken"]);
    let err = graph.query("MATCH (n) RETURN n").await;
    assert!(matches!(err, Err(Error::AgtypeSyntax { .. })));
}

#[tokio::test]
async fn test_client_error_propagates() {
    let (graph, client) = graph();
    client.fail_on("ag_catalog.cypher");
    assert!(matches!(graph.query("RETURN 1").await, Err(Error::Client(_))));
}

// ============================================================================
// 3. Vertex / edge helpers
// ============================================================================

#[tokio::test]
async fn test_create_vertex() {
    let (graph, client) = graph();
    client.push_single_column([ADA]);

    let v = graph
        .create_vertex("Person", &PropertyMap::new().with("name", "Ada"))
        .await
        .unwrap();
    assert_eq!(v.id, Some(GraphId(844424930131969)));
    assert!(v.has_label("Person"));
    assert!(client
        .last_statement()
        .unwrap()
        .contains(r#"$$ CREATE (v:Person {name: "Ada"}) RETURN v $$"#));
}

#[tokio::test]
async fn test_create_vertex_rejects_bad_label() {
    let (graph, client) = graph();
    let err = graph.create_vertex("Person) DETACH DELETE (x", &PropertyMap::new()).await;
    assert!(matches!(err, Err(Error::InvalidName(_))));
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn test_create_vertex_without_row() {
    let (graph, _client) = graph();
    let err = graph.create_vertex("Person", &PropertyMap::new()).await;
    assert!(matches!(err, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_create_edge() {
    let (graph, client) = graph();
    client.push_single_column([KNOWS]);

    let e = graph
        .create_edge(
            "KNOWS",
            GraphId(844424930131969),
            GraphId(844424930131970),
            &PropertyMap::new().with("since", 2020),
        )
        .await
        .unwrap();
    assert_eq!(e.start_id, GraphId(844424930131969));
    assert!(client.last_statement().unwrap().contains(
        "$$ MATCH (a), (b) WHERE id(a) = 844424930131969 AND id(b) = 844424930131970 \
         CREATE (a)-[e:KNOWS{since: 2020}]->(b) RETURN e $$"
    ));
}

#[tokio::test]
async fn test_find_vertices() {
    let (graph, client) = graph();
    client.push_single_column([BOB]);
    let found = graph
        .find_vertices("Person", Some(&PropertyMap::new().with("name", "Bob")))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert!(client
        .last_statement()
        .unwrap()
        .contains(r#"$$ MATCH (v:Person {name: "Bob"}) RETURN v $$"#));
}
