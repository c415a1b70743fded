//! Wiremock integration tests for SnowflakeClient.
//!
//! These tests verify the SQL API exchange (submit, poll, partitions) and
//! error mapping using mocked responses.

use std::time::Duration;

use sanskriti::store::{StageRef, Statement, TableRef};
use sanskriti::{DataSource, SanskritiError, SnowflakeClient};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SnowflakeClient {
    SnowflakeClient::new(server.uri(), "test_token")
        .unwrap()
        .warehouse("COMPUTE_WH")
        .polling(Duration::from_millis(10), 3)
}

fn festivals() -> Statement {
    Statement::select(TableRef::new(
        "CULTURE_TOURISM_DB",
        "CULTURAL_DATA",
        "FESTIVALS",
    ))
}

fn result_body(columns: &[&str], data: serde_json::Value) -> serde_json::Value {
    let row_type: Vec<_> = columns
        .iter()
        .map(|c| serde_json::json!({ "name": c, "type": "text" }))
        .collect();
    serde_json::json!({
        "resultSetMetaData": {
            "numRows": data.as_array().map_or(0, Vec::len),
            "rowType": row_type,
            "partitionInfo": [{ "rowCount": 1 }]
        },
        "data": data,
        "code": "090001",
        "statementHandle": "01b2-0000",
        "message": "Statement executed successfully."
    })
}

/// Test a synchronous select.
#[tokio::test]
async fn test_select_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .and(header("Authorization", "Bearer test_token"))
        .and(header(
            "X-Snowflake-Authorization-Token-Type",
            "PROGRAMMATIC_ACCESS_TOKEN",
        ))
        .and(body_partial_json(serde_json::json!({
            "statement": "SELECT * FROM CULTURE_TOURISM_DB.CULTURAL_DATA.FESTIVALS",
            "warehouse": "COMPUTE_WH"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            &["FESTIVAL_NAME", "STATE"],
            serde_json::json!([["Onam", "Kerala"], ["Hornbill Festival", null]]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let table = client(&mock_server)
        .query(&festivals())
        .await
        .expect("query should succeed");

    assert_eq!(table.columns(), ["FESTIVAL_NAME", "STATE"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(0, "STATE"), Some("Kerala"));
    assert_eq!(table.value(1, "STATE"), None);
}

/// Test that a 202 is polled by handle until the result is ready.
#[tokio::test]
async fn test_running_statement_is_polled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "code": "333334",
            "message": "Asynchronous execution in progress.",
            "statementHandle": "01b2-async"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/statements/01b2-async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            &["STATE"],
            serde_json::json!([["Assam"]]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let table = client(&mock_server).query(&festivals()).await.unwrap();
    assert_eq!(table.value(0, "STATE"), Some("Assam"));
}

/// Test that polling gives up after the configured attempts.
#[tokio::test]
async fn test_polling_exhaustion() {
    let mock_server = MockServer::start().await;
    let running = serde_json::json!({ "statementHandle": "01b2-slow" });

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(202).set_body_json(running.clone()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/statements/01b2-slow"))
        .respond_with(ResponseTemplate::new(202).set_body_json(running))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).query(&festivals()).await.unwrap_err();
    match err {
        SanskritiError::StatementTimeout { handle, attempts } => {
            assert_eq!(handle, "01b2-slow");
            assert_eq!(attempts, 3);
        }
        other => panic!("expected StatementTimeout, got {other:?}"),
    }
}

/// Test that extra partitions are fetched and appended in order.
#[tokio::test]
async fn test_partitions_are_stitched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resultSetMetaData": {
                "rowType": [{ "name": "MONTH" }],
                "partitionInfo": [{ "rowCount": 1 }, { "rowCount": 1 }, { "rowCount": 1 }]
            },
            "data": [["Jan"]],
            "statementHandle": "01b2-parts"
        })))
        .mount(&mock_server)
        .await;

    for (partition, month) in [("1", "Feb"), ("2", "Mar")] {
        Mock::given(method("GET"))
            .and(path("/api/v2/statements/01b2-parts"))
            .and(query_param("partition", partition))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [[month]] })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let table = client(&mock_server).query(&festivals()).await.unwrap();
    let months: Vec<_> = table.column_values("MONTH").into_iter().flatten().collect();
    assert_eq!(months, ["Jan", "Feb", "Mar"]);
}

/// Test that gzip-encoded partitions are decoded.
#[tokio::test]
async fn test_gzipped_partition() {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resultSetMetaData": {
                "rowType": [{ "name": "MONTH" }],
                "partitionInfo": [{ "rowCount": 1 }, { "rowCount": 1 }]
            },
            "data": [["Jan"]],
            "statementHandle": "01b2-gzip"
        })))
        .mount(&mock_server)
        .await;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(br#"{"data":[["Feb"]]}"#).unwrap();
    let gzipped = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/statements/01b2-gzip"))
        .and(query_param("partition", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .insert_header("content-type", "application/json")
                .set_body_bytes(gzipped),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let table = client(&mock_server).query(&festivals()).await.unwrap();
    let months: Vec<_> = table.column_values("MONTH").into_iter().flatten().collect();
    assert_eq!(months, ["Jan", "Feb"]);
}

/// Test authentication failure mapping.
#[tokio::test]
async fn test_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).query(&festivals()).await.unwrap_err();
    assert!(matches!(err, SanskritiError::AuthenticationFailed));
}

/// Test that SQL errors keep the store's code and message.
#[tokio::test]
async fn test_sql_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "code": "002003",
            "message": "SQL compilation error:\nObject 'FESTIVALS' does not exist or not authorized.",
            "sqlState": "02000",
            "statementHandle": "01b2-err"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).query(&festivals()).await.unwrap_err();
    match err {
        SanskritiError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 422);
            assert_eq!(code, "002003");
            assert!(message.contains("does not exist"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

/// Test presigned URL statement text and result column.
#[tokio::test]
async fn test_presigned_url_statement() {
    let mock_server = MockServer::start().await;
    let stage = StageRef::new("CULTURE_TOURISM_DB", "ASSETS", "DANCE_IMAGES_STAGE");

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .and(body_partial_json(serde_json::json!({
            "statement": r#"SELECT GET_PRESIGNED_URL(@"CULTURE_TOURISM_DB"."ASSETS"."DANCE_IMAGES_STAGE", 'kathak.jpg') AS IMAGE_URL"#
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
            &["IMAGE_URL"],
            serde_json::json!([["https://stage.example/kathak.jpg?sig=1"]]),
        )))
        .mount(&mock_server)
        .await;

    let table = client(&mock_server)
        .query(&Statement::presigned_url(stage, "kathak.jpg", None))
        .await
        .unwrap();
    assert_eq!(
        table.value(0, "IMAGE_URL"),
        Some("https://stage.example/kathak.jpg?sig=1")
    );
}

/// Test downloading through a presigned URL.
#[tokio::test]
async fn test_download() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/kathak.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/missing.jpg"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let bytes = client
        .download(&format!("{}/files/kathak.jpg", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, [0xFF, 0xD8, 0xFF]);

    let err = client
        .download(&format!("{}/files/missing.jpg", mock_server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, SanskritiError::Api { status: 403, .. }));
}
