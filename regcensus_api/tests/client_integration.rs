use regcensus_api::{Client, DataFinderQuery, Error, LabelQuery, ValuesQuery};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

/// The API wraps most payloads in a JSON string.
fn double_encoded(raw: &str) -> String {
    serde_json::to_string(raw).unwrap()
}

#[tokio::test]
async fn get_jurisdictions_double_encoded() {
    let mock_server = MockServer::start().await;
    let body = double_encoded(&load_fixture("jurisdictions.json"));

    Mock::given(method("GET"))
        .and(path("/jurisdictions/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let payload = client.get_jurisdictions().await.unwrap();
    let rows = payload.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["jurisdiction_name"], "Alaska");
}

#[tokio::test]
async fn get_datafinder_sends_jurisdiction_and_document_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/datafinder"))
        .and(query_param("jurisdiction", "38"))
        .and(query_param("documenttype", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("datafinder.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let query = DataFinderQuery {
        jurisdictions: vec![38],
        document_type: Some(1),
    };
    let payload = client.get_datafinder(&query).await.unwrap();
    assert_eq!(payload.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_labels_passes_level_and_source() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/labels"))
        .and(query_param("labellevel", "3"))
        .and(query_param("labelsource", "NAICS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("labels.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let payload = client
        .get_labels(&LabelQuery::default().with_label_source("NAICS"))
        .await
        .unwrap();
    assert_eq!(payload[0]["label_code"], "111");
}

#[tokio::test]
async fn get_values_error_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state-summary"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Invalid series"})),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client
        .get_values("/state-summary", &ValuesQuery::default().with_series(&[999]))
        .await;
    match result {
        Err(Error::Upstream { message }) => assert_eq!(message, "Invalid series"),
        other => panic!("expected upstream error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn server_error_with_envelope_reports_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dataseries"))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(json!({"errorMessage": "Task timed out"})),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_series().await;
    assert!(matches!(result, Err(Error::Upstream { message }) if message == "Task timed out"));
}

#[tokio::test]
async fn server_error_without_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dataseries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_series().await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
}

#[tokio::test]
async fn malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clusters"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_clusters().await;
    assert!(matches!(result, Err(Error::Malformed(_))));
}

#[tokio::test]
async fn values_url_matches_requested_path() {
    let mock_server = MockServer::start().await;
    let rows = json!([{"series_value": 52569.0}]);

    Mock::given(method("GET"))
        .and(path("/state-summary"))
        .and(query_param("series", "1"))
        .and(query_param("jurisdiction", "58,59"))
        .and(query_param("year", "2019"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::String(rows.to_string())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let query = ValuesQuery::default()
        .with_series(&[1])
        .with_jurisdictions(&[58, 59])
        .with_year("2019");
    let url = client.values_url("/state-summary", &query).unwrap();
    assert!(url.as_str().starts_with(&mock_server.uri()));
    let payload = client.fetch(url).await.unwrap();
    assert_eq!(payload, rows);
}
