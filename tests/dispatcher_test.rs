//
//  azure-devops-rest
//  tests/dispatcher_test.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use azure_devops_rest::api::areas::GetBuildsOptions;
use azure_devops_rest::api::json::{parse_date, JsonValue};
use azure_devops_rest::api::operation::{Operation, ZIP_CONTENT_TYPE};
use azure_devops_rest::api::query::{Delimiter, QueryValue};
use azure_devops_rest::api::{ApiError, ClientOptions, DevOpsClient, Payload, ResponseType};
use azure_devops_rest::auth::Credential;
use mockito::{Matcher, Server};
use reqwest::StatusCode;

fn client_for(server: &Server) -> DevOpsClient {
    DevOpsClient::for_organization(server.url()).unwrap()
}

#[tokio::test]
async fn test_route_values_fill_the_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Fabrikam/_apis/build/builds/42")
        .match_query(Matcher::UrlEncoded(
            "api-version".into(),
            "7.1-preview.7".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 42, "buildNumber": "20240301.4", "status": "completed"}"#)
        .create_async()
        .await;

    let build = client_for(&server)
        .build()
        .get_build("Fabrikam", 42)
        .await
        .unwrap();

    assert_eq!(build.id, 42);
    assert_eq!(build.build_number.as_deref(), Some("20240301.4"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_route_value_collapses_segment() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"count": 0, "value": []}"#)
        .create_async()
        .await;

    let op = Operation::get("{project}/_apis/build/builds/{buildId}", "7.1")
        .route_value("project", "Fabrikam");
    let payload = client_for(&server).dispatch(op).await.unwrap();

    assert!(payload.as_json().is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_omitted_query_values_are_not_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::Regex(
            r"^definitions=1%2C2&api-version=7\.1-preview\.7$".into(),
        ))
        .with_status(200)
        .with_body(r#"{"count": 0, "value": []}"#)
        .create_async()
        .await;

    let options = GetBuildsOptions {
        definitions: vec![1, 2],
        ..Default::default()
    };
    let page = client_for(&server)
        .build()
        .get_builds("Fabrikam", &options)
        .await
        .unwrap();

    assert!(page.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_parameters_use_their_own_delimiter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/_apis/things")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ids".into(), "1,2,3".into()),
            Matcher::UrlEncoded("fields".into(), "a;b".into()),
            Matcher::UrlEncoded("api-version".into(), "7.1".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let op = Operation::get("_apis/things", "7.1")
        .query("ids", QueryValue::list([1, 2, 3], Delimiter::Comma))
        .query("fields", QueryValue::list(["a", "b"], Delimiter::Semicolon))
        .query("empty", QueryValue::list(Vec::<i64>::new(), Delimiter::Comma));
    client_for(&server).send_empty(op).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_dates_round_trip_through_echoed_body() {
    let mut server = Server::new_async().await;
    let body = r#"{"name":"Sprint 4","startDate":"2024-03-01T10:15:30.123Z","nested":{"when":"2024-03-02T00:00:00.000Z"}}"#;
    let mock = server
        .mock("POST", "/Fabrikam/_apis/echo")
        .match_query(Matcher::UrlEncoded("api-version".into(), "7.1".into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::JsonString(body.into()))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let sent: JsonValue = serde_json::from_str(body).unwrap();
    let op = Operation::post("{project}/_apis/echo", "7.1")
        .route_value("project", "Fabrikam")
        .json(&sent)
        .unwrap();
    let received: JsonValue = client_for(&server).send_json(op).await.unwrap();

    assert_eq!(received, sent);
    assert_eq!(
        received.get("startDate").and_then(JsonValue::as_date),
        parse_date("2024-03-01T10:15:30.123Z")
    );
    assert!(received
        .get("nested")
        .and_then(|n| n.get("when"))
        .and_then(JsonValue::as_date)
        .is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_continuation_token_is_returned() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("x-ms-continuationtoken", "page-2")
        .with_body(r#"{"count": 2, "value": [{"id": 1}, {"id": 2}]}"#)
        .create_async()
        .await;

    let page = client_for(&server)
        .build()
        .get_builds("Fabrikam", &GetBuildsOptions::default())
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert!(page.has_next());
    assert_eq!(page.continuation_token(), Some("page-2"));
}

#[tokio::test]
async fn test_continuation_token_absent_on_last_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::UrlEncoded("continuationToken".into(), "page-2".into()))
        .with_status(200)
        .with_body(r#"{"count": 1, "value": [{"id": 3}]}"#)
        .create_async()
        .await;

    let options = GetBuildsOptions {
        continuation_token: Some("page-2".to_string()),
        ..Default::default()
    };
    let page = client_for(&server)
        .build()
        .get_builds("Fabrikam", &options)
        .await
        .unwrap();

    assert_eq!(page[0].id, 3);
    assert!(!page.has_next());
    assert_eq!(page.continuation_token(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_becomes_api_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/Fabrikam/_apis/build/builds/999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "not found"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .build()
        .get_build("Fabrikam", 999)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.message(), "not found");
    assert!(err.is_not_found());
    assert!(matches!(err, ApiError::Http { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = DevOpsClient::for_organization(format!("http://127.0.0.1:{}", port)).unwrap();

    let err = client
        .send_empty(Operation::get("_apis/projects", "7.1"))
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_dot_route_value_never_reaches_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client_for(&server)
        .build()
        .add_build_tag("Fabrikam", 1, "..")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_zip_is_returned_byte_for_byte() {
    let mut server = Server::new_async().await;
    let archive: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff, 0xfe, 0x0a, 0x0d, 0x80];
    let mock = server
        .mock("GET", "/Fabrikam/_apis/build/builds/42/logs")
        .match_query(Matcher::Any)
        .match_header("accept", "application/zip;api-version=7.1-preview.2")
        .with_status(200)
        .with_header("content-type", ZIP_CONTENT_TYPE)
        .with_body(archive.clone())
        .create_async()
        .await;

    let bytes = client_for(&server)
        .build()
        .get_build_logs_zip("Fabrikam", 42)
        .await
        .unwrap();

    assert_eq!(bytes.as_ref(), archive.as_slice());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_accept_header_carries_api_version() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/_apis/distributedtask/pools")
        .match_query(Matcher::Any)
        .match_header("accept", "application/json;api-version=7.1-preview.1")
        .with_status(200)
        .with_body(r#"{"count": 1, "value": [{"id": 1, "name": "Default"}]}"#)
        .create_async()
        .await;

    let pools = client_for(&server)
        .task_agent()
        .get_agent_pools(&Default::default())
        .await
        .unwrap();

    assert_eq!(pools.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_personal_access_token_is_sent_as_basic() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/_apis/projects")
        .match_query(Matcher::Any)
        .match_header("authorization", "Basic OnNlY3JldA==")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = DevOpsClient::new(
        ClientOptions::new(server.url()).with_credential(Credential::pat("secret")),
    )
    .unwrap();
    client
        .send_empty(Operation::get("_apis/projects", "7.1"))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_text_and_raw_payloads() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/_apis/log")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("x-custom", "yes")
        .with_body("line 1\nline 2\n")
        .create_async()
        .await;

    let client = client_for(&server);

    let text = client
        .dispatch(Operation::get("_apis/log", "7.1").text())
        .await
        .unwrap()
        .into_text();
    assert_eq!(text.as_deref(), Some("line 1\nline 2\n"));

    let raw = match client
        .dispatch(Operation::get("_apis/log", "7.1").response_type(ResponseType::Raw))
        .await
        .unwrap()
    {
        Payload::Raw(raw) => raw,
        other => panic!("expected a raw payload, got {:?}", other),
    };
    assert_eq!(raw.status(), StatusCode::OK);
    assert_eq!(raw.header("x-custom"), Some("yes"));
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/_apis/broken")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let err = client_for(&server)
        .dispatch(Operation::get("_apis/broken", "7.1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}
