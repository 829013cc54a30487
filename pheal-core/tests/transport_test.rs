use common::{StubService, events_server};
use http::StatusCode;
use pheal_core::avatica_proto::{
    AvaticaMessage, CommitRequest, ErrorResponse, ExecuteResponse, OpenConnectionRequest,
    OpenConnectionResponse,
};
use pheal_core::prost::Message;
use pheal_core::{AvaticaClient, DatabaseErrorKind, Error, InterfaceError};
use phoenix_stub::ScriptedResponse;
use std::collections::HashMap;

mod common;

fn open_connection(id: &str) -> OpenConnectionRequest {
    OpenConnectionRequest {
        connection_id: id.to_string(),
        info: HashMap::new(),
    }
}

#[tokio::test]
async fn test_requests_are_identified_and_typed() {
    let service = StubService::new(events_server());
    let client = AvaticaClient::new(service.clone(), None);

    client.apply(&open_connection("a"), None).await.unwrap();
    client.apply(&open_connection("b"), None).await.unwrap();

    let requests = service.server.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.type_name, "OpenConnectionRequest");
        assert_eq!(
            request.content_type.as_deref(),
            Some("application/x-google-protobuf")
        );
        assert_eq!(request.client_id.as_deref(), Some(client.client_id().as_str()));
    }
}

#[tokio::test]
async fn test_each_client_has_its_own_id() {
    let service = StubService::new(events_server());
    let first = AvaticaClient::new(service.clone(), None);
    let second = AvaticaClient::new(service.clone(), None);

    first.apply(&open_connection("a"), None).await.unwrap();
    second.apply(&open_connection("b"), None).await.unwrap();

    let ids: Vec<_> = service
        .server
        .requests()
        .into_iter()
        .map(|r| r.client_id.unwrap())
        .collect();

    assert_ne!(ids[0], ids[1]);
    assert_ne!(first.client_id(), second.client_id());
}

#[tokio::test]
async fn test_response_name_is_derived_from_request_name() {
    let service = StubService::new(events_server());
    let client = AvaticaClient::new(service, None);

    let payload = client.apply(&open_connection("a"), None).await.unwrap();

    assert_eq!(
        OpenConnectionResponse::decode(payload.as_slice()).unwrap(),
        OpenConnectionResponse::default()
    );
}

#[tokio::test]
async fn test_expected_response_override_bypasses_derivation() {
    let service = StubService::new(events_server());
    service.server.push_response(ScriptedResponse::envelope(
        ExecuteResponse::wire_name(),
        ExecuteResponse::default().encode_to_vec(),
    ));
    let client = AvaticaClient::new(service, None);

    let request = CommitRequest {
        connection_id: "a".to_string(),
    };
    let payload = client
        .apply(&request, Some(ExecuteResponse::NAME))
        .await
        .unwrap();

    assert!(payload.is_empty());
}

#[tokio::test]
async fn test_unexpected_response_type_is_rejected() {
    let service = StubService::new(events_server());
    service.server.push_response(ScriptedResponse::envelope(
        ExecuteResponse::wire_name(),
        ExecuteResponse::default().encode_to_vec(),
    ));
    let client = AvaticaClient::new(service, None);

    let err = client.apply(&open_connection("a"), None).await.unwrap_err();

    match err {
        Error::Interface(InterfaceError::UnexpectedResponseType(name)) => {
            assert_eq!(name, ExecuteResponse::wire_name())
        }
        other => panic!("Expected an unexpected response type error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_protobuf_error_becomes_database_error() {
    let service = StubService::new(events_server());
    service.server.push_response(ScriptedResponse::error(ErrorResponse {
        error_message: "Table undefined. tableName=NOPE".to_string(),
        error_code: 1012,
        sql_state: "42M03".to_string(),
        ..Default::default()
    }));
    let client = AvaticaClient::new(service, None);

    let err = client.apply(&open_connection("a"), None).await.unwrap_err();

    let Error::Database(err) = err else {
        panic!("Expected a database error, got {err:?}");
    };
    assert_eq!(err.kind, DatabaseErrorKind::Programming);
    assert_eq!(err.code, Some(1012));
    assert_eq!(err.sql_state.as_deref(), Some("42M03"));
    assert_eq!(err.http_status, Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_jetty_error_page_becomes_database_error() {
    let page = "<html><head><title>Error 500</title></head><body><h2>HTTP ERROR: 500</h2>\
                <p>Problem accessing /. Reason:</p><pre>    java.lang.OutOfMemoryError: Java heap space</pre></body></html>";

    let service = StubService::new(events_server());
    service.server.push_response(ScriptedResponse::raw(
        StatusCode::INTERNAL_SERVER_ERROR,
        page,
    ));
    let client = AvaticaClient::new(service, None);

    let err = client.apply(&open_connection("a"), None).await.unwrap_err();

    let Error::Database(err) = err else {
        panic!("Expected a database error, got {err:?}");
    };
    assert_eq!(err.message, "java.lang.OutOfMemoryError: Java heap space");
    assert_eq!(err.code, Some(500));
    assert_eq!(err.sql_state.as_deref(), Some("XX000"));
}

#[tokio::test]
async fn test_undecodable_error_reports_status() {
    let service = StubService::new(events_server());
    service.server.push_response(ScriptedResponse::raw(
        StatusCode::BAD_GATEWAY,
        "upstream went away",
    ));
    let client = AvaticaClient::new(service.clone(), None);

    let err = client.apply(&open_connection("a"), None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Interface(InterfaceError::InvalidStatus(status)) if status == StatusCode::BAD_GATEWAY
    ));
    assert_eq!(service.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_connection_failures_are_retried() {
    let service = StubService::new(events_server());
    service.fail_next(2);
    let client = AvaticaClient::new(service.clone(), Some(3));

    client.apply(&open_connection("a"), None).await.unwrap();

    assert_eq!(service.attempts(), 3);
    assert_eq!(service.server.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let service = StubService::new(events_server());
    service.fail_next(10);
    let client = AvaticaClient::new(service.clone(), Some(3));

    let err = client.apply(&open_connection("a"), None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Interface(InterfaceError::RequestFailed(_))
    ));
    assert_eq!(service.attempts(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_server_is_retried() {
    let service = StubService::new(events_server());
    service
        .server
        .push_response(ScriptedResponse::status(StatusCode::SERVICE_UNAVAILABLE));
    service
        .server
        .push_response(ScriptedResponse::status(StatusCode::SERVICE_UNAVAILABLE));
    let client = AvaticaClient::new(service.clone(), None);

    client.apply(&open_connection("a"), None).await.unwrap();

    assert_eq!(service.attempts(), 3);
    assert_eq!(service.server.open_connections(), vec!["a".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_server_without_retries_fails() {
    let service = StubService::new(events_server());
    service
        .server
        .push_response(ScriptedResponse::status(StatusCode::SERVICE_UNAVAILABLE));
    let client = AvaticaClient::new(service.clone(), Some(0));

    let err = client.apply(&open_connection("a"), None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Interface(InterfaceError::InvalidStatus(status)) if status == StatusCode::SERVICE_UNAVAILABLE
    ));
    assert_eq!(service.attempts(), 1);
}
