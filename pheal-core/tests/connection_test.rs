use common::{StubService, events_server};
use pheal_core::{
    AvaticaClient, ConnectOptions, Connection, Error, InterfaceError, PlainCursors,
    StatementExecutor,
};
use phoenix_stub::QueryServerStub;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_connect_without_session_flags_only_opens() {
    let service = StubService::new(events_server());

    let connection = Connection::from_service(service.clone(), ConnectOptions::default())
        .await
        .unwrap();

    assert_eq!(service.server.request_types(), vec!["OpenConnectionRequest"]);
    assert_eq!(service.server.open_connections(), vec![connection.id().to_string()]);
    assert_eq!(connection.autocommit(), None);
    assert_eq!(connection.readonly(), None);
}

#[tokio::test]
async fn test_connect_syncs_session_flags() {
    let service = StubService::new(events_server());
    let options = ConnectOptions::default()
        .autocommit(true)
        .info("user", "phoenix");

    let connection = Connection::from_service(service.clone(), options)
        .await
        .unwrap();

    assert_eq!(
        service.server.request_types(),
        vec!["OpenConnectionRequest", "ConnectionSyncRequest"]
    );

    let props = service
        .server
        .connection_properties(connection.id())
        .unwrap();
    assert!(props.has_auto_commit && props.auto_commit);
    assert!(!props.has_read_only);
    assert_eq!(connection.autocommit(), Some(true));
    assert_eq!(connection.readonly(), None);

    let info = service.server.connection_info(connection.id()).unwrap();
    assert_eq!(info.get("user").map(String::as_str), Some("phoenix"));
}

#[tokio::test]
async fn test_readonly_alone_is_synced() {
    let service = StubService::new(events_server());

    let options = ConnectOptions::default().readonly(true);
    let connection = Connection::from_service(service.clone(), options)
        .await
        .unwrap();

    let props = service
        .server
        .connection_properties(connection.id())
        .unwrap();
    assert!(props.has_read_only && props.read_only);
    assert!(!props.has_auto_commit);
    assert_eq!(connection.readonly(), Some(true));
}

#[tokio::test]
async fn test_plain_cursors_round_trip_parameters() {
    let server = QueryServerStub::new().with_table(
        "EVENTS",
        &[
            ("ID", "BIGINT"),
            ("SOURCE", "VARCHAR"),
            ("SCORE", "DOUBLE"),
            ("TAGS", "VARCHAR ARRAY"),
        ],
    );
    let service = StubService::new(server);
    let client = AvaticaClient::new(service.clone(), None);
    let connection = Connection::open(client, ConnectOptions::default(), PlainCursors)
        .await
        .unwrap();
    let mut cursor = connection.cursor().unwrap();

    let params = [json!(7), json!("web"), json!(0.5), json!(["a", "b"])];
    let outcome = cursor
        .execute(
            "UPSERT INTO EVENTS (ID, SOURCE, SCORE, TAGS) VALUES (?, ?, ?, ?)",
            Some(&params[..]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.update_count, Some(1));

    let outcome = cursor
        .execute("UPSERT INTO EVENTS (ID, SOURCE) VALUES (8, NULL)", None)
        .await
        .unwrap();
    assert_eq!(outcome.update_count, Some(1));

    let outcome = cursor.execute("SELECT * FROM EVENTS", None).await.unwrap();

    assert_eq!(outcome.update_count, None);
    assert!(outcome.done);
    assert_eq!(outcome.columns, vec!["ID", "SOURCE", "SCORE", "TAGS"]);
    assert_eq!(
        outcome.rows,
        vec![
            vec![json!(7), json!("web"), json!(0.5), json!(["a", "b"])],
            vec![json!(8), json!(null), json!(null), json!(null)],
        ]
    );
}

#[tokio::test]
async fn test_cursor_reuses_its_statement() {
    let service = StubService::new(events_server());
    let client = AvaticaClient::new(service.clone(), None);
    let connection = Connection::open(client, ConnectOptions::default(), PlainCursors)
        .await
        .unwrap();
    let mut cursor = connection.cursor().unwrap();

    cursor.execute("SELECT ID FROM EVENTS", None).await.unwrap();
    cursor.execute("SELECT * FROM EVENTS", None).await.unwrap();

    let created = service
        .server
        .request_types()
        .into_iter()
        .filter(|t| t == "CreateStatementRequest")
        .count();
    assert_eq!(created, 1);
    assert_eq!(
        service.server.open_statements(connection.id()),
        vec![cursor.statement_id().unwrap()]
    );
}

#[tokio::test]
async fn test_closed_cursor_releases_its_statement() {
    let service = StubService::new(events_server());
    let client = AvaticaClient::new(service.clone(), None);
    let connection = Connection::open(client, ConnectOptions::default(), PlainCursors)
        .await
        .unwrap();
    let mut cursor = connection.cursor().unwrap();

    cursor.execute("SELECT * FROM EVENTS", None).await.unwrap();
    cursor.close().await.unwrap();
    cursor.close().await.unwrap();

    assert!(cursor.is_closed());
    assert!(service.server.open_statements(connection.id()).is_empty());

    let err = cursor
        .execute("SELECT * FROM EVENTS", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Interface(InterfaceError::CursorClosed)
    ));
}

#[tokio::test]
async fn test_transactions_reach_the_server() {
    let service = StubService::new(events_server());
    let connection = Connection::from_service(service.clone(), ConnectOptions::default())
        .await
        .unwrap();

    connection.commit().await.unwrap();
    connection.rollback().await.unwrap();
    connection.commit().await.unwrap();

    assert_eq!(service.server.transactions(connection.id()), Some((2, 1)));
}

#[tokio::test]
async fn test_closed_connection_rejects_work() {
    let service = StubService::new(events_server());
    let mut connection = Connection::from_service(service.clone(), ConnectOptions::default())
        .await
        .unwrap();

    connection.close().await.unwrap();
    connection.close().await.unwrap();

    assert!(connection.is_closed());
    assert!(service.server.open_connections().is_empty());
    assert_eq!(
        service
            .server
            .request_types()
            .into_iter()
            .filter(|t| t == "CloseConnectionRequest")
            .count(),
        1
    );

    assert!(matches!(
        connection.cursor(),
        Err(Error::Interface(InterfaceError::ConnectionClosed))
    ));
    assert!(matches!(
        connection.commit().await,
        Err(Error::Interface(InterfaceError::ConnectionClosed))
    ));
}
