use super::execute;
use bytes::Bytes;
use http::HeaderMap;
use pheal_core::{BoxError, ColumnHint, ConnectOptions, Connection, Error, HttpService};
use phoenix_stub::QueryServerStub;
use std::sync::Arc;

#[derive(Clone)]
struct InProcess(Arc<QueryServerStub>);

impl HttpService for InProcess {
    async fn post(
        &self,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<http::Response<Bytes>, BoxError> {
        Ok(self.0.handle(&headers, &body))
    }
}

async fn connection() -> (Arc<QueryServerStub>, Connection<InProcess>) {
    let server = Arc::new(QueryServerStub::new().with_table("EVENTS", &[("ID", "BIGINT")]));
    let connection = Connection::from_service(InProcess(server.clone()), ConnectOptions::default())
        .await
        .unwrap();
    (server, connection)
}

fn count(server: &QueryServerStub, request_type: &str) -> usize {
    server
        .request_types()
        .iter()
        .filter(|t| *t == request_type)
        .count()
}

#[tokio::test]
async fn test_successful_statement_is_committed_and_released() {
    let (server, connection) = connection().await;
    let mut hint = ColumnHint::new("EVENTS").with_column("SOURCE", "VARCHAR");

    let outcome = execute(
        &connection,
        "UPSERT INTO EVENTS (ID, SOURCE) VALUES (1, 'web')",
        None,
        Some(&mut hint),
        true,
    )
    .await
    .unwrap();

    assert_eq!(outcome.update_count, Some(1));
    assert!(hint.columns.is_empty());
    assert!(server.open_statements(connection.id()).is_empty());
    assert_eq!(server.transactions(connection.id()), Some((1, 0)));
}

#[tokio::test]
async fn test_failed_statement_still_releases_its_cursor() {
    let (server, connection) = connection().await;

    let err = execute(&connection, "SELECT MISSING FROM EVENTS", None, None, true)
        .await
        .unwrap_err();

    let Error::Database(db) = &err else {
        panic!("Expected a database error, got {err:?}");
    };
    assert_eq!(db.code, Some(504));

    assert_eq!(count(&server, "CloseStatementRequest"), 1);
    assert!(server.open_statements(connection.id()).is_empty());
    assert_eq!(server.transactions(connection.id()), Some((0, 0)));
}
