//! # Phoenix Stub
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide an in-process Avatica query
//! server for integration testing `pheal-core`. It is not intended for production use.
//!
//! [`QueryServerStub`] answers protobuf `WireMessage` requests the way the Phoenix Query
//! Server does, backed by an in-memory catalog of tables and rows. It records every request
//! it receives and can be scripted to answer the next requests with canned responses.
pub mod sql;

use avatica_proto::{
    AvaticaMessage, AvaticaType, CloseConnectionRequest, CloseConnectionResponse,
    CloseStatementRequest, CloseStatementResponse, ColumnMetaData, ColumnValue, CommitRequest,
    CommitResponse, ConnectionProperties, ConnectionSyncRequest, ConnectionSyncResponse,
    CreateStatementRequest, CreateStatementResponse, ErrorResponse, ExecuteRequest,
    ExecuteResponse, Frame, OpenConnectionRequest, OpenConnectionResponse, PrepareAndExecuteRequest,
    PrepareRequest, PrepareResponse, REQUESTS_PREFIX, Rep, ResultSetResponse, RollbackRequest,
    RollbackResponse, Row, Severity, Signature, StatementHandle, StatementType, TypedValue,
    WireMessage,
};
use bytes::Bytes;
use http::{HeaderMap, StatusCode, header::CONTENT_TYPE};
use prost::Message;
use sql::{Slot, SqlError, Statement};
use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::{Mutex, MutexGuard},
};

/// Avatica's marker for "this result is a query, not an update".
const NO_UPDATE_COUNT: u64 = u64::MAX;

/// One request received by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Short type name, e.g. `PrepareAndExecuteRequest`.
    pub type_name: String,
    pub client_id: Option<String>,
    pub content_type: Option<String>,
    /// SQL carried by the request, if any. For `ExecuteRequest` the SQL of the prepared statement.
    pub sql: Option<String>,
}

/// A canned answer returned instead of processing the next request.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ScriptedResponse {
    /// A response with the given status and body.
    pub fn raw(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response with the given status and an empty body.
    pub fn status(status: StatusCode) -> Self {
        Self::raw(status, Bytes::new())
    }

    /// A `200 OK` response carrying `payload` in an envelope named `name`.
    pub fn envelope(name: impl Into<String>, payload: Vec<u8>) -> Self {
        let envelope = WireMessage {
            name: name.into(),
            wrapped_message: payload,
        };
        Self::raw(StatusCode::OK, envelope.encode_to_vec())
    }

    /// A `500` response carrying `error`.
    pub fn error(error: ErrorResponse) -> Self {
        Self::raw(StatusCode::INTERNAL_SERVER_ERROR, wrap(&error))
    }
}

#[derive(Debug, Default)]
struct Table {
    columns: Vec<(String, String)>,
    rows: Vec<HashMap<String, TypedValue>>,
}

impl Table {
    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|(name, _)| name == column)
    }
}

#[derive(Debug, Default)]
struct State {
    tables: BTreeMap<String, Table>,
    connections: HashMap<String, Connection>,
    next_statement_id: u32,
    requests: Vec<RecordedRequest>,
    scripted: VecDeque<ScriptedResponse>,
}

#[derive(Debug, Default)]
struct Connection {
    info: HashMap<String, String>,
    props: ConnectionProperties,
    /// Open statements and, once prepared, their SQL.
    statements: HashMap<u32, Option<String>>,
    commits: usize,
    rollbacks: usize,
}

#[derive(Debug, Default)]
pub struct QueryServerStub {
    state: Mutex<State>,
}

impl QueryServerStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table with the given `(name, declaration)` columns.
    pub fn with_table(self, table: &str, columns: &[(&str, &str)]) -> Self {
        self.lock().tables.insert(
            table.to_uppercase(),
            Table {
                columns: columns
                    .iter()
                    .map(|(name, declaration)| (name.to_uppercase(), declaration.to_uppercase()))
                    .collect(),
                rows: Vec::new(),
            },
        );
        self
    }

    /// Column names of `table`, in creation order.
    pub fn columns(&self, table: &str) -> Vec<String> {
        self.lock()
            .tables
            .get(&table.to_uppercase())
            .map(|t| t.columns.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// Declaration of `column` in `table`.
    pub fn column_declaration(&self, table: &str, column: &str) -> Option<String> {
        let state = self.lock();
        let table = state.tables.get(&table.to_uppercase())?;
        table
            .columns
            .iter()
            .find(|(name, _)| *name == column.to_uppercase())
            .map(|(_, declaration)| declaration.clone())
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.lock()
            .tables
            .get(&table.to_uppercase())
            .map_or(0, |t| t.rows.len())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Short type names of the requests received so far.
    pub fn request_types(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .map(|r| r.type_name.clone())
            .collect()
    }

    /// SQL of every statement executed or prepared so far, in order.
    pub fn executed_sql(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.type_name != "ExecuteRequest")
            .filter_map(|r| r.sql.clone())
            .collect()
    }

    pub fn open_connections(&self) -> Vec<String> {
        self.lock().connections.keys().cloned().collect()
    }

    pub fn connection_properties(&self, connection_id: &str) -> Option<ConnectionProperties> {
        self.lock()
            .connections
            .get(connection_id)
            .map(|c| c.props.clone())
    }

    pub fn connection_info(&self, connection_id: &str) -> Option<HashMap<String, String>> {
        self.lock()
            .connections
            .get(connection_id)
            .map(|c| c.info.clone())
    }

    /// `(commits, rollbacks)` received on a connection.
    pub fn transactions(&self, connection_id: &str) -> Option<(usize, usize)> {
        self.lock()
            .connections
            .get(connection_id)
            .map(|c| (c.commits, c.rollbacks))
    }

    /// Open statement ids of a connection.
    pub fn open_statements(&self, connection_id: &str) -> Vec<u32> {
        let state = self.lock();
        let mut ids: Vec<u32> = state
            .connections
            .get(connection_id)
            .map(|c| c.statements.keys().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Queues a canned response. Queued responses are returned first, in order.
    pub fn push_response(&self, response: ScriptedResponse) {
        self.lock().scripted.push_back(response);
    }

    /// Handles one HTTP POST.
    pub fn handle(&self, headers: &HeaderMap, body: &[u8]) -> http::Response<Bytes> {
        let Ok(envelope) = WireMessage::decode(body) else {
            return respond(StatusCode::BAD_REQUEST, Bytes::from_static(b"bad envelope"));
        };

        let type_name = envelope
            .name
            .strip_prefix(REQUESTS_PREFIX)
            .unwrap_or(&envelope.name)
            .to_string();

        let mut state = self.lock();

        let sql = request_sql(&state, &type_name, &envelope.wrapped_message);
        state.requests.push(RecordedRequest {
            type_name: type_name.clone(),
            client_id: header(headers, "clientid"),
            content_type: header(headers, CONTENT_TYPE.as_str()),
            sql,
        });

        if let Some(scripted) = state.scripted.pop_front() {
            return respond(scripted.status, scripted.body);
        }

        let payload = envelope.wrapped_message.as_slice();
        let result = match type_name.as_str() {
            "OpenConnectionRequest" => decode(payload).map(|r| state.open_connection(r)),
            "CloseConnectionRequest" => decode(payload).and_then(|r| state.close_connection(r)),
            "ConnectionSyncRequest" => decode(payload).and_then(|r| state.connection_sync(r)),
            "CreateStatementRequest" => decode(payload).and_then(|r| state.create_statement(r)),
            "CloseStatementRequest" => decode(payload).and_then(|r| state.close_statement(r)),
            "PrepareAndExecuteRequest" => {
                decode(payload).and_then(|r| state.prepare_and_execute(r))
            }
            "PrepareRequest" => decode(payload).and_then(|r| state.prepare(r)),
            "ExecuteRequest" => decode(payload).and_then(|r| state.execute(r)),
            "CommitRequest" => decode(payload).and_then(|r| state.commit(r)),
            "RollbackRequest" => decode(payload).and_then(|r| state.rollback(r)),
            other => Err(internal_error(&format!("Unknown request type {other}"))),
        };

        match result {
            Ok(body) => respond(StatusCode::OK, body),
            Err(error) => respond(StatusCode::INTERNAL_SERVER_ERROR, wrap(&error)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

type Handled = Result<Bytes, ErrorResponse>;

impl State {
    fn open_connection(&mut self, request: OpenConnectionRequest) -> Bytes {
        self.connections.insert(
            request.connection_id,
            Connection {
                info: request.info,
                ..Default::default()
            },
        );
        wrap(&OpenConnectionResponse::default())
    }

    fn close_connection(&mut self, request: CloseConnectionRequest) -> Handled {
        self.connections
            .remove(&request.connection_id)
            .ok_or_else(|| missing_connection(&request.connection_id))?;
        Ok(wrap(&CloseConnectionResponse::default()))
    }

    fn connection_sync(&mut self, request: ConnectionSyncRequest) -> Handled {
        let connection = self.connection(&request.connection_id)?;
        let update = request.conn_props.unwrap_or_default();

        if update.has_auto_commit {
            connection.props.auto_commit = update.auto_commit;
            connection.props.has_auto_commit = true;
        }
        if update.has_read_only {
            connection.props.read_only = update.read_only;
            connection.props.has_read_only = true;
        }

        Ok(wrap(&ConnectionSyncResponse {
            conn_props: Some(connection.props.clone()),
            metadata: None,
        }))
    }

    fn create_statement(&mut self, request: CreateStatementRequest) -> Handled {
        let statement_id = self.allocate_statement();
        self.connection(&request.connection_id)?
            .statements
            .insert(statement_id, None);

        Ok(wrap(&CreateStatementResponse {
            connection_id: request.connection_id,
            statement_id,
            metadata: None,
        }))
    }

    fn close_statement(&mut self, request: CloseStatementRequest) -> Handled {
        self.connection(&request.connection_id)?
            .statements
            .remove(&request.statement_id)
            .ok_or_else(|| missing_statement(request.statement_id))?;
        Ok(wrap(&CloseStatementResponse::default()))
    }

    fn prepare_and_execute(&mut self, request: PrepareAndExecuteRequest) -> Handled {
        let connection = self.connection(&request.connection_id)?;
        if !connection.statements.contains_key(&request.statement_id) {
            return Err(missing_statement(request.statement_id));
        }

        let statement = Statement::parse(&request.sql).map_err(|e| sql_error(&request.sql, e))?;
        let result = self
            .run(&statement, &[])
            .map_err(|e| sql_error(&request.sql, e))?;

        Ok(wrap(&execute_response(
            request.connection_id,
            request.statement_id,
            result,
        )))
    }

    fn prepare(&mut self, request: PrepareRequest) -> Handled {
        self.connection(&request.connection_id)?;

        let statement = Statement::parse(&request.sql).map_err(|e| sql_error(&request.sql, e))?;
        self.check(&statement)
            .map_err(|e| sql_error(&request.sql, e))?;

        let statement_id = self.allocate_statement();
        self.connection(&request.connection_id)?
            .statements
            .insert(statement_id, Some(request.sql.clone()));

        let signature = Signature {
            sql: request.sql,
            parameters: vec![Default::default(); statement.parameter_count()],
            statement_type: statement_type(&statement).into(),
            ..Default::default()
        };

        Ok(wrap(&PrepareResponse {
            statement: Some(StatementHandle {
                connection_id: request.connection_id,
                id: statement_id,
                signature: Some(signature),
            }),
            metadata: None,
        }))
    }

    fn execute(&mut self, request: ExecuteRequest) -> Handled {
        let handle = request
            .statement_handle
            .ok_or_else(|| internal_error("Missing statement handle"))?;

        let sql = self
            .connection(&handle.connection_id)?
            .statements
            .get(&handle.id)
            .cloned()
            .flatten()
            .ok_or_else(|| missing_statement(handle.id))?;

        let statement = Statement::parse(&sql).map_err(|e| sql_error(&sql, e))?;
        let result = self
            .run(&statement, &request.parameter_values)
            .map_err(|e| sql_error(&sql, e))?;

        Ok(wrap(&execute_response(handle.connection_id, handle.id, result)))
    }

    fn commit(&mut self, request: CommitRequest) -> Handled {
        self.connection(&request.connection_id)?.commits += 1;
        Ok(wrap(&CommitResponse {}))
    }

    fn rollback(&mut self, request: RollbackRequest) -> Handled {
        self.connection(&request.connection_id)?.rollbacks += 1;
        Ok(wrap(&RollbackResponse {}))
    }

    fn connection(&mut self, connection_id: &str) -> Result<&mut Connection, ErrorResponse> {
        self.connections
            .get_mut(connection_id)
            .ok_or_else(|| missing_connection(connection_id))
    }

    fn allocate_statement(&mut self) -> u32 {
        self.next_statement_id += 1;
        self.next_statement_id
    }

    /// Validates a statement against the catalog without running it.
    fn check(&self, statement: &Statement) -> Result<(), SqlError> {
        let (table_name, columns) = match statement {
            Statement::AlterAdd { table, .. } => (table, Vec::new()),
            Statement::Upsert { table, columns, .. } => (table, columns.clone()),
            Statement::Select { table, columns } => (table, columns.clone().unwrap_or_default()),
        };

        let table = self
            .tables
            .get(table_name)
            .ok_or_else(|| SqlError::undefined_table(table_name))?;

        match columns.iter().find(|column| !table.has_column(column)) {
            Some(column) => Err(SqlError::undefined_column(column)),
            None => Ok(()),
        }
    }

    fn run(
        &mut self,
        statement: &Statement,
        parameters: &[TypedValue],
    ) -> Result<QueryResult, SqlError> {
        self.check(statement)?;

        match statement {
            Statement::AlterAdd {
                table,
                column,
                declaration,
            } => {
                let table = self
                    .tables
                    .get_mut(table)
                    .ok_or_else(|| SqlError::undefined_table(table))?;
                if table.has_column(column) {
                    return Err(SqlError::duplicate_column(column));
                }
                table.columns.push((column.clone(), declaration.clone()));
                Ok(QueryResult::Update(0))
            }
            Statement::Upsert {
                table,
                columns,
                values,
            } => {
                if parameters.len() != statement.parameter_count() {
                    return Err(SqlError::illegal_data(&format!(
                        "Expected {} parameters but got {}",
                        statement.parameter_count(),
                        parameters.len()
                    )));
                }

                let mut parameters = parameters.iter();
                let row = columns
                    .iter()
                    .zip(values)
                    .map(|(column, slot)| {
                        let value = match slot {
                            Slot::Literal(value) => value.clone(),
                            Slot::Parameter => {
                                parameters.next().cloned().unwrap_or_else(sql::null_value)
                            }
                        };
                        (column.clone(), value)
                    })
                    .collect();

                let table = self
                    .tables
                    .get_mut(table)
                    .ok_or_else(|| SqlError::undefined_table(table))?;
                table.rows.push(row);
                Ok(QueryResult::Update(1))
            }
            Statement::Select { table, columns } => {
                let table = self
                    .tables
                    .get(table)
                    .ok_or_else(|| SqlError::undefined_table(table))?;
                let columns = columns.clone().unwrap_or_else(|| {
                    table.columns.iter().map(|(name, _)| name.clone()).collect()
                });

                let rows = table
                    .rows
                    .iter()
                    .map(|row| {
                        columns
                            .iter()
                            .map(|column| row.get(column).cloned().unwrap_or_else(sql::null_value))
                            .collect()
                    })
                    .collect();

                Ok(QueryResult::Rows { columns, rows })
            }
        }
    }
}

enum QueryResult {
    Update(u64),
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<TypedValue>>,
    },
}

fn execute_response(
    connection_id: String,
    statement_id: u32,
    result: QueryResult,
) -> ExecuteResponse {
    let result = match result {
        QueryResult::Update(count) => ResultSetResponse {
            connection_id,
            statement_id,
            own_statement: true,
            update_count: count,
            ..Default::default()
        },
        QueryResult::Rows { columns, rows } => ResultSetResponse {
            connection_id,
            statement_id,
            own_statement: true,
            signature: Some(Signature {
                columns: columns
                    .iter()
                    .enumerate()
                    .map(|(ordinal, label)| column_metadata(ordinal, label))
                    .collect(),
                ..Default::default()
            }),
            first_frame: Some(Frame {
                offset: 0,
                done: true,
                rows: rows.into_iter().map(row).collect(),
            }),
            update_count: NO_UPDATE_COUNT,
            metadata: None,
        },
    };

    ExecuteResponse {
        results: vec![result],
        missing_statement: false,
        metadata: None,
    }
}

fn column_metadata(ordinal: usize, label: &str) -> ColumnMetaData {
    ColumnMetaData {
        ordinal: u32::try_from(ordinal).unwrap_or(u32::MAX),
        label: label.to_string(),
        column_name: label.to_string(),
        r#type: Some(AvaticaType {
            rep: Rep::Object.into(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn row(values: Vec<TypedValue>) -> Row {
    Row {
        value: values
            .into_iter()
            .map(|value| {
                if value.r#type() == Rep::Array {
                    ColumnValue {
                        array_value: value.array_value,
                        has_array_value: true,
                        ..Default::default()
                    }
                } else {
                    ColumnValue {
                        scalar_value: Some(value),
                        ..Default::default()
                    }
                }
            })
            .collect(),
    }
}

fn statement_type(statement: &Statement) -> StatementType {
    match statement {
        Statement::AlterAdd { .. } => StatementType::Alter,
        Statement::Upsert { .. } => StatementType::Upsert,
        Statement::Select { .. } => StatementType::Select,
    }
}

/// Builds the `ErrorResponse` Phoenix sends for a failed statement.
fn sql_error(sql: &str, error: SqlError) -> ErrorResponse {
    let phoenix_message = error.phoenix_message();
    ErrorResponse {
        exceptions: vec![format!(
            "{}: {phoenix_message}\n\tat org.apache.phoenix.jdbc.PhoenixStatement.execute(PhoenixStatement.java)",
            error.exception
        )],
        has_exceptions: true,
        error_message: format!(
            "Error -1 (00000) : Error while executing SQL \"{sql}\": Remote driver error: {}: {phoenix_message} -> {}",
            short_name(error.exception),
            short_name(error.exception)
        ),
        severity: Severity::ErrorSeverity.into(),
        error_code: error.code,
        sql_state: error.sql_state.to_string(),
        metadata: None,
    }
}

fn internal_error(message: &str) -> ErrorResponse {
    ErrorResponse {
        error_message: message.to_string(),
        severity: Severity::FatalSeverity.into(),
        error_code: 0,
        sql_state: "INT00".to_string(),
        ..Default::default()
    }
}

fn missing_connection(connection_id: &str) -> ErrorResponse {
    internal_error(&format!("Connection not found: invalid id {connection_id}"))
}

fn missing_statement(statement_id: u32) -> ErrorResponse {
    internal_error(&format!("Statement not found: invalid id {statement_id}"))
}

fn short_name(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

fn request_sql(state: &State, type_name: &str, payload: &[u8]) -> Option<String> {
    match type_name {
        "PrepareAndExecuteRequest" => PrepareAndExecuteRequest::decode(payload).ok().map(|r| r.sql),
        "PrepareRequest" => PrepareRequest::decode(payload).ok().map(|r| r.sql),
        "ExecuteRequest" => {
            let handle = ExecuteRequest::decode(payload).ok()?.statement_handle?;
            state
                .connections
                .get(&handle.connection_id)?
                .statements
                .get(&handle.id)
                .cloned()
                .flatten()
        }
        _ => None,
    }
}

fn decode<M: AvaticaMessage>(payload: &[u8]) -> Result<M, ErrorResponse> {
    M::decode(payload).map_err(|e| internal_error(&format!("Cannot decode {}: {e}", M::NAME)))
}

fn wrap<M: AvaticaMessage>(message: &M) -> Bytes {
    WireMessage {
        name: M::wire_name(),
        wrapped_message: message.encode_to_vec(),
    }
    .encode_to_vec()
    .into()
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn respond(status: StatusCode, body: Bytes) -> http::Response<Bytes> {
    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    response
}
