//! # Base Cursor
//!
//! [`Cursor`] runs statements against an open connection:
//!
//! * Without parameters it lazily creates a server-side statement and sends a
//!   `PrepareAndExecuteRequest`.
//! * With parameters it sends a `PrepareRequest` followed by an `ExecuteRequest` carrying the
//!   marshaled values.
//!
//! Only the first frame of a result set is decoded.
use super::{ExecuteOutcome, values};
use crate::{
    error::{Error, InterfaceError},
    rpc::{
        client::AvaticaClient,
        service::{HttpService, ReqwestService},
    },
};
use avatica_proto::ExecuteResponse;
use serde_json::Value;
use std::{future::Future, sync::Arc};
use tracing::debug;

/// Number of rows requested in the first frame of a result set.
pub const DEFAULT_FIRST_FRAME_MAX_SIZE: i32 = 2000;

/// Avatica encodes an update count of -1 (a result set, not an update) in an unsigned field.
const NO_UPDATE_COUNT: u64 = u64::MAX;

/// Anything able to execute a statement.
///
/// This is the seam between the base [`Cursor`] and the wrappers built around it, such as
/// [`super::SelfHealingCursor`].
pub trait StatementExecutor {
    fn execute(
        &mut self,
        operation: &str,
        parameters: Option<&[Value]>,
    ) -> impl Future<Output = Result<ExecuteOutcome, Error>> + Send;

    fn close(&mut self) -> impl Future<Output = Result<(), Error>> + Send;
}

pub struct Cursor<S = ReqwestService> {
    client: Arc<AvaticaClient<S>>,
    connection_id: String,
    statement_id: Option<u32>,
    first_frame_max_size: i32,
    closed: bool,
}

impl<S> Cursor<S>
where
    S: HttpService,
{
    pub(crate) fn new(client: Arc<AvaticaClient<S>>, connection_id: String) -> Self {
        Self {
            client,
            connection_id,
            statement_id: None,
            first_frame_max_size: DEFAULT_FIRST_FRAME_MAX_SIZE,
            closed: false,
        }
    }

    /// Sets the number of rows requested in the first frame.
    pub fn with_first_frame_max_size(mut self, size: i32) -> Self {
        self.first_frame_max_size = size;
        self
    }

    pub fn statement_id(&self) -> Option<u32> {
        self.statement_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    async fn run(
        &mut self,
        operation: &str,
        parameters: Option<&[Value]>,
    ) -> Result<ExecuteOutcome, Error> {
        if self.closed {
            return Err(InterfaceError::CursorClosed.into());
        }

        let response = match parameters {
            None => {
                let statement_id = match self.statement_id {
                    Some(id) => id,
                    None => {
                        let id = self.client.create_statement(&self.connection_id).await?;
                        self.statement_id = Some(id);
                        id
                    }
                };

                debug!(statement_id, sql = operation, "prepare and execute");
                self.client
                    .prepare_and_execute(
                        &self.connection_id,
                        statement_id,
                        operation,
                        self.first_frame_max_size,
                    )
                    .await?
            }
            Some(parameters) => {
                let parameter_values = parameters
                    .iter()
                    .map(values::to_typed_value)
                    .collect::<Result<Vec<_>, _>>()?;

                let statement = self.client.prepare(&self.connection_id, operation).await?;
                self.replace_statement(statement.id).await?;

                debug!(
                    statement_id = statement.id,
                    sql = operation,
                    parameters = parameter_values.len(),
                    "execute prepared statement"
                );
                self.client
                    .execute(statement, parameter_values, self.first_frame_max_size)
                    .await?
            }
        };

        self.process_results(response)
    }

    /// Adopts `statement_id`, closing the previous server-side statement if it differs.
    async fn replace_statement(&mut self, statement_id: u32) -> Result<(), Error> {
        if let Some(previous) = self.statement_id.replace(statement_id)
            && previous != statement_id
        {
            self.client
                .close_statement(&self.connection_id, previous)
                .await?;
        }
        Ok(())
    }

    fn process_results(&mut self, response: ExecuteResponse) -> Result<ExecuteOutcome, Error> {
        let result = response
            .results
            .into_iter()
            .next()
            .ok_or(InterfaceError::EmptyResult)?;

        if result.own_statement {
            self.statement_id = Some(result.statement_id);
        }

        let columns = result
            .signature
            .map(|signature| {
                signature
                    .columns
                    .into_iter()
                    .map(|column| column.label)
                    .collect()
            })
            .unwrap_or_default();

        let (rows, done) = match result.first_frame {
            Some(frame) => {
                let rows = frame
                    .rows
                    .iter()
                    .map(|row| row.value.iter().map(values::from_column_value).collect())
                    .collect();
                (rows, frame.done)
            }
            None => (Vec::new(), true),
        };

        let update_count = (result.update_count != NO_UPDATE_COUNT).then_some(result.update_count);

        Ok(ExecuteOutcome {
            update_count,
            columns,
            rows,
            done,
        })
    }

    async fn shutdown(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if let Some(statement_id) = self.statement_id.take() {
            self.client
                .close_statement(&self.connection_id, statement_id)
                .await?;
        }
        Ok(())
    }
}

impl<S> StatementExecutor for Cursor<S>
where
    S: HttpService,
{
    async fn execute(
        &mut self,
        operation: &str,
        parameters: Option<&[Value]>,
    ) -> Result<ExecuteOutcome, Error> {
        self.run(operation, parameters).await
    }

    /// Closes the server-side statement. Closing twice is a no-op.
    async fn close(&mut self) -> Result<(), Error> {
        self.shutdown().await
    }
}
