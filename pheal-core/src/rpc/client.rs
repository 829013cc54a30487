//! # Identified Avatica Client
//!
//! [`AvaticaClient`] performs request/response exchanges with an Avatica query server over
//! an [`HttpService`].
//!
//! ## Client identity
//!
//! Each client generates a [`ClientId`] once, when it is built, and sends it in a `clientid`
//! header with every request. A reverse proxy (nginx, HAProxy, ...) in front of several
//! query servers can hash on that header so that all requests of one connection land on the
//! same backend, which is required because Avatica connections and statements live in the
//! memory of the server that opened them.
//!
//! ## Response validation
//!
//! * A non-success status is decoded as a server error (see [`super::error_body`]).
//! * A success status must carry a `WireMessage` whose name is the expected response type,
//!   anything else is reported as [`InterfaceError::UnexpectedResponseType`].
//!
//! ## Retries
//!
//! Failed exchanges (connection refused, reset, ...) and `503 Service Unavailable` answers are
//! retried up to `max_retries` times, waiting `e^-n` seconds where `n` is the number of
//! retries left. No other status is retried.
use super::{codec, error_body, service::HttpService};
use crate::{
    error::{Error, InterfaceError},
    rpc::service::ReqwestService,
};
use avatica_proto::{
    AvaticaMessage, CloseConnectionRequest, CloseConnectionResponse, CloseStatementRequest,
    CloseStatementResponse, CommitRequest, CommitResponse, ConnectionProperties,
    ConnectionSyncRequest, ConnectionSyncResponse, CreateStatementRequest,
    CreateStatementResponse, ExecuteRequest, ExecuteResponse, OpenConnectionRequest,
    OpenConnectionResponse, PrepareAndExecuteRequest, PrepareRequest, PrepareResponse,
    RollbackRequest, RollbackResponse, StatementHandle, TypedValue,
};
use bytes::Bytes;
use http::{
    HeaderMap, HeaderName, HeaderValue, StatusCode,
    header::CONTENT_TYPE,
};
use std::{collections::HashMap, fmt, time::Duration};
use tracing::{debug, trace, warn};
use uuid::Uuid;

pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-google-protobuf";
pub const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("clientid");
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Identity sent in the `clientid` header, stable for the lifetime of one [`AvaticaClient`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.0).expect("a uuid is a valid header value")
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Avatica protocol client that identifies itself on every request.
#[derive(Debug)]
pub struct AvaticaClient<S = ReqwestService> {
    service: S,
    client_id: ClientId,
    max_retries: u32,
}

impl AvaticaClient<ReqwestService> {
    /// Builds a client for the query server at `url` (e.g. `http://localhost:8765/`).
    ///
    /// `max_retries` defaults to [`DEFAULT_MAX_RETRIES`].
    pub fn connect(url: &str, max_retries: Option<u32>) -> Result<Self, InterfaceError> {
        Ok(Self::new(ReqwestService::new(url)?, max_retries))
    }
}

impl<S> AvaticaClient<S>
where
    S: HttpService,
{
    pub fn new(service: S, max_retries: Option<u32>) -> Self {
        Self {
            service,
            client_id: ClientId::generate(),
            max_retries: max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Sends `request` and returns the payload of the validated response envelope.
    ///
    /// # Arguments
    ///
    /// * `request` - The Avatica request message.
    /// * `expected_response` - Short name of the expected response type. When `None` it is
    ///   derived from the request name (`FooRequest` -> `FooResponse`).
    ///
    /// # Returns
    ///
    /// * `Ok(payload)` - The serialized response message.
    /// * `Err(Error::Database)` - The server reported an error.
    /// * `Err(Error::Interface)` - The exchange failed or violated the protocol.
    pub async fn apply<M: AvaticaMessage>(
        &self,
        request: &M,
        expected_response: Option<&str>,
    ) -> Result<Vec<u8>, Error> {
        debug!(request = M::NAME, client_id = %self.client_id, "sending request");
        trace!(?request, "request content");

        let response = self.post_request(codec::encode_request(request)).await?;
        let status = response.status();
        let body = response.into_body();

        if status != StatusCode::OK {
            debug!(%status, body = %String::from_utf8_lossy(&body), "received error response");
            return Err(error_body::decode_error_body(status, &body));
        }

        let envelope = codec::decode_envelope(&body)?;
        debug!(
            response = %envelope.name,
            size = envelope.wrapped_message.len(),
            "received response"
        );

        let expected = codec::expected_response_name(M::NAME, expected_response);
        if envelope.name != expected {
            return Err(InterfaceError::UnexpectedResponseType(envelope.name).into());
        }

        Ok(envelope.wrapped_message)
    }

    async fn call<Req, Res>(
        &self,
        request: &Req,
        expected_response: Option<&str>,
    ) -> Result<Res, Error>
    where
        Req: AvaticaMessage,
        Res: AvaticaMessage,
    {
        let payload = self.apply(request, expected_response).await?;
        let response = Res::decode(payload.as_slice())?;
        trace!(?response, "response content");
        Ok(response)
    }

    async fn post_request(&self, body: Bytes) -> Result<http::Response<Bytes>, InterfaceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(PROTOBUF_CONTENT_TYPE));
        headers.insert(CLIENT_ID_HEADER, self.client_id.header_value());

        let mut retries_left = self.max_retries;
        loop {
            match self.service.post(headers.clone(), body.clone()).await {
                Ok(response)
                    if response.status() == StatusCode::SERVICE_UNAVAILABLE && retries_left > 0 =>
                {
                    let delay = retry_delay(retries_left);
                    warn!(?delay, retries_left, "query server unavailable, will retry");
                    tokio::time::sleep(delay).await;
                    retries_left -= 1;
                }
                Ok(response) => return Ok(response),
                Err(err) if retries_left > 0 => {
                    let delay = retry_delay(retries_left);
                    warn!(error = %err, ?delay, retries_left, "HTTP request failed, will retry");
                    tokio::time::sleep(delay).await;
                    retries_left -= 1;
                }
                Err(err) => return Err(InterfaceError::RequestFailed(err)),
            }
        }
    }

    pub async fn open_connection(
        &self,
        connection_id: &str,
        info: HashMap<String, String>,
    ) -> Result<OpenConnectionResponse, Error> {
        let request = OpenConnectionRequest {
            connection_id: connection_id.to_string(),
            info,
        };
        self.call(&request, None).await
    }

    pub async fn close_connection(&self, connection_id: &str) -> Result<(), Error> {
        let request = CloseConnectionRequest {
            connection_id: connection_id.to_string(),
        };
        self.call::<_, CloseConnectionResponse>(&request, None).await?;
        Ok(())
    }

    /// Synchronizes the connection properties with the server and returns the server's view.
    pub async fn connection_sync(
        &self,
        connection_id: &str,
        props: ConnectionProperties,
    ) -> Result<ConnectionProperties, Error> {
        let request = ConnectionSyncRequest {
            connection_id: connection_id.to_string(),
            conn_props: Some(props),
        };
        let response: ConnectionSyncResponse = self.call(&request, None).await?;
        Ok(response.conn_props.unwrap_or_default())
    }

    pub async fn create_statement(&self, connection_id: &str) -> Result<u32, Error> {
        let request = CreateStatementRequest {
            connection_id: connection_id.to_string(),
        };
        let response: CreateStatementResponse = self.call(&request, None).await?;
        Ok(response.statement_id)
    }

    pub async fn close_statement(
        &self,
        connection_id: &str,
        statement_id: u32,
    ) -> Result<(), Error> {
        let request = CloseStatementRequest {
            connection_id: connection_id.to_string(),
            statement_id,
        };
        self.call::<_, CloseStatementResponse>(&request, None).await?;
        Ok(())
    }

    /// Prepares and immediately executes `sql` on an existing statement.
    pub async fn prepare_and_execute(
        &self,
        connection_id: &str,
        statement_id: u32,
        sql: &str,
        first_frame_max_size: i32,
    ) -> Result<ExecuteResponse, Error> {
        let request = PrepareAndExecuteRequest {
            connection_id: connection_id.to_string(),
            sql: sql.to_string(),
            statement_id,
            max_rows_total: -1,
            first_frame_max_size,
            ..Default::default()
        };
        self.call(&request, Some(ExecuteResponse::NAME)).await
    }

    pub async fn prepare(&self, connection_id: &str, sql: &str) -> Result<StatementHandle, Error> {
        let request = PrepareRequest {
            connection_id: connection_id.to_string(),
            sql: sql.to_string(),
            max_rows_total: -1,
            ..Default::default()
        };
        let response: PrepareResponse = self.call(&request, None).await?;
        response
            .statement
            .ok_or_else(|| InterfaceError::EmptyResult.into())
    }

    /// Executes a prepared statement with the given parameter values.
    pub async fn execute(
        &self,
        statement: StatementHandle,
        parameter_values: Vec<TypedValue>,
        first_frame_max_size: i32,
    ) -> Result<ExecuteResponse, Error> {
        let request = ExecuteRequest {
            statement_handle: Some(statement),
            parameter_values,
            has_parameter_values: true,
            first_frame_max_size,
            ..Default::default()
        };
        self.call(&request, None).await
    }

    pub async fn commit(&self, connection_id: &str) -> Result<(), Error> {
        let request = CommitRequest {
            connection_id: connection_id.to_string(),
        };
        self.call::<_, CommitResponse>(&request, None).await?;
        Ok(())
    }

    pub async fn rollback(&self, connection_id: &str) -> Result<(), Error> {
        let request = RollbackRequest {
            connection_id: connection_id.to_string(),
        };
        self.call::<_, RollbackResponse>(&request, None).await?;
        Ok(())
    }
}

fn retry_delay(retries_left: u32) -> Duration {
    Duration::from_secs_f64((-f64::from(retries_left)).exp())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn client_ids_are_unique() {
        assert_ne!(ClientId::generate(), ClientId::generate());
    }

    #[test]
    fn retry_delay_grows_as_retries_run_out() {
        assert!(retry_delay(3) < retry_delay(2));
        assert!(retry_delay(2) < retry_delay(1));
        assert!(retry_delay(1) < Duration::from_millis(400));
    }
}
