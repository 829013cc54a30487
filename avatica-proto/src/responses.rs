//! Messages from Avatica's `responses.proto`.
use super::common::{ConnectionProperties, Frame, RpcMetadata, Severity, Signature, StatementHandle};

/// Response that contains a result set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResultSetResponse {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub statement_id: u32,
    #[prost(bool, tag = "3")]
    pub own_statement: bool,
    #[prost(message, optional, tag = "4")]
    pub signature: ::core::option::Option<Signature>,
    #[prost(message, optional, tag = "5")]
    pub first_frame: ::core::option::Option<Frame>,
    /// -1 for normal result sets, else this response contains a dummy result set
    /// with no signature nor other data.
    #[prost(uint64, tag = "6")]
    pub update_count: u64,
    #[prost(message, optional, tag = "7")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to PrepareAndExecuteRequest and ExecuteRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteResponse {
    #[prost(message, repeated, tag = "1")]
    pub results: ::prost::alloc::vec::Vec<ResultSetResponse>,
    /// Did the request fail because of no-cached statement
    #[prost(bool, tag = "2")]
    pub missing_statement: bool,
    #[prost(message, optional, tag = "3")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to PrepareRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrepareResponse {
    #[prost(message, optional, tag = "1")]
    pub statement: ::core::option::Option<StatementHandle>,
    #[prost(message, optional, tag = "2")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to OpenConnectionRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpenConnectionResponse {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to CloseConnectionRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CloseConnectionResponse {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to ConnectionSyncRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConnectionSyncResponse {
    #[prost(message, optional, tag = "1")]
    pub conn_props: ::core::option::Option<ConnectionProperties>,
    #[prost(message, optional, tag = "2")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to CreateStatementRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateStatementResponse {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub statement_id: u32,
    #[prost(message, optional, tag = "3")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to CloseStatementRequest
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CloseStatementResponse {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}

/// Response to a commit request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitResponse {}

/// Response to a rollback request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RollbackResponse {}

/// Send contextual information about some error over the wire from the server.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorResponse {
    /// exception stacktraces, many for linked exceptions.
    #[prost(string, repeated, tag = "1")]
    pub exceptions: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// are there stacktraces contained?
    #[prost(bool, tag = "7")]
    pub has_exceptions: bool,
    /// human readable description
    #[prost(string, tag = "2")]
    pub error_message: ::prost::alloc::string::String,
    #[prost(enumeration = "Severity", tag = "3")]
    pub severity: i32,
    /// numeric identifier for error
    #[prost(uint32, tag = "4")]
    pub error_code: u32,
    /// five-character standard-defined value
    #[prost(string, tag = "5")]
    pub sql_state: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "6")]
    pub metadata: ::core::option::Option<RpcMetadata>,
}
