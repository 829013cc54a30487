//! Messages from Avatica's `requests.proto`.
use super::common::{ConnectionProperties, StatementHandle, TypedValue};

/// Request for Meta#openConnection(Meta.ConnectionHandle, Map<String, String>)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpenConnectionRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(map = "string, string", tag = "2")]
    pub info: ::std::collections::HashMap<
        ::prost::alloc::string::String,
        ::prost::alloc::string::String,
    >,
}

/// Request for Meta#closeConnection(Meta.ConnectionHandle)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CloseConnectionRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConnectionSyncRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub conn_props: ::core::option::Option<ConnectionProperties>,
}

/// Request for Meta#createStatement(Meta.ConnectionHandle)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateStatementRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
}

/// Request for Meta#closeStatement(Meta.StatementHandle)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CloseStatementRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub statement_id: u32,
}

/// Request for Meta#prepareAndExecute(Meta.StatementHandle, String, long, Meta.PrepareCallback)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrepareAndExecuteRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub sql: ::prost::alloc::string::String,
    /// Deprecated
    #[prost(uint64, tag = "3")]
    pub max_row_count: u64,
    #[prost(uint32, tag = "4")]
    pub statement_id: u32,
    #[prost(int64, tag = "5")]
    pub max_rows_total: i64,
    #[prost(int32, tag = "6")]
    pub first_frame_max_size: i32,
}

/// Request for Meta.prepare(Meta.ConnectionHandle, String, long)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrepareRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub sql: ::prost::alloc::string::String,
    /// Deprecated
    #[prost(uint64, tag = "3")]
    pub max_row_count: u64,
    #[prost(int64, tag = "4")]
    pub max_rows_total: i64,
}

/// Request for Meta#execute(Meta.ExecuteRequest)
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteRequest {
    #[prost(message, optional, tag = "1")]
    pub statement_handle: ::core::option::Option<StatementHandle>,
    #[prost(message, repeated, tag = "2")]
    pub parameter_values: ::prost::alloc::vec::Vec<TypedValue>,
    /// Deprecated
    #[prost(uint64, tag = "3")]
    pub deprecated_first_frame_max_size: u64,
    #[prost(bool, tag = "4")]
    pub has_parameter_values: bool,
    #[prost(int32, tag = "5")]
    pub first_frame_max_size: i32,
}

/// Request to invoke a commit on a Connection
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
}

/// Request to invoke rollback on a Connection
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RollbackRequest {
    #[prost(string, tag = "1")]
    pub connection_id: ::prost::alloc::string::String,
}
