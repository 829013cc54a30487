//! # Avatica Protobuf Messages
//!
//! Rust bindings for the subset of the Apache Calcite Avatica protobuf protocol
//! (`common.proto`, `requests.proto`, `responses.proto`) that `pheal` speaks.
//!
//! The messages are written with `prost` derives and keep the upstream field numbers,
//! so they are wire compatible with any Avatica query server (Phoenix Query Server,
//! Calcite's own Avatica server, ...).
//!
//! Every message travels inside a [`WireMessage`] whose `name` is the Java class name of
//! the wrapped message, e.g. `org.apache.calcite.avatica.proto.Requests$OpenConnectionRequest`.
//! [`AvaticaMessage::NAME`] holds the short name (`OpenConnectionRequest`), and
//! [`AvaticaMessage::wire_name`] the fully-qualified one.
pub mod common;
pub mod requests;
pub mod responses;

pub use common::*;
pub use requests::*;
pub use responses::*;

pub use prost;

/// Prefix of every fully-qualified request type name.
pub const REQUESTS_PREFIX: &str = "org.apache.calcite.avatica.proto.Requests$";

/// Prefix of every fully-qualified response type name.
pub const RESPONSES_PREFIX: &str = "org.apache.calcite.avatica.proto.Responses$";

/// Which side of the protocol a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    pub fn prefix(self) -> &'static str {
        match self {
            Direction::Request => REQUESTS_PREFIX,
            Direction::Response => RESPONSES_PREFIX,
        }
    }
}

/// A protobuf message that can be wrapped into a [`WireMessage`].
pub trait AvaticaMessage: prost::Message + Default + std::fmt::Debug {
    /// Short type name, e.g. `PrepareAndExecuteRequest`.
    const NAME: &'static str;
    const DIRECTION: Direction;

    /// Fully-qualified type name as it appears in [`WireMessage::name`].
    fn wire_name() -> String {
        format!("{}{}", Self::DIRECTION.prefix(), Self::NAME)
    }
}

macro_rules! avatica_messages {
    ($direction:ident => $($ty:ident),+ $(,)?) => {
        $(
            impl AvaticaMessage for $ty {
                const NAME: &'static str = stringify!($ty);
                const DIRECTION: Direction = Direction::$direction;
            }
        )+
    };
}

avatica_messages!(Request =>
    OpenConnectionRequest,
    CloseConnectionRequest,
    ConnectionSyncRequest,
    CreateStatementRequest,
    CloseStatementRequest,
    PrepareAndExecuteRequest,
    PrepareRequest,
    ExecuteRequest,
    CommitRequest,
    RollbackRequest,
);

avatica_messages!(Response =>
    OpenConnectionResponse,
    CloseConnectionResponse,
    ConnectionSyncResponse,
    CreateStatementResponse,
    CloseStatementResponse,
    ExecuteResponse,
    ResultSetResponse,
    PrepareResponse,
    CommitResponse,
    RollbackResponse,
    ErrorResponse,
);
