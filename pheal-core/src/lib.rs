//! # Pheal Core
//!
//! `pheal-core` is a client for Avatica query servers (the Phoenix Query Server being the
//! main target) that speaks the protobuf flavour of the Avatica RPC protocol over HTTP.
//!
//! On top of a plain Avatica client it adds two things:
//!
//! * **Sticky routing**: every [`AvaticaClient`] generates a client id once and sends it in a
//!   `clientid` header with each request, so that a reverse proxy in front of several query
//!   servers can keep all requests of one connection on the same backend.
//! * **Self-healing statements**: a [`SelfHealingCursor`] recognises the server's
//!   `Undefined column` error, adds the missing column with an `ALTER TABLE` described by a
//!   caller supplied [`ColumnHint`] and replays the statement.
//!
//! ## Key Components
//!
//! * **[`connect`]:** The main entry point. Opens a [`Connection`] whose cursors are
//!   self-healing by default.
//! * **[`AvaticaClient`]:** The identified transport. Wraps every request in a `WireMessage`
//!   envelope, validates the envelope of every response and decodes server errors.
//! * **[`Cursor`]:** The base statement executor (`PrepareAndExecute` or `Prepare` + `Execute`).
//! * **[`infer`]:** Helper that guesses a column type declaration from a JSON value, handy to
//!   build hints on the fly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pheal_core::{ColumnHint, ConnectOptions, connect};
//!
//! # async fn run() -> Result<(), pheal_core::Error> {
//! let connection = connect("http://localhost:8765/", ConnectOptions::default()).await?;
//! let mut cursor = connection.cursor()?;
//!
//! let mut hint = ColumnHint::new("EVENTS").with_column("SOURCE", "VARCHAR");
//! let params = [serde_json::json!(1), serde_json::json!("web")];
//! cursor
//!     .execute(
//!         "UPSERT INTO EVENTS (ID, SOURCE) VALUES (?, ?)",
//!         Some(&params[..]),
//!         Some(&mut hint),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports `avatica-proto` and `prost` so that consumers building raw requests
//! use compatible versions of the wire messages.
pub mod client;
pub mod error;
pub mod infer;
pub mod rpc;

pub use client::{
    ColumnHint, ConnectOptions, Connection, Cursor, CursorFactory, ExecuteOutcome, PlainCursors,
    SelfHealing, SelfHealingCursor, StatementExecutor, connect, connect_with,
};
pub use error::{DatabaseError, DatabaseErrorKind, Error, InterfaceError};
pub use infer::{InferError, infer};
pub use rpc::client::{AvaticaClient, ClientId};
pub use rpc::service::{HttpService, ReqwestService};

// Re-exports
pub use avatica_proto;
pub use prost;

/// Type alias for the standard boxed error used by the HTTP seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
