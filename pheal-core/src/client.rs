//! # Connections
//!
//! This module implements the connection level API: opening a connection on the query
//! server, handing out cursors and driving transactions.
//!
//! A [`Connection`] is generic over two things:
//!
//! 1. **The HTTP service `S`** used by its [`AvaticaClient`]. [`ReqwestService`] in
//!    production, an in-process server in tests.
//! 2. **The cursor factory `F`** deciding what [`Connection::cursor`] returns. By default
//!    ([`SelfHealing`]) cursors are [`SelfHealingCursor`]s; [`PlainCursors`] hands out bare
//!    [`Cursor`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pheal_core::{ConnectOptions, PlainCursors, StatementExecutor, connect_with};
//!
//! # async fn run() -> Result<(), pheal_core::Error> {
//! let options = ConnectOptions::default().autocommit(true).max_retries(5);
//! let connection = connect_with("http://localhost:8765/", options, PlainCursors).await?;
//!
//! let mut cursor = connection.cursor()?;
//! let outcome = cursor.execute("SELECT * FROM EVENTS", None).await?;
//! println!("{:?}", outcome.rows);
//! # Ok(())
//! # }
//! ```
mod cursor;
mod healing;
mod types;
pub mod values;

pub use cursor::*;
pub use healing::*;
pub use types::*;

use crate::{
    error::{Error, InterfaceError},
    rpc::{
        client::AvaticaClient,
        service::{HttpService, ReqwestService},
    },
};
use avatica_proto::ConnectionProperties;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Decides which kind of cursor a [`Connection`] hands out.
pub trait CursorFactory<S> {
    type Cursor;

    fn make_cursor(&self, cursor: Cursor<S>) -> Self::Cursor;
}

/// Hands out [`SelfHealingCursor`]s. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfHealing;

impl<S: HttpService> CursorFactory<S> for SelfHealing {
    type Cursor = SelfHealingCursor<Cursor<S>>;

    fn make_cursor(&self, cursor: Cursor<S>) -> Self::Cursor {
        SelfHealingCursor::new(cursor)
    }
}

/// Hands out bare [`Cursor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCursors;

impl<S> CursorFactory<S> for PlainCursors {
    type Cursor = Cursor<S>;

    fn make_cursor(&self, cursor: Cursor<S>) -> Self::Cursor {
        cursor
    }
}

/// An open connection on the query server.
pub struct Connection<S = ReqwestService, F = SelfHealing> {
    client: Arc<AvaticaClient<S>>,
    id: String,
    cursor_factory: F,
    autocommit: Option<bool>,
    readonly: Option<bool>,
    closed: bool,
}

/// Connects to a query server.
///
/// # Arguments
///
/// * `url` - URL of the query server, e.g. `http://localhost:8765/`.
/// * `options` - Retry budget, session flags and connection properties.
///
/// # Returns
///
/// A connection handing out [`SelfHealingCursor`]s.
pub async fn connect(url: &str, options: ConnectOptions) -> Result<Connection, Error> {
    connect_with(url, options, SelfHealing).await
}

/// Same as [`connect`], with a custom cursor factory.
pub async fn connect_with<F>(
    url: &str,
    options: ConnectOptions,
    cursor_factory: F,
) -> Result<Connection<ReqwestService, F>, Error>
where
    F: CursorFactory<ReqwestService>,
{
    let client = AvaticaClient::connect(url, options.max_retries)?;
    Connection::open(client, options, cursor_factory).await
}

impl<S> Connection<S, SelfHealing>
where
    S: HttpService,
{
    /// Opens a connection over an existing HTTP service.
    pub async fn from_service(service: S, options: ConnectOptions) -> Result<Self, Error> {
        let client = AvaticaClient::new(service, options.max_retries);
        Self::open(client, options, SelfHealing).await
    }
}

impl<S, F> Connection<S, F>
where
    S: HttpService,
    F: CursorFactory<S>,
{
    /// Opens a new connection through `client` and applies the session flags of `options`.
    pub async fn open(
        client: AvaticaClient<S>,
        options: ConnectOptions,
        cursor_factory: F,
    ) -> Result<Self, Error> {
        let id = Uuid::new_v4().to_string();
        client.open_connection(&id, options.info).await?;
        debug!(connection_id = %id, client_id = %client.client_id(), "connection opened");

        let mut connection = Self {
            client: Arc::new(client),
            id,
            cursor_factory,
            autocommit: None,
            readonly: None,
            closed: false,
        };

        if options.autocommit.is_some() || options.readonly.is_some() {
            connection
                .set_session(options.autocommit, options.readonly)
                .await?;
        }

        Ok(connection)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &AvaticaClient<S> {
        &self.client
    }

    /// Autocommit mode as last synchronized with the server, if ever.
    pub fn autocommit(&self) -> Option<bool> {
        self.autocommit
    }

    /// Readonly mode as last synchronized with the server, if ever.
    pub fn readonly(&self) -> Option<bool> {
        self.readonly
    }

    /// Creates a new cursor, of the kind chosen by the connection's cursor factory.
    pub fn cursor(&self) -> Result<F::Cursor, Error> {
        self.ensure_open()?;
        let cursor = Cursor::new(Arc::clone(&self.client), self.id.clone());
        Ok(self.cursor_factory.make_cursor(cursor))
    }

    /// Synchronizes the session flags with the server. `None` leaves a flag untouched.
    pub async fn set_session(
        &mut self,
        autocommit: Option<bool>,
        readonly: Option<bool>,
    ) -> Result<(), Error> {
        self.ensure_open()?;

        let props = ConnectionProperties {
            auto_commit: autocommit.unwrap_or_default(),
            has_auto_commit: autocommit.is_some(),
            read_only: readonly.unwrap_or_default(),
            has_read_only: readonly.is_some(),
            ..Default::default()
        };

        let synced = self.client.connection_sync(&self.id, props).await?;

        if synced.has_auto_commit {
            self.autocommit = Some(synced.auto_commit);
        }
        if synced.has_read_only {
            self.readonly = Some(synced.read_only);
        }
        Ok(())
    }

    pub async fn commit(&self) -> Result<(), Error> {
        self.ensure_open()?;
        self.client.commit(&self.id).await
    }

    pub async fn rollback(&self) -> Result<(), Error> {
        self.ensure_open()?;
        self.client.rollback(&self.id).await
    }

    /// Closes the connection on the server. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.client.close_connection(&self.id).await
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), InterfaceError> {
        if self.closed {
            return Err(InterfaceError::ConnectionClosed);
        }
        Ok(())
    }
}
