#![allow(dead_code)]

use bytes::Bytes;
use http::HeaderMap;
use pheal_core::{BoxError, HttpService};
use phoenix_stub::QueryServerStub;
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

/// Serves requests from an in-process [`QueryServerStub`].
#[derive(Clone, Default)]
pub struct StubService {
    pub server: Arc<QueryServerStub>,
    failures_left: Arc<AtomicU32>,
    attempts: Arc<AtomicU32>,
}

impl StubService {
    pub fn new(server: QueryServerStub) -> Self {
        Self {
            server: Arc::new(server),
            ..Default::default()
        }
    }

    /// Makes the next `count` exchanges fail before reaching the server.
    pub fn fail_next(&self, count: u32) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Number of exchanges attempted, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl HttpService for StubService {
    async fn post(
        &self,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<http::Response<Bytes>, BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err("connection refused".into());
        }

        Ok(self.server.handle(&headers, &body))
    }
}

/// A server with an `EVENTS (ID BIGINT)` table.
pub fn events_server() -> QueryServerStub {
    QueryServerStub::new().with_table("EVENTS", &[("ID", "BIGINT")])
}
