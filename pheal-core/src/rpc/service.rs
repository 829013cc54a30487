//! # HTTP Seam
//!
//! [`HttpService`] is the only thing the transport needs from the network: POST a body
//! with some headers and hand back the status, headers and body of the response.
//!
//! [`ReqwestService`] is the production implementation. Tests plug an in-process query
//! server in instead, the same way a `tonic` client can be handed a service directly.
use crate::{BoxError, error::InterfaceError};
use bytes::Bytes;
use http::HeaderMap;
use std::future::Future;

pub trait HttpService: Send + Sync {
    /// Sends one POST request to the query server.
    ///
    /// An `Err` means the exchange itself failed (connection refused, reset, ...). Any HTTP
    /// response, whatever its status, is an `Ok`.
    fn post(
        &self,
        headers: HeaderMap,
        body: Bytes,
    ) -> impl Future<Output = Result<http::Response<Bytes>, BoxError>> + Send;
}

/// [`HttpService`] backed by a `reqwest` client bound to one query server URL.
#[derive(Debug, Clone)]
pub struct ReqwestService {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl ReqwestService {
    /// Creates a service posting to `url` (e.g. `http://localhost:8765/`).
    pub fn new(url: &str) -> Result<Self, InterfaceError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| InterfaceError::InvalidUrl(url.to_string(), e.to_string()))?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(InterfaceError::HttpClient)?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

impl HttpService for ReqwestService {
    async fn post(
        &self,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<http::Response<Bytes>, BoxError> {
        let response = self
            .client
            .post(self.url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let mut builder = http::Response::builder().status(response.status());
        if let Some(response_headers) = builder.headers_mut() {
            response_headers.extend(response.headers().clone());
        }

        let body = response.bytes().await?;
        Ok(builder.body(body)?)
    }
}
