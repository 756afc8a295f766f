//! Request executor: one request in, one normalized result out.
//!
//! # Design
//! `JsonClient` resolves the target and configuration into an `HttpRequest`,
//! sends it once through its `Transport`, and interprets the response. It
//! holds no mutable state, so clones can run concurrently without
//! coordination. Every failure comes back as a `FetchError`; nothing is
//! retried.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchResult;
use crate::http::HttpResponse;
use crate::request::{resolve, RequestInit, RequestTarget};
use crate::response::{interpret, interpret_value};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct JsonClient {
    transport: Arc<dyn Transport>,
}

impl JsonClient {
    /// A client over a default [`ReqwestTransport`].
    pub fn new() -> FetchResult<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Send one request and decode a JSON object or array body into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        target: impl Into<RequestTarget>,
        init: Option<RequestInit>,
    ) -> FetchResult<T> {
        let response = self.send(target.into(), init).await?;
        log_outcome(interpret(response))
    }

    /// Like [`execute`](Self::execute), returning the JSON value undecoded.
    pub async fn execute_value(
        &self,
        target: impl Into<RequestTarget>,
        init: Option<RequestInit>,
    ) -> FetchResult<Value> {
        let response = self.send(target.into(), init).await?;
        log_outcome(interpret_value(response))
    }

    async fn send(
        &self,
        target: RequestTarget,
        init: Option<RequestInit>,
    ) -> FetchResult<HttpResponse> {
        let (request, redirect) = resolve(target, init);
        debug!(method = %request.method, url = %request.url, ?redirect, "sending request");
        self.transport
            .send(request, redirect)
            .await
            .inspect_err(|err| debug!(error = %err, "transport failed"))
    }
}

impl fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonClient").finish_non_exhaustive()
    }
}

fn log_outcome<T>(result: FetchResult<T>) -> FetchResult<T> {
    if let Err(err) = &result {
        debug!(error = %err, "request produced no value");
    }
    result
}

/// Send one request over a fresh default client and decode the body into `T`.
///
/// ```no_run
/// # async fn demo() {
/// match json_fetch::fetch_json::<serde_json::Value>("https://api.example.com/data", None).await {
///     Ok(data) => println!("{data}"),
///     Err(err) => eprintln!("{err}"),
/// }
/// # }
/// ```
pub async fn fetch_json<T: DeserializeOwned>(
    target: impl Into<RequestTarget>,
    init: Option<RequestInit>,
) -> FetchResult<T> {
    JsonClient::new()?.execute(target, init).await
}
