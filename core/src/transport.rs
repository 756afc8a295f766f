//! Executes an [`HttpRequest`] over the network.
//!
//! # Design
//! `Transport` is the only place that performs I/O. The executor hands it a
//! fully resolved request and receives an `HttpResponse` back, or a
//! `FetchError::Transport` when no response could be obtained. Status codes
//! are never treated as errors here.

use std::sync::OnceLock;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::{RedirectPolicy, MAX_REDIRECTS};

/// Sends one request and returns the complete response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: HttpRequest,
        redirect: RedirectPolicy,
    ) -> Result<HttpResponse, FetchError>;
}

/// `reqwest`-backed transport.
///
/// Holds one client that follows redirects and, once a request asks for
/// `Error` or `Manual`, one that does not.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    follow: reqwest::Client,
    no_follow: OnceLock<reqwest::Client>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, FetchError> {
        let follow = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(transport_error)?;
        Self::from_client(follow)
    }

    /// Use `client` for requests that follow redirects. Its own redirect
    /// policy is kept as configured.
    pub fn from_client(client: reqwest::Client) -> Result<Self, FetchError> {
        Ok(Self {
            follow: client,
            no_follow: OnceLock::new(),
        })
    }

    fn client(&self, redirect: RedirectPolicy) -> Result<&reqwest::Client, FetchError> {
        if redirect == RedirectPolicy::Follow {
            return Ok(&self.follow);
        }
        if let Some(client) = self.no_follow.get() {
            return Ok(client);
        }
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(transport_error)?;
        Ok(self.no_follow.get_or_init(|| client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
        redirect: RedirectPolicy,
    ) -> Result<HttpResponse, FetchError> {
        let client = self.client(redirect)?;

        let mut builder = client.request(to_reqwest_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        debug!(status, url = %response.url(), "received response");

        if redirect == RedirectPolicy::Error && is_redirect(status) {
            return Err(FetchError::Transport(format!(
                "unexpected redirect from {}",
                request.url
            )));
        }

        let status_text = status_text(&response);
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

/// The reason phrase as sent on the wire. hyper only records it when it
/// differs from the canonical phrase, so fall back to that.
fn status_text(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Flatten a reqwest error and its sources into one message.
fn transport_error(err: reqwest::Error) -> FetchError {
    FetchError::Transport(error_chain(&err))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
