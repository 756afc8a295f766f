//! Single-shot HTTP requests with JSON bodies normalized into a `Result`.
//!
//! # Overview
//! [`fetch_json`] (or [`JsonClient::execute`]) sends one request and returns
//! either the decoded body or a [`FetchError`] saying which of the failure
//! paths was taken: the transport failed, the status was not 2xx, the body
//! was not JSON, or the JSON was `null` or a primitive.
//!
//! # Design
//! - The target is a URL or an [`HttpRequest`] descriptor; an optional
//!   [`RequestInit`] overrides its method, headers, body or redirect policy.
//! - I/O lives behind the [`Transport`] trait. [`interpret`] is a pure
//!   function over [`HttpResponse`], so response handling is testable
//!   without a network.
//! - The only shape check is "object or array". Anything further is left to
//!   serde when converting into the caller's type.
//! - No retries, timeouts, caching or cancellation.

pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{fetch_json, JsonClient};
pub use error::{FetchError, FetchResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{RedirectPolicy, RequestInit, RequestTarget};
pub use response::{interpret, interpret_value, is_success};
pub use transport::{ReqwestTransport, Transport};
