//! Request target and per-call configuration.
//!
//! A call names its target either by URL or by a prepared [`HttpRequest`],
//! and may pass a [`RequestInit`] whose set fields replace the target's.

use serde::{Deserialize, Serialize};

use crate::http::{HttpMethod, HttpRequest};

/// What a request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// A bare URL, requested with `GET` unless configured otherwise.
    Url(String),
    /// A reusable request descriptor.
    Request(HttpRequest),
}

impl From<&str> for RequestTarget {
    fn from(url: &str) -> Self {
        RequestTarget::Url(url.to_string())
    }
}

impl From<String> for RequestTarget {
    fn from(url: String) -> Self {
        RequestTarget::Url(url)
    }
}

impl From<&String> for RequestTarget {
    fn from(url: &String) -> Self {
        RequestTarget::Url(url.clone())
    }
}

impl From<reqwest::Url> for RequestTarget {
    fn from(url: reqwest::Url) -> Self {
        RequestTarget::Url(url.into())
    }
}

impl From<HttpRequest> for RequestTarget {
    fn from(request: HttpRequest) -> Self {
        RequestTarget::Request(request)
    }
}

impl From<&HttpRequest> for RequestTarget {
    fn from(request: &HttpRequest) -> Self {
        RequestTarget::Request(request.clone())
    }
}

/// How redirect responses are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectPolicy {
    /// Follow up to [`MAX_REDIRECTS`] hops.
    #[default]
    Follow,
    /// Treat any redirect response as a transport failure.
    Error,
    /// Return the redirect response itself.
    Manual,
}

pub const MAX_REDIRECTS: usize = 20;

/// Optional per-call overrides. Fields left `None` keep the target's value.
///
/// `headers` replaces the target's header list wholesale when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInit {
    pub method: Option<HttpMethod>,
    pub headers: Option<Vec<(String, String)>>,
    pub body: Option<Vec<u8>>,
    pub redirect: Option<RedirectPolicy>,
}

impl RequestInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    /// Accepts text (`&str`, `String`) or raw bytes (`&[u8]`, `Vec<u8>`).
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body and the matching `content-type` header.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.header("content-type", "application/json").body(body))
    }

    pub fn redirect(mut self, policy: RedirectPolicy) -> Self {
        self.redirect = Some(policy);
        self
    }
}

/// Merge `target` and `init` into the request that goes on the wire, along
/// with the redirect policy to apply to it.
pub fn resolve(target: RequestTarget, init: Option<RequestInit>) -> (HttpRequest, RedirectPolicy) {
    let mut request = match target {
        RequestTarget::Url(url) => HttpRequest::get(url),
        RequestTarget::Request(request) => request,
    };
    let Some(init) = init else {
        return (request, RedirectPolicy::default());
    };

    if let Some(method) = init.method {
        request.method = method;
    }
    if let Some(headers) = init.headers {
        request.headers = headers;
    }
    if let Some(body) = init.body {
        request.body = Some(body);
    }
    (request, init.redirect.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:3000/echo";

    fn descriptor() -> HttpRequest {
        HttpRequest::get(URL)
            .method(HttpMethod::Put)
            .header("x-original", "1")
            .body("original")
    }

    #[test]
    fn url_without_init_is_plain_get() {
        let (req, redirect) = resolve(URL.into(), None);
        assert_eq!(req, HttpRequest::get(URL));
        assert_eq!(redirect, RedirectPolicy::Follow);
    }

    #[test]
    fn descriptor_without_init_is_unchanged() {
        let (req, _) = resolve(descriptor().into(), None);
        assert_eq!(req, descriptor());
    }

    #[test]
    fn empty_init_keeps_descriptor_fields() {
        let (req, redirect) = resolve(descriptor().into(), Some(RequestInit::new()));
        assert_eq!(req, descriptor());
        assert_eq!(redirect, RedirectPolicy::Follow);
    }

    #[test]
    fn init_overrides_method_and_body() {
        let init = RequestInit::new().method(HttpMethod::Post).body("replaced");
        let (req, _) = resolve(descriptor().into(), Some(init));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(b"replaced".as_slice()));
        assert_eq!(req.headers, vec![("x-original".to_string(), "1".to_string())]);
    }

    #[test]
    fn init_headers_replace_descriptor_headers() {
        let init = RequestInit::new().header("x-init", "2");
        let (req, _) = resolve(descriptor().into(), Some(init));
        assert_eq!(req.headers, vec![("x-init".to_string(), "2".to_string())]);
    }

    #[test]
    fn init_body_may_be_binary() {
        let init = RequestInit::new().body(vec![0x00, 0xc3, 0x28]);
        let (req, _) = resolve(descriptor().into(), Some(init));
        assert_eq!(req.body, Some(vec![0x00, 0xc3, 0x28]));
    }

    #[test]
    fn init_with_empty_header_list_clears_headers() {
        let init = RequestInit {
            headers: Some(Vec::new()),
            ..RequestInit::default()
        };
        let (req, _) = resolve(descriptor().into(), Some(init));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn init_redirect_policy_is_returned() {
        let init = RequestInit::new().redirect(RedirectPolicy::Manual);
        let (_, redirect) = resolve(URL.into(), Some(init));
        assert_eq!(redirect, RedirectPolicy::Manual);
    }

    #[test]
    fn json_sets_body_and_content_type() {
        let init = RequestInit::new()
            .json(&serde_json::json!({"title": "Buy milk"}))
            .unwrap();
        assert_eq!(
            init.headers,
            Some(vec![("content-type".to_string(), "application/json".to_string())])
        );
        let body: serde_json::Value = serde_json::from_slice(init.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
    }

    #[test]
    fn url_conversions_produce_url_targets() {
        let parsed = reqwest::Url::parse(URL).unwrap();
        assert_eq!(RequestTarget::from(parsed), RequestTarget::Url(URL.to_string()));
        assert_eq!(
            RequestTarget::from(URL.to_string()),
            RequestTarget::Url(URL.to_string())
        );
    }
}
