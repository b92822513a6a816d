// ABOUTME: Description of an outbound carrier HTTP request built by an adapter
// ABOUTME: Transport is left to the caller; this is the shape it needs to send
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use http::Method;
use serde::{Serialize, Serializer};

/// Basic-auth credentials for carriers that authenticate at the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestAuth {
    /// Account user name
    pub username: String,
    /// Account password
    pub password: String,
}

/// Outbound request description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierRequest {
    /// HTTP method
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    /// Fully qualified URL including any query string
    pub url: String,
    /// Extra request headers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    /// Request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// HTTP-level credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<RequestAuth>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl CarrierRequest {
    /// GET request for `url`
    #[must_use]
    pub fn get(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            auth: None,
            timeout_ms,
        }
    }

    /// POST request for `url` carrying `body`
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
            auth: None,
            timeout_ms,
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach basic-auth credentials
    #[must_use]
    pub fn with_auth(mut self, auth: RequestAuth) -> Self {
        self.auth = Some(auth);
        self
    }
}

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_method_as_string() {
        let request = CarrierRequest::post("https://example.test/track", "<xml/>", 2000)
            .with_header("Content-Type", "text/xml");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["body"], "<xml/>");
        assert_eq!(json["timeout_ms"], 2000);
        assert!(json.get("auth").is_none());
    }

    #[test]
    fn test_get_request_has_no_body() {
        let request = CarrierRequest::get("https://example.test/track?id=1", 500);
        assert_eq!(request.method, Method::GET);
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }
}
