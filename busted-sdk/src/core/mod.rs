//! Core abstractions for the busted SDK
//!
//! - `HttpTransport`: the injectable network primitive
//! - `ReqwestTransport`: the production transport over `reqwest`
//! - `HttpClient`: JSON-over-HTTP client built on a transport
//! - `ClientBuilder`: builder for a ready-to-use `HttpClient`

pub mod builder;
pub mod client;
pub mod transport;

pub use builder::ClientBuilder;
pub use client::HttpClient;
pub use transport::ReqwestTransport;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// HTTP methods supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(ClientError::request(format!("Unsupported HTTP method: {}", other))),
        }
    }
}

/// One logical request, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Option<HashMap<String, String>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }
}

/// A fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl TransportRequest {
    /// Look up a header value, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response returned by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl TransportResponse {
    /// Build a JSON response, handy for scripted transports
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            reason: None,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }

    /// Build a plain-text response
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// Whether the declared content type is JSON
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let media = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                media == "application/json" || media.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

/// The network primitive: performs exactly one HTTP exchange
///
/// Implementations must map every failure that happens before a status is
/// received to `ClientError::Transport`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Decoded body of a successful call
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }

    /// Decode a JSON body into a typed value; text bodies are decode errors
    pub fn into_json<R: DeserializeOwned>(self) -> Result<R> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value).map_err(|e| {
                ClientError::decode(None, format!("Unexpected response shape: {}", e))
            }),
            ResponseBody::Text(_) => Err(ClientError::decode(
                None,
                "Expected a JSON response but received text",
            )),
        }
    }
}
