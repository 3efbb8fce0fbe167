//! JSON-over-HTTP client
//!
//! `HttpClient` turns a relative path plus an optional body into exactly one
//! transport call and normalizes every outcome into either a decoded
//! `ResponseBody` or a `ClientError`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{HttpTransport, Method, RequestDescriptor, ResponseBody, TransportRequest, TransportResponse};
use crate::config::ClientConfig;
use crate::error::mapping::{is_success_status, map_http_error};
use crate::error::{ClientError, Result};
use crate::util::{generate_request_id, sanitize_for_logging, truncate_string};

/// Maximum number of body characters written to debug logs
const LOG_BODY_LIMIT: usize = 512;

/// Generic HTTP client bound to one base URL
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.config.has_api_key())
            .finish()
    }
}

/// Join a base URL and a relative path with exactly one slash between them
pub fn join_base_path(base: &str, path: &str) -> Result<String> {
    let base = base.trim();
    if base.is_empty() {
        return Err(ClientError::configuration("base_url is empty"));
    }
    let normalized_base = base.trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(format!("{normalized_base}{normalized_path}"))
}

impl HttpClient {
    /// Create a client over any transport
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Convenience constructor taking the transport by value
    pub fn with_transport(config: ClientConfig, transport: impl HttpTransport + 'static) -> Result<Self> {
        Self::new(config, Arc::new(transport))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `path`, appending `query` in the map's iteration order
    pub async fn get(&self, path: &str, query: Option<&HashMap<String, String>>) -> Result<ResponseBody> {
        let mut descriptor = RequestDescriptor::new(Method::Get, path);
        descriptor.query = query.cloned();
        self.send(descriptor).await
    }

    pub async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<ResponseBody>
    where
        B: Serialize + ?Sized,
    {
        self.send(with_body(Method::Post, path, body)?).await
    }

    pub async fn put<B>(&self, path: &str, body: Option<&B>) -> Result<ResponseBody>
    where
        B: Serialize + ?Sized,
    {
        self.send(with_body(Method::Put, path, body)?).await
    }

    pub async fn patch<B>(&self, path: &str, body: Option<&B>) -> Result<ResponseBody>
    where
        B: Serialize + ?Sized,
    {
        self.send(with_body(Method::Patch, path, body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<ResponseBody> {
        self.send(RequestDescriptor::new(Method::Delete, path)).await
    }

    /// POST a typed body and decode a typed JSON response
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (status, response) = self.execute(with_body(Method::Post, path, Some(body))?).await?;
        response.into_json().map_err(|err| match err {
            ClientError::Decode { message, .. } => ClientError::decode(Some(status), message),
            other => other,
        })
    }

    /// Perform one request described by `descriptor`
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<ResponseBody> {
        self.execute(descriptor).await.map(|(_, body)| body)
    }

    /// Absolute URL for a path and optional query
    pub fn url_for(&self, path: &str, query: Option<&HashMap<String, String>>) -> Result<String> {
        let joined = join_base_path(&self.config.base_url, path)?;
        let mut url = Url::parse(&joined)?;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.to_string())
    }

    /// Headers sent with every request; depends on configuration only
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(ref api_key) = self.config.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {}", api_key)));
        }
        headers
    }

    async fn execute(&self, descriptor: RequestDescriptor) -> Result<(u16, ResponseBody)> {
        let request_id = generate_request_id();
        let url = self.url_for(&descriptor.path, descriptor.query.as_ref())?;
        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        debug!(
            "[{}] {} {} body_len={}",
            request_id,
            descriptor.method,
            url,
            body.as_ref().map(String::len).unwrap_or(0)
        );

        let request = TransportRequest {
            method: descriptor.method,
            url,
            headers: self.default_headers(),
            body,
        };

        let response = self.transport.send(request).await.map_err(|err| {
            warn!("[{}] {} {} failed: {}", request_id, descriptor.method, descriptor.path, err);
            err
        })?;

        debug!(
            "[{}] status={} body={}",
            request_id,
            response.status,
            sanitize_for_logging(&truncate_string(&response.body, LOG_BODY_LIMIT))
        );

        let status = response.status;
        decode_response(response)
            .map(|body| (status, body))
            .map_err(|err| {
                warn!(
                    "[{}] {} {} -> {} error: {}",
                    request_id,
                    descriptor.method,
                    descriptor.path,
                    err.kind(),
                    err.message()
                );
                err
            })
    }
}

fn with_body<B>(method: Method, path: &str, body: Option<&B>) -> Result<RequestDescriptor>
where
    B: Serialize + ?Sized,
{
    let mut descriptor = RequestDescriptor::new(method, path);
    if let Some(body) = body {
        descriptor.body = Some(serde_json::to_value(body)?);
    }
    Ok(descriptor)
}

/// Interpret a raw response: failure statuses become errors, JSON bodies are
/// decoded, anything else is returned as text
fn decode_response(response: TransportResponse) -> Result<ResponseBody> {
    if !is_success_status(response.status) {
        return Err(map_http_error(
            response.status,
            response.reason.as_deref(),
            &response.body,
        ));
    }

    if !response.is_json() {
        return Ok(ResponseBody::Text(response.body));
    }

    if response.body.trim().is_empty() {
        return Ok(ResponseBody::Json(Value::Null));
    }

    serde_json::from_str(&response.body)
        .map(ResponseBody::Json)
        .map_err(|e| {
            ClientError::decode(
                Some(response.status),
                format!("Malformed JSON response: {}", e),
            )
        })
}
