//! `reqwest`-backed transport

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{HttpTransport, Method, TransportRequest, TransportResponse};
use crate::error::{ClientError, Result};

/// Production transport over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|err| {
            warn!(
                "{} {} failed: timeout={} connect={}",
                request.method,
                request.url,
                err.is_timeout(),
                err.is_connect()
            );
            match ClientError::from(err) {
                // Anything before a status is a transport failure
                ClientError::Decode { message, .. } => ClientError::transport(message),
                other => other,
            }
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|err| {
            ClientError::decode(
                Some(status.as_u16()),
                format!("Failed to read response body: {}", err),
            )
        })?;

        debug!(
            "{} {} -> {} content-type={} body_len={}",
            request.method,
            request.url,
            status.as_u16(),
            content_type.as_deref().unwrap_or("unknown"),
            body.len()
        );

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            content_type,
            body,
        })
    }
}
