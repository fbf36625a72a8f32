// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON CRUD client for the remote system of record.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use rl_core::{EntityPayload, EntityType};
use serde_json::Value;

use super::remote::{RemoteApi, RemoteError, RemoteRecord, RemoteResult};
use crate::error::{Error, Result};

/// `reqwest`-backed [`RemoteApi`].
///
/// Records live at `{base}/{collection}` and `{base}/{collection}/{id}`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base: Url,
    client: Client,
}

impl HttpRemote {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(HttpRemote { base, client })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns the URL of a collection, or of one record in it.
    pub fn record_url(&self, entity: EntityType, id: Option<&str>) -> RemoteResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RemoteError::Decode(format!("cannot use {} as a base", self.base)))?;
            segments.pop_if_empty().push(entity.collection());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> RemoteResult<String> {
        tracing::debug!(%method, %url, "remote request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        match classify_status(status, &text) {
            Some(err) => Err(err),
            None => Ok(text),
        }
    }
}

/// Parses and checks the base URL of the remote.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::Config(format!("invalid remote url '{}': {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "unsupported remote url scheme '{}'\n  hint: use an http:// or https:// url",
            other
        ))),
    }
}

fn request_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else if e.is_decode() {
        RemoteError::Decode(e.to_string())
    } else {
        RemoteError::Connectivity(e.to_string())
    }
}

/// Maps a non-success status to a [`RemoteError`].
///
/// Returns `None` for 2xx responses.
pub fn classify_status(status: StatusCode, body: &str) -> Option<RemoteError> {
    if status.is_success() {
        return None;
    }
    let code = status.as_u16();
    let message = error_message(status, body);
    if code == StatusCode::REQUEST_TIMEOUT.as_u16() {
        Some(RemoteError::Timeout)
    } else if status.is_client_error() && code != StatusCode::TOO_MANY_REQUESTS.as_u16() {
        Some(RemoteError::Rejected {
            status: code,
            message,
        })
    } else {
        Some(RemoteError::Server {
            status: code,
            message,
        })
    }
}

/// Extracts a human readable message from an error body.
///
/// Looks at the `message`, `error` and `detail` fields of a JSON body, and
/// falls back to the raw text, then to the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            match map.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
                Some(v @ (Value::Object(_) | Value::Array(_))) => return v.to_string(),
                _ => {}
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

fn parse_body(text: &str) -> RemoteResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| RemoteError::Decode(e.to_string()))
}

fn payload_body(payload: &EntityPayload) -> RemoteResult<Value> {
    payload
        .to_json()
        .map_err(|e| RemoteError::Decode(format!("cannot encode payload: {}", e)))
}

impl RemoteApi for HttpRemote {
    fn create<'a>(
        &'a self,
        entity: EntityType,
        payload: &'a EntityPayload,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<RemoteRecord>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.record_url(entity, None)?;
            let text = self.send(Method::POST, url, Some(payload_body(payload)?)).await?;
            let record = RemoteRecord::from_body(parse_body(&text)?);
            if record.id.is_none() {
                return Err(RemoteError::Decode(format!(
                    "create {} response has no id",
                    entity
                )));
            }
            Ok(record)
        })
    }

    fn update<'a>(
        &'a self,
        entity: EntityType,
        id: &'a str,
        payload: &'a EntityPayload,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<RemoteRecord>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.record_url(entity, Some(id))?;
            let text = self.send(Method::PUT, url, Some(payload_body(payload)?)).await?;
            Ok(RemoteRecord::from_body(parse_body(&text)?))
        })
    }

    fn delete<'a>(
        &'a self,
        entity: EntityType,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.record_url(entity, Some(id))?;
            self.send(Method::DELETE, url, None).await?;
            Ok(())
        })
    }
}
