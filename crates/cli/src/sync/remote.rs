// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote system of record abstraction.
//!
//! The engine only ever talks to a [`RemoteApi`], which lets tests drive it
//! with a scripted in-process remote instead of a real server.

use std::future::Future;
use std::pin::Pin;

use rl_core::{EntityPayload, EntityType, FailureKind};
use serde_json::Value;

/// Error returned by a remote call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// No response from the remote.
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The remote refused the request (4xx).
    #[error("rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The remote failed to handle the request (5xx).
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response could not be understood.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Classifies the error for display and stickiness.
    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteError::Connectivity(_) | RemoteError::Timeout => FailureKind::Connectivity,
            RemoteError::Rejected { .. } => FailureKind::Rejection,
            RemoteError::Server { .. } | RemoteError::Decode(_) => FailureKind::Server,
        }
    }
}

/// Result type for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Record returned by a successful create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRecord {
    /// Remote-assigned id, when the response carries one.
    pub id: Option<String>,
    /// Full response body.
    pub body: Value,
}

impl RemoteRecord {
    /// Builds a record from a response body, reading `id` as a string or number.
    pub fn from_body(body: Value) -> Self {
        let id = match body.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        RemoteRecord { id, body }
    }
}

/// CRUD capability of the remote system, per entity type.
pub trait RemoteApi: Send + Sync {
    /// Creates a record and returns it with its remote id.
    fn create<'a>(
        &'a self,
        entity: EntityType,
        payload: &'a EntityPayload,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<RemoteRecord>> + Send + 'a>>;

    /// Updates the record `id`.
    fn update<'a>(
        &'a self,
        entity: EntityType,
        id: &'a str,
        payload: &'a EntityPayload,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<RemoteRecord>> + Send + 'a>>;

    /// Deletes the record `id`.
    fn delete<'a>(
        &'a self,
        entity: EntityType,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>>;
}
