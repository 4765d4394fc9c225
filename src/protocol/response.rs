//! Response definitions
//!
//! Represents responses to clients. Payloads are JSON bodies shaped as
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.

use serde::Serialize;
use serde_json::json;

use crate::error::{BoardError, Result};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
    BadRequest = 0x03,
}

/// A response to send to client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (JSON body, or `PONG` for ping)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an OK response wrapping `data` in a success body
    pub fn success<T: Serialize>(data: &T) -> Result<Self> {
        let data = serde_json::to_value(data)?;
        let body = json!({ "success": true, "data": data });
        Ok(Self::ok(Some(serde_json::to_vec(&body)?)))
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self::failure(Status::NotFound, message)
    }

    /// Create a BAD_REQUEST response
    pub fn bad_request(message: &str) -> Self {
        Self::failure(Status::BadRequest, message)
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self::failure(Status::Error, message)
    }

    /// Parse the payload as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        let payload = self
            .payload
            .as_deref()
            .ok_or_else(|| BoardError::Protocol("response has no payload".to_string()))?;
        Ok(serde_json::from_slice(payload)?)
    }

    fn failure(status: Status, message: &str) -> Self {
        let body = json!({ "success": false, "error": message });
        Self {
            status,
            payload: Some(body.to_string().into_bytes()),
        }
    }
}
