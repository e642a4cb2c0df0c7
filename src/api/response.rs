//
//  azure-devops-rest
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Buffered responses and decoded payloads.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::common::ApiError;
use super::json::{decode_json, JsonValue};

/// A successful response whose body has been read but not decoded.
///
/// Returned by [`DevOpsClient::begin_request`](super::DevOpsClient::begin_request)
/// and used by the pagination adapter, which needs the headers as well as the
/// body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string. Names are case-insensitive.
    /// Values that are not visible ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The body, byte for byte.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<String, ApiError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| ApiError::Decode(format!("response is not valid UTF-8: {}", e)))
    }

    /// The body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode_json(&self.body)
    }
}

/// A response body decoded according to the operation's
/// [`ResponseType`](super::operation::ResponseType).
#[derive(Debug, Clone)]
pub enum Payload {
    Json(JsonValue),
    Text(String),
    Binary(Bytes),
    Raw(RawResponse),
}

impl Payload {
    /// Borrows the JSON value, if this is a JSON payload.
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            Self::Raw(raw) => Some(raw.into_bytes()),
            _ => None,
        }
    }
}
