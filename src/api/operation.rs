//
//  azure-devops-rest
//  api/operation.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Operation Descriptors
//!
//! An [`Operation`] describes one REST call: verb, route template, route
//! values, query parameters, body, declared response type, custom headers
//! and the pinned API version. It is built by a catalog method, handed to
//! [`DevOpsClient`](super::DevOpsClient) and consumed exactly once.
//!
//! The API version is a constructor argument. There is no default version
//! anywhere in the client, so every request states the contract it expects.
//!
//! ## Example
//!
//! ```rust
//! use azure_devops_rest::api::operation::{Operation, ResponseType};
//! use azure_devops_rest::api::query::{Delimiter, QueryValue};
//!
//! let op = Operation::get("{project}/_apis/build/builds", "7.1-preview.7")
//!     .route_value("project", "Fabrikam")
//!     .query("$top", 25)
//!     .query("tagFilters", QueryValue::list(["nightly", "release"], Delimiter::Comma));
//!
//! assert_eq!(op.path(), "Fabrikam/_apis/build/builds");
//! assert_eq!(op.accept_header(), "application/json;api-version=7.1-preview.7");
//! assert_eq!(op.declared_response_type(), &ResponseType::Json);
//! ```

use std::fmt::Display;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use super::common::ApiError;
use super::query::{QueryParams, QueryValue};
use super::route::{resolve_route, RouteValues};

/// `Content-Type` for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// `Content-Type` for JSON patch documents used by partial updates.
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// `Content-Type` for binary uploads.
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

/// `Accept` type for zipped downloads (log bundles, attachments).
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// How the dispatcher should treat a successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Parse as JSON with date reviving.
    #[default]
    Json,
    /// Return as a UTF-8 string.
    Text,
    /// Return the bytes untouched. Holds the media type to ask for.
    Binary(String),
    /// Return the undecoded response for post-processing (pagination).
    Raw,
}

impl ResponseType {
    /// The media type sent in the `Accept` header.
    pub fn media_type(&self) -> &str {
        match self {
            Self::Json | Self::Raw => JSON_CONTENT_TYPE,
            Self::Text => "text/plain",
            Self::Binary(media_type) => media_type,
        }
    }
}

/// The request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON plus its content type (plain JSON or JSON patch).
    Json {
        data: Bytes,
        content_type: &'static str,
    },
    /// Bytes sent unmodified, e.g. file uploads.
    Content { data: Bytes, content_type: String },
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Json { content_type, .. } => Some(content_type),
            Self::Content { content_type, .. } => Some(content_type),
        }
    }
}

/// Description of a single REST call.
#[derive(Debug, Clone)]
pub struct Operation {
    api_version: String,
    method: Method,
    route_template: String,
    route_values: RouteValues,
    query: QueryParams,
    body: RequestBody,
    response_type: ResponseType,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl Operation {
    /// Creates an operation. `api_version` is required and sent verbatim.
    pub fn new(
        method: Method,
        route_template: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            method,
            route_template: route_template.into(),
            route_values: RouteValues::new(),
            query: QueryParams::new(),
            body: RequestBody::Empty,
            response_type: ResponseType::Json,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub fn get(route_template: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::new(Method::GET, route_template, api_version)
    }

    pub fn post(route_template: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::new(Method::POST, route_template, api_version)
    }

    pub fn put(route_template: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::new(Method::PUT, route_template, api_version)
    }

    pub fn patch(route_template: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::new(Method::PATCH, route_template, api_version)
    }

    pub fn delete(route_template: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::new(Method::DELETE, route_template, api_version)
    }

    /// Sets a route placeholder value.
    pub fn route_value(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.route_values.insert(name.into(), value.to_string());
        self
    }

    /// Sets a route placeholder value when present. With `None` the
    /// placeholder's segment is dropped from the path.
    pub fn optional_route_value<V: Display>(
        mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        let name = name.into();
        match value {
            Some(value) => {
                self.route_values.insert(name, value.to_string());
            }
            None => {
                self.route_values.remove(&name);
            }
        }
        self
    }

    /// Adds a query parameter. Omitted values are kept out of the URL.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(name, value);
        self
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = RequestBody::Json {
            data: serialize_body(body)?,
            content_type: JSON_CONTENT_TYPE,
        };
        Ok(self)
    }

    /// Serializes `body` as a JSON patch document.
    pub fn json_patch<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = RequestBody::Json {
            data: serialize_body(body)?,
            content_type: JSON_PATCH_CONTENT_TYPE,
        };
        Ok(self)
    }

    /// Sends `data` unmodified with an explicit content type.
    pub fn content(mut self, data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body = RequestBody::Content {
            data: data.into(),
            content_type: content_type.into(),
        };
        self
    }

    /// Sends `data` unmodified as `application/octet-stream`.
    pub fn octet_stream(self, data: impl Into<Bytes>) -> Self {
        self.content(data, OCTET_STREAM_CONTENT_TYPE)
    }

    /// Adds a custom header.
    pub fn header<K, V>(mut self, name: K, value: V) -> Result<Self, ApiError>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: Display,
        V::Error: Display,
    {
        let name = name
            .try_into()
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid header name: {}", e)))?;
        let value = value
            .try_into()
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Declares how the response body should be decoded.
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Declares a binary response of the given media type.
    pub fn binary(self, media_type: impl Into<String>) -> Self {
        self.response_type(ResponseType::Binary(media_type.into()))
    }

    /// Declares a plain text response.
    pub fn text(self) -> Self {
        self.response_type(ResponseType::Text)
    }

    /// Per-request timeout handed to the HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn route_template(&self) -> &str {
        &self.route_template
    }

    pub fn route_values(&self) -> &RouteValues {
        &self.route_values
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn declared_response_type(&self) -> &ResponseType {
        &self.response_type
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The resolved path, relative to the organization URL.
    pub fn path(&self) -> String {
        resolve_route(&self.route_template, &self.route_values)
    }

    /// The encoded query string including `api-version`, which always comes
    /// last.
    pub fn query_string(&self) -> String {
        let version = format!("api-version={}", urlencoding::encode(&self.api_version));
        let query = self.query.to_query_string();
        if query.is_empty() {
            version
        } else {
            format!("{}&{}", query, version)
        }
    }

    /// `Accept` header value carrying the media type and the API version.
    pub fn accept_header(&self) -> String {
        format!(
            "{};api-version={}",
            self.response_type.media_type(),
            self.api_version
        )
    }

    /// Splits the operation into its request parts for the dispatcher.
    pub(crate) fn into_parts(self) -> (Method, HeaderMap, RequestBody, Option<Duration>) {
        (self.method, self.headers, self.body, self.timeout)
    }
}

fn serialize_body<B: Serialize + ?Sized>(body: &B) -> Result<Bytes, ApiError> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| ApiError::InvalidRequest(format!("Could not serialize body: {}", e)))
}
