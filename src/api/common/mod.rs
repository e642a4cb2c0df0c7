//
//  azure-devops-rest
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types shared by every resource area
//!
//! This module provides the error type every client call returns, the
//! pagination adapter used by list endpoints, the team context used to derive
//! team-scoped routes, and the small reference shapes (identities, projects)
//! that appear across all areas.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`PagedList`] - A page of results plus its continuation token
//! - [`TeamContext`] - Project/team pair for team-scoped routes
//! - [`IdentityRef`], [`TeamProjectReference`], [`ShallowReference`]
//!
//! # Example
//!
//! ```rust
//! use azure_devops_rest::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(e) if e.is_not_found() => println!("Not found: {}", e.message()),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod context;
mod pagination;

pub use context::*;
pub use pagination::*;

/// Unified error type for all Azure DevOps API operations.
///
/// Every failure is surfaced to the caller as-is. The client performs no
/// retries and no local recovery, so deciding what a 404 or a 403 means is
/// left to the calling code.
///
/// # Variants
///
/// | Variant | Description |
/// |---------|-------------|
/// | `Transport` | The request never reached the server, or no response arrived |
/// | `Http` | The server answered with a non-2xx status |
/// | `Decode` | The body did not match the expected content type |
/// | `InvalidRequest` | The operation could not be turned into an HTTP request |
///
/// # Example
///
/// ```rust
/// use azure_devops_rest::api::common::ApiError;
/// use reqwest::StatusCode;
///
/// let err = ApiError::from_response(StatusCode::NOT_FOUND, r#"{"message": "not found"}"#);
/// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
/// assert_eq!(err.message(), "not found");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    ///
    /// This covers connection failures, timeouts, DNS resolution errors,
    /// and other transport-layer issues.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server responded with a non-success status code.
    ///
    /// `message` is extracted from the server's error body when it can be
    /// parsed, otherwise it falls back to the raw body or the status reason.
    #[error("HTTP {status}: {message}")]
    Http {
        /// The response status code
        status: StatusCode,
        /// Human readable message from the server
        message: String,
        /// Server-side exception type (`typeKey`/`typeName`), when present
        type_key: Option<String>,
        /// The raw response body
        body: String,
    },

    /// The response body could not be decoded as the declared type.
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// The operation could not be turned into a valid HTTP request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Builds an [`ApiError::Http`] from a status and the raw error body.
    ///
    /// Azure DevOps returns errors in the format:
    /// ```json
    /// {"$id": "1", "message": "Human readable message", "typeKey": "BuildNotFoundException"}
    /// ```
    ///
    /// Some gateways answer with `{"error": {"message": "..."}}` or
    /// `{"errors": [{"message": "..."}]}` instead. All three are tried before
    /// falling back to the raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let mut message = None;
        let mut type_key = None;

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            message = json
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| {
                    json.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                })
                .or_else(|| {
                    json.get("errors")
                        .and_then(|e| e.as_array())
                        .and_then(|arr| arr.first())
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                })
                .map(str::to_string);

            type_key = json
                .get("typeKey")
                .or_else(|| json.get("typeName"))
                .and_then(|t| t.as_str())
                .map(str::to_string);
        }

        let message = message.unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

        Self::Http {
            status,
            message,
            type_key,
            body: body.to_string(),
        }
    }

    /// Returns the HTTP status for server errors, `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Returns the most specific message available for this error.
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Transport(err) => err.to_string(),
            Self::Decode(message) | Self::InvalidRequest(message) => message.clone(),
        }
    }

    /// Returns the server-side exception type, when the server sent one.
    pub fn type_key(&self) -> Option<&str> {
        match self {
            Self::Http { type_key, .. } => type_key.as_deref(),
            _ => None,
        }
    }

    /// `true` for a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// `true` for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// `true` for a 403 response.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// `true` when the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Lightweight identity reference.
///
/// Appears as `requestedFor`, `owner`, `tester` and similar fields across
/// every area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    /// Identity id (a GUID)
    #[serde(default)]
    pub id: Option<String>,

    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Sign-in name, usually an email address
    #[serde(default)]
    pub unique_name: Option<String>,

    /// REST URL of the identity
    #[serde(default)]
    pub url: Option<String>,

    /// Avatar URL
    #[serde(default)]
    pub image_url: Option<String>,
}

impl IdentityRef {
    /// Returns the best name to show for this identity.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.unique_name.as_deref())
            .unwrap_or("-")
    }
}

/// Reference to a team project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProjectReference {
    /// Project id (a GUID)
    #[serde(default)]
    pub id: Option<String>,

    /// Project name
    #[serde(default)]
    pub name: Option<String>,

    /// `wellFormed`, `createPending`, `deleting`, ...
    #[serde(default)]
    pub state: Option<String>,

    /// REST URL of the project
    #[serde(default)]
    pub url: Option<String>,
}

/// The minimal `{id, name, url}` reference used for builds, plans, suites
/// and configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShallowReference {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}
