//
//  azure-devops-rest
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Dispatcher
//!
//! [`DevOpsClient`] turns an [`Operation`] into exactly one HTTP request and
//! decodes the answer according to the operation's declared
//! [`ResponseType`]. Every catalog method in [`areas`](super::areas) funnels
//! through [`DevOpsClient::begin_request`].
//!
//! ## Request pipeline
//!
//! 1. Resolve the route template against the route values
//! 2. Serialize query values, dropping omitted ones, `api-version` last
//! 3. Set `Accept: {media};api-version={version}`
//! 4. Attach the credential, custom headers, body and timeout
//! 5. Send once, buffer the body
//! 6. Non-2xx becomes [`ApiError::Http`]; everything else is decoded
//!
//! There is no retry, no cache and no background work. The client holds
//! only immutable configuration and a `reqwest::Client`, so it can be shared
//! across tasks freely.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_devops_rest::api::{ClientOptions, DevOpsClient};
//! use azure_devops_rest::auth::Credential;
//!
//! # async fn example() -> Result<(), azure_devops_rest::api::common::ApiError> {
//! let client = DevOpsClient::new(
//!     ClientOptions::new("https://dev.azure.com/contoso")
//!         .with_credential(Credential::pat("token")),
//! )?;
//!
//! let build = client.build().get_build("Fabrikam", 42).await?;
//! println!("{} {:?}", build.id, build.status);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::areas::{BuildApi, PipelinesApi, TaskAgentApi, TestApi, TestPlanApi, WorkApi};
use super::common::{into_paged_list, ApiError, PagedList};
use super::json::{decode_collection, decode_json};
use super::operation::{Operation, RequestBody, ResponseType};
use super::response::{Payload, RawResponse};
use super::route::dot_segment;
use crate::auth::Credential;

/// Returns the default `User-Agent`, `azdo/<version>`.
pub fn default_user_agent() -> String {
    format!("{}/{}", crate::APP_NAME, crate::VERSION)
}

/// Construction-time settings for a [`DevOpsClient`].
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `base_url` | Organization URL, e.g. `https://dev.azure.com/contoso` |
/// | `credential` | Optional credential attached to every request |
/// | `user_agent` | `User-Agent` header, defaults to `azdo/<version>` |
/// | `timeout` | Default timeout for every request |
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub credential: Option<Credential>,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: None,
            user_agent: default_user_agent(),
            timeout: None,
        }
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The HTTP client for one Azure DevOps organization.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct DevOpsClient {
    /// The underlying HTTP client
    http: Client,
    /// Organization URL without a trailing slash
    base_url: String,
    /// Optional authentication credentials
    credential: Option<Credential>,
}

impl DevOpsClient {
    /// Creates a client from options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the base URL is not an
    /// absolute `http`/`https` URL, and [`ApiError::Transport`] if the HTTP
    /// client cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| {
            ApiError::InvalidRequest(format!("Invalid organization URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidRequest(format!(
                "Organization URL must use http or https: {}",
                base_url
            )));
        }

        let mut builder = Client::builder().user_agent(options.user_agent);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            credential: options.credential,
        })
    }

    /// Shorthand for an unauthenticated client with default options.
    pub fn for_organization(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(ClientOptions::new(base_url))
    }

    /// The organization URL every route is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Builds the full request URL for an operation.
    ///
    /// ```rust
    /// use azure_devops_rest::api::DevOpsClient;
    /// use azure_devops_rest::api::operation::Operation;
    ///
    /// let client = DevOpsClient::for_organization("https://dev.azure.com/contoso/").unwrap();
    /// let op = Operation::get("{project}/_apis/build/builds/{buildId}", "7.1-preview.7")
    ///     .route_value("project", "Fabrikam")
    ///     .route_value("buildId", 42);
    ///
    /// assert_eq!(
    ///     client.build_url(&op).unwrap().as_str(),
    ///     "https://dev.azure.com/contoso/Fabrikam/_apis/build/builds/42?api-version=7.1-preview.7"
    /// );
    /// ```
    pub fn build_url(&self, operation: &Operation) -> Result<Url, ApiError> {
        let path = operation.path();
        if let Some(segment) = dot_segment(&path) {
            return Err(ApiError::InvalidRequest(format!(
                "Route '{}' resolves to a relative '{}' segment",
                operation.route_template(),
                segment
            )));
        }

        let raw = if path.is_empty() {
            format!("{}?{}", self.base_url, operation.query_string())
        } else {
            format!("{}/{}?{}", self.base_url, path, operation.query_string())
        };

        Url::parse(&raw)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid request URL '{}': {}", raw, e)))
    }

    /// Sends an operation and returns the buffered, undecoded response.
    ///
    /// This is the single place requests are issued. The descriptor is
    /// consumed.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidRequest`] if the URL or a header is malformed
    /// - [`ApiError::Transport`] if no response arrived
    /// - [`ApiError::Http`] for any non-2xx status
    pub async fn begin_request(&self, operation: Operation) -> Result<RawResponse, ApiError> {
        let url = self.build_url(&operation)?;
        let accept = operation.accept_header();

        tracing::debug!(
            method = %operation.method(),
            url = %url,
            api_version = operation.api_version(),
            "sending request"
        );

        let (method, headers, body, timeout) = operation.into_parts();
        let mut request = self.http.request(method, url).header(ACCEPT, accept);

        if let Some(credential) = &self.credential {
            request = credential.apply_to_request(request);
        }

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json { data, content_type } => {
                request.header(CONTENT_TYPE, content_type).body(data)
            }
            RequestBody::Content { data, content_type } => {
                let content_type = HeaderValue::try_from(content_type).map_err(|e| {
                    ApiError::InvalidRequest(format!("Invalid content type: {}", e))
                })?;
                request.header(CONTENT_TYPE, content_type).body(data)
            }
        };

        // Custom headers go last so they can override the defaults above.
        request = request.headers(headers);

        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(ApiError::from_response(status, &text));
        }

        Ok(RawResponse::new(status, headers, body))
    }

    /// Sends an operation and decodes the body according to its declared
    /// [`ResponseType`].
    pub async fn dispatch(&self, operation: Operation) -> Result<Payload, ApiError> {
        let response_type = operation.declared_response_type().clone();
        let raw = self.begin_request(operation).await?;

        match response_type {
            ResponseType::Json => Ok(Payload::Json(decode_json(raw.bytes())?)),
            ResponseType::Text => Ok(Payload::Text(raw.text()?)),
            ResponseType::Binary(_) => Ok(Payload::Binary(raw.into_bytes())),
            ResponseType::Raw => Ok(Payload::Raw(raw)),
        }
    }

    /// Sends an operation and decodes the JSON body into `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, operation: Operation) -> Result<T, ApiError> {
        let raw = self.begin_request(operation).await?;
        decode_json(raw.bytes())
    }

    /// Sends an operation and decodes a list, unwrapping the
    /// `{"count": n, "value": [...]}` envelope.
    pub async fn send_collection<T: DeserializeOwned>(
        &self,
        operation: Operation,
    ) -> Result<Vec<T>, ApiError> {
        let raw = self.begin_request(operation).await?;
        decode_collection(raw.bytes())
    }

    /// Sends an operation and returns one page plus its continuation token.
    pub async fn send_paged<T: DeserializeOwned>(
        &self,
        operation: Operation,
    ) -> Result<PagedList<T>, ApiError> {
        let raw = self
            .begin_request(operation.response_type(ResponseType::Raw))
            .await?;
        into_paged_list(raw)
    }

    /// Sends an operation and returns the body as text.
    pub async fn send_text(&self, operation: Operation) -> Result<String, ApiError> {
        self.begin_request(operation).await?.text()
    }

    /// Sends an operation and returns the body byte for byte.
    pub async fn send_bytes(&self, operation: Operation) -> Result<Bytes, ApiError> {
        Ok(self.begin_request(operation).await?.into_bytes())
    }

    /// Sends an operation and discards any body.
    pub async fn send_empty(&self, operation: Operation) -> Result<(), ApiError> {
        self.begin_request(operation).await.map(|_| ())
    }

    /// Build definitions, builds, logs and tags.
    pub fn build(&self) -> BuildApi<'_> {
        BuildApi::new(self)
    }

    /// YAML pipelines and their runs.
    pub fn pipelines(&self) -> PipelinesApi<'_> {
        PipelinesApi::new(self)
    }

    /// Agent pools, queues, variable groups and secure files.
    pub fn task_agent(&self) -> TaskAgentApi<'_> {
        TaskAgentApi::new(self)
    }

    /// Test runs, results and attachments.
    pub fn test(&self) -> TestApi<'_> {
        TestApi::new(self)
    }

    /// Test plans, suites, points and cases.
    pub fn test_plan(&self) -> TestPlanApi<'_> {
        TestPlanApi::new(self)
    }

    /// Team settings and iterations.
    pub fn work(&self) -> WorkApi<'_> {
        WorkApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::{Delimiter, QueryValue};

    fn client() -> DevOpsClient {
        DevOpsClient::for_organization("https://dev.azure.com/contoso").unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            DevOpsClient::for_organization("not a url"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            DevOpsClient::for_organization("ftp://dev.azure.com/contoso"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_dot_route_value_is_rejected() {
        let op = Operation::put("{project}/_apis/build/builds/{buildId}/tags/{tag}", "7.1")
            .route_value("project", "P")
            .route_value("buildId", 1)
            .route_value("tag", "..");
        assert!(matches!(
            client().build_url(&op),
            Err(ApiError::InvalidRequest(_))
        ));

        let op = Operation::put("{project}/_apis/build/builds/{buildId}/tags/{tag}", "7.1")
            .route_value("project", "P")
            .route_value("buildId", 1)
            .route_value("tag", "v1..2");
        assert_eq!(
            client().build_url(&op).unwrap().path(),
            "/contoso/P/_apis/build/builds/1/tags/v1..2"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = DevOpsClient::for_organization("https://dev.azure.com/contoso/").unwrap();
        assert_eq!(client.base_url(), "https://dev.azure.com/contoso");
    }

    #[test]
    fn test_build_url_with_query() {
        let op = Operation::get("{project}/_apis/build/builds", "7.1-preview.7")
            .route_value("project", "Fabrikam")
            .query("definitions", QueryValue::list([1, 2], Delimiter::Comma))
            .query("branchName", None::<String>);

        assert_eq!(
            client().build_url(&op).unwrap().as_str(),
            "https://dev.azure.com/contoso/Fabrikam/_apis/build/builds?definitions=1%2C2&api-version=7.1-preview.7"
        );
    }

    #[test]
    fn test_build_url_with_project_omitted() {
        let op = Operation::get("{project}/_apis/distributedtask/queues", "7.1-preview.1");
        assert_eq!(
            client().build_url(&op).unwrap().as_str(),
            "https://dev.azure.com/contoso/_apis/distributedtask/queues?api-version=7.1-preview.1"
        );
    }

    #[test]
    fn test_default_user_agent() {
        assert!(default_user_agent().starts_with("azdo/"));
    }
}
