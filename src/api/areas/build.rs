//
//  azure-devops-rest
//  api/areas/build.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build API: builds, definitions, logs and tags.
//!
//! # Build Lifecycle
//!
//! ```text
//! notStarted -> inProgress -> completed (succeeded/partiallySucceeded/failed/canceled)
//!                         \-> cancelling -> completed (canceled)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use azure_devops_rest::api::DevOpsClient;
//! use azure_devops_rest::api::areas::{BuildStatus, GetBuildsOptions};
//!
//! # async fn example(client: DevOpsClient) -> Result<(), azure_devops_rest::api::ApiError> {
//! let options = GetBuildsOptions {
//!     definitions: vec![12, 14],
//!     status_filter: Some(BuildStatus::InProgress),
//!     top: Some(20),
//!     ..Default::default()
//! };
//!
//! let page = client.build().get_builds("Fabrikam", &options).await?;
//! for build in page.iter() {
//!     println!("#{} {}", build.id, build.build_number.as_deref().unwrap_or("-"));
//! }
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::DevOpsClient;
use crate::api::common::{ApiError, IdentityRef, PagedList, TeamProjectReference};
use crate::api::operation::{Operation, ZIP_CONTENT_TYPE};
use crate::api::query::{Delimiter, QueryValue};

/// Version pinned for builds and definitions.
pub const BUILD_API_VERSION: &str = "7.1-preview.7";

/// Version pinned for build logs.
pub const BUILD_LOGS_API_VERSION: &str = "7.1-preview.2";

/// Version pinned for build tags.
pub const BUILD_TAGS_API_VERSION: &str = "7.1-preview.3";

const BUILDS_ROUTE: &str = "{project}/_apis/build/builds/{buildId}";
const BUILD_LOGS_ROUTE: &str = "{project}/_apis/build/builds/{buildId}/logs/{logId}";
const BUILD_TAGS_ROUTE: &str = "{project}/_apis/build/builds/{buildId}/tags/{tag}";
const DEFINITIONS_ROUTE: &str = "{project}/_apis/build/definitions/{definitionId}";

/// Execution status of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildStatus {
    None,
    InProgress,
    Completed,
    Cancelling,
    Postponed,
    NotStarted,
    All,
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    /// The wire name, as used in `statusFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
            Self::Cancelling => "cancelling",
            Self::Postponed => "postponed",
            Self::NotStarted => "notStarted",
            Self::All => "all",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of a completed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildResult {
    None,
    Succeeded,
    PartiallySucceeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl BuildResult {
    /// The wire name, as used in `resultFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Succeeded => "succeeded",
            Self::PartiallySucceeded => "partiallySucceeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

/// Sort order for build queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildQueryOrder {
    FinishTimeAscending,
    FinishTimeDescending,
    QueueTimeDescending,
    QueueTimeAscending,
    StartTimeDescending,
    StartTimeAscending,
}

impl BuildQueryOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinishTimeAscending => "finishTimeAscending",
            Self::FinishTimeDescending => "finishTimeDescending",
            Self::QueueTimeDescending => "queueTimeDescending",
            Self::QueueTimeAscending => "queueTimeAscending",
            Self::StartTimeDescending => "startTimeDescending",
            Self::StartTimeAscending => "startTimeAscending",
        }
    }
}

/// A single build.
///
/// # Fields
///
/// * `id` - Build id, unique within the project collection
/// * `build_number` - Formatted number, e.g. `20240301.4`
/// * `status` / `result` - Lifecycle state and, once completed, the outcome
/// * `queue_time`, `start_time`, `finish_time` - Lifecycle timestamps
/// * `source_branch` / `source_version` - What was built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: i64,

    #[serde(default)]
    pub build_number: Option<String>,

    #[serde(default)]
    pub status: Option<BuildStatus>,

    #[serde(default)]
    pub result: Option<BuildResult>,

    #[serde(default)]
    pub queue_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,

    /// Full ref name, e.g. `refs/heads/main`.
    #[serde(default)]
    pub source_branch: Option<String>,

    /// Commit SHA or changeset that was built.
    #[serde(default)]
    pub source_version: Option<String>,

    #[serde(default)]
    pub definition: Option<DefinitionReference>,

    #[serde(default)]
    pub project: Option<TeamProjectReference>,

    #[serde(default)]
    pub requested_for: Option<IdentityRef>,

    /// `manual`, `individualCI`, `schedule`, `pullRequest`, ...
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub keep_forever: Option<bool>,

    #[serde(default)]
    pub url: Option<String>,
}

/// The `{id, name}` reference a build carries for its definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionReference {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

/// A build definition as returned by list and get calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefinition {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// Folder path, e.g. `\Web`.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub revision: Option<i64>,

    /// `enabled`, `paused` or `disabled`.
    #[serde(default)]
    pub queue_status: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub project: Option<TeamProjectReference>,

    #[serde(default)]
    pub authored_by: Option<IdentityRef>,

    /// Only present with `includeLatestBuilds=true`.
    #[serde(default)]
    pub latest_build: Option<Box<Build>>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Metadata for one build log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLog {
    pub id: i64,

    #[serde(default, rename = "type")]
    pub log_type: Option<String>,

    #[serde(default)]
    pub line_count: Option<i64>,

    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_changed_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Body of a queue-build request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueBuildRequest {
    pub definition: DefinitionReference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,

    /// Queue-time variables, serialized as a JSON object string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

impl QueueBuildRequest {
    pub fn new(definition_id: i64) -> Self {
        Self {
            definition: DefinitionReference {
                id: definition_id,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.source_branch = Some(branch.into());
        self
    }
}

/// Partial update of a build. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BuildStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_forever: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained_by_release: Option<bool>,
}

/// Filters for [`BuildApi::get_builds`]. Empty lists and `None` are omitted.
#[derive(Debug, Clone, Default)]
pub struct GetBuildsOptions {
    pub definitions: Vec<i64>,
    pub queues: Vec<i64>,
    pub build_number: Option<String>,
    pub min_time: Option<DateTime<Utc>>,
    pub max_time: Option<DateTime<Utc>>,
    pub requested_for: Option<String>,
    pub status_filter: Option<BuildStatus>,
    pub result_filter: Option<BuildResult>,
    pub tag_filters: Vec<String>,
    pub top: Option<i32>,
    pub continuation_token: Option<String>,
    pub max_builds_per_definition: Option<i32>,
    pub query_order: Option<BuildQueryOrder>,
    pub branch_name: Option<String>,
    pub build_ids: Vec<i64>,
    pub repository_id: Option<String>,
    pub repository_type: Option<String>,
}

/// Filters for [`BuildApi::get_definitions`].
#[derive(Debug, Clone, Default)]
pub struct GetDefinitionsOptions {
    pub name: Option<String>,
    pub path: Option<String>,
    pub definition_ids: Vec<i64>,
    pub top: Option<i32>,
    pub continuation_token: Option<String>,
    pub include_latest_builds: Option<bool>,
}

/// Build endpoints.
pub struct BuildApi<'a> {
    client: &'a DevOpsClient,
}

impl<'a> BuildApi<'a> {
    pub fn new(client: &'a DevOpsClient) -> Self {
        Self { client }
    }

    pub async fn get_build(&self, project: &str, build_id: i64) -> Result<Build, ApiError> {
        let op = Operation::get(BUILDS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id);
        self.client.send_json(op).await
    }

    /// Lists builds. One page per call; pass the returned continuation token
    /// back through `options.continuation_token` for the next one.
    pub async fn get_builds(
        &self,
        project: &str,
        options: &GetBuildsOptions,
    ) -> Result<PagedList<Build>, ApiError> {
        let op = Operation::get(BUILDS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .query("definitions", QueryValue::list(&options.definitions, Delimiter::Comma))
            .query("queues", QueryValue::list(&options.queues, Delimiter::Comma))
            .query("buildNumber", options.build_number.as_deref())
            .query("minTime", options.min_time)
            .query("maxTime", options.max_time)
            .query("requestedFor", options.requested_for.as_deref())
            .query("statusFilter", options.status_filter.map(|s| s.as_str()))
            .query("resultFilter", options.result_filter.map(|r| r.as_str()))
            .query("tagFilters", QueryValue::list(&options.tag_filters, Delimiter::Comma))
            .query("$top", options.top)
            .query("continuationToken", options.continuation_token.as_deref())
            .query("maxBuildsPerDefinition", options.max_builds_per_definition)
            .query("queryOrder", options.query_order.map(|o| o.as_str()))
            .query("branchName", options.branch_name.as_deref())
            .query("buildIds", QueryValue::list(&options.build_ids, Delimiter::Comma))
            .query("repositoryId", options.repository_id.as_deref())
            .query("repositoryType", options.repository_type.as_deref());
        self.client.send_paged(op).await
    }

    pub async fn queue_build(
        &self,
        project: &str,
        request: &QueueBuildRequest,
        ignore_warnings: Option<bool>,
    ) -> Result<Build, ApiError> {
        let op = Operation::post(BUILDS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .query("ignoreWarnings", ignore_warnings)
            .json(request)?;
        self.client.send_json(op).await
    }

    /// Updates a build. With `retry = Some(true)` the server re-runs the
    /// failed jobs instead.
    pub async fn update_build(
        &self,
        project: &str,
        build_id: i64,
        update: &BuildUpdate,
        retry: Option<bool>,
    ) -> Result<Build, ApiError> {
        let op = Operation::patch(BUILDS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id)
            .query("retry", retry)
            .json(update)?;
        self.client.send_json(op).await
    }

    pub async fn delete_build(&self, project: &str, build_id: i64) -> Result<(), ApiError> {
        let op = Operation::delete(BUILDS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id);
        self.client.send_empty(op).await
    }

    pub async fn get_build_logs(
        &self,
        project: &str,
        build_id: i64,
    ) -> Result<Vec<BuildLog>, ApiError> {
        let op = Operation::get(BUILD_LOGS_ROUTE, BUILD_LOGS_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id);
        self.client.send_collection(op).await
    }

    /// Returns one log as plain text, optionally limited to a line range.
    pub async fn get_build_log_lines(
        &self,
        project: &str,
        build_id: i64,
        log_id: i64,
        start_line: Option<i64>,
        end_line: Option<i64>,
    ) -> Result<String, ApiError> {
        let op = Operation::get(BUILD_LOGS_ROUTE, BUILD_LOGS_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id)
            .route_value("logId", log_id)
            .query("startLine", start_line)
            .query("endLine", end_line)
            .text();
        self.client.send_text(op).await
    }

    /// Downloads every log of a build as one zip archive.
    pub async fn get_build_logs_zip(&self, project: &str, build_id: i64) -> Result<Bytes, ApiError> {
        let op = Operation::get(BUILD_LOGS_ROUTE, BUILD_LOGS_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id)
            .binary(ZIP_CONTENT_TYPE);
        self.client.send_bytes(op).await
    }

    pub async fn get_build_tags(&self, project: &str, build_id: i64) -> Result<Vec<String>, ApiError> {
        let op = Operation::get(BUILD_TAGS_ROUTE, BUILD_TAGS_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id);
        self.client.send_collection(op).await
    }

    /// Adds a tag and returns the build's full tag list.
    pub async fn add_build_tag(
        &self,
        project: &str,
        build_id: i64,
        tag: &str,
    ) -> Result<Vec<String>, ApiError> {
        let op = Operation::put(BUILD_TAGS_ROUTE, BUILD_TAGS_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id)
            .route_value("tag", tag);
        self.client.send_collection(op).await
    }

    /// Removes a tag and returns the remaining tags.
    pub async fn delete_build_tag(
        &self,
        project: &str,
        build_id: i64,
        tag: &str,
    ) -> Result<Vec<String>, ApiError> {
        let op = Operation::delete(BUILD_TAGS_ROUTE, BUILD_TAGS_API_VERSION)
            .route_value("project", project)
            .route_value("buildId", build_id)
            .route_value("tag", tag);
        self.client.send_collection(op).await
    }

    pub async fn get_definitions(
        &self,
        project: &str,
        options: &GetDefinitionsOptions,
    ) -> Result<PagedList<BuildDefinition>, ApiError> {
        let op = Operation::get(DEFINITIONS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .query("name", options.name.as_deref())
            .query("path", options.path.as_deref())
            .query(
                "definitionIds",
                QueryValue::list(&options.definition_ids, Delimiter::Comma),
            )
            .query("$top", options.top)
            .query("continuationToken", options.continuation_token.as_deref())
            .query("includeLatestBuilds", options.include_latest_builds);
        self.client.send_paged(op).await
    }

    pub async fn get_definition(
        &self,
        project: &str,
        definition_id: i64,
        revision: Option<i64>,
    ) -> Result<BuildDefinition, ApiError> {
        let op = Operation::get(DEFINITIONS_ROUTE, BUILD_API_VERSION)
            .route_value("project", project)
            .route_value("definitionId", definition_id)
            .query("revision", revision);
        self.client.send_json(op).await
    }
}
