//
//  azure-devops-rest
//  api/areas/pipelines.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipelines API: YAML pipelines, runs and run artifacts.
//!
//! # Run States
//!
//! * `inProgress` - Run is executing
//! * `canceling` - Cancellation requested
//! * `completed` - Run finished; see `result`
//!
//! # Example
//!
//! ```rust,no_run
//! use azure_devops_rest::api::DevOpsClient;
//! use azure_devops_rest::api::areas::RunPipelineRequest;
//!
//! # async fn example(client: DevOpsClient) -> Result<(), azure_devops_rest::api::ApiError> {
//! let request = RunPipelineRequest::for_branch("refs/heads/main")
//!     .with_variable("DEPLOY_ENV", "staging");
//! let run = client.pipelines().run_pipeline("Fabrikam", 3, &request).await?;
//! println!("Started run {}", run.id);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::DevOpsClient;
use crate::api::common::{ApiError, PagedList};
use crate::api::operation::Operation;

/// Version pinned for the pipelines area.
pub const PIPELINES_API_VERSION: &str = "7.1-preview.1";

const PIPELINES_ROUTE: &str = "{project}/_apis/pipelines/{pipelineId}";
const RUNS_ROUTE: &str = "{project}/_apis/pipelines/{pipelineId}/runs/{runId}";
const ARTIFACTS_ROUTE: &str = "{project}/_apis/pipelines/{pipelineId}/runs/{runId}/artifacts";

/// A pipeline definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// Folder, e.g. `\` or `\Deploy`.
    #[serde(default)]
    pub folder: Option<String>,

    #[serde(default)]
    pub revision: Option<i64>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    Unknown,
    InProgress,
    Canceling,
    Completed,
    #[serde(other)]
    Other,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::InProgress => "inProgress",
            Self::Canceling => "canceling",
            Self::Completed => "completed",
            Self::Other => "other",
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunResult {
    Unknown,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Other,
}

impl RunResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Other => "other",
        }
    }
}

/// One execution of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub state: Option<RunState>,

    #[serde(default)]
    pub result: Option<RunResult>,

    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub pipeline: Option<Pipeline>,

    #[serde(default)]
    pub url: Option<String>,
}

/// A variable passed at queue time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub value: String,

    #[serde(default)]
    pub is_secret: bool,
}

/// A published run artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,

    #[serde(default)]
    pub url: Option<String>,

    /// Present when requested with `$expand=signedContent`.
    #[serde(default)]
    pub signed_content: Option<SignedUrl>,
}

/// A pre-signed download URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub signature_expires: Option<DateTime<Utc>>,
}

/// Body of a run request.
///
/// Serializes to the `resources.repositories.self.refName` shape the server
/// expects for the branch to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<RunResources>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Variable>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub template_parameters: BTreeMap<String, String>,

    /// Validate and return the final YAML without queuing.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub preview_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunResources {
    pub repositories: BTreeMap<String, RepositoryResourceParameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryResourceParameters {
    pub ref_name: String,
}

impl RunPipelineRequest {
    /// Runs the pipeline's own repository at `ref_name`.
    pub fn for_branch(ref_name: impl Into<String>) -> Self {
        let mut repositories = BTreeMap::new();
        repositories.insert(
            "self".to_string(),
            RepositoryResourceParameters {
                ref_name: ref_name.into(),
            },
        );
        Self {
            resources: Some(RunResources { repositories }),
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(
            name.into(),
            Variable {
                value: value.into(),
                is_secret: false,
            },
        );
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.template_parameters.insert(name.into(), value.into());
        self
    }
}

/// Pipelines endpoints.
pub struct PipelinesApi<'a> {
    client: &'a DevOpsClient,
}

impl<'a> PipelinesApi<'a> {
    pub fn new(client: &'a DevOpsClient) -> Self {
        Self { client }
    }

    /// Lists pipelines, one page per call.
    pub async fn list_pipelines(
        &self,
        project: &str,
        order_by: Option<&str>,
        top: Option<i32>,
        continuation_token: Option<&str>,
    ) -> Result<PagedList<Pipeline>, ApiError> {
        let op = Operation::get(PIPELINES_ROUTE, PIPELINES_API_VERSION)
            .route_value("project", project)
            .query("orderBy", order_by)
            .query("$top", top)
            .query("continuationToken", continuation_token);
        self.client.send_paged(op).await
    }

    pub async fn get_pipeline(
        &self,
        project: &str,
        pipeline_id: i64,
        pipeline_version: Option<i64>,
    ) -> Result<Pipeline, ApiError> {
        let op = Operation::get(PIPELINES_ROUTE, PIPELINES_API_VERSION)
            .route_value("project", project)
            .route_value("pipelineId", pipeline_id)
            .query("pipelineVersion", pipeline_version);
        self.client.send_json(op).await
    }

    pub async fn run_pipeline(
        &self,
        project: &str,
        pipeline_id: i64,
        request: &RunPipelineRequest,
    ) -> Result<Run, ApiError> {
        let op = Operation::post(RUNS_ROUTE, PIPELINES_API_VERSION)
            .route_value("project", project)
            .route_value("pipelineId", pipeline_id)
            .json(request)?;
        self.client.send_json(op).await
    }

    /// Lists the most recent runs of a pipeline.
    pub async fn list_runs(&self, project: &str, pipeline_id: i64) -> Result<Vec<Run>, ApiError> {
        let op = Operation::get(RUNS_ROUTE, PIPELINES_API_VERSION)
            .route_value("project", project)
            .route_value("pipelineId", pipeline_id);
        self.client.send_collection(op).await
    }

    pub async fn get_run(&self, project: &str, pipeline_id: i64, run_id: i64) -> Result<Run, ApiError> {
        let op = Operation::get(RUNS_ROUTE, PIPELINES_API_VERSION)
            .route_value("project", project)
            .route_value("pipelineId", pipeline_id)
            .route_value("runId", run_id);
        self.client.send_json(op).await
    }

    /// Gets a run artifact by name. `expand` is `signedContent` to include a
    /// download URL.
    pub async fn get_artifact(
        &self,
        project: &str,
        pipeline_id: i64,
        run_id: i64,
        artifact_name: &str,
        expand: Option<&str>,
    ) -> Result<Artifact, ApiError> {
        let op = Operation::get(ARTIFACTS_ROUTE, PIPELINES_API_VERSION)
            .route_value("project", project)
            .route_value("pipelineId", pipeline_id)
            .route_value("runId", run_id)
            .query("artifactName", artifact_name)
            .query("$expand", expand);
        self.client.send_json(op).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_shape() {
        let request = RunPipelineRequest::for_branch("refs/heads/main").with_variable("ENV", "qa");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "resources": {"repositories": {"self": {"refName": "refs/heads/main"}}},
                "variables": {"ENV": {"value": "qa", "isSecret": false}}
            })
        );
    }

    #[test]
    fn test_preview_run_serialized_only_when_set() {
        let request = RunPipelineRequest {
            preview_run: true,
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, serde_json::json!({"previewRun": true}));
    }

    #[test]
    fn test_run_deserializes() {
        let run: Run = serde_json::from_str(
            r#"{"id": 9, "state": "completed", "result": "succeeded", "createdDate": "2024-05-01T08:00:00.5Z"}"#,
        )
        .unwrap();
        assert_eq!(run.state, Some(RunState::Completed));
        assert_eq!(run.result, Some(RunResult::Succeeded));
        assert!(run.created_date.is_some());
    }
}
