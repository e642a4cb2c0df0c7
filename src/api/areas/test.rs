//
//  azure-devops-rest
//  api/areas/test.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Test API: test runs, results and attachments.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::DevOpsClient;
use crate::api::common::{ApiError, IdentityRef, ShallowReference};
use crate::api::operation::{Operation, ZIP_CONTENT_TYPE};
use crate::api::query::{Delimiter, QueryValue};

/// Version pinned for test runs and attachments.
pub const TEST_RUNS_API_VERSION: &str = "7.1-preview.3";

/// Version pinned for test results.
pub const TEST_RESULTS_API_VERSION: &str = "7.1-preview.6";

const RUNS_ROUTE: &str = "{project}/_apis/test/Runs/{runId}";
const RESULTS_ROUTE: &str = "{project}/_apis/test/Runs/{runId}/results/{testCaseResultId}";
const ATTACHMENTS_ROUTE: &str = "{project}/_apis/test/Runs/{runId}/attachments/{attachmentId}";

/// A test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// `NotStarted`, `InProgress`, `Completed`, `Aborted`, ...
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub is_automated: bool,

    #[serde(default)]
    pub total_tests: Option<i64>,

    #[serde(default)]
    pub passed_tests: Option<i64>,

    #[serde(default)]
    pub unanalyzed_tests: Option<i64>,

    #[serde(default)]
    pub started_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub build: Option<ShallowReference>,

    #[serde(default)]
    pub owner: Option<IdentityRef>,

    #[serde(default)]
    pub url: Option<String>,
}

/// The result of one test case in a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub id: i64,

    #[serde(default)]
    pub test_case_title: Option<String>,

    #[serde(default)]
    pub automated_test_name: Option<String>,

    /// `Passed`, `Failed`, `NotExecuted`, ...
    #[serde(default)]
    pub outcome: Option<String>,

    #[serde(default)]
    pub duration_in_ms: Option<f64>,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub stack_trace: Option<String>,

    #[serde(default)]
    pub started_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tester: Option<IdentityRef>,
}

/// Test outcome filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Unspecified,
    None,
    Passed,
    Failed,
    Inconclusive,
    Timeout,
    Aborted,
    Blocked,
    NotExecuted,
    Warning,
    Error,
    NotApplicable,
    Paused,
    InProgress,
    NotImpacted,
}

impl TestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::None => "None",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Inconclusive => "Inconclusive",
            Self::Timeout => "Timeout",
            Self::Aborted => "Aborted",
            Self::Blocked => "Blocked",
            Self::NotExecuted => "NotExecuted",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::NotApplicable => "NotApplicable",
            Self::Paused => "Paused",
            Self::InProgress => "InProgress",
            Self::NotImpacted => "NotImpacted",
        }
    }
}

impl std::fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters for [`TestApi::get_test_runs`].
#[derive(Debug, Clone, Default)]
pub struct GetTestRunsOptions {
    /// `vstfs:///Build/Build/{id}` URI of the build the runs belong to.
    pub build_uri: Option<String>,
    pub owner: Option<String>,
    pub automated: Option<bool>,
    pub include_run_details: Option<bool>,
    pub skip: Option<i32>,
    pub top: Option<i32>,
}

/// Filters for [`TestApi::get_test_results`].
#[derive(Debug, Clone, Default)]
pub struct GetTestResultsOptions {
    /// `None`, `Iterations`, `WorkItems`, `SubResults`, `Point`.
    pub details_to_include: Option<String>,
    pub skip: Option<i32>,
    pub top: Option<i32>,
    pub outcomes: Vec<TestOutcome>,
}

/// Test endpoints.
pub struct TestApi<'a> {
    client: &'a DevOpsClient,
}

impl<'a> TestApi<'a> {
    pub fn new(client: &'a DevOpsClient) -> Self {
        Self { client }
    }

    pub async fn get_test_runs(
        &self,
        project: &str,
        options: &GetTestRunsOptions,
    ) -> Result<Vec<TestRun>, ApiError> {
        let op = Operation::get(RUNS_ROUTE, TEST_RUNS_API_VERSION)
            .route_value("project", project)
            .query("buildUri", options.build_uri.as_deref())
            .query("owner", options.owner.as_deref())
            .query("automated", options.automated)
            .query("includeRunDetails", options.include_run_details)
            .query("$skip", options.skip)
            .query("$top", options.top);
        self.client.send_collection(op).await
    }

    pub async fn get_test_run_by_id(
        &self,
        project: &str,
        run_id: i64,
        include_details: Option<bool>,
    ) -> Result<TestRun, ApiError> {
        let op = Operation::get(RUNS_ROUTE, TEST_RUNS_API_VERSION)
            .route_value("project", project)
            .route_value("runId", run_id)
            .query("includeDetails", include_details);
        self.client.send_json(op).await
    }

    pub async fn get_test_results(
        &self,
        project: &str,
        run_id: i64,
        options: &GetTestResultsOptions,
    ) -> Result<Vec<TestCaseResult>, ApiError> {
        let op = Operation::get(RESULTS_ROUTE, TEST_RESULTS_API_VERSION)
            .route_value("project", project)
            .route_value("runId", run_id)
            .query("detailsToInclude", options.details_to_include.as_deref())
            .query("$skip", options.skip)
            .query("$top", options.top)
            .query("outcomes", QueryValue::list(&options.outcomes, Delimiter::Comma));
        self.client.send_collection(op).await
    }

    /// Downloads a run attachment as a zip archive, byte for byte.
    pub async fn get_test_attachment_zip(
        &self,
        project: &str,
        run_id: i64,
        attachment_id: i64,
    ) -> Result<Bytes, ApiError> {
        let op = Operation::get(ATTACHMENTS_ROUTE, TEST_RUNS_API_VERSION)
            .route_value("project", project)
            .route_value("runId", run_id)
            .route_value("attachmentId", attachment_id)
            .binary(ZIP_CONTENT_TYPE);
        self.client.send_bytes(op).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_list_renders_with_commas() {
        let value = QueryValue::list(
            &[TestOutcome::Failed, TestOutcome::Aborted],
            Delimiter::Comma,
        );
        assert_eq!(value.render().as_deref(), Some("Failed,Aborted"));
    }

    #[test]
    fn test_result_deserializes() {
        let result: TestCaseResult = serde_json::from_str(
            r#"{"id": 100000, "outcome": "Failed", "durationInMs": 12.5, "completedDate": "2024-04-02T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(result.outcome.as_deref(), Some("Failed"));
        assert_eq!(result.duration_in_ms, Some(12.5));
        assert!(result.completed_date.is_some());
    }
}
