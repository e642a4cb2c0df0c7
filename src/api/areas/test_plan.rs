//
//  azure-devops-rest
//  api/areas/test_plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Test plan API: plans, suites, points and test cases.
//!
//! Plans contain a tree of suites. Each suite holds test cases, and each
//! (test case, configuration) pair in a suite is a test point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::DevOpsClient;
use crate::api::common::{ApiError, IdentityRef, PagedList, ShallowReference, TeamProjectReference};
use crate::api::operation::Operation;
use crate::api::query::{Delimiter, QueryValue};

/// Version pinned for the test plan area.
pub const TEST_PLAN_API_VERSION: &str = "7.1-preview.1";

const PLANS_ROUTE: &str = "{project}/_apis/testplan/plans/{planId}";
const SUITES_ROUTE: &str = "{project}/_apis/testplan/Plans/{planId}/suites/{suiteId}";
const POINTS_ROUTE: &str = "{project}/_apis/testplan/Plans/{planId}/Suites/{suiteId}/TestPoint";
const TEST_CASES_ROUTE: &str =
    "{project}/_apis/testplan/Plans/{planId}/Suites/{suiteId}/TestCase/{testCaseIds}";

/// A test plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// `Active` or `Inactive`.
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub area_path: Option<String>,

    #[serde(default)]
    pub iteration: Option<String>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub owner: Option<IdentityRef>,

    #[serde(default)]
    pub root_suite: Option<ShallowReference>,

    #[serde(default)]
    pub project: Option<TeamProjectReference>,
}

/// Body of a create-plan request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlanCreateParams {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// A test suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuite {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// `staticTestSuite`, `dynamicTestSuite` or `requirementTestSuite`.
    #[serde(default)]
    pub suite_type: Option<String>,

    #[serde(default)]
    pub parent_suite: Option<ShallowReference>,

    #[serde(default)]
    pub has_children: bool,

    #[serde(default)]
    pub last_updated_date: Option<DateTime<Utc>>,
}

/// A test point: one test case under one configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPoint {
    pub id: i64,

    #[serde(default)]
    pub tester: Option<IdentityRef>,

    #[serde(default)]
    pub configuration: Option<ShallowReference>,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub last_updated_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub results: Option<TestPointResults>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPointResults {
    #[serde(default)]
    pub outcome: Option<String>,

    #[serde(default)]
    pub last_result_state: Option<String>,
}

/// A test case in a suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub work_item: Option<WorkItemDetails>,

    #[serde(default)]
    pub point_assignments: Vec<PointAssignment>,

    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemDetails {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAssignment {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub configuration_name: Option<String>,

    #[serde(default)]
    pub tester: Option<IdentityRef>,
}

/// Test plan endpoints.
pub struct TestPlanApi<'a> {
    client: &'a DevOpsClient,
}

impl<'a> TestPlanApi<'a> {
    pub fn new(client: &'a DevOpsClient) -> Self {
        Self { client }
    }

    /// Lists test plans, one page per call.
    pub async fn get_test_plans(
        &self,
        project: &str,
        owner: Option<&str>,
        continuation_token: Option<&str>,
        include_plan_details: Option<bool>,
        filter_active_plans: Option<bool>,
    ) -> Result<PagedList<TestPlan>, ApiError> {
        let op = Operation::get(PLANS_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .query("owner", owner)
            .query("continuationToken", continuation_token)
            .query("includePlanDetails", include_plan_details)
            .query("filterActivePlans", filter_active_plans);
        self.client.send_paged(op).await
    }

    pub async fn get_test_plan_by_id(&self, project: &str, plan_id: i64) -> Result<TestPlan, ApiError> {
        let op = Operation::get(PLANS_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .route_value("planId", plan_id);
        self.client.send_json(op).await
    }

    pub async fn create_test_plan(
        &self,
        project: &str,
        params: &TestPlanCreateParams,
    ) -> Result<TestPlan, ApiError> {
        let op = Operation::post(PLANS_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .json(params)?;
        self.client.send_json(op).await
    }

    pub async fn delete_test_plan(&self, project: &str, plan_id: i64) -> Result<(), ApiError> {
        let op = Operation::delete(PLANS_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .route_value("planId", plan_id);
        self.client.send_empty(op).await
    }

    /// Lists the suites of a plan, one page per call.
    pub async fn get_test_suites_for_plan(
        &self,
        project: &str,
        plan_id: i64,
        continuation_token: Option<&str>,
        as_tree_view: Option<bool>,
    ) -> Result<PagedList<TestSuite>, ApiError> {
        let op = Operation::get(SUITES_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .route_value("planId", plan_id)
            .query("continuationToken", continuation_token)
            .query("asTreeView", as_tree_view);
        self.client.send_paged(op).await
    }

    /// Gets specific points of a suite. `point_ids` are comma-joined.
    pub async fn get_points_list(
        &self,
        project: &str,
        plan_id: i64,
        suite_id: i64,
        point_ids: &[i64],
        continuation_token: Option<&str>,
    ) -> Result<PagedList<TestPoint>, ApiError> {
        let op = Operation::get(POINTS_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .route_value("planId", plan_id)
            .route_value("suiteId", suite_id)
            .query("pointIds", QueryValue::list(point_ids, Delimiter::Comma))
            .query("continuationToken", continuation_token);
        self.client.send_paged(op).await
    }

    /// Lists the test cases of a suite. With an empty `test_case_ids` every
    /// case is returned; otherwise the ids become a comma-joined route
    /// segment.
    pub async fn get_test_case_list(
        &self,
        project: &str,
        plan_id: i64,
        suite_id: i64,
        test_case_ids: &[i64],
    ) -> Result<Vec<TestCase>, ApiError> {
        let ids = QueryValue::list(test_case_ids, Delimiter::Comma).render();
        let op = Operation::get(TEST_CASES_ROUTE, TEST_PLAN_API_VERSION)
            .route_value("project", project)
            .route_value("planId", plan_id)
            .route_value("suiteId", suite_id)
            .optional_route_value("testCaseIds", ids);
        self.client.send_collection(op).await
    }
}
