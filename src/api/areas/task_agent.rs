//
//  azure-devops-rest
//  api/areas/task_agent.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Distributed task API: agent pools, agents, queues, variable groups and
//! secure files.
//!
//! Pools live at the organization level (`_apis/distributedtask/pools`).
//! Queues are the project-scoped view of a pool, but the project segment is
//! optional: leaving it out lists queues across the organization.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::DevOpsClient;
use crate::api::common::{ApiError, IdentityRef, PagedList};
use crate::api::operation::Operation;
use crate::api::query::{Delimiter, QueryValue};

/// Version pinned for pools, agents, queues and secure files.
pub const TASK_AGENT_API_VERSION: &str = "7.1-preview.1";

/// Version pinned for variable groups.
pub const VARIABLE_GROUPS_API_VERSION: &str = "7.1-preview.2";

const POOLS_ROUTE: &str = "_apis/distributedtask/pools/{poolId}";
const AGENTS_ROUTE: &str = "_apis/distributedtask/pools/{poolId}/agents/{agentId}";
const QUEUES_ROUTE: &str = "{project}/_apis/distributedtask/queues/{queueId}";
const VARIABLE_GROUPS_ROUTE: &str = "{project}/_apis/distributedtask/variablegroups/{groupId}";
const SECURE_FILES_ROUTE: &str = "{project}/_apis/distributedtask/securefiles/{secureFileId}";

/// An agent pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAgentPool {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// `automation` or `deployment`.
    #[serde(default)]
    pub pool_type: Option<String>,

    #[serde(default)]
    pub is_hosted: bool,

    #[serde(default)]
    pub size: Option<i64>,

    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub owner: Option<IdentityRef>,
}

/// An agent registered in a pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAgent {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// `online` or `offline`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub os_description: Option<String>,

    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,

    /// Only present with `includeCapabilities=true`.
    #[serde(default)]
    pub system_capabilities: BTreeMap<String, String>,
}

/// A project's view of an agent pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAgentQueue {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub pool: Option<TaskAgentPoolReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAgentPoolReference {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub is_hosted: bool,
}

/// A variable group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableGroup {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// `Vsts` or `AzureKeyVault`.
    #[serde(default, rename = "type")]
    pub group_type: Option<String>,

    #[serde(default)]
    pub variables: BTreeMap<String, VariableValue>,

    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified_by: Option<IdentityRef>,
}

/// A variable in a group. Secret values come back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableValue {
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub is_secret: bool,
}

/// A secure file stored in the library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureFile {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<IdentityRef>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Action filter for pool and queue queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFilter {
    None,
    Manage,
    Use,
}

impl ActionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Manage => "manage",
            Self::Use => "use",
        }
    }
}

/// Filters for [`TaskAgentApi::get_agent_pools`].
#[derive(Debug, Clone, Default)]
pub struct GetAgentPoolsOptions {
    pub pool_name: Option<String>,
    pub properties: Vec<String>,
    pub pool_type: Option<String>,
    pub action_filter: Option<ActionFilter>,
}

/// Distributed task endpoints.
pub struct TaskAgentApi<'a> {
    client: &'a DevOpsClient,
}

impl<'a> TaskAgentApi<'a> {
    pub fn new(client: &'a DevOpsClient) -> Self {
        Self { client }
    }

    pub async fn get_agent_pools(
        &self,
        options: &GetAgentPoolsOptions,
    ) -> Result<Vec<TaskAgentPool>, ApiError> {
        let op = Operation::get(POOLS_ROUTE, TASK_AGENT_API_VERSION)
            .query("poolName", options.pool_name.as_deref())
            .query("properties", QueryValue::list(&options.properties, Delimiter::Comma))
            .query("poolType", options.pool_type.as_deref())
            .query("actionFilter", options.action_filter.map(|a| a.as_str()));
        self.client.send_collection(op).await
    }

    pub async fn get_agent_pool(&self, pool_id: i64) -> Result<TaskAgentPool, ApiError> {
        let op = Operation::get(POOLS_ROUTE, TASK_AGENT_API_VERSION).route_value("poolId", pool_id);
        self.client.send_json(op).await
    }

    pub async fn get_agents(
        &self,
        pool_id: i64,
        agent_name: Option<&str>,
        include_capabilities: Option<bool>,
    ) -> Result<Vec<TaskAgent>, ApiError> {
        let op = Operation::get(AGENTS_ROUTE, TASK_AGENT_API_VERSION)
            .route_value("poolId", pool_id)
            .query("agentName", agent_name)
            .query("includeCapabilities", include_capabilities);
        self.client.send_collection(op).await
    }

    /// Lists queues. With `project = None` the project segment is left out of
    /// the route and queues across the organization are returned.
    pub async fn get_agent_queues(
        &self,
        project: Option<&str>,
        queue_name: Option<&str>,
        action_filter: Option<ActionFilter>,
    ) -> Result<Vec<TaskAgentQueue>, ApiError> {
        let op = Operation::get(QUEUES_ROUTE, TASK_AGENT_API_VERSION)
            .optional_route_value("project", project)
            .query("queueName", queue_name)
            .query("actionFilter", action_filter.map(|a| a.as_str()));
        self.client.send_collection(op).await
    }

    pub async fn get_agent_queues_by_ids(
        &self,
        project: Option<&str>,
        queue_ids: &[i64],
    ) -> Result<Vec<TaskAgentQueue>, ApiError> {
        let op = Operation::get(QUEUES_ROUTE, TASK_AGENT_API_VERSION)
            .optional_route_value("project", project)
            .query("queueIds", QueryValue::list(queue_ids, Delimiter::Comma));
        self.client.send_collection(op).await
    }

    /// Lists variable groups, one page per call.
    pub async fn get_variable_groups(
        &self,
        project: &str,
        group_name: Option<&str>,
        top: Option<i32>,
        continuation_token: Option<&str>,
    ) -> Result<PagedList<VariableGroup>, ApiError> {
        let op = Operation::get(VARIABLE_GROUPS_ROUTE, VARIABLE_GROUPS_API_VERSION)
            .route_value("project", project)
            .query("groupName", group_name)
            .query("$top", top)
            .query("continuationToken", continuation_token);
        self.client.send_paged(op).await
    }

    pub async fn get_variable_groups_by_id(
        &self,
        project: &str,
        group_ids: &[i64],
    ) -> Result<Vec<VariableGroup>, ApiError> {
        let op = Operation::get(VARIABLE_GROUPS_ROUTE, VARIABLE_GROUPS_API_VERSION)
            .route_value("project", project)
            .query("groupIds", QueryValue::list(group_ids, Delimiter::Comma));
        self.client.send_collection(op).await
    }

    pub async fn get_secure_files(&self, project: &str) -> Result<Vec<SecureFile>, ApiError> {
        let op = Operation::get(SECURE_FILES_ROUTE, TASK_AGENT_API_VERSION)
            .route_value("project", project);
        self.client.send_collection(op).await
    }

    /// Uploads a secure file. The bytes are sent unmodified as
    /// `application/octet-stream`.
    pub async fn upload_secure_file(
        &self,
        project: &str,
        name: &str,
        content: impl Into<Bytes>,
        authorize_pipelines: Option<bool>,
    ) -> Result<SecureFile, ApiError> {
        let op = Operation::post(SECURE_FILES_ROUTE, TASK_AGENT_API_VERSION)
            .route_value("project", project)
            .query("name", name)
            .query("authorizePipelines", authorize_pipelines)
            .octet_stream(content);
        self.client.send_json(op).await
    }

    pub async fn delete_secure_file(&self, project: &str, secure_file_id: &str) -> Result<(), ApiError> {
        let op = Operation::delete(SECURE_FILES_ROUTE, TASK_AGENT_API_VERSION)
            .route_value("project", project)
            .route_value("secureFileId", secure_file_id);
        self.client.send_empty(op).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_group_deserializes() {
        let json = r#"{
            "id": 3,
            "name": "shared",
            "type": "Vsts",
            "variables": {"API_URL": {"value": "https://x"}, "KEY": {"isSecret": true}}
        }"#;
        let group: VariableGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.group_type.as_deref(), Some("Vsts"));
        assert_eq!(group.variables["API_URL"].value.as_deref(), Some("https://x"));
        assert!(group.variables["KEY"].is_secret);
        assert!(group.variables["KEY"].value.is_none());
    }

    #[test]
    fn test_action_filter_names() {
        assert_eq!(ActionFilter::Manage.as_str(), "manage");
        assert_eq!(ActionFilter::Use.as_str(), "use");
    }
}
