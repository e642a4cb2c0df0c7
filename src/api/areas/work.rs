//
//  azure-devops-rest
//  api/areas/work.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Work API: team settings and iterations.
//!
//! These routes are team-scoped. The `{project}` and `{team}` segments come
//! from a [`TeamContext`]; a context without a team targets the project's
//! default team and the `{team}` segment is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::DevOpsClient;
use crate::api::common::{ApiError, TeamContext};
use crate::api::operation::Operation;

/// Version pinned for the work area.
pub const WORK_API_VERSION: &str = "7.1-preview.1";

const TEAM_SETTINGS_ROUTE: &str = "{project}/{team}/_apis/work/teamsettings";
const ITERATIONS_ROUTE: &str = "{project}/{team}/_apis/work/teamsettings/iterations/{id}";

/// An iteration (sprint) assigned to a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSettingsIteration {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Classification path, e.g. `Fabrikam\Sprint 4`.
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub attributes: Option<IterationAttributes>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationAttributes {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finish_date: Option<DateTime<Utc>>,

    /// `past`, `current` or `future`.
    #[serde(default)]
    pub time_frame: Option<String>,
}

/// Team configuration: backlog visibility, working days, bug behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSetting {
    #[serde(default)]
    pub backlog_iteration: Option<TeamSettingsIteration>,

    #[serde(default)]
    pub default_iteration: Option<TeamSettingsIteration>,

    #[serde(default)]
    pub backlog_visibilities: std::collections::BTreeMap<String, bool>,

    /// `asRequirements`, `asTasks` or `off`.
    #[serde(default)]
    pub bugs_behavior: Option<String>,

    #[serde(default)]
    pub working_days: Vec<String>,
}

/// Work endpoints.
pub struct WorkApi<'a> {
    client: &'a DevOpsClient,
}

impl<'a> WorkApi<'a> {
    pub fn new(client: &'a DevOpsClient) -> Self {
        Self { client }
    }

    /// Lists a team's iterations. `timeframe` is `current` to get only the
    /// running sprint.
    pub async fn get_team_iterations(
        &self,
        team_context: &TeamContext,
        timeframe: Option<&str>,
    ) -> Result<Vec<TeamSettingsIteration>, ApiError> {
        let op = team_operation(Operation::get(ITERATIONS_ROUTE, WORK_API_VERSION), team_context)
            .query("$timeframe", timeframe);
        self.client.send_collection(op).await
    }

    pub async fn get_team_settings(&self, team_context: &TeamContext) -> Result<TeamSetting, ApiError> {
        let op = team_operation(
            Operation::get(TEAM_SETTINGS_ROUTE, WORK_API_VERSION),
            team_context,
        );
        self.client.send_json(op).await
    }
}

fn team_operation(op: Operation, team_context: &TeamContext) -> Operation {
    op.optional_route_value("project", team_context.project_segment())
        .optional_route_value("team", team_context.team_segment())
}
