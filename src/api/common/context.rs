//
//  azure-devops-rest
//  api/common/context.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Team context used to derive `{project}/{team}` route values.

use serde::{Deserialize, Serialize};

/// A project/team pair for team-scoped endpoints.
///
/// Either the name or the id may be given for each half. Ids win over names
/// when both are set, since names can be renamed while ids cannot.
///
/// # Example
///
/// ```rust
/// use azure_devops_rest::api::common::TeamContext;
///
/// let ctx = TeamContext::new("Fabrikam").with_team("Web");
/// assert_eq!(ctx.project_segment(), Some("Fabrikam"));
/// assert_eq!(ctx.team_segment(), Some("Web"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamContext {
    /// Project name
    #[serde(default)]
    pub project: Option<String>,

    /// Project id
    #[serde(default)]
    pub project_id: Option<String>,

    /// Team name
    #[serde(default)]
    pub team: Option<String>,

    /// Team id
    #[serde(default)]
    pub team_id: Option<String>,
}

impl TeamContext {
    /// Creates a context for a project's default team.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            ..Default::default()
        }
    }

    /// Sets the team name.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// The value for the `{project}` route segment.
    pub fn project_segment(&self) -> Option<&str> {
        self.project_id.as_deref().or(self.project.as_deref())
    }

    /// The value for the `{team}` route segment. `None` targets the
    /// project's default team.
    pub fn team_segment(&self) -> Option<&str> {
        self.team_id.as_deref().or(self.team.as_deref())
    }
}
