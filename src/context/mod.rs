//
//  azure-devops-rest
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command Context
//!
//! Detects which organization, project and repository a command runs
//! against, from flags, environment, configuration and the local git remote.
//!
//! - [`git`]: Read-only repository access via `git2`
//! - [`resolver`]: Remote URL parsing and the resolution order

mod git;
mod resolver;

pub use git::*;
pub use resolver::*;

use anyhow::Result;

use crate::api::common::TeamContext;

/// The resolved target of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevOpsContext {
    /// Organization short name, when it came from a flag or the config.
    pub organization: Option<String>,
    /// Organization base URL, e.g. `https://dev.azure.com/contoso`.
    pub organization_url: String,
    pub project: Option<String>,
    /// Repository name, when detected from the git remote.
    pub repository: Option<String>,
}

impl DevOpsContext {
    /// Returns the project or an error telling the user how to set one.
    pub fn require_project(&self) -> Result<&str> {
        self.project.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No project specified. Use --project, set AZDO_PROJECT, or run `azdo config set project <name>`."
            )
        })
    }

    /// A team context for the project's default team.
    pub fn team_context(&self) -> Result<TeamContext> {
        Ok(TeamContext::new(self.require_project()?))
    }

    /// Web URL of the project, or the organization when there is no project.
    pub fn web_url(&self) -> String {
        match &self.project {
            Some(project) => format!(
                "{}/{}",
                self.organization_url,
                urlencoding::encode(project)
            ),
            None => self.organization_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(project: Option<&str>) -> DevOpsContext {
        DevOpsContext {
            organization: Some("contoso".to_string()),
            organization_url: "https://dev.azure.com/contoso".to_string(),
            project: project.map(str::to_string),
            repository: None,
        }
    }

    #[test]
    fn test_require_project() {
        assert_eq!(ctx(Some("Fabrikam")).require_project().unwrap(), "Fabrikam");
        assert!(ctx(None).require_project().is_err());
    }

    #[test]
    fn test_web_url_encodes_project() {
        assert_eq!(
            ctx(Some("My Project")).web_url(),
            "https://dev.azure.com/contoso/My%20Project"
        );
        assert_eq!(ctx(None).web_url(), "https://dev.azure.com/contoso");
    }
}
