//
//  azure-devops-rest
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Context Resolution
//!
//! Works out which organization and project a command targets.
//!
//! ## Priority
//!
//! 1. `--org` / `--project` flags
//! 2. `AZDO_ORG` / `AZDO_PROJECT` (read by clap into the same flags)
//! 3. The configuration file
//! 4. The `origin` remote of the current git repository
//!
//! ## Recognized Remote URLs
//!
//! | Form | Example |
//! |------|---------|
//! | HTTPS | `https://dev.azure.com/contoso/Fabrikam/_git/web` |
//! | HTTPS with user | `https://contoso@dev.azure.com/contoso/Fabrikam/_git/web` |
//! | SSH | `git@ssh.dev.azure.com:v3/contoso/Fabrikam/web` |
//! | Legacy HTTPS | `https://contoso.visualstudio.com/Fabrikam/_git/web` |
//! | Legacy SSH | `contoso@vs-ssh.visualstudio.com:v3/contoso/Fabrikam/web` |
//! | Server | `https://tfs.corp.local/tfs/DefaultCollection/Fabrikam/_git/web` |

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{DevOpsContext, GitContext};
use crate::cli::GlobalOptions;
use crate::config::{organization_url, Config};

static HTTPS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:[^@/]+@)?dev\.azure\.com/([^/]+)/(?:([^/]+)/)?_git/([^/?#]+?)(?:\.git)?/?$")
        .unwrap()
});

static SSH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ssh://)?git@ssh\.dev\.azure\.com[:/]v3/([^/]+)/([^/]+)/([^/]+?)(?:\.git)?$")
        .unwrap()
});

static LEGACY_HTTPS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:[^@/]+@)?([^./@]+)\.visualstudio\.com/(?:DefaultCollection/)?(?:([^/]+)/)?_git/([^/?#]+?)(?:\.git)?/?$")
        .unwrap()
});

static LEGACY_SSH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ssh://)?[^@]+@vs-ssh\.visualstudio\.com[:/]v3/([^/]+)/([^/]+)/([^/]+?)(?:\.git)?$")
        .unwrap()
});

static SERVER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://[^/]+(?:/[^/]+)*?)/([^/]+)/_git/([^/?#]+?)(?:\.git)?/?$").unwrap()
});

/// What a git remote URL says about its organization, project and repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub organization_url: String,
    pub project: String,
    pub repository: String,
}

/// Parses an Azure Repos remote URL.
///
/// Percent-encoded segments (`My%20Project`) are decoded. When the project
/// segment is missing (`.../_git/web`), the repository name is the project
/// name.
///
/// ```rust
/// use azure_devops_rest::context::parse_remote_url;
///
/// let info = parse_remote_url("git@ssh.dev.azure.com:v3/contoso/Fabrikam/web").unwrap();
/// assert_eq!(info.organization_url, "https://dev.azure.com/contoso");
/// assert_eq!(info.project, "Fabrikam");
/// assert_eq!(info.repository, "web");
/// ```
pub fn parse_remote_url(url: &str) -> Result<RemoteInfo> {
    let url = url.trim();

    if let Some(caps) = HTTPS_PATTERN.captures(url) {
        return Ok(remote_info(organization_url(&decode(&caps[1])), &caps));
    }

    if let Some(caps) = SSH_PATTERN.captures(url) {
        return Ok(remote_info(organization_url(&decode(&caps[1])), &caps));
    }

    if let Some(caps) = LEGACY_HTTPS_PATTERN.captures(url) {
        let org = format!("https://{}.visualstudio.com", &caps[1]);
        return Ok(remote_info(org, &caps));
    }

    if let Some(caps) = LEGACY_SSH_PATTERN.captures(url) {
        let org = format!("https://{}.visualstudio.com", &caps[1]);
        return Ok(remote_info(org, &caps));
    }

    if let Some(caps) = SERVER_PATTERN.captures(url) {
        let repository = decode(&caps[3]);
        return Ok(RemoteInfo {
            organization_url: caps[1].to_string(),
            project: decode(&caps[2]),
            repository,
        });
    }

    anyhow::bail!("Not an Azure Repos remote: {}", url)
}

fn remote_info(organization_url: String, caps: &Captures<'_>) -> RemoteInfo {
    let repository = decode(&caps[3]);
    let project = caps
        .get(2)
        .map(|m| decode(m.as_str()))
        .unwrap_or_else(|| repository.clone());

    RemoteInfo {
        organization_url,
        project,
        repository,
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Resolves the organization and project for a command.
pub struct ContextResolver {
    config: Config,
}

impl ContextResolver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves the context, failing only when no organization can be found.
    /// A missing project is allowed; commands that need one call
    /// [`DevOpsContext::require_project`].
    pub fn resolve(&self, options: &GlobalOptions) -> Result<DevOpsContext> {
        let remote = GitContext::open()
            .ok()
            .and_then(|git| git.origin_url().ok().flatten())
            .and_then(|url| parse_remote_url(&url).ok());

        self.resolve_with_remote(options, remote)
    }

    /// Same as [`resolve`](Self::resolve) with an explicit remote, so the
    /// priority rules can be checked without a repository on disk.
    pub fn resolve_with_remote(
        &self,
        options: &GlobalOptions,
        remote: Option<RemoteInfo>,
    ) -> Result<DevOpsContext> {
        let (organization, organization_url) = match (&options.org, &self.config.core.organization)
        {
            (Some(org), _) | (None, Some(org)) => {
                (Some(org.clone()), self.config.organization_base_url(org))
            }
            (None, None) => match &remote {
                Some(remote) => (None, remote.organization_url.clone()),
                None => anyhow::bail!(
                    "Could not determine organization. Use --org, set AZDO_ORG, run `azdo config set organization <name>`, or run from within an Azure Repos clone."
                ),
            },
        };

        let project = options
            .project
            .clone()
            .or_else(|| self.config.core.project.clone())
            .or_else(|| {
                organization
                    .as_deref()
                    .and_then(|org| self.config.organization(org))
                    .and_then(|org| org.default_project.clone())
            })
            .or_else(|| {
                remote
                    .as_ref()
                    .filter(|remote| remote.organization_url == organization_url)
                    .map(|remote| remote.project.clone())
            });

        let repository = remote
            .filter(|remote| remote.organization_url == organization_url)
            .map(|remote| remote.repository);

        Ok(DevOpsContext {
            organization,
            organization_url,
            project,
            repository,
        })
    }
}
