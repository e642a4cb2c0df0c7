//
//  azure-devops-rest
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command Line Interface
//!
//! Argument definitions for the `azdo` binary and the glue that turns the
//! resolved context into a ready [`DevOpsClient`].
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `api` | Send any REST call through the dispatcher |
//! | `build` | List, inspect, queue and tag builds |
//! | `pipeline` | List pipelines, their runs, and start runs |
//! | `config` | Read and write the configuration file |
//! | `completion` | Print shell completion scripts |
//! | `version` | Print the version |

mod api;
mod build;
mod completion;
mod config;
mod pipeline;

pub use api::ApiCommand;
pub use build::BuildCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use pipeline::PipelineCommand;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::{ClientOptions, DevOpsClient};
use crate::auth::Credential;
use crate::config::Config;
use crate::context::{ContextResolver, DevOpsContext};

#[derive(Parser, Debug)]
#[command(
    name = "azdo",
    version,
    about = "Work with Azure DevOps from the command line",
    long_about = "azdo is a CLI for the Azure DevOps REST API.\n\n\
                  It brings builds, pipelines and raw API access to your terminal.",
    propagate_version = true,
    after_help = "Use 'azdo <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Organization name or URL
    #[arg(long, short = 'o', global = true, env = "AZDO_ORG")]
    pub org: Option<String>,

    /// Project name
    #[arg(long, short = 'p', global = true, env = "AZDO_PROJECT")]
    pub project: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Api(ApiCommand),

    #[command(visible_alias = "b")]
    Build(BuildCommand),

    #[command(visible_alias = "pl")]
    Pipeline(PipelineCommand),

    Config(ConfigCommand),

    Completion(CompletionCommand),

    Version,
}

/// Everything a command needs to talk to the server.
pub struct Session {
    pub config: Config,
    pub context: DevOpsContext,
    pub client: DevOpsClient,
}

impl Session {
    /// Loads the configuration, resolves the context and builds a client.
    pub fn connect(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let context = ContextResolver::new(config.clone()).resolve(global)?;

        let mut options = ClientOptions::new(context.organization_url.clone());
        if let Some(credential) = resolve_credential(&config, &context) {
            options = options.with_credential(credential);
        }
        if let Some(timeout) = config.timeout() {
            options = options.with_timeout(timeout);
        }

        let client = DevOpsClient::new(options)
            .with_context(|| format!("Could not create client for {}", context.organization_url))?;

        Ok(Self {
            config,
            context,
            client,
        })
    }

    pub fn project(&self) -> Result<&str> {
        self.context.require_project()
    }
}

/// Picks the credential for an organization: its configured `token_env`
/// variable first, then `AZDO_PAT` / `AZDO_TOKEN`.
pub fn resolve_credential(config: &Config, context: &DevOpsContext) -> Option<Credential> {
    let configured = context
        .organization
        .as_deref()
        .and_then(|org| config.organization(org))
        .and_then(|org| org.token_env.as_deref());

    if let Some(var) = configured {
        match Credential::from_env_var(var) {
            Some(credential) => return Some(credential),
            None => tracing::warn!(var, "Configured token variable is not set"),
        }
    }

    let credential = Credential::from_env();
    if credential.is_none() {
        tracing::debug!("No credential found, sending anonymous requests");
    }
    credential
}
