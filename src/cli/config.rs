//
//  azure-devops-rest
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration commands
//!
//! ```bash
//! azdo config set organization contoso
//! azdo config set token_env CONTOSO_PAT --organization contoso
//! azdo config get project
//! azdo config list
//! ```

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::auth::Credential;
use crate::config::{Config, CONFIG_KEYS, ORGANIZATION_KEYS};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a setting
    Get(KeyArgs),

    /// Change a setting
    Set(SetArgs),

    /// Remove a setting
    Unset(KeyArgs),

    /// Print every setting
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    pub key: String,

    /// Use the settings of this organization instead of the core settings
    #[arg(long)]
    pub organization: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub key: String,

    pub value: String,

    /// Use the settings of this organization instead of the core settings
    #[arg(long)]
    pub organization: Option<String>,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args),
            ConfigSubcommand::Unset(args) => unset(args),
            ConfigSubcommand::List => list(global),
            ConfigSubcommand::Path => {
                println!("{}", Config::config_path()?.display());
                Ok(())
            }
        }
    }
}

fn check_key(key: &str, organization: Option<&str>) -> Result<()> {
    let valid = if organization.is_some() {
        ORGANIZATION_KEYS
    } else {
        CONFIG_KEYS
    };

    if !valid.contains(&key) {
        bail!("Unknown key '{}'. Valid keys: {}", key, valid.join(", "));
    }
    Ok(())
}

fn get(args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
    check_key(&args.key, args.organization.as_deref())?;
    let config = Config::load()?;

    let value = match &args.organization {
        Some(org) => config.get_organization_value(org, &args.key),
        None => config.get(&args.key),
    };

    if global.json {
        let result = serde_json::json!({
            "key": args.key,
            "value": value,
            "organization": args.organization,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(value) = value {
        println!("{}", value);
    }

    Ok(())
}

fn set(args: &SetArgs) -> Result<()> {
    check_key(&args.key, args.organization.as_deref())?;
    let mut config = Config::load()?;

    let changed = match &args.organization {
        Some(org) => config.set_organization_value(org, &args.key, args.value.clone()),
        None => config.set(&args.key, args.value.clone()),
    };
    if !changed {
        bail!("Invalid value '{}' for {}", args.value, args.key);
    }

    config.save()?;
    println!("{} Set {} = {}", style("✓").green(), args.key, args.value);
    Ok(())
}

fn unset(args: &KeyArgs) -> Result<()> {
    check_key(&args.key, args.organization.as_deref())?;
    let mut config = Config::load()?;

    let removed = match &args.organization {
        Some(org) => config.unset_organization_value(org, &args.key),
        None => config.unset(&args.key),
    };

    if removed {
        config.save()?;
    }
    println!("{} Unset {}", style("✓").green(), args.key);
    Ok(())
}

fn list(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;

    if global.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", style("Core").bold());
    for key in CONFIG_KEYS {
        let value = config.get(key);
        println!(
            "  {} = {}",
            key,
            value.as_deref().unwrap_or("(not set)")
        );
    }

    for (name, org) in &config.organizations {
        println!();
        println!("{}", style(format!("Organization {}", name)).bold());
        println!("  url = {}", config.organization_base_url(name));
        for key in &["default_project", "token_env"] {
            let value = config.get_organization_value(name, key);
            println!("  {} = {}", key, value.as_deref().unwrap_or("(not set)"));
        }

        let credential = org
            .token_env
            .as_deref()
            .and_then(Credential::from_env_var)
            .or_else(Credential::from_env);
        println!(
            "  credential = {}",
            credential.as_ref().map(Credential::kind).unwrap_or("none")
        );
    }

    Ok(())
}
