//
//  azure-devops-rest
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads and saves the `azdo` configuration file, a TOML document stored in
//! the platform configuration directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/azdo/config.toml`
//! - **macOS**: `~/Library/Application Support/azdo/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\azdo\config.toml`
//!
//! `AZDO_CONFIG` overrides the path.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! organization = "contoso"
//! project = "Fabrikam"
//! timeout = 30
//!
//! [organizations.contoso]
//! url = "https://dev.azure.com/contoso"
//! default_project = "Fabrikam"
//! token_env = "CONTOSO_PAT"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use azure_devops_rest::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("project", "Fabrikam".to_string());
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod file;
mod organizations;

pub use file::*;
pub use organizations::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "AZDO_CONFIG";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`].
pub const CONFIG_KEYS: &[&str] = &["organization", "project", "timeout", "api_version"];

/// Keys accepted under `[organizations.<name>]`.
pub const ORGANIZATION_KEYS: &[&str] = &["url", "default_project", "token_env"];

/// The complete configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub core: CoreConfig,

    /// Per-organization settings, keyed by the organization's short name.
    #[serde(default)]
    pub organizations: BTreeMap<String, OrganizationConfig>,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CoreConfig {
    /// Default organization, as a short name or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Default project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Default API version for `azdo api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Settings for one organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OrganizationConfig {
    /// Base URL. Defaults to `https://dev.azure.com/<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Project used when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// Environment variable holding this organization's PAT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl Config {
    /// Loads the configuration from the default location. A missing file
    /// yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }

        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_config_file(path, &content)
    }

    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Settings for an organization, looked up by short name.
    pub fn organization(&self, name: &str) -> Option<&OrganizationConfig> {
        self.organizations.get(name)
    }

    /// Base URL for an organization name or URL, honoring a configured
    /// `url` override.
    pub fn organization_base_url(&self, name_or_url: &str) -> String {
        self.organization(name_or_url)
            .and_then(|org| org.url.as_deref())
            .map(normalize_organization_url)
            .unwrap_or_else(|| organization_url(name_or_url))
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.core.timeout.map(Duration::from_secs)
    }

    /// Reads a core setting.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "organization" => self.core.organization.clone(),
            "project" => self.core.project.clone(),
            "timeout" => self.core.timeout.map(|t| t.to_string()),
            "api_version" => self.core.api_version.clone(),
            _ => None,
        }
    }

    /// Sets a core setting. Returns `false` for unknown keys and for values
    /// that do not parse (a non-numeric timeout).
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match key {
            "organization" => {
                self.core.organization = Some(value);
                true
            }
            "project" => {
                self.core.project = Some(value);
                true
            }
            "timeout" => match value.trim().parse() {
                Ok(seconds) => {
                    self.core.timeout = Some(seconds);
                    true
                }
                Err(_) => false,
            },
            "api_version" => {
                self.core.api_version = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Clears a core setting. Returns `false` for unknown keys.
    pub fn unset(&mut self, key: &str) -> bool {
        match key {
            "organization" => self.core.organization = None,
            "project" => self.core.project = None,
            "timeout" => self.core.timeout = None,
            "api_version" => self.core.api_version = None,
            _ => return false,
        }
        true
    }

    /// Reads an organization setting.
    pub fn get_organization_value(&self, organization: &str, key: &str) -> Option<String> {
        let org = self.organization(organization)?;
        match key {
            "url" => org.url.clone(),
            "default_project" => org.default_project.clone(),
            "token_env" => org.token_env.clone(),
            _ => None,
        }
    }

    /// Sets an organization setting, creating the organization entry if
    /// needed. Returns `false` for unknown keys.
    pub fn set_organization_value(&mut self, organization: &str, key: &str, value: String) -> bool {
        if !ORGANIZATION_KEYS.contains(&key) {
            return false;
        }

        let org = self.organizations.entry(organization.to_string()).or_default();
        match key {
            "url" => org.url = Some(value),
            "default_project" => org.default_project = Some(value),
            _ => org.token_env = Some(value),
        }
        true
    }

    /// Clears an organization setting. An entry left with no settings is
    /// removed. Returns `false` for unknown keys or organizations.
    pub fn unset_organization_value(&mut self, organization: &str, key: &str) -> bool {
        let Some(org) = self.organizations.get_mut(organization) else {
            return false;
        };

        match key {
            "url" => org.url = None,
            "default_project" => org.default_project = None,
            "token_env" => org.token_env = None,
            _ => return false,
        }

        if *org == OrganizationConfig::default() {
            self.organizations.remove(organization);
        }
        true
    }
}
