//
//  azure-devops-rest
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # azure-devops-rest
//!
//! A typed client for the Azure DevOps REST API and the `azdo` command-line
//! tool built on it.
//!
//! Every call is described by an [`api::Operation`] (method, route template,
//! route values, query, body, API version) and sent through one dispatcher,
//! [`api::DevOpsClient::begin_request`]. The per-area clients in
//! [`api::areas`] are thin catalogs of such descriptors.
//!
//! ```rust,no_run
//! use azure_devops_rest::api::{ClientOptions, DevOpsClient};
//! use azure_devops_rest::auth::Credential;
//!
//! # async fn example() -> Result<(), azure_devops_rest::api::ApiError> {
//! let client = DevOpsClient::new(
//!     ClientOptions::new("https://dev.azure.com/contoso")
//!         .with_credential(Credential::pat("token")),
//! )?;
//!
//! let build = client.build().get_build("Fabrikam", 42).await?;
//! println!("{:?}", build.status);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Each command module parses its arguments with clap and runs against a
/// [`cli::Session`].
pub mod cli;

/// The REST client: operation descriptors, the dispatcher, JSON and
/// pagination handling, and the per-area catalogs.
pub mod api;

/// Credentials applied to outgoing requests.
pub mod auth;

/// Configuration file management.
///
/// - Linux: `~/.config/azdo/config.toml`
/// - macOS: `~/Library/Application Support/azdo/config.toml`
/// - Windows: `%APPDATA%\azdo\config.toml`
pub mod config;

/// Organization and project detection from flags, config and git remotes.
pub mod context;

/// Table and JSON output.
pub mod output;

/// Formatting and argument parsing helpers.
pub mod util;

pub use api::{ApiError, DevOpsClient};
pub use cli::Cli;
pub use config::Config;
pub use context::DevOpsContext;

/// Name of the binary, also used for the configuration directory.
pub const APP_NAME: &str = "azdo";

/// Crate version from Cargo.toml.
///
/// ```rust
/// use azure_devops_rest::VERSION;
///
/// println!("azdo version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// | Code | Meaning |
/// |------|---------|
/// | `0` | Success |
/// | `1` | Any other error |
/// | `2` | Invalid usage |
/// | `4` | Missing or rejected credentials (401, 403) |
/// | `8` | Resource not found (404) |
/// | `16` | Network failure, no response |
/// | `32` | Rate limited (429) |
///
/// ```rust
/// use azure_devops_rest::api::ApiError;
/// use azure_devops_rest::exit_codes;
/// use reqwest::StatusCode;
///
/// let err = anyhow::Error::from(ApiError::from_response(StatusCode::NOT_FOUND, ""));
/// assert_eq!(exit_codes::for_error(&err), exit_codes::NOT_FOUND);
/// ```
pub mod exit_codes {
    use crate::api::ApiError;

    pub const SUCCESS: i32 = 0;

    pub const ERROR: i32 = 1;

    pub const USAGE: i32 = 2;

    /// Run with `AZDO_PAT` set to a token with access to the resource.
    pub const AUTH_ERROR: i32 = 4;

    pub const NOT_FOUND: i32 = 8;

    pub const NETWORK: i32 = 16;

    pub const RATE_LIMIT: i32 = 32;

    /// Picks the exit code for an error, looking through `anyhow` context
    /// for an [`ApiError`].
    pub fn for_error(err: &anyhow::Error) -> i32 {
        let Some(api_error) = err.chain().find_map(|e| e.downcast_ref::<ApiError>()) else {
            return ERROR;
        };

        if api_error.is_transport() {
            return NETWORK;
        }
        if api_error.is_unauthorized() || api_error.is_forbidden() {
            return AUTH_ERROR;
        }
        if api_error.is_not_found() {
            return NOT_FOUND;
        }

        match api_error.status() {
            Some(status) if status.as_u16() == 429 => RATE_LIMIT,
            _ => ERROR,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use anyhow::Context;
        use reqwest::StatusCode;

        #[test]
        fn test_for_error_maps_status() {
            let err = anyhow::Error::from(ApiError::from_response(StatusCode::UNAUTHORIZED, ""));
            assert_eq!(for_error(&err), AUTH_ERROR);

            let err = anyhow::Error::from(ApiError::from_response(StatusCode::TOO_MANY_REQUESTS, ""));
            assert_eq!(for_error(&err), RATE_LIMIT);

            let err = anyhow::Error::from(ApiError::from_response(StatusCode::BAD_REQUEST, ""));
            assert_eq!(for_error(&err), ERROR);
        }

        #[test]
        fn test_for_error_looks_through_context() {
            let result: Result<(), ApiError> =
                Err(ApiError::from_response(StatusCode::NOT_FOUND, "{}"));
            let err = result.context("Could not get build 42").unwrap_err();
            assert_eq!(for_error(&err), NOT_FOUND);
        }

        #[test]
        fn test_other_errors() {
            assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
        }
    }
}
