//
//  azure-devops-rest
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Typed access to the Azure DevOps REST API.
//!
//! ## Architecture
//!
//! - [`operation`]: One REST call described as data (verb, route, query, body,
//!   response type, API version)
//! - [`route`]: Route template substitution
//! - [`query`]: Query values and their wire form
//! - [`json`]: Date-aware JSON decoding
//! - [`client`]: The dispatcher that sends operations
//! - [`response`]: Buffered responses and decoded payloads
//! - [`common`]: Errors, pagination, team context, shared reference types
//! - [`areas`]: Per-family endpoint catalogs (build, pipelines, ...)
//!
//! ## Usage
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
//! let pools = client.task_agent().get_agent_pools(&Default::default()).await?;
//! for pool in pools {
//!     println!("{}", pool.name.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`]:
//!
//! - `Transport`: no response arrived
//! - `Http`: non-2xx status, with the server's message
//! - `Decode`: the body did not match the declared type
//! - `InvalidRequest`: the operation could not be turned into a request

/// Per-family endpoint catalogs.
pub mod areas;

/// The request dispatcher.
pub mod client;

/// Errors, pagination and shared reference types.
pub mod common;

/// Date-aware JSON decoding.
pub mod json;

/// Operation descriptors.
pub mod operation;

/// Query values.
pub mod query;

/// Buffered responses.
pub mod response;

/// Route templates.
pub mod route;

pub use client::{ClientOptions, DevOpsClient};
pub use common::{ApiError, PagedList};
pub use operation::{Operation, ResponseType};
pub use response::{Payload, RawResponse};
