//
//  azure-devops-rest
//  config/organizations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Organization URLs
//!
//! An organization can be named by its short name (`contoso`) or by URL.
//! Both forms are accepted everywhere and normalized with
//! [`organization_url`].
//!
//! | Input | URL |
//! |-------|-----|
//! | `contoso` | `https://dev.azure.com/contoso` |
//! | `https://dev.azure.com/contoso/` | `https://dev.azure.com/contoso` |
//! | `contoso.visualstudio.com` | `https://contoso.visualstudio.com` |
//! | `https://tfs.corp.local/tfs/DefaultCollection` | unchanged |
//!
//! ```rust
//! use azure_devops_rest::config::{is_hosted_service, organization_url};
//!
//! assert_eq!(organization_url("contoso"), "https://dev.azure.com/contoso");
//! assert!(is_hosted_service("https://dev.azure.com/contoso"));
//! assert!(!is_hosted_service("https://tfs.corp.local/tfs/DefaultCollection"));
//! ```

/// Host of the hosted service.
pub const HOSTED_SERVICE: &str = "dev.azure.com";

/// Suffix of legacy hosted organization hosts.
pub const LEGACY_HOSTED_SUFFIX: &str = ".visualstudio.com";

/// Trims whitespace and trailing slashes and adds `https://` when no scheme
/// is present.
pub fn normalize_organization_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Turns an organization name or URL into the organization's base URL.
pub fn organization_url(name_or_url: &str) -> String {
    let value = name_or_url.trim().trim_end_matches('/');
    if value.contains('/') || value.contains('.') || value.contains(':') {
        normalize_organization_url(value)
    } else {
        format!("https://{}/{}", HOSTED_SERVICE, value)
    }
}

/// Returns `true` for URLs on the hosted service (as opposed to an
/// on-premises server).
pub fn is_hosted_service(url: &str) -> bool {
    let Ok(parsed) = url::Url::parse(&normalize_organization_url(url)) else {
        return false;
    };

    match parsed.host_str() {
        Some(host) => {
            let host = host.to_lowercase();
            host == HOSTED_SERVICE || host.ends_with(LEGACY_HOSTED_SUFFIX)
        }
        None => false,
    }
}
