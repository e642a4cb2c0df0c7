//
//  azure-devops-rest
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials are passed through to every request unchanged. There is no
//! login flow, token storage or refresh: the caller supplies a credential
//! and the client attaches it.
//!
//! ## Supported Authentication Methods
//!
//! - **Personal Access Token (PAT)**: HTTP Basic with an empty user name and
//!   the token as the password. This is what Azure DevOps expects for PATs.
//! - **Bearer**: An OAuth / Entra ID access token.
//! - **Basic**: Explicit user name and password, for on-premises servers.
//!
//! ## Environment
//!
//! | Variable | Credential |
//! |----------|------------|
//! | `AZDO_PAT` | [`Credential::PersonalAccessToken`] |
//! | `AZDO_TOKEN` | [`Credential::Bearer`] |
//!
//! ## Example
//!
//! ```rust
//! use azure_devops_rest::auth::Credential;
//!
//! let credential = Credential::pat("my-token");
//! assert_eq!(credential.kind(), "pat");
//! assert!(!format!("{:?}", credential).contains("my-token"));
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

/// Environment variable holding a personal access token.
pub const PAT_ENV: &str = "AZDO_PAT";

/// Environment variable holding a bearer token.
pub const TOKEN_ENV: &str = "AZDO_TOKEN";

/// Credentials attached to every request.
///
/// `Debug` never prints secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Personal access token, sent as Basic auth with an empty user name.
    PersonalAccessToken {
        /// The token string.
        token: String,
    },
    /// OAuth access token, sent as `Authorization: Bearer`.
    Bearer {
        /// The token string.
        token: String,
    },
    /// Plain Basic authentication.
    Basic {
        /// The user name.
        username: String,
        /// The password.
        password: String,
    },
}

impl Credential {
    pub fn pat(token: impl Into<String>) -> Self {
        Self::PersonalAccessToken {
            token: token.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads a credential from `AZDO_PAT`, then `AZDO_TOKEN`.
    ///
    /// Blank or malformed values are ignored.
    pub fn from_env() -> Option<Self> {
        Self::from_env_var(PAT_ENV).or_else(|| {
            std::env::var(TOKEN_ENV)
                .ok()
                .map(|token| token.trim().to_string())
                .filter(|token| validate_token(token))
                .map(Self::bearer)
        })
    }

    /// Reads a personal access token from the named environment variable.
    pub fn from_env_var(name: &str) -> Option<Self> {
        std::env::var(name)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| validate_token(token))
            .map(Self::pat)
    }

    /// Short name of the credential type, for logs and `azdo config list`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PersonalAccessToken { .. } => "pat",
            Self::Bearer { .. } => "bearer",
            Self::Basic { .. } => "basic",
        }
    }

    /// The `Authorization` header value for this credential, marked
    /// sensitive so it is never logged by the HTTP stack.
    pub fn authorization_header(&self) -> Option<HeaderValue> {
        let raw = match self {
            Self::PersonalAccessToken { token } => {
                format!("Basic {}", STANDARD.encode(format!(":{}", token)))
            }
            Self::Bearer { token } => format!("Bearer {}", token),
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
            }
        };

        let mut value = HeaderValue::try_from(raw).ok()?;
        value.set_sensitive(true);
        Some(value)
    }

    /// Applies the credential to an HTTP request.
    ///
    /// A credential that cannot be expressed as a header value (for example
    /// a bearer token containing a newline) is not attached; the server will
    /// answer 401.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self.authorization_header() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => {
                tracing::warn!(kind = self.kind(), "credential is not a valid header value");
                request
            }
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonalAccessToken { .. } => f
                .debug_struct("PersonalAccessToken")
                .field("token", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Checks the format of a token: not empty, no whitespace.
///
/// This does not ask the server whether the token is valid.
///
/// ```rust
/// use azure_devops_rest::auth::validate_token;
///
/// assert!(validate_token("abc123"));
/// assert!(!validate_token(""));
/// assert!(!validate_token("has space"));
/// ```
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pat_uses_basic_with_empty_user() {
        let header = Credential::pat("secret").authorization_header().unwrap();
        // base64(":secret")
        assert_eq!(header.to_str().unwrap(), "Basic OnNlY3JldA==");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_bearer_header() {
        let header = Credential::bearer("abc").authorization_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_basic_header() {
        let header = Credential::basic("user", "pass").authorization_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_invalid_header_value_is_skipped() {
        assert!(Credential::bearer("bad\ntoken").authorization_header().is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", Credential::basic("jamie", "hunter2"));
        assert!(debug.contains("jamie"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_validate_token() {
        assert!(validate_token("NjM0NTY3ODkw"));
        assert!(!validate_token("has\ttab"));
    }
}
