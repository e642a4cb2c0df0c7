//
//  azure-devops-rest
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Continuation-token pagination
//!
//! List endpoints return one page of results in the body and, when more
//! results exist, an opaque cursor in the `x-ms-continuationtoken` response
//! header. The cursor is passed back as the `continuationToken` query
//! parameter to get the next page.
//!
//! # Overview
//!
//! | Step | Input | Output |
//! |------|-------|--------|
//! | 1 | Response body | `Vec<T>` (date-aware, `{"value": [...]}` unwrapped) |
//! | 2 | `x-ms-continuationtoken` header | `Option<String>` |
//!
//! [`into_paged_list`] runs both steps and returns a [`PagedList`]. It never
//! fetches more than one page; callers loop while
//! [`has_next()`](PagedList::has_next) is `true`.
//!
//! # Example
//!
//! ```rust,no_run
//! use azure_devops_rest::api::DevOpsClient;
//! use azure_devops_rest::api::areas::GetBuildsOptions;
//!
//! # async fn example(client: DevOpsClient) -> Result<(), azure_devops_rest::api::common::ApiError> {
//! let mut options = GetBuildsOptions::default();
//! let mut all = Vec::new();
//!
//! loop {
//!     let page = client.build().get_builds("Fabrikam", &options).await?;
//!     let token = page.continuation_token().map(str::to_string);
//!     all.extend(page.into_items());
//!
//!     match token {
//!         Some(token) => options.continuation_token = Some(token),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ApiError;
use crate::api::json::decode_collection;
use crate::api::response::RawResponse;

/// Response header carrying the cursor for the next page.
pub const CONTINUATION_TOKEN_HEADER: &str = "x-ms-continuationtoken";

/// Query parameter the cursor is sent back in.
pub const CONTINUATION_TOKEN_PARAM: &str = "continuationToken";

/// One page of results plus the cursor for the next one.
///
/// Dereferences to `[T]`, so it can be indexed, iterated and measured like
/// a slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    /// Items in this page
    pub items: Vec<T>,

    /// Cursor for the next page. `None` on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, continuation_token: Option<String>) -> Self {
        Self {
            items,
            continuation_token,
        }
    }

    /// Returns `true` when the server issued a cursor for another page.
    pub fn has_next(&self) -> bool {
        self.continuation_token.is_some()
    }

    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl<T> Deref for PagedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Reads the continuation token from a response. An absent or blank header
/// means there are no more pages.
pub fn continuation_token(raw: &RawResponse) -> Option<String> {
    raw.header(CONTINUATION_TOKEN_HEADER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Turns an undecoded list response into a [`PagedList`].
///
/// The body is decoded first. If that fails the header is never read and the
/// decode error is returned.
pub fn into_paged_list<T: DeserializeOwned>(raw: RawResponse) -> Result<PagedList<T>, ApiError> {
    let items = decode_collection(raw.bytes())?;
    let token = continuation_token(&raw);

    if let Some(token) = &token {
        tracing::trace!(token = %token, "continuation token received");
    }

    Ok(PagedList::new(items, token))
}
