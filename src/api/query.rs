//
//  azure-devops-rest
//  api/query.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Query parameter values and their wire serialization
//!
//! Query parameters are carried as tagged [`QueryValue`]s so the dispatcher
//! can apply the serialization rules without inspecting types at runtime:
//!
//! | Value | Wire form |
//! |-------|-----------|
//! | `Text` | as-is |
//! | `Integer` / `Float` | decimal |
//! | `Bool` | `true` / `false` |
//! | `Date` | `2024-01-02T03:04:05.000Z` |
//! | `List` | items joined with the parameter's own [`Delimiter`] |
//! | `Omitted` | parameter left out entirely |
//!
//! The delimiter is part of each endpoint's contract. Most list parameters
//! are comma-joined, but not all of them, so catalog methods always name it.
//!
//! # Example
//!
//! ```rust
//! use azure_devops_rest::api::query::{Delimiter, QueryParams, QueryValue};
//!
//! let mut query = QueryParams::new();
//! query.insert("$top", 10);
//! query.insert("branchName", None::<String>);
//! query.insert("definitions", QueryValue::list([1, 2, 3], Delimiter::Comma));
//!
//! assert_eq!(query.to_query_string(), "%24top=10&definitions=1%2C2%2C3");
//! ```

use std::fmt::Display;

use chrono::{DateTime, Utc};

use super::json::format_date;

/// Separator used to join a list-valued query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// `,` (the usual choice)
    #[default]
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `|`
    Pipe,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Pipe => "|",
        }
    }
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    List {
        items: Vec<String>,
        delimiter: Delimiter,
    },
    /// No value: the parameter is not sent at all.
    Omitted,
}

impl QueryValue {
    /// Builds a list value joined with `delimiter`.
    pub fn list<I, T>(items: I, delimiter: Delimiter) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        Self::List {
            items: items.into_iter().map(|item| item.to_string()).collect(),
            delimiter,
        }
    }

    /// Like [`list`](Self::list), but `None` becomes [`QueryValue::Omitted`].
    pub fn optional_list<I, T>(items: Option<I>, delimiter: Delimiter) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        match items {
            Some(items) => Self::list(items, delimiter),
            None => Self::Omitted,
        }
    }

    /// Returns `true` if this value will not be sent.
    pub fn is_omitted(&self) -> bool {
        match self {
            Self::Omitted => true,
            Self::List { items, .. } => items.is_empty(),
            _ => false,
        }
    }

    /// Renders the unencoded wire value, or `None` when omitted.
    pub fn render(&self) -> Option<String> {
        if self.is_omitted() {
            return None;
        }

        Some(match self {
            Self::Text(text) => text.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Date(date) => format_date(date),
            Self::List { items, delimiter } => items.join(delimiter.as_str()),
            Self::Omitted => return None,
        })
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Omitted)
    }
}

/// Ordered query parameters for one operation.
///
/// Insertion order is preserved on the wire. Inserting an existing name
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.params.iter().all(|(_, value)| value.is_omitted())
    }

    /// Name/value pairs that will be sent, unencoded, omitted ones skipped.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(name, value)| value.render().map(|rendered| (name.clone(), rendered)))
            .collect()
    }

    /// The encoded `name=value&...` string, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_omitted_values_are_never_serialized() {
        let mut query = QueryParams::new();
        query.insert("a", 1);
        query.insert("b", None::<i32>);
        query.insert("c", "x");

        assert_eq!(query.to_query_string(), "a=1&c=x");
        assert!(!query.to_query_string().contains("b="));
    }

    #[test]
    fn test_list_uses_declared_delimiter() {
        assert_eq!(
            QueryValue::list([1, 2, 3], Delimiter::Comma).render().as_deref(),
            Some("1,2,3")
        );
        assert_eq!(
            QueryValue::list(["a", "b"], Delimiter::Pipe).render().as_deref(),
            Some("a|b")
        );
        assert_eq!(
            QueryValue::list(["a", "b"], Delimiter::Semicolon).render().as_deref(),
            Some("a;b")
        );
        assert_eq!(
            QueryValue::list(["a", "b"], Delimiter::Colon).render().as_deref(),
            Some("a:b")
        );
    }

    #[test]
    fn test_empty_list_is_omitted() {
        let empty: Vec<i32> = Vec::new();
        assert!(QueryValue::list(empty, Delimiter::Comma).is_omitted());
        assert!(QueryValue::optional_list(None::<Vec<i32>>, Delimiter::Comma).is_omitted());
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(QueryValue::from(true).render().as_deref(), Some("true"));
        assert_eq!(QueryValue::from(false).render().as_deref(), Some("false"));
        assert_eq!(QueryValue::from(1.5).render().as_deref(), Some("1.5"));

        let date = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            QueryValue::from(date).render().as_deref(),
            Some("2024-06-01T12:00:00.000Z")
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut query = QueryParams::new();
        query.insert("first", 1);
        query.insert("second", 2);
        query.insert("first", 3);
        assert_eq!(query.to_query_string(), "first=3&second=2");
    }

    #[test]
    fn test_names_and_values_are_encoded() {
        let mut query = QueryParams::new();
        query.insert("$top", 5);
        query.insert("branchName", "refs/heads/feature one");
        assert_eq!(
            query.to_query_string(),
            "%24top=5&branchName=refs%2Fheads%2Ffeature%20one"
        );
    }
}
