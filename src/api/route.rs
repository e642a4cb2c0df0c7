//
//  azure-devops-rest
//  api/route.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Route template resolution
//!
//! Route templates look like `{project}/_apis/build/builds/{buildId}`. Each
//! `{name}` is replaced with its percent-encoded value. `{*name}` is a
//! catch-all whose value may contain `/`; every piece is encoded separately
//! so the separators survive. `{{` and `}}` are literal braces.
//!
//! A path segment that ends up empty, because its placeholder had no value,
//! is dropped together with its separator:
//!
//! ```rust
//! use azure_devops_rest::api::route::{resolve_route, RouteValues};
//!
//! let mut values = RouteValues::new();
//! values.insert("project".to_string(), "P".to_string());
//!
//! assert_eq!(
//!     resolve_route("{project}/_apis/distributedtask/securefiles/{secureFileId}", &values),
//!     "P/_apis/distributedtask/securefiles"
//! );
//! ```
//!
//! URL parsing treats `.` and `..` segments (also as `%2E`) as relative
//! references, so [`dot_segment`] lets the dispatcher refuse such paths.

use std::collections::BTreeMap;

/// Route placeholder name to value. A missing key means "no value".
pub type RouteValues = BTreeMap<String, String>;

/// Substitutes the placeholders of `template` with `values`.
pub fn resolve_route(template: &str, values: &RouteValues) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                current.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                current.push('}');
            }
            '{' => {
                let name: String = chars.by_ref().take_while(|&n| n != '}').collect();
                if let Some(value) = placeholder_value(&name, values) {
                    current.push_str(&value);
                }
            }
            '/' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments.join("/")
}

/// Returns the first segment of `path` that URL parsing would treat as `.`
/// or `..`.
pub fn dot_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

fn placeholder_value(name: &str, values: &RouteValues) -> Option<String> {
    match name.strip_prefix('*') {
        Some(catch_all) => {
            let value = values.get(catch_all).or_else(|| values.get(name))?;
            let encoded = value
                .split('/')
                .filter(|piece| !piece.is_empty())
                .map(|piece| urlencoding::encode(piece).into_owned())
                .collect::<Vec<_>>()
                .join("/");
            Some(encoded)
        }
        None => values
            .get(name)
            .map(|value| urlencoding::encode(value).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> RouteValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_placeholders() {
        let resolved = resolve_route(
            "{project}/_apis/build/builds/{buildId}",
            &values(&[("project", "P"), ("buildId", "42")]),
        );
        assert_eq!(resolved, "P/_apis/build/builds/42");
    }

    #[test]
    fn test_missing_catch_all_collapses() {
        let resolved = resolve_route(
            "{project}/_apis/test/attachments/{*path}",
            &values(&[("project", "P")]),
        );
        assert_eq!(resolved, "P/_apis/test/attachments");
        assert!(!resolved.contains("undefined"));
        assert!(!resolved.ends_with('/'));
    }

    #[test]
    fn test_catch_all_keeps_separators() {
        let resolved = resolve_route(
            "_apis/files/{*path}",
            &values(&[("path", "dir one/file.txt")]),
        );
        assert_eq!(resolved, "_apis/files/dir%20one/file.txt");
    }

    #[test]
    fn test_missing_leading_segment_collapses() {
        let resolved = resolve_route("{project}/_apis/distributedtask/queues", &RouteValues::new());
        assert_eq!(resolved, "_apis/distributedtask/queues");
    }

    #[test]
    fn test_middle_segment_collapses() {
        let resolved = resolve_route(
            "{project}/{team}/_apis/work/teamsettings",
            &values(&[("project", "P")]),
        );
        assert_eq!(resolved, "P/_apis/work/teamsettings");
    }

    #[test]
    fn test_values_are_encoded() {
        let resolved = resolve_route(
            "{project}/_apis/build/builds/{buildId}/tags/{tag}",
            &values(&[("project", "My Project"), ("buildId", "1"), ("tag", "a/b")]),
        );
        assert_eq!(resolved, "My%20Project/_apis/build/builds/1/tags/a%2Fb");
    }

    #[test]
    fn test_dot_values_are_detected() {
        let resolved = resolve_route(
            "{project}/_apis/build/builds/{buildId}/tags/{tag}",
            &values(&[("project", "P"), ("buildId", "1"), ("tag", "..")]),
        );
        assert_eq!(resolved, "P/_apis/build/builds/1/tags/..");
        assert_eq!(dot_segment(&resolved), Some(".."));

        assert_eq!(dot_segment("P/_apis/files/%2E"), Some("%2E"));
        assert_eq!(dot_segment("P/_apis/files/%2e%2E"), Some("%2e%2E"));
        assert_eq!(dot_segment("P/_apis/files/v1.2/..."), None);
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let resolved = resolve_route("_apis/{{literal}}/{id}", &values(&[("id", "7")]));
        assert_eq!(resolved, "_apis/{literal}/7");
    }

    #[test]
    fn test_partial_segment_keeps_literal_text() {
        let resolved = resolve_route("_apis/items/v{version}", &RouteValues::new());
        assert_eq!(resolved, "_apis/items/v");
    }
}
