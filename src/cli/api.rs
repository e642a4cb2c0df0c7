//
//  azure-devops-rest
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Builds an [`Operation`] from the command line and sends it through the
//! same dispatcher the typed areas use. Useful for endpoints without a
//! dedicated command and for debugging.
//!
//! ## Examples
//!
//! ```bash
//! # Route template with values; {project} defaults to the current project
//! azdo api '{project}/_apis/build/builds/{buildId}' -r buildId=42
//!
//! # List-valued query and an explicit version
//! azdo api _apis/projects -q '$top=5' --api-version 7.1
//!
//! # POST with typed fields
//! azdo api -X POST '{project}/_apis/build/builds' -F definition.id=12 \
//!     -F sourceBranch=refs/heads/main
//!
//! # Follow x-ms-continuationtoken until the last page
//! azdo api '{project}/_apis/build/builds' --paginate
//!
//! # Save a zip
//! azdo api '{project}/_apis/build/builds/42/logs' --accept application/zip --output logs.zip
//! ```

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use reqwest::Method;
use serde_json::Value;

use crate::api::common::continuation_token;
use crate::api::operation::{Operation, ResponseType};
use crate::api::RawResponse;
use crate::output::write_json;
use crate::util::parse_key_value;

use super::{GlobalOptions, Session};

/// Version used when neither `--api-version` nor the config sets one.
pub const DEFAULT_API_VERSION: &str = "7.1";

/// Send a REST call to Azure DevOps
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Route template relative to the organization, e.g. {project}/_apis/build/builds
    pub route: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// API version sent with the request
    #[arg(long, env = "AZDO_API_VERSION")]
    pub api_version: Option<String>,

    /// Route value for a {placeholder} (key=value, repeatable)
    #[arg(long = "route-value", short = 'r', action = clap::ArgAction::Append)]
    pub route_values: Vec<String>,

    /// Query parameter (key=value, repeatable)
    #[arg(long, short = 'q', action = clap::ArgAction::Append)]
    pub query: Vec<String>,

    /// Typed JSON body field (key=value, nested with dots, repeatable)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Request header ("Name: Value", repeatable)
    #[arg(long, short = 'H', action = clap::ArgAction::Append)]
    pub header: Vec<String>,

    /// Read the JSON body from a file (- for stdin)
    #[arg(long, short = 'f', conflicts_with = "field")]
    pub input: Option<String>,

    /// Media type to accept; anything but JSON is treated as binary
    #[arg(long)]
    pub accept: Option<String>,

    /// Follow continuation tokens and print every page's items as one array
    #[arg(long)]
    pub paginate: bool,

    /// Write the response body to a file instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Print the body as received, without pretty-printing
    #[arg(long)]
    pub raw: bool,

    /// Print the status line and response headers first
    #[arg(long, short = 'i')]
    pub include: bool,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::connect(global)?;
        let api_version = self
            .api_version
            .clone()
            .or_else(|| session.config.core.api_version.clone())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let operation = self.build_operation(&api_version, session.context.project.as_deref())?;

        if self.paginate {
            return self.run_paginated(&session, operation).await;
        }

        let response = session.client.begin_request(operation).await?;
        self.print_response(&response)
    }

    /// Turns the arguments into an operation.
    pub fn build_operation(&self, api_version: &str, project: Option<&str>) -> Result<Operation> {
        let method = parse_method(&self.method)?;
        let route = self.route.trim_start_matches('/');
        let mut operation = Operation::new(method, route, api_version);

        let mut has_project = false;
        for value in &self.route_values {
            let (key, value) = parse_key_value(value)?;
            has_project |= key == "project";
            operation = operation.route_value(key, value);
        }
        if !has_project && route.contains("{project}") {
            operation = operation.optional_route_value("project", project);
        }

        for param in &self.query {
            let (key, value) = parse_key_value(param)?;
            operation = operation.query(key, value);
        }

        if let Some(body) = self.build_body()? {
            operation = operation.json(&body)?;
        }

        for header in &self.header {
            let (name, value) = header
                .split_once(':')
                .with_context(|| format!("Invalid header '{}'. Expected 'Name: Value'", header))?;
            operation = operation.header(name.trim(), value.trim())?;
        }

        if let Some(accept) = &self.accept {
            if !accept.eq_ignore_ascii_case("application/json") {
                operation = operation.binary(accept.clone());
            }
        }

        Ok(operation)
    }

    fn build_body(&self) -> Result<Option<Value>> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input).with_context(|| format!("Could not read {}", input))?
            };

            let value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", input))?;
            return Ok(Some(value));
        }

        if self.field.is_empty() {
            return Ok(None);
        }

        let mut body = serde_json::Map::new();
        for field in &self.field {
            let (key, value) = parse_key_value(field)?;
            set_nested_value(&mut body, &key, parse_field_value(&value));
        }

        Ok(Some(Value::Object(body)))
    }

    async fn run_paginated(&self, session: &Session, operation: Operation) -> Result<()> {
        if *operation.method() != Method::GET {
            bail!("--paginate only works with GET requests");
        }

        let mut items = Vec::new();
        let mut token: Option<String> = None;
        let mut page = 1;

        loop {
            let mut op = operation.clone().response_type(ResponseType::Raw);
            if let Some(token) = &token {
                op = op.query("continuationToken", token.as_str());
            }

            tracing::debug!(page, "Fetching page");
            let response = session.client.begin_request(op).await?;
            let next = continuation_token(&response);
            let body: Value = response.json()?;

            match body {
                Value::Object(mut map) if map.contains_key("value") => {
                    if let Some(Value::Array(values)) = map.remove("value") {
                        items.extend(values);
                    }
                }
                Value::Array(values) => items.extend(values),
                other => items.push(other),
            }

            match next_page_token(token.as_deref(), next) {
                Some(next) => {
                    token = Some(next);
                    page += 1;
                }
                None => break,
            }
        }

        let all = Value::Array(items);
        match &self.output {
            Some(path) => {
                let content = serde_json::to_vec_pretty(&all)?;
                fs::write(path, content).with_context(|| format!("Could not write {}", path))?;
            }
            None => write_json(&all)?,
        }
        Ok(())
    }

    fn print_response(&self, response: &RawResponse) -> Result<()> {
        if self.include {
            println!("{} {}", style("HTTP").dim(), response.status());
            for (name, value) in response.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or(""));
            }
            println!();
        }

        if let Some(path) = &self.output {
            fs::write(path, response.bytes())
                .with_context(|| format!("Could not write {}", path))?;
            tracing::info!(path = %path, bytes = response.bytes().len(), "Saved response");
            return Ok(());
        }

        if response.bytes().is_empty() {
            return Ok(());
        }

        if !self.raw {
            if let Ok(json) = response.json::<Value>() {
                return write_json(&json);
            }
        }

        println!("{}", String::from_utf8_lossy(response.bytes()));
        Ok(())
    }
}

/// The token for the next page. A token equal to the one just sent ends the
/// loop, since requesting it again would return the same page.
fn next_page_token(current: Option<&str>, next: Option<String>) -> Option<String> {
    match next {
        Some(next) if current == Some(next.as_str()) => {
            tracing::warn!(token = %next, "Server repeated the continuation token, stopping");
            None
        }
        next => next,
    }
}

fn parse_method(method: &str) -> Result<Method> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        _ => bail!("Unsupported HTTP method: {}", method),
    }
}

/// Interprets a `-F` value: booleans, null, numbers and JSON literals keep
/// their type, anything else is a string.
fn parse_field_value(value: &str) -> Value {
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = value.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                Value::Number(n)
            } else if value.starts_with('[') || value.starts_with('{') {
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
            } else {
                Value::String(value.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut serde_json::Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        api: ApiCommand,
    }

    fn parse(args: &[&str]) -> ApiCommand {
        let mut argv = vec!["azdo"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).api
    }

    #[test]
    fn test_field_values_keep_their_type() {
        assert_eq!(parse_field_value("12"), Value::from(12));
        assert_eq!(parse_field_value("true"), Value::Bool(true));
        assert_eq!(parse_field_value("[1,2]"), serde_json::json!([1, 2]));
        assert_eq!(parse_field_value("main"), Value::from("main"));
    }

    #[test]
    fn test_repeated_token_ends_paging() {
        assert_eq!(next_page_token(None, Some("a".into())), Some("a".to_string()));
        assert_eq!(next_page_token(Some("a"), Some("b".into())), Some("b".to_string()));
        assert_eq!(next_page_token(Some("a"), Some("a".into())), None);
        assert_eq!(next_page_token(Some("a"), None), None);
    }

    #[test]
    fn test_nested_fields() {
        let mut body = serde_json::Map::new();
        set_nested_value(&mut body, "definition.id", Value::from(12));
        set_nested_value(&mut body, "definition.name", Value::from("CI"));
        assert_eq!(
            Value::Object(body),
            serde_json::json!({"definition": {"id": 12, "name": "CI"}})
        );
    }

    #[test]
    fn test_project_defaults_from_context() {
        let cmd = parse(&["{project}/_apis/build/builds/{buildId}", "-r", "buildId=42"]);
        let op = cmd.build_operation("7.1", Some("Fabrikam")).unwrap();
        assert_eq!(op.path(), "Fabrikam/_apis/build/builds/42");
        assert_eq!(op.query_string(), "api-version=7.1");
    }

    #[test]
    fn test_explicit_project_wins() {
        let cmd = parse(&["{project}/_apis/build/builds", "-r", "project=Other"]);
        let op = cmd.build_operation("7.1", Some("Fabrikam")).unwrap();
        assert_eq!(op.path(), "Other/_apis/build/builds");
    }

    #[test]
    fn test_query_and_body() {
        let cmd = parse(&[
            "/_apis/projects",
            "-X",
            "post",
            "-q",
            "$top=5",
            "-F",
            "name=web",
        ]);
        let op = cmd.build_operation("7.1", None).unwrap();
        assert_eq!(op.method(), &Method::POST);
        assert_eq!(op.path(), "_apis/projects");
        assert_eq!(op.query_string(), "%24top=5&api-version=7.1");
        assert!(!op.body().is_empty());
    }

    #[test]
    fn test_accept_selects_binary() {
        let cmd = parse(&["_apis/x", "--accept", "application/zip"]);
        let op = cmd.build_operation("7.1", None).unwrap();
        assert_eq!(op.accept_header(), "application/zip;api-version=7.1");
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse(&["_apis/x", "-X", "BREW"]).build_operation("7.1", None).is_err());
        assert!(parse(&["_apis/x", "-q", "novalue"]).build_operation("7.1", None).is_err());
        assert!(parse(&["_apis/x", "-H", "NoColon"]).build_operation("7.1", None).is_err());
    }
}
