//
//  azure-devops-rest
//  tests/cli_test.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::Path;

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::TempDir;

/// An `azdo` command isolated from the user's environment and config.
fn azdo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("azdo").unwrap();
    cmd.current_dir(dir)
        .env("AZDO_CONFIG", dir.join("config.toml"))
        .env_remove("AZDO_ORG")
        .env_remove("AZDO_PROJECT")
        .env_remove("AZDO_PAT")
        .env_remove("AZDO_TOKEN")
        .env_remove("AZDO_API_VERSION")
        .env_remove("AZDO_DEBUG");
    cmd
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    azdo(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("azdo version "));
}

#[test]
fn test_config_set_get_and_path() {
    let dir = TempDir::new().unwrap();

    azdo(dir.path())
        .args(["config", "set", "organization", "contoso"])
        .assert()
        .success();

    azdo(dir.path())
        .args(["config", "get", "organization"])
        .assert()
        .success()
        .stdout("contoso\n");

    azdo(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("organization = \"contoso\""));
}

#[test]
fn test_config_rejects_unknown_key_and_bad_timeout() {
    let dir = TempDir::new().unwrap();

    azdo(dir.path())
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));

    azdo(dir.path())
        .args(["config", "set", "timeout", "soon"])
        .assert()
        .failure();
}

#[test]
fn test_organization_settings() {
    let dir = TempDir::new().unwrap();

    azdo(dir.path())
        .args(["config", "set", "token_env", "CONTOSO_PAT", "--organization", "contoso"])
        .assert()
        .success();

    azdo(dir.path())
        .args(["--json", "config", "get", "token_env", "--organization", "contoso"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": \"CONTOSO_PAT\""));
}

#[test]
fn test_commands_need_an_organization() {
    let dir = TempDir::new().unwrap();
    azdo(dir.path())
        .args(["build", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not determine organization"));
}

#[test]
fn test_build_list_needs_a_project() {
    let dir = TempDir::new().unwrap();
    azdo(dir.path())
        .args(["--org", "https://dev.azure.com/contoso", "build", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project specified"));
}

#[test]
fn test_api_prints_json() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/_apis/projects")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("$top".into(), "1".into()),
            Matcher::UrlEncoded("api-version".into(), "7.1".into()),
        ]))
        .match_header("authorization", "Basic OnNlY3JldA==")
        .with_status(200)
        .with_body(r#"{"count": 1, "value": [{"name": "Fabrikam"}]}"#)
        .create();

    azdo(dir.path())
        .env("AZDO_PAT", "secret")
        .args(["--org", &server.url(), "api", "_apis/projects", "-q", "$top=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Fabrikam\""));

    mock.assert();
}

#[test]
fn test_api_fills_project_and_route_values() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/Fabrikam/_apis/build/builds/42")
        .match_query(Matcher::UrlEncoded("api-version".into(), "7.1-preview.7".into()))
        .with_status(200)
        .with_body(r#"{"id": 42}"#)
        .create();

    azdo(dir.path())
        .env("AZDO_API_VERSION", "7.1-preview.7")
        .args([
            "--org",
            &server.url(),
            "--project",
            "Fabrikam",
            "api",
            "{project}/_apis/build/builds/{buildId}",
            "-r",
            "buildId=42",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 42"));

    mock.assert();
}

#[test]
fn test_api_paginate_merges_pages() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let first = server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::Regex("^api-version=7\\.1$".into()))
        .with_status(200)
        .with_header("x-ms-continuationtoken", "next")
        .with_body(r#"{"count": 1, "value": [{"id": 1}]}"#)
        .create();
    let second = server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::UrlEncoded("continuationToken".into(), "next".into()))
        .with_status(200)
        .with_body(r#"{"count": 1, "value": [{"id": 2}]}"#)
        .create();

    let output = azdo(dir.path())
        .args([
            "--org",
            &server.url(),
            "-p",
            "Fabrikam",
            "api",
            "{project}/_apis/build/builds",
            "--paginate",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let items: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(items, serde_json::json!([{"id": 1}, {"id": 2}]));
    first.assert();
    second.assert();
}

#[test]
fn test_api_paginate_stops_on_repeated_token() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let first = server
        .mock("GET", "/_apis/projects")
        .match_query(Matcher::Regex("^api-version=7\\.1$".into()))
        .with_status(200)
        .with_header("x-ms-continuationtoken", "same")
        .with_body(r#"{"count": 1, "value": [{"id": 1}]}"#)
        .expect(1)
        .create();
    let repeated = server
        .mock("GET", "/_apis/projects")
        .match_query(Matcher::UrlEncoded("continuationToken".into(), "same".into()))
        .with_status(200)
        .with_header("x-ms-continuationtoken", "same")
        .with_body(r#"{"count": 1, "value": [{"id": 2}]}"#)
        .expect(1)
        .create();

    let output = azdo(dir.path())
        .args(["--org", &server.url(), "api", "_apis/projects", "--paginate"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let items: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(items, serde_json::json!([{"id": 1}, {"id": 2}]));
    first.assert();
    repeated.assert();
}

#[test]
fn test_api_not_found_exit_code() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    server
        .mock("GET", "/_apis/missing")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "not found"}"#)
        .create();

    azdo(dir.path())
        .args(["--org", &server.url(), "api", "_apis/missing"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_api_output_writes_bytes() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let archive: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0xff, 0x00];
    server
        .mock("GET", "/_apis/logs")
        .match_query(Matcher::Any)
        .match_header("accept", "application/zip;api-version=7.1")
        .with_status(200)
        .with_body(archive.clone())
        .create();

    let target = dir.path().join("logs.zip");
    azdo(dir.path())
        .args([
            "--org",
            &server.url(),
            "api",
            "_apis/logs",
            "--accept",
            "application/zip",
            "--output",
            target.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(std::fs::read(&target).unwrap(), archive);
}

#[test]
fn test_build_list_table() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    server
        .mock("GET", "/Fabrikam/_apis/build/builds")
        .match_query(Matcher::UrlEncoded("$top".into(), "20".into()))
        .with_status(200)
        .with_body(
            r#"{"count": 1, "value": [{"id": 42, "buildNumber": "20240301.4",
                "status": "completed", "result": "succeeded",
                "sourceBranch": "refs/heads/main",
                "definition": {"id": 12, "name": "web-ci"}}]}"#,
        )
        .create();

    azdo(dir.path())
        .args(["--org", &server.url(), "-p", "Fabrikam", "build", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web-ci"))
        .stdout(predicate::str::contains("succeeded"));
}

#[test]
fn test_completion_bash() {
    let dir = TempDir::new().unwrap();
    azdo(dir.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("azdo"));
}
