//
//  azure-devops-rest
//  cli/build.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build commands
//!
//! ```bash
//! azdo build list --definition 12 --branch main --status completed
//! azdo build view 42
//! azdo build logs 42 --log 7
//! azdo build logs 42 --zip logs.zip
//! azdo build queue --definition 12
//! azdo build tag 42 --add release
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::api::areas::{
    Build, BuildDefinition, BuildLog, BuildResult, BuildStatus, BuildUpdate, GetBuildsOptions,
    GetDefinitionsOptions, QueueBuildRequest,
};
use crate::context::GitContext;
use crate::output::{
    format_status, print_field, print_header, print_optional_field, truncate, OutputWriter,
    TableOutput, TableRow,
};
use crate::util::{branch_ref, elapsed, format_relative_time, format_time};

use super::{GlobalOptions, Session};

/// Work with builds
#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(subcommand)]
    pub command: BuildSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BuildSubcommand {
    /// List recent builds
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show one build
    View(ViewArgs),

    /// List a build's logs, print one, or download all as a zip
    Logs(LogsArgs),

    /// Queue a new build of a definition
    Queue(QueueArgs),

    /// Cancel a running build
    Cancel(ViewArgs),

    /// Re-run the failed jobs of a build
    Retry(ViewArgs),

    /// List, add or remove build tags
    Tag(TagArgs),

    /// List build definitions
    #[command(visible_alias = "defs")]
    Definitions(DefinitionsArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only builds of these definition ids
    #[arg(long, short = 'd', value_delimiter = ',')]
    pub definition: Vec<i64>,

    /// Only builds of this branch (name or full ref)
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Status filter: inProgress, completed, cancelling, postponed, notStarted, all
    #[arg(long, value_parser = parse_status)]
    pub status: Option<BuildStatus>,

    /// Result filter: succeeded, partiallySucceeded, failed, canceled
    #[arg(long, value_parser = parse_result)]
    pub result: Option<BuildResult>,

    /// Only builds requested by this user
    #[arg(long)]
    pub requested_for: Option<String>,

    /// Only builds carrying these tags
    #[arg(long, value_delimiter = ',')]
    pub tag: Vec<String>,

    /// Maximum number of builds per page
    #[arg(long, short = 'L', default_value = "20")]
    pub limit: i32,

    /// Follow continuation tokens and list every page
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Build id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Build id
    pub id: i64,

    /// Print this log instead of listing logs
    #[arg(long)]
    pub log: Option<i64>,

    /// First line to print
    #[arg(long, requires = "log")]
    pub start: Option<i64>,

    /// Last line to print
    #[arg(long, requires = "log")]
    pub end: Option<i64>,

    /// Download every log as a zip archive to this path
    #[arg(long, conflicts_with = "log")]
    pub zip: Option<String>,
}

#[derive(Args, Debug)]
pub struct QueueArgs {
    /// Definition id
    #[arg(long, short = 'd')]
    pub definition: i64,

    /// Branch to build (defaults to the current git branch)
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Commit to build
    #[arg(long)]
    pub commit: Option<String>,

    /// Queue-time variables as a JSON object
    #[arg(long)]
    pub parameters: Option<String>,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Build id
    pub id: i64,

    /// Tags to add
    #[arg(long, short = 'a')]
    pub add: Vec<String>,

    /// Tags to remove
    #[arg(long, short = 'r')]
    pub remove: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DefinitionsArgs {
    /// Only definitions whose name matches (supports * wildcards)
    #[arg(long)]
    pub name: Option<String>,

    /// Maximum number of definitions
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: i32,
}

impl BuildCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::connect(global)?;
        let writer = OutputWriter::from_json_flag(global.json);

        match &self.command {
            BuildSubcommand::List(args) => list(&session, &writer, args).await,
            BuildSubcommand::View(args) => view(&session, &writer, args).await,
            BuildSubcommand::Logs(args) => logs(&session, &writer, args).await,
            BuildSubcommand::Queue(args) => queue(&session, &writer, args).await,
            BuildSubcommand::Cancel(args) => cancel(&session, &writer, args).await,
            BuildSubcommand::Retry(args) => retry(&session, &writer, args).await,
            BuildSubcommand::Tag(args) => tag(&session, &writer, args).await,
            BuildSubcommand::Definitions(args) => definitions(&session, &writer, args).await,
        }
    }
}

async fn list(session: &Session, writer: &OutputWriter, args: &ListArgs) -> Result<()> {
    let project = session.project()?;
    let mut options = GetBuildsOptions {
        definitions: args.definition.clone(),
        branch_name: args.branch.as_deref().map(branch_ref),
        status_filter: args.status,
        result_filter: args.result,
        requested_for: args.requested_for.clone(),
        tag_filters: args.tag.clone(),
        top: Some(args.limit),
        ..Default::default()
    };

    let mut builds = Vec::new();
    loop {
        let page = session.client.build().get_builds(project, &options).await?;
        let next = page.continuation_token().map(str::to_string);
        builds.extend(page.into_items());

        match next {
            Some(token) if args.all => options.continuation_token = Some(token),
            _ => break,
        }
    }

    writer.write_list(&builds)
}

async fn view(session: &Session, writer: &OutputWriter, args: &ViewArgs) -> Result<()> {
    let build = session
        .client
        .build()
        .get_build(session.project()?, args.id)
        .await
        .with_context(|| format!("Could not get build {}", args.id))?;
    writer.write(&build)
}

async fn logs(session: &Session, writer: &OutputWriter, args: &LogsArgs) -> Result<()> {
    let project = session.project()?;
    let api = session.client.build();

    if let Some(path) = &args.zip {
        let archive = api.get_build_logs_zip(project, args.id).await?;
        fs::write(path, &archive).with_context(|| format!("Could not write {}", path))?;
        writer.write_success(&format!("Saved {} bytes to {}", archive.len(), path));
        return Ok(());
    }

    if let Some(log_id) = args.log {
        let text = api
            .get_build_log_lines(project, args.id, log_id, args.start, args.end)
            .await?;
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let logs = api.get_build_logs(project, args.id).await?;
    writer.write_list(&logs)
}

async fn queue(session: &Session, writer: &OutputWriter, args: &QueueArgs) -> Result<()> {
    let project = session.project()?;

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => GitContext::open()
            .and_then(|git| git.current_branch())
            .context("No --branch given and no current git branch found")?,
    };

    let mut request = QueueBuildRequest::new(args.definition).with_branch(branch_ref(&branch));
    request.source_version = args.commit.clone();
    if let Some(parameters) = &args.parameters {
        serde_json::from_str::<serde_json::Value>(parameters)
            .context("--parameters must be a JSON object")?;
        request.parameters = Some(parameters.clone());
    }

    let build = session.client.build().queue_build(project, &request, None).await?;
    writer.write_success(&format!(
        "Queued build {} ({})",
        build.id,
        build.build_number.as_deref().unwrap_or("-")
    ));
    writer.write(&build)
}

async fn cancel(session: &Session, writer: &OutputWriter, args: &ViewArgs) -> Result<()> {
    let update = BuildUpdate {
        status: Some(BuildStatus::Cancelling),
        ..Default::default()
    };
    let build = session
        .client
        .build()
        .update_build(session.project()?, args.id, &update, None)
        .await?;
    writer.write_success(&format!("Cancelling build {}", build.id));
    Ok(())
}

async fn retry(session: &Session, writer: &OutputWriter, args: &ViewArgs) -> Result<()> {
    let build = session
        .client
        .build()
        .update_build(session.project()?, args.id, &BuildUpdate::default(), Some(true))
        .await?;
    writer.write_success(&format!("Retrying build {}", build.id));
    Ok(())
}

async fn tag(session: &Session, writer: &OutputWriter, args: &TagArgs) -> Result<()> {
    let project = session.project()?;
    let api = session.client.build();

    let mut tags = if args.add.is_empty() && args.remove.is_empty() {
        api.get_build_tags(project, args.id).await?
    } else {
        Vec::new()
    };

    for tag in &args.add {
        if tag.trim().is_empty() {
            bail!("Tags cannot be empty");
        }
        tags = api.add_build_tag(project, args.id, tag).await?;
    }
    for tag in &args.remove {
        tags = api.delete_build_tag(project, args.id, tag).await?;
    }

    if writer.is_json() {
        return crate::output::write_json(&tags);
    }
    if tags.is_empty() {
        writer.write_info("No tags");
    } else {
        for tag in &tags {
            println!("{}", tag);
        }
    }
    Ok(())
}

async fn definitions(session: &Session, writer: &OutputWriter, args: &DefinitionsArgs) -> Result<()> {
    let options = GetDefinitionsOptions {
        name: args.name.clone(),
        top: Some(args.limit),
        ..Default::default()
    };
    let definitions = session
        .client
        .build()
        .get_definitions(session.project()?, &options)
        .await?;
    writer.write_list(&definitions)
}

fn parse_status(value: &str) -> Result<BuildStatus, String> {
    match value.to_lowercase().as_str() {
        "inprogress" | "in-progress" => Ok(BuildStatus::InProgress),
        "completed" => Ok(BuildStatus::Completed),
        "cancelling" => Ok(BuildStatus::Cancelling),
        "postponed" => Ok(BuildStatus::Postponed),
        "notstarted" | "not-started" => Ok(BuildStatus::NotStarted),
        "all" => Ok(BuildStatus::All),
        _ => Err(format!("unknown build status '{}'", value)),
    }
}

fn parse_result(value: &str) -> Result<BuildResult, String> {
    match value.to_lowercase().as_str() {
        "succeeded" => Ok(BuildResult::Succeeded),
        "partiallysucceeded" | "partially-succeeded" => Ok(BuildResult::PartiallySucceeded),
        "failed" => Ok(BuildResult::Failed),
        "canceled" | "cancelled" => Ok(BuildResult::Canceled),
        _ => Err(format!("unknown build result '{}'", value)),
    }
}

/// `refs/heads/main` shows as `main`.
fn short_branch(branch: Option<&str>) -> &str {
    branch
        .map(|b| b.strip_prefix("refs/heads/").unwrap_or(b))
        .unwrap_or("-")
}

/// The result once a build completed, its status before that.
fn build_state(build: &Build) -> &'static str {
    match (build.status, build.result) {
        (Some(BuildStatus::Completed), Some(result)) => result.as_str(),
        (Some(status), _) => status.as_str(),
        (None, Some(result)) => result.as_str(),
        (None, None) => "unknown",
    }
}

impl TableRow for Build {
    fn headers() -> &'static [&'static str] {
        &["ID", "NUMBER", "DEFINITION", "BRANCH", "STATE", "REQUESTED BY", "QUEUED"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let now = Utc::now();
        vec![
            self.id.to_string(),
            self.build_number.clone().unwrap_or_default(),
            self.definition
                .as_ref()
                .and_then(|d| d.name.as_deref())
                .map(|name| truncate(name, 30))
                .unwrap_or_default(),
            truncate(short_branch(self.source_branch.as_deref()), 30),
            format_status(build_state(self), color),
            self.requested_for
                .as_ref()
                .map(|identity| identity.name().to_string())
                .unwrap_or_default(),
            self.queue_time
                .as_ref()
                .map(|time| format_relative_time(time, &now))
                .unwrap_or_default(),
        ]
    }
}

impl TableOutput for Build {
    fn print_table(&self, color: bool) {
        print_header(&format!(
            "Build {} ({})",
            self.id,
            self.build_number.as_deref().unwrap_or("-")
        ));
        print_optional_field(
            "Definition",
            self.definition.as_ref().and_then(|d| d.name.as_deref()),
            color,
        );
        print_field("State", &format_status(build_state(self), color), color);
        print_field("Branch", short_branch(self.source_branch.as_deref()), color);
        print_optional_field("Commit", self.source_version.as_deref(), color);
        print_optional_field("Reason", self.reason.as_deref(), color);
        print_optional_field(
            "Requested by",
            self.requested_for.as_ref().map(|identity| identity.name()),
            color,
        );
        if let Some(time) = &self.queue_time {
            print_field("Queued", &format_time(time), color);
        }
        if let Some(time) = &self.finish_time {
            print_field("Finished", &format_time(time), color);
        }
        if let Some(duration) = elapsed(self.start_time.as_ref(), self.finish_time.as_ref()) {
            print_field("Duration", &duration, color);
        }
        if !self.tags.is_empty() {
            print_field("Tags", &self.tags.join(", "), color);
        }
    }
}

impl TableRow for BuildLog {
    fn headers() -> &'static [&'static str] {
        &["ID", "TYPE", "LINES", "LAST CHANGED"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.log_type.clone().unwrap_or_default(),
            self.line_count.map(|n| n.to_string()).unwrap_or_default(),
            self.last_changed_on
                .as_ref()
                .map(format_time)
                .unwrap_or_default(),
        ]
    }
}

impl TableRow for BuildDefinition {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "PATH", "QUEUE STATUS"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or_default(),
            self.path.clone().unwrap_or_default(),
            format_status(self.queue_status.as_deref().unwrap_or("-"), color),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_and_result() {
        assert_eq!(parse_status("inProgress").unwrap(), BuildStatus::InProgress);
        assert_eq!(parse_result("cancelled").unwrap(), BuildResult::Canceled);
        assert!(parse_status("sleeping").is_err());
    }

    #[test]
    fn test_build_state_prefers_result_once_completed() {
        let mut build = Build {
            status: Some(BuildStatus::InProgress),
            ..Default::default()
        };
        assert_eq!(build_state(&build), "inProgress");

        build.status = Some(BuildStatus::Completed);
        build.result = Some(BuildResult::Failed);
        assert_eq!(build_state(&build), "failed");
    }

    #[test]
    fn test_build_row() {
        let build = Build {
            id: 42,
            build_number: Some("20240301.4".to_string()),
            source_branch: Some("refs/heads/main".to_string()),
            status: Some(BuildStatus::Completed),
            result: Some(BuildResult::Succeeded),
            ..Default::default()
        };

        let row = build.row(false);
        assert_eq!(row.len(), Build::headers().len());
        assert_eq!(row[0], "42");
        assert_eq!(row[3], "main");
        assert_eq!(row[4], "succeeded");
    }
}
