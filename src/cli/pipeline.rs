//
//  azure-devops-rest
//  cli/pipeline.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline commands
//!
//! ```bash
//! azdo pipeline list
//! azdo pipeline runs 7
//! azdo pipeline run 7 --branch main --variable env=staging --parameter image=ubuntu
//! azdo pipeline view-run 7 1234
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::api::areas::{Pipeline, Run, RunPipelineRequest};
use crate::context::GitContext;
use crate::output::{
    format_status, print_field, print_header, print_optional_field, OutputWriter, TableOutput,
    TableRow,
};
use crate::util::{branch_ref, elapsed, format_relative_time, format_time, parse_key_value};

use super::{GlobalOptions, Session};

/// Work with YAML pipelines
#[derive(Args, Debug)]
pub struct PipelineCommand {
    #[command(subcommand)]
    pub command: PipelineSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PipelineSubcommand {
    /// List pipelines in the project
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// List recent runs of a pipeline
    Runs(RunsArgs),

    /// Start a run
    Run(RunArgs),

    /// Show one run
    ViewRun(ViewRunArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of pipelines per page
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: i32,

    /// Follow continuation tokens and list every page
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct RunsArgs {
    /// Pipeline id
    pub pipeline: i64,

    /// Show at most this many runs
    #[arg(long, short = 'L', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pipeline id
    pub pipeline: i64,

    /// Branch to run (defaults to the current git branch)
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Run-time variable (name=value, repeatable)
    #[arg(long = "variable", short = 'v', action = clap::ArgAction::Append)]
    pub variables: Vec<String>,

    /// Template parameter (name=value, repeatable)
    #[arg(long = "parameter", action = clap::ArgAction::Append)]
    pub parameters: Vec<String>,

    /// Only expand the YAML, do not run it
    #[arg(long)]
    pub preview: bool,
}

#[derive(Args, Debug)]
pub struct ViewRunArgs {
    /// Pipeline id
    pub pipeline: i64,

    /// Run id
    pub run: i64,
}

impl PipelineCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::connect(global)?;
        let writer = OutputWriter::from_json_flag(global.json);

        match &self.command {
            PipelineSubcommand::List(args) => list(&session, &writer, args).await,
            PipelineSubcommand::Runs(args) => runs(&session, &writer, args).await,
            PipelineSubcommand::Run(args) => run(&session, &writer, args).await,
            PipelineSubcommand::ViewRun(args) => view_run(&session, &writer, args).await,
        }
    }
}

async fn list(session: &Session, writer: &OutputWriter, args: &ListArgs) -> Result<()> {
    let project = session.project()?;
    let api = session.client.pipelines();

    let mut pipelines = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = api
            .list_pipelines(project, None, Some(args.limit), token.as_deref())
            .await?;
        let next = page.continuation_token().map(str::to_string);
        pipelines.extend(page.into_items());

        match next {
            Some(next) if args.all => token = Some(next),
            _ => break,
        }
    }

    writer.write_list(&pipelines)
}

async fn runs(session: &Session, writer: &OutputWriter, args: &RunsArgs) -> Result<()> {
    let mut runs = session
        .client
        .pipelines()
        .list_runs(session.project()?, args.pipeline)
        .await?;
    runs.truncate(args.limit);
    writer.write_list(&runs)
}

async fn run(session: &Session, writer: &OutputWriter, args: &RunArgs) -> Result<()> {
    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => GitContext::open()
            .and_then(|git| git.current_branch())
            .context("No --branch given and no current git branch found")?,
    };

    let mut request = RunPipelineRequest::for_branch(branch_ref(&branch));
    for variable in &args.variables {
        let (name, value) = parse_key_value(variable)?;
        request = request.with_variable(name, value);
    }
    for parameter in &args.parameters {
        let (name, value) = parse_key_value(parameter)?;
        request = request.with_parameter(name, value);
    }
    request.preview_run = args.preview;

    let run = session
        .client
        .pipelines()
        .run_pipeline(session.project()?, args.pipeline, &request)
        .await
        .with_context(|| format!("Could not run pipeline {}", args.pipeline))?;

    writer.write_success(&format!(
        "Started run {} of pipeline {}",
        run.id, args.pipeline
    ));
    writer.write(&run)
}

async fn view_run(session: &Session, writer: &OutputWriter, args: &ViewRunArgs) -> Result<()> {
    let run = session
        .client
        .pipelines()
        .get_run(session.project()?, args.pipeline, args.run)
        .await?;
    writer.write(&run)
}

fn run_state(run: &Run) -> &'static str {
    match (&run.result, &run.state) {
        (Some(result), _) => result.as_str(),
        (None, Some(state)) => state.as_str(),
        (None, None) => "unknown",
    }
}

impl TableRow for Pipeline {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "FOLDER", "REVISION"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or_default(),
            self.folder.clone().unwrap_or_default(),
            self.revision.map(|r| r.to_string()).unwrap_or_default(),
        ]
    }
}

impl TableRow for Run {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "STATE", "CREATED", "DURATION"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let now = Utc::now();
        vec![
            self.id.to_string(),
            self.name.clone().unwrap_or_default(),
            format_status(run_state(self), color),
            self.created_date
                .as_ref()
                .map(|time| format_relative_time(time, &now))
                .unwrap_or_default(),
            elapsed(self.created_date.as_ref(), self.finished_date.as_ref()).unwrap_or_default(),
        ]
    }
}

impl TableOutput for Run {
    fn print_table(&self, color: bool) {
        print_header(&format!(
            "Run {} ({})",
            self.id,
            self.name.as_deref().unwrap_or("-")
        ));
        print_optional_field(
            "Pipeline",
            self.pipeline.as_ref().and_then(|p| p.name.as_deref()),
            color,
        );
        print_field("State", &format_status(run_state(self), color), color);
        if let Some(time) = &self.created_date {
            print_field("Created", &format_time(time), color);
        }
        if let Some(time) = &self.finished_date {
            print_field("Finished", &format_time(time), color);
        }
        print_optional_field("URL", self.url.as_deref(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::areas::{RunResult, RunState};

    #[test]
    fn test_run_state() {
        let mut run = Run {
            state: Some(RunState::InProgress),
            ..Default::default()
        };
        assert_eq!(run_state(&run), "inProgress");

        run.result = Some(RunResult::Succeeded);
        assert_eq!(run_state(&run), "succeeded");
    }

    #[test]
    fn test_pipeline_row() {
        let pipeline = Pipeline {
            id: 7,
            name: Some("web-ci".to_string()),
            folder: Some("\\".to_string()),
            ..Default::default()
        };
        assert_eq!(pipeline.row(false), vec!["7", "web-ci", "\\", ""]);
    }
}
