//
//  azure-devops-rest
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Renders command results either as tables for the terminal or as JSON for
//! scripts (`--json`).
//!
//! - [`table`]: Table helpers built on `comfy_table`
//! - [`json`]: JSON writers built on `serde_json`
//!
//! Single records implement [`TableOutput`] and print as a list of fields.
//! Collections implement [`TableRow`] and print as one table.
//!
//! ## Example
//!
//! ```rust,ignore
//! use azure_devops_rest::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write_list(&builds)?;
//! writer.write_success("Build queued");
//! ```

mod json;
mod table;

pub use json::*;
pub use table::*;

use serde::Serialize;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Writes results and status messages in the selected format.
///
/// Colors follow `console`'s detection, so they are off when stdout is not
/// a terminal or `NO_COLOR` is set.
///
/// # Streams
///
/// Results always go to stdout. In JSON mode success messages move to
/// stderr, keeping stdout a single JSON document for tools like `jq`.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// JSON when `json` is set, tables otherwise.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::new(OutputFormat::Json)
        } else {
            Self::new(OutputFormat::Table)
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes a single record.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value)?,
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    /// Writes a collection as one table, or a JSON array.
    pub fn write_list<T: Serialize + TableRow>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&values)?,
            OutputFormat::Table => {
                if values.is_empty() {
                    self.write_info("No results");
                    return Ok(());
                }

                TableBuilder::new()
                    .color(self.color)
                    .headers(T::headers().iter().copied())
                    .rows(values.iter().map(|value| value.row(self.color)))
                    .print();
            }
        }
        Ok(())
    }

    pub fn write_info(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Status messages go to stderr in JSON mode so stdout stays parseable.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        let line = if self.color {
            format!("{} {}", style("✓").green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        };

        if self.is_json() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// A record that prints as a block of `key: value` fields.
///
/// Used by `view` commands, for example `azdo build view 42`:
///
/// ```text
/// Build 20240301.4
/// ----------------
/// Definition: web-ci
/// Status: succeeded
/// ```
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

/// A record that prints as one row of a table.
pub trait TableRow {
    /// Column titles, shared by every row of the type.
    fn headers() -> &'static [&'static str];

    /// One cell per header, in the same order.
    fn row(&self, color: bool) -> Vec<String>;
}

/// Prints `text` in bold, underlined with dashes.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

/// Prints a field only when it has a value.
pub fn print_optional_field(key: &str, value: Option<&str>, color: bool) {
    if let Some(value) = value {
        print_field(key, value, color);
    }
}
