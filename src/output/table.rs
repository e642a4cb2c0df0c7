//
//  azure-devops-rest
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Helpers for printing builds, runs, pipelines and other lists as terminal
//! tables, rendered with `comfy_table`.
//!
//! ## Features
//!
//! - Builder for tables with headers and rows
//! - Cyan headers when the terminal supports color
//! - Status coloring for build, run and test states
//! - Character-safe truncation of long names and branches
//!
//! ## Example
//!
//! ```rust,ignore
//! use azure_devops_rest::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["ID", "DEFINITION", "STATE"])
//!     .row(["42", "web-ci", "succeeded"])
//!     .row(["43", "web-ci", "inProgress"])
//!     .print();
//! ```
//!
//! ## Notes
//!
//! Tables use UTF-8 box-drawing borders. With a terminal attached the
//! columns wrap to its width; piped output is left unwrapped.

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a table with the UTF-8 border preset and dynamic column widths.
///
/// Prefer [`TableBuilder`] unless the raw [`Table`] is needed.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Builds a table with optional colored headers.
///
/// ```rust
/// use azure_devops_rest::output::TableBuilder;
///
/// let table = TableBuilder::new()
///     .color(false)
///     .headers(["ID", "STATUS"])
///     .row(["42", "completed"])
///     .build();
/// assert!(table.to_string().contains("completed"));
/// ```
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    /// Overrides color detection. Must be called before [`headers`](Self::headers).
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            self.table
                .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .add_row(cells.into_iter().map(Into::into).collect::<Vec<String>>());
        self
    }

    /// Adds every row of `rows`, typically from [`TableRow::row`](super::TableRow::row).
    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            self.table
                .add_row(row.into_iter().map(Into::into).collect::<Vec<String>>());
        }
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a build, run or test status by how it went.
///
/// | Color | Statuses |
/// |-------|----------|
/// | Green | `inProgress`, `running`, `active`, `online` |
/// | Blue | `succeeded`, `completed`, `passed` |
/// | Red | `failed`, `canceled`, `cancelling`, `aborted`, `offline` |
/// | Yellow | `notStarted`, `postponed`, `partiallySucceeded`, `queued`, `waiting` |
///
/// Matching ignores case. Other values and uncolored output are returned
/// as given.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    use console::style;
    match status.to_lowercase().as_str() {
        "inprogress" | "running" | "active" | "online" => style(status).green().to_string(),
        "succeeded" | "completed" | "passed" => style(status).blue().to_string(),
        "failed" | "canceled" | "cancelling" | "aborted" | "offline" => {
            style(status).red().to_string()
        }
        "notstarted" | "postponed" | "partiallysucceeded" | "queued" | "waiting" => {
            style(status).yellow().to_string()
        }
        _ => status.to_string(),
    }
}

/// Shortens `s` to at most `max_len` characters, ending in `...`.
///
/// Counts characters, not bytes, so multi-byte names are never split. When
/// `max_len` is 3 or less there is no room for the ellipsis and the text is
/// cut short instead.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}
