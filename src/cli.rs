//! Command-line interface. Attribute flags mirror the card's attributes
//! (`--month 3`, `--highlight-days=1,15`); their values stay raw strings and
//! are sanitized later like any other attribute input.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::calendar::{days_in_month, first_weekday_index, Cell, Grid, WEEKDAY_LABELS};
use crate::widget::{Attributes, ATTR_DESIGN, ATTR_HIGHLIGHT, ATTR_MONTH, ATTR_SIZE, ATTR_YEAR};

/// Themed monthly calendar cards as paste-ready HTML.
#[derive(Parser)]
#[command(
    name = "calcard",
    version,
    about = "Themed monthly calendar cards as paste-ready HTML",
    long_about = "Without a subcommand, opens the interactive form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the card's HTML (style block + table).
    Render(RenderArgs),
    /// Copy the card to the clipboard.
    Copy(CopyArgs),
    /// Print the computed month grid.
    Grid(GridArgs),
    /// Open the card in the system browser.
    Open(OpenArgs),
}

/// Card attributes. Values are kept as typed; bad ones fall back to defaults.
#[derive(clap::Args, Debug, Default)]
pub struct AttrArgs {
    /// Month, 1-12.
    #[arg(long, allow_hyphen_values = true)]
    pub month: Option<String>,

    /// Four-digit year.
    #[arg(long, allow_hyphen_values = true)]
    pub year: Option<String>,

    /// Table width in pixels.
    #[arg(long, allow_hyphen_values = true)]
    pub size: Option<String>,

    /// Comma-separated day numbers to highlight.
    #[arg(long = "highlight-days", visible_alias = "highlight")]
    pub highlight_days: Option<String>,

    /// academy, minimal, vibrant or material.
    #[arg(long)]
    pub design: Option<String>,
}

impl AttrArgs {
    /// Flags given on the command line win over `base`.
    pub fn layer_over(&self, mut base: Attributes) -> Attributes {
        let flags = [
            (ATTR_MONTH,     &self.month),
            (ATTR_YEAR,      &self.year),
            (ATTR_SIZE,      &self.size),
            (ATTR_HIGHLIGHT, &self.highlight_days),
            (ATTR_DESIGN,    &self.design),
        ];
        for (name, value) in flags {
            if let Some(v) = value {
                base.insert(name.to_owned(), v.clone());
            }
        }
        base
    }
}

#[derive(clap::Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub attrs: AttrArgs,

    /// Wrap the card in a complete HTML page.
    #[arg(long)]
    pub page: bool,

    /// Write to a file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CopyArgs {
    #[command(flatten)]
    pub attrs: AttrArgs,

    /// Copy the <my-calendar> tag as plain text instead of the styled table.
    #[arg(long)]
    pub container: bool,

    /// Print what would be copied without touching the clipboard.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub attrs: AttrArgs,

    /// Print JSON instead of a text calendar.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct OpenArgs {
    #[command(flatten)]
    pub attrs: AttrArgs,
}

// ─── Grid output ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GridReport<'a> {
    month:               u32,
    year:                i32,
    first_weekday_index: u32,
    days_in_month:       u32,
    weeks:               Vec<&'a [Cell]>,
}

pub fn grid_json(grid: &Grid) -> Result<String> {
    let report = GridReport {
        month:               grid.month,
        year:                grid.year,
        first_weekday_index: first_weekday_index(grid.year, grid.month),
        days_in_month:       days_in_month(grid.year, grid.month),
        weeks:               grid.weeks().collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Plain-text month, highlighted days marked with `*`.
pub fn grid_text(grid: &Grid) -> String {
    let width = 4 * WEEKDAY_LABELS.len();
    let mut out = String::new();
    let title = format!("{} {}", grid.month_name(), grid.year);
    let _ = writeln!(out, "{title:^width$}");
    for label in WEEKDAY_LABELS {
        let _ = write!(out, "{:>3} ", &label[..2]);
    }
    out.push('\n');
    for week in grid.weeks() {
        let line: String = week.iter().map(|c| match c.day {
            None    => "    ".to_owned(),
            Some(d) => format!("{d:>3}{}", if c.highlighted { '*' } else { ' ' }),
        }).collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}
