//! Month grid arithmetic: which cell of a Monday-first 7-column table holds
//! which day, and which days are highlighted.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::RangeInclusive;

pub const DAYS_PER_WEEK: usize = 7;

/// Years we render. Four-digit Gregorian years only.
pub const YEAR_RANGE: RangeInclusive<i32> = 1..=9999;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March",     "April",   "May",      "June",
    "July",    "August",   "September", "October", "November", "December",
];

pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// ─── Data types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRequest {
    pub month:            u32,
    pub year:             i32,
    pub highlighted_days: HashSet<u32>,
}

impl CalendarRequest {
    /// Month outside 1-12 becomes 1, year is clamped into [`YEAR_RANGE`].
    pub fn new(month: u32, year: i32, highlighted_days: HashSet<u32>) -> Self {
        Self {
            month: coerce_month(month),
            year:  clamp_year(year),
            highlighted_days,
        }
    }
}

/// One table cell. `day == None` is padding before the 1st or after the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub day:         Option<u32>,
    pub highlighted: bool,
}

impl Cell {
    pub const EMPTY: Cell = Cell { day: None, highlighted: false };

    pub fn is_empty(&self) -> bool { self.day.is_none() }
}

/// Cells of one month in emission order; always a whole number of weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub month: u32,
    pub year:  i32,
    cells:     Vec<Cell>,
}

impl Grid {
    pub fn compute(req: &CalendarRequest) -> Self {
        Self {
            month: req.month,
            year:  req.year,
            cells: compute_grid(req.month, req.year, &req.highlighted_days),
        }
    }

    pub fn cells(&self) -> &[Cell] { &self.cells }

    /// Rows of exactly [`DAYS_PER_WEEK`] cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn week_count(&self) -> usize { self.cells.len() / DAYS_PER_WEEK }

    pub fn month_name(&self) -> &'static str { month_name(self.month) }
}

// ─── Arithmetic ───────────────────────────────────────────────────────────────

pub fn coerce_month(month: u32) -> u32 {
    if (1..=12).contains(&month) { month } else { 1 }
}

pub fn clamp_year(year: i32) -> i32 {
    year.clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end())
}

/// Weekday of the 1st, Monday = 0 … Sunday = 6.
pub fn first_weekday_index(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        // Sunday-based numbering shifted so the week starts on Monday.
        .map(|d| (d.weekday().num_days_from_sunday() + 6) % 7)
        .unwrap_or(0)
}

/// Last day of `month`: the day before the 1st of the following month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year.checked_add(1), 1) } else { (Some(year), month + 1) };
    ny.and_then(|ny| NaiveDate::from_ymd_opt(ny, nm, 1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn total_cells(first_weekday: u32, days: u32) -> usize {
    let used = (first_weekday + days) as usize;
    used.div_ceil(DAYS_PER_WEEK) * DAYS_PER_WEEK
}

/// Cells for `month`/`year`, padded on both sides to complete weeks. Month and
/// year are coerced the same way [`CalendarRequest::new`] does.
pub fn compute_grid(month: u32, year: i32, highlighted: &HashSet<u32>) -> Vec<Cell> {
    let month  = coerce_month(month);
    let year   = clamp_year(year);
    let offset = first_weekday_index(year, month) as usize;
    let days   = days_in_month(year, month);
    let total  = total_cells(offset as u32, days);

    let mut cells = Vec::with_capacity(total);
    let mut day   = 1u32;
    for i in 0..total {
        if i < offset || day > days {
            cells.push(Cell::EMPTY);
        } else {
            cells.push(Cell { day: Some(day), highlighted: highlighted.contains(&day) });
            day += 1;
        }
    }
    cells
}

pub fn month_name(m: u32) -> &'static str {
    MONTH_NAMES.get(m.wrapping_sub(1) as usize).copied().unwrap_or(MONTH_NAMES[0])
}
