//! Terminal rendering for reports and raw pages.
//!
//! Rendering goes through a [`Printer`] passed in by the caller, so the
//! core never writes to the terminal on its own.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use tracing::debug;

use crate::dataset::TripRecord;
use crate::error::StatsError;
use crate::pager::Page;
use crate::stats::{
    DurationStats, StationStats, StatisticsReport, TemporalStats, UserStats, ValueCounts,
};

const RULE_WIDTH: usize = 40;

/// How a line should stand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Success,
    Warning,
    Plain,
}

/// Line-oriented output capability.
pub trait Printer {
    fn print(&mut self, tone: Tone, text: &str) -> io::Result<()>;

    fn rule(&mut self, tone: Tone) -> io::Result<()> {
        self.print(tone, &"-".repeat(RULE_WIDTH))
    }
}

/// Writes lines to `out`, colored yellow/green/red unless disabled.
pub struct ColorPrinter<W> {
    out: W,
    color: bool,
}

impl<W: Write> ColorPrinter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ColorPrinter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Printer for ColorPrinter<W> {
    fn print(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        if !self.color {
            return writeln!(self.out, "{text}");
        }
        match tone {
            Tone::Heading => writeln!(self.out, "{}", text.yellow()),
            Tone::Success => writeln!(self.out, "{}", text.green()),
            Tone::Warning => writeln!(self.out, "{}", text.red()),
            Tone::Plain => writeln!(self.out, "{text}"),
        }
    }
}

pub fn render_temporal<P: Printer>(p: &mut P, stats: &Result<TemporalStats, StatsError>) -> io::Result<()> {
    section(p, "Calculating The Most Frequent Times of Travel...", stats, |p, s| {
        p.print(Tone::Plain, &format!("Top Start Month: {}", s.top_month))?;
        p.print(Tone::Plain, &format!("Top Start Day: {}", s.top_weekday))?;
        p.print(Tone::Plain, &format!("Top Start Hour: {}", s.top_hour))
    })
}

pub fn render_stations<P: Printer>(p: &mut P, stats: &Result<StationStats, StatsError>) -> io::Result<()> {
    section(p, "Calculating The Most Popular Stations and Trip...", stats, |p, s| {
        p.print(Tone::Plain, &format!("Top Starting Locale: {}", s.top_start_station))?;
        p.print(Tone::Plain, &format!("Top Ending Locale: {}", s.top_end_station))?;
        p.print(Tone::Plain, &format!("Top Trip: {}", s.top_trip))
    })
}

pub fn render_durations<P: Printer>(
    p: &mut P,
    stats: &Result<DurationStats, StatsError>,
) -> io::Result<()> {
    section(p, "Calculating Trip Duration...", stats, |p, s| {
        p.print(Tone::Plain, &format!("Total Travel Seconds: {}", s.total_duration))?;
        p.print(Tone::Plain, &format!("Mean Travel Seconds: {:.2}", s.mean_duration))
    })
}

/// `city` names the source in "no data" lines for absent columns.
pub fn render_users<P: Printer>(p: &mut P, city: &str, stats: &UserStats) -> io::Result<()> {
    framed(p, "Calculating User Stats...", |p| {
        render_counts(p, "User Type", &stats.user_type_counts)?;
        p.rule(Tone::Success)?;

        match &stats.gender_counts {
            Some(counts) => render_counts(p, "Gender", counts)?,
            None => p.print(Tone::Plain, &format!("No gender data for {}.", title_case(city)))?,
        }
        p.rule(Tone::Success)?;

        match &stats.birth_years {
            Some(Ok(years)) => {
                p.print(Tone::Plain, &format!("Oldest Birth Year: {}", years.min))?;
                p.print(Tone::Plain, &format!("Newest Birth Year: {}", years.max))?;
                p.print(Tone::Plain, &format!("Most Common Birth Year: {}", years.mode))
            }
            Some(Err(e)) => no_data(p, e),
            None => p.print(
                Tone::Plain,
                &format!("No birth year data for {}.", title_case(city)),
            ),
        }
    })
}

fn render_counts<P: Printer>(p: &mut P, label: &str, counts: &ValueCounts) -> io::Result<()> {
    if counts.is_empty() {
        return p.print(Tone::Plain, &format!("No {} data.", label.to_lowercase()));
    }
    let width = counts.iter().map(|e| e.value.len()).max().unwrap_or(0);
    p.print(Tone::Plain, label)?;
    for entry in counts.iter() {
        p.print(
            Tone::Plain,
            &format!("{:<width$}  {}", entry.value, entry.count),
        )?;
    }
    Ok(())
}

fn section<P, T, F>(p: &mut P, title: &str, stats: &Result<T, StatsError>, body: F) -> io::Result<()>
where
    P: Printer,
    F: FnOnce(&mut P, &T) -> io::Result<()>,
{
    framed(p, title, |p| match stats {
        Ok(s) => body(p, s),
        Err(e) => no_data(p, e),
    })
}

fn framed<P, F>(p: &mut P, title: &str, body: F) -> io::Result<()>
where
    P: Printer,
    F: FnOnce(&mut P) -> io::Result<()>,
{
    p.print(Tone::Heading, "")?;
    p.print(Tone::Heading, title)?;
    p.rule(Tone::Success)?;
    body(p)?;
    p.rule(Tone::Success)
}

fn no_data<P: Printer>(p: &mut P, e: &StatsError) -> io::Result<()> {
    p.print(Tone::Warning, &format!("No data for the selected filters ({e})."))
}

const PAGE_COLUMNS: [&str; 9] = [
    "ID",
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
    "Gender",
    "Birth Year",
];

/// Prints a page as a left-justified table. Blank cells are left empty.
pub fn render_page<P: Printer>(p: &mut P, page: &Page<'_>) -> io::Result<()> {
    let rows: Vec<[String; 9]> = page.records.iter().map(row_cells).collect();

    let mut widths = PAGE_COLUMNS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    p.rule(Tone::Success)?;
    p.print(Tone::Plain, &join_row(PAGE_COLUMNS.iter().copied(), &widths))?;
    for row in &rows {
        p.print(Tone::Plain, &join_row(row.iter().map(String::as_str), &widths))?;
    }
    p.rule(Tone::Success)
}

fn row_cells(r: &TripRecord) -> [String; 9] {
    let fmt_ts = |ts: &chrono::NaiveDateTime| ts.format("%Y-%m-%d %H:%M:%S").to_string();
    [
        r.id.to_string(),
        fmt_ts(&r.start_time),
        r.end_time.as_ref().map(fmt_ts).unwrap_or_default(),
        r.duration_seconds.to_string(),
        r.start_station.clone(),
        r.end_station.clone(),
        r.user_type.clone().unwrap_or_default(),
        r.gender.clone().unwrap_or_default(),
        r.birth_year.map(|y| y.to_string()).unwrap_or_default(),
    ]
}

fn join_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Writes the full report as pretty-printed JSON.
pub fn print_json<W: Write>(out: &mut W, report: &StatisticsReport) -> Result<()> {
    debug!(records = report.records, "Writing JSON report");
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
