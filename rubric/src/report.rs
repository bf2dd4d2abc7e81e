use core::fmt;
use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use mark_records::types::{StudentId, StudentName};
use serde::Serialize;
use tracing::debug;

use crate::grade::{GradedRecord, Percentage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// `<total> - <first> <last> - (<id>)`, one line per student
    #[default]
    Text,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            other => bail!("unknown report format `{other}`, expected `text` or `csv`"),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Graded records ordered from highest to lowest total. Students with equal totals keep the order
/// they were given in.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<GradedRecord>,
}

impl Leaderboard {
    pub fn new(records: impl IntoIterator<Item = GradedRecord>) -> Self {
        // `sorted_by_key` is a stable sort
        let entries = records
            .into_iter()
            .sorted_by_key(|record| Reverse(record.total()))
            .collect_vec();
        Self { entries }
    }

    pub fn entries(&self) -> &[GradedRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = ReportLine<'_>> {
        self.entries.iter().map(ReportLine::new)
    }

    pub fn write(&self, format: ReportFormat, writer: impl Write) -> Result<()> {
        match format {
            ReportFormat::Text => self.write_text(writer),
            ReportFormat::Csv => self.write_csv(writer),
        }
    }

    /// Writes the report to `path`, replacing anything already there.
    #[tracing::instrument(level = "debug", skip(self), fields(len = self.len()))]
    pub fn write_to_path(&self, format: ReportFormat, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("could not create report file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write(format, &mut writer)?;
        writer
            .flush()
            .with_context(|| format!("could not flush report file {}", path.display()))?;
        debug!("wrote report");
        Ok(())
    }

    fn write_text(&self, mut writer: impl Write) -> Result<()> {
        for line in self.lines() {
            writeln!(writer, "{line}").context("could not write report line")?;
        }
        Ok(())
    }

    fn write_csv(&self, writer: impl Write) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for line in self.lines() {
            csv.serialize(line.csv_row())
                .context("could not write report row")?;
        }
        csv.flush().context("could not flush report rows")?;
        Ok(())
    }
}

/// One student's entry in the report.
#[derive(Debug, Clone, Copy)]
pub struct ReportLine<'a> {
    record: &'a GradedRecord,
}

impl<'a> ReportLine<'a> {
    pub fn new(record: &'a GradedRecord) -> Self {
        Self { record }
    }

    fn csv_row(&self) -> CsvRow<'a> {
        CsvRow {
            total: self.record.total(),
            first_name: self.record.first_name(),
            last_name: self.record.last_name(),
            id: self.record.id(),
        }
    }
}

impl<'a> fmt::Display for ReportLine<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {} {} - ({})",
            self.record.total(),
            self.record.first_name(),
            self.record.last_name(),
            self.record.id(),
        )
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    total: Percentage,
    first_name: &'a StudentName,
    last_name: &'a StudentName,
    id: &'a StudentId,
}
