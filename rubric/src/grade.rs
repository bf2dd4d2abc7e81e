use core::fmt;
use std::ops::Deref;

use mark_records::record::StudentRecord;
use serde::Serialize;
use tracing::{trace, warn};

/// How many of the (sorted) first challenge group count towards the portfolio.
pub const GROUP1_TOP: usize = 4;
/// How many of the (sorted) second challenge group count towards the portfolio.
pub const GROUP2_TOP: usize = 2;

pub const PORTFOLIO_DIVISOR: f64 = 30.0;
pub const EXAM_DIVISOR: f64 = 20.0;
pub const CAPSTONE_DIVISOR: f64 = 100.0;

pub const PORTFOLIO_WEIGHT: f64 = 0.5;
pub const EXAM_WEIGHT: f64 = 0.25;
pub const CAPSTONE_WEIGHT: f64 = 0.25;

/// Highest mark a single counted challenge can earn, i.e. the portfolio divisor spread over the
/// six counted challenges.
pub const CHALLENGE_MAX: i32 = 5;
pub const EXAM_MAX: i32 = 20;
pub const CAPSTONE_MAX: i32 = 100;

/// A whole-number percentage. Not clamped: out-of-range marks can push it below 0 or above 100.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Percentage {
    percent: i64,
}

impl Percentage {
    pub fn new(percent: i64) -> Self {
        Self { percent }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.percent.fmt(f)
    }
}

/// The intermediate values of a grade calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    portfolio_raw: i64,
    portfolio: f64,
    exam: f64,
    capstone: f64,
    total: Percentage,
}

impl Breakdown {
    pub fn of(record: &StudentRecord) -> Self {
        let portfolio_raw =
            top_sum(record.group1(), GROUP1_TOP) + top_sum(record.group2(), GROUP2_TOP);

        let portfolio = 100.0 * portfolio_raw as f64 / PORTFOLIO_DIVISOR;
        let exam = 100.0 * f64::from(record.exam()) / EXAM_DIVISOR;
        let capstone = 100.0 * f64::from(record.capstone()) / CAPSTONE_DIVISOR;

        let weighted =
            portfolio * PORTFOLIO_WEIGHT + exam * EXAM_WEIGHT + capstone * CAPSTONE_WEIGHT;
        // `f64::round` rounds half away from zero
        let total = Percentage::new(weighted.round() as i64);

        Self {
            portfolio_raw,
            portfolio,
            exam,
            capstone,
            total,
        }
    }

    /// Sum of the counted challenge scores.
    pub fn portfolio_raw(&self) -> i64 {
        self.portfolio_raw
    }

    pub fn portfolio_percentage(&self) -> f64 {
        self.portfolio
    }

    pub fn exam_percentage(&self) -> f64 {
        self.exam
    }

    pub fn capstone_percentage(&self) -> f64 {
        self.capstone
    }

    pub fn total(&self) -> Percentage {
        self.total
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Portfolio: {} ({:.2}%)", self.portfolio_raw, self.portfolio)?;
        writeln!(f, "Exam: {:.2}%", self.exam)?;
        writeln!(f, "Capstone: {:.2}%", self.capstone)?;
        write!(f, "Total Percentage: {}", self.total)
    }
}

/// Sums the first `n` scores of an already sorted group, or all of them if there are fewer.
fn top_sum(group: &[i32], n: usize) -> i64 {
    group.iter().take(n).map(|&score| i64::from(score)).sum()
}

pub fn total_percentage(record: &StudentRecord) -> Percentage {
    Breakdown::of(record).total()
}

/// A student record together with its final percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedRecord {
    record: StudentRecord,
    total: Percentage,
}

impl GradedRecord {
    pub fn record(&self) -> &StudentRecord {
        &self.record
    }

    pub fn total(&self) -> Percentage {
        self.total
    }
}

impl Deref for GradedRecord {
    type Target = StudentRecord;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

pub fn grade(record: StudentRecord) -> GradedRecord {
    warn_out_of_range(&record);
    let total = total_percentage(&record);
    trace!(id = %record.id(), %total, "graded student");
    GradedRecord { record, total }
}

pub fn grade_all(records: impl IntoIterator<Item = StudentRecord>) -> Vec<GradedRecord> {
    records.into_iter().map(grade).collect()
}

// Out-of-range marks are graded as given; this only makes them visible.
fn warn_out_of_range(record: &StudentRecord) {
    let id = record.id();

    let bad_challenges = record
        .challenges()
        .iter()
        .filter(|score| !(0..=CHALLENGE_MAX).contains(*score))
        .collect::<Vec<_>>();
    if !bad_challenges.is_empty() {
        warn!(
            %id,
            ?bad_challenges,
            max = CHALLENGE_MAX,
            "challenge scores outside rubric range"
        );
    }

    if !(0..=EXAM_MAX).contains(&record.exam()) {
        warn!(%id, exam = record.exam(), max = EXAM_MAX, "exam mark outside rubric range");
    }

    if !(0..=CAPSTONE_MAX).contains(&record.capstone()) {
        warn!(
            %id,
            capstone = record.capstone(),
            max = CAPSTONE_MAX,
            "capstone mark outside rubric range"
        );
    }
}
