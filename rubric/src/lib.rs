//! The fixed summative rubric: turning extracted student records into percentage grades and a
//! leaderboard report.
//!
//! # Terminology:
//! - Portfolio: the combined score of the best challenges, 4 of the first 5 plus 2 of the next 3
//! - Group 1/Group 2: the first 5 and next 3 challenge scores, each sorted descending
//! - Rubric: the fixed weights (50/25/25) and divisors (30/20/100) applied to the raw scores

use mark_records::record::StudentRecord;

use self::grade::grade_all;
use self::report::Leaderboard;

pub mod grade;
pub mod report;

/// Grades every record and orders the results for reporting.
pub fn leaderboard(records: impl IntoIterator<Item = StudentRecord>) -> Leaderboard {
    Leaderboard::new(grade_all(records))
}
