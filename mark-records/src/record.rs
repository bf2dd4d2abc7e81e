use std::fmt;

use itertools::Itertools;

use crate::types::{StudentId, StudentName};

/// Number of leading challenge scores that make up the first group.
pub const GROUP1_LEN: usize = 5;
/// Number of challenge scores after the first group that make up the second group.
pub const GROUP2_LEN: usize = 3;

/// One student's marks, as extracted from a `Student:[...]` block.
///
/// The challenge groups are computed once on construction, each sorted descending, and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    id: StudentId,
    last_name: StudentName,
    first_name: StudentName,
    challenges: Vec<i32>,
    group1: Vec<i32>,
    group2: Vec<i32>,
    exam: i32,
    capstone: i32,
}

impl StudentRecord {
    pub fn new(
        id: StudentId,
        last_name: StudentName,
        first_name: StudentName,
        challenges: Vec<i32>,
        exam: i32,
        capstone: i32,
    ) -> Self {
        let group1 = descending(challenges.iter().take(GROUP1_LEN));
        let group2 = descending(challenges.iter().skip(GROUP1_LEN).take(GROUP2_LEN));

        Self {
            id,
            last_name,
            first_name,
            challenges,
            group1,
            group2,
            exam,
            capstone,
        }
    }

    pub fn id(&self) -> &StudentId {
        &self.id
    }

    pub fn last_name(&self) -> &StudentName {
        &self.last_name
    }

    pub fn first_name(&self) -> &StudentName {
        &self.first_name
    }

    /// All challenge scores, in the order they appeared in the source text.
    pub fn challenges(&self) -> &[i32] {
        &self.challenges
    }

    pub fn group1(&self) -> &[i32] {
        &self.group1
    }

    pub fn group2(&self) -> &[i32] {
        &self.group2
    }

    pub fn exam(&self) -> i32 {
        self.exam
    }

    pub fn capstone(&self) -> i32 {
        self.capstone
    }
}

fn descending<'a>(scores: impl Iterator<Item = &'a i32>) -> Vec<i32> {
    scores.copied().sorted_by(|a, b| b.cmp(a)).collect_vec()
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Student ID: {}", self.id)?;
        writeln!(f, "Last Name: {}", self.last_name)?;
        writeln!(f, "First Name: {}", self.first_name)?;
        writeln!(f, "Challenge Scores: {}", self.challenges.iter().format(", "))?;
        writeln!(f, "First Challenges Group: {}", self.group1.iter().format(", "))?;
        writeln!(f, "Second Challenges Group: {}", self.group2.iter().format(", "))?;
        writeln!(f, "Exam: {}", self.exam)?;
        write!(f, "Capstone: {}", self.capstone)
    }
}
