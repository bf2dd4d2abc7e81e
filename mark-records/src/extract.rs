//! Extraction of student records from free-form mark text.
//!
//! A student block looks like
//! ```text
//! Student:[ID:1,LastName:Smith,FirstName:John],Marks:[Challenges:[5,4,3,2,1,5,4,3],Exam:18,Capstone:90]
//! ```
//! and may appear anywhere in the text, surrounded by anything. Blocks are found left to right
//! without overlapping; anything that does not form a complete block is skipped without error.
//!
//! The challenge list is captured lazily: it runs up to the first `]` (on the same line) that is
//! followed by a well-formed `,Exam:..,Capstone:..]` tail. Numeric conversion happens only after
//! a block has matched, and a bad number there fails the whole extraction.

use std::ops::RangeFrom;

use anyhow::{Context, Result, anyhow};
use lazy_static::lazy_static;
use nom::bytes::complete::tag;
use nom::character::complete::{anychar, digit1, none_of};
use nom::error::{ErrorKind, ParseError};
use nom::multi::{many_till, many0};
use nom::sequence::{delimited, preceded, tuple};
use nom::{AsChar, IResult, InputIter, InputLength, Parser, Slice};
use regex::Regex;
use tracing::{debug, trace};

use crate::record::StudentRecord;
use crate::types::{StudentId, StudentName};

/// Finds every student block in `text` and converts each into a [`StudentRecord`], in the order
/// the blocks appear.
///
/// Text without any blocks gives an empty list. A block whose challenge, exam, or capstone marks
/// do not parse as integers is an error for the whole call.
#[tracing::instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn extract_records(text: &str) -> Result<Vec<StudentRecord>> {
    let (_, blocks) = student_blocks(text)
        .map_err(|err| anyhow!("could not scan text for student blocks: {err}"))?;
    debug!(num_blocks = blocks.len(), "matched student blocks");

    blocks.into_iter().map(RawBlock::into_record).collect()
}

/// Captures of one matched block, before any numeric conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawBlock<'a> {
    id: &'a str,
    last_name: &'a str,
    first_name: &'a str,
    challenges: String,
    exam: &'a str,
    capstone: &'a str,
}

impl RawBlock<'_> {
    fn into_record(self) -> Result<StudentRecord> {
        trace!(block = ?self, "converting student block");
        let id = self.id;

        let challenges = parse_challenges(&self.challenges)
            .with_context(|| format!("could not parse challenges for student {id}"))?;
        let exam = self.exam.parse::<i32>().with_context(|| {
            format!("could not parse exam mark `{}` for student {id}", self.exam)
        })?;
        let capstone = self.capstone.parse::<i32>().with_context(|| {
            format!(
                "could not parse capstone mark `{}` for student {id}",
                self.capstone
            )
        })?;

        Ok(StudentRecord::new(
            StudentId::new(id.to_owned()),
            StudentName::new(self.last_name.to_owned()),
            StudentName::new(self.first_name.to_owned()),
            challenges,
            exam,
            capstone,
        ))
    }
}

fn parse_challenges(raw: &str) -> Result<Vec<i32>> {
    raw.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i32>()
                .with_context(|| format!("could not parse challenge score {token:?}"))
        })
        .collect()
}

fn student_blocks(text: &str) -> IResult<&str, Vec<RawBlock<'_>>> {
    many0(skip_to(student_block))(text)
}

fn student_block(text: &str) -> IResult<&str, RawBlock<'_>> {
    let (text, (id, last_name, first_name)) = delimited(
        tag("Student:[ID:"),
        tuple((
            digit1,
            preceded(tag(",LastName:"), word),
            preceded(tag(",FirstName:"), word),
        )),
        tag("],"),
    )(text)?;

    let (text, (challenges, (exam, capstone))) = preceded(
        tag("Marks:[Challenges:["),
        many_till(none_of("\n"), marks_tail),
    )(text)?;

    let block = RawBlock {
        id,
        last_name,
        first_name,
        challenges: challenges.into_iter().collect(),
        exam,
        capstone,
    };
    Ok((text, block))
}

fn marks_tail(text: &str) -> IResult<&str, (&str, &str)> {
    tuple((tag("],Exam:"), digit1, tag(",Capstone:"), digit1, tag("]")))
        .map(|(_, exam, _, capstone, _)| (exam, capstone))
        .parse(text)
}

lazy_static! {
    // Unicode `\w`: letters, combining marks, digits, and connector punctuation, so decomposed
    // accents (`e` + U+0301) stay part of the name.
    static ref WORD: Regex = Regex::new(r"^\w+").expect("word pattern should compile");
}

/// Word characters; names need not be alphabetic.
fn word(text: &str) -> IResult<&str, &str> {
    match WORD.find(text) {
        Some(found) => Ok((&text[found.end()..], found.as_str())),
        None => Err(nom::Err::Error(nom::error::Error::from_error_kind(
            text,
            ErrorKind::AlphaNumeric,
        ))),
    }
}

/// Skips ahead one character at a time until `comb` matches, yielding its output.
fn skip_to<I, O, E>(mut comb: impl Parser<I, O, E>) -> impl FnMut(I) -> IResult<I, O, E>
where
    I: Clone + InputIter + InputLength + Slice<RangeFrom<usize>>,
    <I as InputIter>::Item: AsChar,
    E: ParseError<I>,
{
    let mut comb_fn = move |input| comb.parse(input);
    move |input| {
        many_till(anychar, &mut comb_fn)
            .map(|(_, out)| out)
            .parse(input)
    }
}
