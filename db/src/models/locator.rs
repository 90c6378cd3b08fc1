use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::{Match, Regex};

use crate::DbError;

/// The verse part of a locator: one verse, or an inclusive range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verses {
    Single(i32),
    Range { start: i32, end: i32 },
}

/// Model representing a parsed notation such as "John 3:16" or
/// "Genesis 1:1-5", used to look up a passage in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerseLocator {
    /// Book name exactly as it was written.
    pub book: String,
    pub chapter: i32,
    pub verses: Verses,
}

impl VerseLocator {
    pub fn is_range(&self) -> bool {
        matches!(self.verses, Verses::Range { .. })
    }

    /// Checks that a range starts strictly before it ends. Single verses are
    /// always valid here; whether they exist is up to the store.
    pub fn validate(&self) -> Result<(), DbError> {
        match self.verses {
            Verses::Range { start, end } if start >= end => {
                Err(DbError::InvalidRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for VerseLocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.verses {
            Verses::Single(verse) => write!(f, "{} {}:{}", self.book, self.chapter, verse),
            Verses::Range { start, end } => {
                write!(f, "{} {}:{}-{}", self.book, self.chapter, start, end)
            }
        }
    }
}

impl FromStr for VerseLocator {
    type Err = DbError;

    /// Parses `<book> <chapter>:<verse>[-<end>]`, taking the first match in
    /// the input.
    ///
    /// A book is three or more letters or digits, optionally preceded by a
    /// `1`-`3` prefix ("1 Samuel") or followed by an `of` clause
    /// ("Song of Solomon"). An empty or missing end verse gives a single
    /// verse. Start and end are not compared here; see
    /// [validate](VerseLocator::validate).
    fn from_str(s: &str) -> Result<VerseLocator, Self::Err> {
        lazy_static! {
            static ref LOCATOR_RE: Regex = Regex::new(
                r"((?:[1-3] )?[[:alnum:]]{3,}(?: of [[:alnum:]]{3,})?)\s([0-9]+):([0-9]+)(?:-([0-9]+))?"
            )
            .unwrap();
        }

        let caps = LOCATOR_RE.captures(s).ok_or_else(|| invalid_reference(s))?;
        match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
            // Chapter and one verse
            (Some(book), Some(chapter), Some(verse), None) => Ok(VerseLocator {
                book: book.as_str().to_string(),
                chapter: parse_num_match(chapter, s)?,
                verses: Verses::Single(parse_num_match(verse, s)?),
            }),
            // Chapter with a verse range
            (Some(book), Some(chapter), Some(start), Some(end)) => Ok(VerseLocator {
                book: book.as_str().to_string(),
                chapter: parse_num_match(chapter, s)?,
                verses: Verses::Range {
                    start: parse_num_match(start, s)?,
                    end: parse_num_match(end, s)?,
                },
            }),
            _ => Err(invalid_reference(s)),
        }
    }
}

/// Parse a [Match](regex::Match) into an i32.
fn parse_num_match(m: Match, reference: &str) -> Result<i32, DbError> {
    m.as_str().parse().map_err(|_| invalid_reference(reference))
}

fn invalid_reference(s: &str) -> DbError {
    DbError::InvalidReference {
        reference: s.to_string(),
    }
}
