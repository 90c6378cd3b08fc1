use serde_derive::{Deserialize, Serialize};

use crate::books;

/// A verse as it arrives from a source file, before ingestion.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SourceVerse {
    pub pk: i32,
    /// Informational only; not persisted.
    #[serde(default)]
    pub translation: String,
    /// Book ordinal, 1-66.
    pub book: i32,
    pub chapter: i32,
    pub verse: i32,
    pub text: String,
    #[serde(default)]
    pub comment: String,
}

impl SourceVerse {
    pub fn book_name(&self) -> Option<&'static str> {
        books::name_for_ordinal(self.book)
    }
}

/// Model representing a stored Bible verse.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerseRecord {
    pub pk: i32,
    /// Book ordinal, 1-66.
    pub book: i32,
    pub chapter: i32,
    pub verse: i32,
    pub text: String,
    /// Empty when the verse has no comment.
    pub comment: String,
}

mod locator;
pub use self::locator::{VerseLocator, Verses};
