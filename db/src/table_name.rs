//! Mapping between book names and the per-book table identifiers.

use std::fmt;

use crate::DbError;

/// Converts a book name to its storage form: lowercase, spaces replaced by
/// underscores ("1 Samuel" becomes "1_samuel").
pub fn to_storage_name(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// Converts a storage name back to a title-cased display name
/// ("song_of_solomon" becomes "Song Of Solomon").
///
/// Only the first character of each word is changed. This is not an exact
/// inverse of [to_storage_name]; identifiers must always be derived with
/// [to_storage_name].
pub fn to_display_name(storage_name: &str) -> String {
    storage_name
        .replace('_', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A validated per-book table identifier.
///
/// Table names cannot be bound as SQL parameters, so every identifier that
/// reaches a statement goes through this type: ASCII alphanumerics and
/// underscores only, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Derives the table name for a book name given in any casing.
    pub fn for_book(book: &str) -> Result<TableName, DbError> {
        let name = to_storage_name(book);
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(TableName(name))
        } else {
            Err(DbError::InvalidTableName {
                name: book.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The title-cased name used when presenting results.
    pub fn display_name(&self) -> String {
        to_display_name(&self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
