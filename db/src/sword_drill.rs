use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use log::{debug, warn};

use crate::books;
use crate::models::{VerseLocator, VerseRecord, Verses};
use crate::schema::{self, VerseRow};
use crate::table_name::TableName;
use crate::{open_existing, read_lock, DbConnection, DbError};

/// Trait implemented by types that can resolve a locator to stored verses.
pub trait SwordDrillable {
    /// Looks up Bible verses for the given locator.
    ///
    /// A single verse yields exactly one record. A range yields every stored
    /// verse from start to end inclusive, ordered by verse. Each record's
    /// chapter is taken from the locator. Zero rows is a
    /// [VerseNotFound](DbError::VerseNotFound) error, never an empty list.
    fn verses(locator: &VerseLocator, conn: &mut DbConnection)
        -> Result<Vec<VerseRecord>, DbError>;
}

/// Main implementation for the [SwordDrillable](crate::sword_drill::SwordDrillable) trait.
pub struct SwordDrill;

impl SwordDrillable for SwordDrill {
    fn verses(
        locator: &VerseLocator,
        conn: &mut DbConnection,
    ) -> Result<Vec<VerseRecord>, DbError> {
        locator.validate()?;

        let book = books::ordinal_for_name(&locator.book).ok_or_else(|| DbError::BookNotFound {
            book: locator.book.to_owned(),
        })?;
        let table = TableName::for_book(&locator.book)?;

        // A canonical book that was never ingested has no verses
        if !schema::table_exists(conn, &table).map_err(other)? {
            return Err(verse_not_found(locator));
        }

        let rows = match locator.verses {
            Verses::Single(verse) => single_verse(&table, locator.chapter, verse, conn)?,
            Verses::Range { start, end } => {
                verse_range(&table, locator.chapter, start, end, conn)?
            }
        };

        if rows.is_empty() {
            return Err(verse_not_found(locator));
        }

        Ok(rows
            .into_iter()
            .map(|row| VerseRecord {
                pk: row.pk,
                book,
                chapter: locator.chapter,
                verse: row.verse,
                text: row.text,
                comment: row.comment.unwrap_or_default(),
            })
            .collect())
    }
}

fn single_verse(
    table: &TableName,
    chapter: i32,
    verse: i32,
    conn: &mut DbConnection,
) -> Result<Vec<VerseRow>, DbError> {
    let query = schema::select_verse(table);
    debug!("Executing query: {} with args: [{}, {}]", query, chapter, verse);

    let mut rows = sql_query(query)
        .bind::<Integer, _>(chapter)
        .bind::<Integer, _>(verse)
        .load::<VerseRow>(conn)
        .map_err(other)?;

    if rows.len() > 1 {
        warn!(
            "{} rows stored for {} {}:{}; using the lowest pk",
            rows.len(),
            table,
            chapter,
            verse
        );
        rows.truncate(1);
    }
    Ok(rows)
}

fn verse_range(
    table: &TableName,
    chapter: i32,
    start: i32,
    end: i32,
    conn: &mut DbConnection,
) -> Result<Vec<VerseRow>, DbError> {
    let query = schema::select_verse_range(table);
    debug!(
        "Executing query: {} with args: [{}, {}, {}]",
        query, chapter, start, end
    );

    sql_query(query)
        .bind::<Integer, _>(chapter)
        .bind::<Integer, _>(start)
        .bind::<Integer, _>(end)
        .load::<VerseRow>(conn)
        .map_err(other)
}

fn verse_not_found(locator: &VerseLocator) -> DbError {
    DbError::VerseNotFound {
        reference: locator.to_string(),
    }
}

fn other(e: diesel::result::Error) -> DbError {
    DbError::Other {
        cause: e.to_string(),
    }
}

/// A store file that is queried by notation.
///
/// No connection is held between calls: each lookup opens its own and
/// closes it when the lookup returns, whether it succeeded or not.
#[derive(Clone, Debug)]
pub struct BibleDatabase {
    url: String,
}

impl BibleDatabase {
    pub fn new<S: Into<String>>(url: S) -> Self {
        BibleDatabase { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parses `notation` and resolves it with [SwordDrill].
    pub fn query(&self, notation: &str) -> Result<Vec<VerseRecord>, DbError> {
        let locator: VerseLocator = notation.parse()?;
        self.resolve::<SwordDrill>(&locator)
    }

    /// Resolves a parsed locator. Invalid ranges are rejected before the
    /// store is touched.
    pub fn resolve<D: SwordDrillable>(
        &self,
        locator: &VerseLocator,
    ) -> Result<Vec<VerseRecord>, DbError> {
        locator.validate()?;

        let _guard = read_lock();
        let mut conn = open_existing(&self.url)?;
        D::verses(locator, &mut conn)
    }
}
