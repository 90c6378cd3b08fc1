//! Storage writer: persists verses into their per-book tables.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text};
use log::{debug, info};

use crate::models::SourceVerse;
use crate::schema;
use crate::table_name::TableName;
use crate::{write_lock, DbConnection, DbError};

/// Inserts `records` in order, creating each book's table the first time
/// the book is seen.
///
/// This is not transactional. The first failure stops the batch and is
/// returned; rows inserted before it stay in the store. The store's write
/// lock is held for the whole call. Returns the number of rows inserted.
pub fn ingest(records: &[SourceVerse], conn: &mut DbConnection) -> Result<usize, DbError> {
    let _guard = write_lock();
    let mut ensured: HashSet<TableName> = HashSet::new();

    for record in records {
        let book = record.book_name().ok_or(DbError::UnknownBook {
            ordinal: record.book,
        })?;
        let table = TableName::for_book(book)?;

        if !ensured.contains(&table) {
            ensure_table(&table, conn)?;
            ensured.insert(table.clone());
        }

        insert_verse(&table, record, conn)?;
    }

    info!(
        "Ingested {} verses into {} book tables",
        records.len(),
        ensured.len()
    );
    Ok(records.len())
}

/// Creates the table unless it is already present.
fn ensure_table(table: &TableName, conn: &mut DbConnection) -> Result<(), DbError> {
    let exists = schema::table_exists(conn, table).map_err(|e| schema_error(table, e))?;
    if exists {
        debug!("Book {} exists", table);
        return Ok(());
    }

    info!("Creating book table {}", table);
    let query = schema::create_table(table);
    debug!("Executing query: {} with args: []", query);

    sql_query(query)
        .execute(conn)
        .map(|_| ())
        .map_err(|e| schema_error(table, e))
}

fn insert_verse(
    table: &TableName,
    v: &SourceVerse,
    conn: &mut DbConnection,
) -> Result<(), DbError> {
    let query = schema::insert_verse(table);
    debug!(
        "Executing query: {} with args: [{}, {}, {}, {:?}, {:?}]",
        query, v.pk, v.chapter, v.verse, v.text, v.comment
    );

    sql_query(query)
        .bind::<Integer, _>(v.pk)
        .bind::<Integer, _>(v.chapter)
        .bind::<Integer, _>(v.verse)
        .bind::<Text, _>(&v.text)
        .bind::<Text, _>(&v.comment)
        .execute(conn)
        .map(|_| ())
        .map_err(|e| schema_error(table, e))
}

fn schema_error(table: &TableName, e: diesel::result::Error) -> DbError {
    DbError::Schema {
        table: table.to_string(),
        cause: e.to_string(),
    }
}
