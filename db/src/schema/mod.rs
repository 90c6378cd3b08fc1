//! Per-book table layout.
//!
//! Every book gets its own table named by [TableName], so statements are
//! built at runtime instead of through `table!`. Values are always bound;
//! only the validated identifier is formatted into the SQL.

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Nullable, Text};
use diesel::QueryableByName;
use log::debug;

use crate::table_name::TableName;
use crate::DbConnection;

const TABLE_EXISTS: &str =
    "SELECT count(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?";

pub fn create_table(table: &TableName) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{}" (pk INTEGER, chapter INTEGER, verse INTEGER, text TEXT, comment TEXT)"#,
        table
    )
}

pub fn insert_verse(table: &TableName) -> String {
    format!(
        r#"INSERT INTO "{}" (pk, chapter, verse, text, comment) VALUES (?, ?, ?, ?, ?)"#,
        table
    )
}

pub fn select_verse(table: &TableName) -> String {
    format!(
        r#"SELECT pk, verse, text, comment FROM "{}" WHERE chapter = ? AND verse = ? ORDER BY pk"#,
        table
    )
}

pub fn select_verse_range(table: &TableName) -> String {
    format!(
        r#"SELECT pk, verse, text, comment FROM "{}" WHERE chapter = ? AND verse BETWEEN ? AND ? ORDER BY verse, pk"#,
        table
    )
}

#[derive(QueryableByName)]
struct TableCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// A row read back from a book table. The chapter is not selected; callers
/// stamp it from the request.
#[derive(Debug, QueryableByName)]
pub struct VerseRow {
    #[diesel(sql_type = Integer)]
    pub pk: i32,
    #[diesel(sql_type = Integer)]
    pub verse: i32,
    #[diesel(sql_type = Text)]
    pub text: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub comment: Option<String>,
}

pub fn table_exists(conn: &mut DbConnection, table: &TableName) -> QueryResult<bool> {
    debug!("Executing query: {} with args: [{}]", TABLE_EXISTS, table);
    sql_query(TABLE_EXISTS)
        .bind::<Text, _>(table.as_str())
        .get_result::<TableCount>(conn)
        .map(|c| c.count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::establish_connection;

    #[test]
    fn create_and_check() {
        let mut conn = establish_connection(crate::IN_MEMORY).unwrap();
        let table = TableName::for_book("1 Samuel").unwrap();

        assert!(!table_exists(&mut conn, &table).unwrap());

        sql_query(create_table(&table)).execute(&mut conn).unwrap();
        assert!(table_exists(&mut conn, &table).unwrap());

        // Creating again is a no-op
        sql_query(create_table(&table)).execute(&mut conn).unwrap();
        assert!(table_exists(&mut conn, &table).unwrap());
    }

    #[test]
    fn statements_quote_identifier() {
        let table = TableName::for_book("Song of Solomon").unwrap();
        assert!(create_table(&table).contains(r#""song_of_solomon""#));
        assert!(insert_verse(&table).contains(r#""song_of_solomon""#));
        assert!(select_verse(&table).contains(r#""song_of_solomon""#));
        assert!(select_verse_range(&table).ends_with("ORDER BY verse, pk"));
    }
}
