//! Loading verses from a JSON source file into a store.

use std::fs;
use std::path::Path;

use log::info;

use crate::ingest::ingest;
use crate::models::SourceVerse;
use crate::{establish_connection, DbError};

/// Reads a JSON array of verse objects.
pub fn load_source(path: &Path) -> Result<Vec<SourceVerse>, DbError> {
    let source_error = |cause: String| DbError::Source {
        path: path.display().to_string(),
        cause,
    };

    let contents = fs::read_to_string(path).map_err(|e| source_error(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| source_error(e.to_string()))
}

/// Converts the JSON file at `src` into the SQLite store at `dest`,
/// creating the store if needed. Returns the number of verses inserted.
pub fn convert_json_to_db(src: &Path, dest: &str) -> Result<usize, DbError> {
    let mut conn = establish_connection(dest)?;
    let verses = load_source(src)?;
    info!("Loaded {} verses from {}", verses.len(), src.display());

    ingest(&verses, &mut conn)
}
