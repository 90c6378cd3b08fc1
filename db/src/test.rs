use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use crate::convert::convert_json_to_db;
use crate::models::*;
use crate::*;

pub fn source_verse(pk: i32, book: i32, chapter: i32, verse: i32, text: &str) -> SourceVerse {
    SourceVerse {
        pk,
        translation: "NLT".to_string(),
        book,
        chapter,
        verse,
        text: text.to_string(),
        comment: String::new(),
    }
}

pub fn john_1_15() -> SourceVerse {
    source_verse(
        1,
        43,
        1,
        15,
        "John testified about him when he shouted to the crowds, “This is the one I was talking about when I said, ‘Someone is coming after me who is far greater than I am, for he existed long before me.’”",
    )
}

pub fn ezekiel_18() -> Vec<SourceVerse> {
    let mut verses = vec![
        source_verse(2, 26, 18, 4, "For all people are mine to judge — both parents and children alike. And this is my rule: The person who sins is the one who will die."),
        source_verse(3, 26, 18, 5, "“Suppose a certain man is righteous and does what is just and right."),
        source_verse(4, 26, 18, 6, "He does not feast in the mountains before Israel’s idols or worship them. He does not commit adultery or have intercourse with a woman during her menstrual period."),
        source_verse(5, 26, 18, 7, "He is a merciful creditor, not keeping the items given as security by poor debtors. He does not rob the poor but instead gives food to the hungry and provides clothes for the needy."),
        source_verse(6, 26, 18, 8, "He grants loans without interest, stays away from injustice, is honest and fair when judging others,"),
    ];
    verses[2].comment = "The Hebrew term (literally <i>round things</i>) probably alludes to dung; also in <a href='/NLT/26/18/12'>18:12</a>, <a href='/NLT/26/18/15'>15</a>.".to_string();
    verses
}

/// Writes `verses` as a JSON source file and converts it into a new store.
fn converted_store(dir: &TempDir, verses: &[SourceVerse]) -> PathBuf {
    let src = dir.path().join("bible.json");
    let dest = dir.path().join("bible.db");

    let json = verses
        .iter()
        .map(|v| {
            json!({
                "pk": v.pk,
                "translation": v.translation,
                "book": v.book,
                "chapter": v.chapter,
                "verse": v.verse,
                "text": v.text,
                "comment": v.comment,
            })
        })
        .collect::<Vec<_>>();
    fs::write(&src, serde_json::to_string(&json).unwrap()).unwrap();

    let inserted = convert_json_to_db(&src, path_str(&dest)).unwrap();
    assert_eq!(inserted, verses.len());
    dest
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn fixture_store(dir: &TempDir) -> BibleDatabase {
    let mut verses = vec![john_1_15()];
    verses.extend(ezekiel_18());
    BibleDatabase::new(path_str(&converted_store(dir, &verses)))
}

#[test]
fn single_verse_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = fixture_store(&dir);

    let result = db.query("John 1:15").unwrap();
    assert_eq!(
        result,
        vec![VerseRecord {
            pk: 1,
            book: 43,
            chapter: 1,
            verse: 15,
            text: john_1_15().text,
            comment: String::new(),
        }]
    );
}

#[test]
fn range_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = fixture_store(&dir);

    let result = db.query("Ezekiel 18:4-8").unwrap();
    let expected = ezekiel_18();
    assert_eq!(result.len(), 5);
    result.iter().zip(expected.iter()).for_each(|(got, want)| {
        assert_eq!(got.chapter, 18);
        assert_eq!(got.verse, want.verse);
        assert_eq!(got.text, want.text);
        assert_eq!(got.comment, want.comment);
    });
}

#[test]
fn not_found_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = fixture_store(&dir);

    vec![
        (
            "John 1:52",
            DbError::VerseNotFound {
                reference: "John 1:52".to_string(),
            },
        ),
        (
            "Revelation 2:0",
            DbError::VerseNotFound {
                reference: "Revelation 2:0".to_string(),
            },
        ),
        ("Genesis 5:18-18", DbError::InvalidRange { start: 18, end: 18 }),
        (
            "no reference here",
            DbError::InvalidReference {
                reference: "no reference here".to_string(),
            },
        ),
    ]
    .into_iter()
    .for_each(|(reference, expected)| {
        assert_eq!(db.query(reference), Err(expected), "{}", reference);
    });
}

#[test]
fn connection_per_query() {
    let dir = tempfile::tempdir().unwrap();
    let db = fixture_store(&dir);

    // Repeated lookups against the same store
    for _ in 0..3 {
        assert_eq!(db.query("John 1:15").unwrap().len(), 1);
        assert!(db.query("John 1:52").is_err());
    }

    // The store is looked up again on every call
    fs::remove_file(db.url()).unwrap();
    assert!(matches!(
        db.query("John 1:15"),
        Err(DbError::Connection { .. })
    ));
}

#[test]
fn convert_appends_to_existing_store() {
    let dir = tempfile::tempdir().unwrap();
    let dest = converted_store(&dir, &[john_1_15()]);

    let src = dir.path().join("more.json");
    fs::write(
        &src,
        r#"[{"pk": 9, "book": 43, "chapter": 1, "verse": 16, "text": "From his abundance we have all received one gracious blessing after another."}]"#,
    )
    .unwrap();
    assert_eq!(convert_json_to_db(&src, path_str(&dest)), Ok(1));

    let db = BibleDatabase::new(path_str(&dest));
    let result = db.query("John 1:15-16").unwrap();
    assert_eq!(
        result.iter().map(|v| v.pk).collect::<Vec<_>>(),
        vec![1, 9]
    );
}

#[test]
fn query_waits_for_ingest() {
    let dir = tempfile::tempdir().unwrap();
    let db = fixture_store(&dir);

    let guard = write_lock();

    let (tx, rx) = mpsc::channel();
    let reader = db.clone();
    let handle = thread::spawn(move || {
        tx.send(reader.query("John 1:15").map(|v| v.len())).unwrap();
    });

    // Blocked while the write side is held
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    drop(guard);
    assert_eq!(rx.recv_timeout(Duration::from_secs(10)).unwrap(), Ok(1));
    handle.join().unwrap();
}
