//! The fixed catalog of the 66 canonical books, indexed by ordinal.

use crate::table_name::to_storage_name;

/// Array of books indexed by their order in the Bible.
static BOOKS: [&str; 67] = [
    "_", // Dummy in order to just use the book ordinal (1-indexed)
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Number of books in the catalog.
pub const BOOK_COUNT: i32 = 66;

/// Gets the canonical name of the book at `ordinal`, or `None` outside 1-66.
pub fn name_for_ordinal(ordinal: i32) -> Option<&'static str> {
    if (1..=BOOK_COUNT).contains(&ordinal) {
        Some(BOOKS[ordinal as usize])
    } else {
        None
    }
}

/// Looks up a book's ordinal by name.
///
/// Names are compared through their storage form, so "song of solomon",
/// "Song_Of_Solomon" and "Song of Solomon" all resolve to 22.
pub fn ordinal_for_name(name: &str) -> Option<i32> {
    let wanted = to_storage_name(name);
    all_books()
        .find(|(_, book)| to_storage_name(book) == wanted)
        .map(|(ordinal, _)| ordinal)
}

/// Iterates over `(ordinal, name)` pairs in canonical order.
pub fn all_books() -> impl Iterator<Item = (i32, &'static str)> {
    BOOKS.iter().enumerate().skip(1).map(|(i, b)| (i as i32, *b))
}
