use super::Verse;
use crate::canon::BookInfo;

/// Marks the verse at which a weekly Torah portion begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParshaMarker {
    pub verse: u32,
    pub name: String,
    pub hebrew_name: String,
}

/// A chapter of a book, with its verses in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub number: u32,
    pub verses: Vec<Verse>,
    /// Portions starting within this chapter, ordered by verse
    pub parshiyot: Vec<ParshaMarker>,
}

impl Chapter {
    /// The portion that starts at the given verse, if any.
    pub fn parsha_at(&self, verse: u32) -> Option<&ParshaMarker> {
        self.parshiyot.iter().find(|p| p.verse == verse)
    }
}

/// A book with its chapters in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub info: &'static BookInfo,
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }
}

/// Every book of a generation run, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anthology {
    pub books: Vec<Book>,
}

impl Anthology {
    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|b| b.chapters.len()).sum()
    }

    pub fn verse_count(&self) -> usize {
        self.books.iter().map(Book::verse_count).sum()
    }
}
