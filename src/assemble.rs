//! Organising fetched verses into a book.
//!
//! Verses arrive as a flat list in request order. Assembly groups them into
//! chapters, checks that every requested chapter is present and that verse
//! numbers run 1, 2, 3… without gaps or repeats, then drops verses that have
//! nothing to display and attaches portion markers.

use crate::canon::{BookInfo, ParshaTable};
use crate::config::Configuration;
use crate::source::{Book, Chapter, ParshaMarker, Verse};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("{book} {chapter} was requested but no verses were fetched for it")]
    MissingChapter { book: String, chapter: u32 },

    #[error("{book} {chapter} skips from verse {previous} to verse {found}")]
    NonContiguousVerses {
        book: String,
        chapter: u32,
        previous: u32,
        found: u32,
    },

    #[error("{book} {chapter}:{verse} appears more than once")]
    DuplicateVerse { book: String, chapter: u32, verse: u32 },

    #[error("{reference} was fetched while assembling {book}")]
    ForeignVerse { book: String, reference: String },

    #[error("{book} {chapter} was not requested")]
    UnrequestedChapter { book: String, chapter: u32 },

    #[error("{book} {chapter} has no verse with text in the displayed languages")]
    EmptyChapter { book: String, chapter: u32 },

    #[error("portion {name} starts at {book} {chapter}:{verse}, which is not in the book")]
    InvalidParshaBoundary {
        name: String,
        book: String,
        chapter: u32,
        verse: u32,
    },
}

/// What assembly produced besides the book itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Verses dropped because none of their displayed texts had content
    pub dropped_verses: usize,
}

/// Assemble the verses fetched for `chapters` of `info` into a `Book`.
pub fn assemble(
    info: &'static BookInfo,
    verses: Vec<Verse>,
    chapters: RangeInclusive<u32>,
    parshiyot: &ParshaTable,
    config: &Configuration,
) -> Result<(Book, AssemblyStats), AssemblyError> {
    let mut grouped: BTreeMap<u32, Vec<Verse>> = BTreeMap::new();
    for verse in verses {
        if verse.book != info.name {
            return Err(AssemblyError::ForeignVerse {
                book: info.name.to_string(),
                reference: verse.reference(),
            });
        }
        if !chapters.contains(&verse.chapter) {
            return Err(AssemblyError::UnrequestedChapter {
                book: info.name.to_string(),
                chapter: verse.chapter,
            });
        }
        grouped.entry(verse.chapter).or_default().push(verse);
    }

    let mut stats = AssemblyStats::default();
    let mut assembled = Vec::with_capacity(grouped.len());
    // verse counts before dropping, which portion boundaries are checked against
    let mut verse_counts = BTreeMap::new();
    for number in chapters {
        let Some(mut verses) = grouped.remove(&number) else {
            return Err(AssemblyError::MissingChapter {
                book: info.name.to_string(),
                chapter: number,
            });
        };
        verses.sort_by_key(|v| v.number);
        check_numbering(info, number, &verses)?;
        verse_counts.insert(number, verses.len() as u32);

        let verses: Vec<Verse> = verses
            .into_iter()
            .filter(|verse| {
                let keep = displays_text(verse, config);
                if !keep {
                    warn!("dropping {} because it has no text to display", verse.reference());
                    stats.dropped_verses += 1;
                }
                keep
            })
            .collect();
        if verses.is_empty() {
            return Err(AssemblyError::EmptyChapter {
                book: info.name.to_string(),
                chapter: number,
            });
        }

        assembled.push(Chapter {
            number,
            verses,
            parshiyot: Vec::new(),
        });
    }

    let mut book = Book {
        info,
        chapters: assembled,
    };
    if config.parsha_markers {
        attach_parshiyot(&mut book, &verse_counts, parshiyot)?;
    }

    debug!(
        "assembled {} with {} chapters and {} verses",
        info.name,
        book.chapters.len(),
        book.verse_count()
    );
    Ok((book, stats))
}

/// Verse numbers must be 1..=n with no gaps or repeats. Expects `verses`
/// sorted by number.
fn check_numbering(info: &BookInfo, chapter: u32, verses: &[Verse]) -> Result<(), AssemblyError> {
    let mut previous = 0;
    for verse in verses {
        if verse.number == previous {
            return Err(AssemblyError::DuplicateVerse {
                book: info.name.to_string(),
                chapter,
                verse: verse.number,
            });
        }
        if verse.number != previous + 1 {
            return Err(AssemblyError::NonContiguousVerses {
                book: info.name.to_string(),
                chapter,
                previous,
                found: verse.number,
            });
        }
        previous = verse.number;
    }
    Ok(())
}

fn displays_text(verse: &Verse, config: &Configuration) -> bool {
    let mode = config.epub.display_mode;
    (mode.shows_hebrew() && verse.hebrew_text().is_some())
        || (mode.shows_english() && verse.translation(config.translation).is_some())
}

/// Attach a marker for every portion that starts within the assembled
/// chapters. Boundaries in chapters outside the run (sample editions) are
/// skipped; a boundary naming a verse the chapter doesn't have is an error.
/// When the boundary verse itself was dropped, the marker moves to the next
/// verse that remains in its chapter.
fn attach_parshiyot(
    book: &mut Book,
    verse_counts: &BTreeMap<u32, u32>,
    parshiyot: &ParshaTable,
) -> Result<(), AssemblyError> {
    for parsha in parshiyot.for_book(book.info.name) {
        let Some(&count) = verse_counts.get(&parsha.chapter) else {
            continue;
        };
        if parsha.verse == 0 || parsha.verse > count {
            return Err(AssemblyError::InvalidParshaBoundary {
                name: parsha.name.clone(),
                book: parsha.book.clone(),
                chapter: parsha.chapter,
                verse: parsha.verse,
            });
        }
        let Some(chapter) = book
            .chapters
            .iter_mut()
            .find(|c| c.number == parsha.chapter)
        else {
            continue;
        };
        let Some(verse) = chapter
            .verses
            .iter()
            .map(|v| v.number)
            .find(|&n| n >= parsha.verse)
        else {
            warn!(
                "no verse left to mark the start of {} in {} {}",
                parsha.name, book.info.name, parsha.chapter
            );
            continue;
        };
        if verse != parsha.verse {
            debug!(
                "portion {} starts at dropped verse {}:{}, marking {}:{} instead",
                parsha.name, parsha.chapter, parsha.verse, parsha.chapter, verse
            );
        }
        chapter.parshiyot.push(ParshaMarker {
            verse,
            name: parsha.name.clone(),
            hebrew_name: parsha.hebrew_name.clone(),
        });
        chapter.parshiyot.sort_by_key(|p| p.verse);
    }
    Ok(())
}
