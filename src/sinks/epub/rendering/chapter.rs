//! Chapter rendering for EPUB.
//!
//! Each chapter becomes a separate XHTML document. Verses are laid out
//! according to the display mode: Hebrew paragraphs are right to left with
//! Hebrew-numeral verse numbers, English paragraphs left to right with Arabic
//! numerals, and parallel mode wraps both in a `.verse-container` that the
//! stylesheet arranges per screen orientation. Commentary becomes EPUB 3
//! footnotes (a `noteref` link plus a `footnote` aside after the verse).

use crate::canon::hebrew_numeral;
use crate::config::Configuration;
use crate::sinks::epub::DisplayMode;
use crate::source::{Book, Chapter, ParshaMarker, Translation, Verse};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("{reference} has no verse with text in the displayed languages")]
    NoText { reference: String },
}

/// One chapter's XHTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChapter {
    /// Document name within the package, e.g. `genesis_001.xhtml`
    pub filename: String,
    /// Navigation title, e.g. `Genesis 1`
    pub title: String,
    pub xhtml: String,
}

/// Document name for a chapter; stable across runs.
fn chapter_filename(book: &Book, chapter: &Chapter) -> String {
    format!("{}_{:03}.xhtml", book.info.slug(), chapter.number)
}

/// Render a chapter as XHTML.
pub fn render(
    book: &Book,
    chapter: &Chapter,
    config: &Configuration,
) -> Result<RenderedChapter, RenderError> {
    let title = format!("{} {}", book.info.name, chapter.number);
    let mode = config.epub.display_mode;

    let mut body = String::new();
    body.push_str(&render_heading(book, chapter, config));

    let mut notes = 0;
    let mut rendered_verses = 0;
    for verse in &chapter.verses {
        let Some(html) = render_verse(verse, config, &mut notes) else {
            continue;
        };
        if let Some(parsha) = chapter.parsha_at(verse.number) {
            body.push_str(&render_parsha(parsha));
        }
        body.push_str(&html);
        rendered_verses += 1;
    }

    if rendered_verses == 0 {
        return Err(RenderError::NoText { reference: title });
    }

    let lang = mode.language();
    let dir = if mode == DisplayMode::Hebrew {
        r#" dir="rtl""#
    } else {
        ""
    };

    let xhtml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}"{dir}>
<head>
    <meta charset="UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body>
<section class="chapter" epub:type="chapter">
{body}</section>
</body>
</html>
"#,
        title = html_escape::encode_text(&title),
    );

    Ok(RenderedChapter {
        filename: chapter_filename(book, chapter),
        title,
        xhtml,
    })
}

fn render_heading(book: &Book, chapter: &Chapter, config: &Configuration) -> String {
    let mut html = String::new();
    html.push_str("<header class=\"chapter-header\">\n<h1 class=\"chapter-title\">");
    html.push_str(&format!(
        r#"<span class="hebrew-title" lang="he" dir="rtl">{} {}</span>"#,
        html_escape::encode_text(book.info.hebrew_name),
        hebrew_numeral(chapter.number)
    ));
    html.push_str(&format!(
        r#"<span class="english-title" lang="en">{} – Chapter {}</span>"#,
        html_escape::encode_text(book.info.name),
        chapter.number
    ));
    html.push_str("</h1>\n");

    if chapter.number == 1 {
        html.push_str(&format!(
            "<p class=\"book-transliteration\" lang=\"en\">{}</p>\n",
            html_escape::encode_text(book.info.transliteration)
        ));
    }

    if config.translation != Translation::Default && config.epub.display_mode.shows_english() {
        html.push_str(&format!(
            "<p class=\"translation-name\" lang=\"en\">{}</p>\n",
            html_escape::encode_text(config.translation.name())
        ));
    }
    html.push_str("</header>\n");
    html
}

fn render_parsha(parsha: &ParshaMarker) -> String {
    format!(
        r#"<div class="parsha-marker" id="parsha-{verse}">
<p class="hebrew-name" lang="he" dir="rtl">פרשת {hebrew}</p>
<p class="english-name" lang="en">Parashat {english}</p>
</div>
"#,
        verse = parsha.verse,
        hebrew = html_escape::encode_text(&parsha.hebrew_name),
        english = html_escape::encode_text(&parsha.name),
    )
}

/// Render one verse, or `None` if it has nothing to show in this mode.
/// `notes` counts the footnotes emitted so far in the chapter.
fn render_verse(verse: &Verse, config: &Configuration, notes: &mut usize) -> Option<String> {
    let mode = config.epub.display_mode;
    let hebrew = verse.hebrew_text().filter(|_| mode.shows_hebrew());
    let english = verse
        .translation(config.translation)
        .filter(|_| mode.shows_english());
    if hebrew.is_none() && english.is_none() {
        return None;
    }

    let commentary = verse.commentary_text().filter(|_| config.include_commentary);
    let note = commentary.map(|text| {
        *notes += 1;
        (*notes, text)
    });
    let noteref = note
        .map(|(n, _)| {
            format!(r##"<a class="noteref" epub:type="noteref" href="#fn{n}" id="nr{n}">{n}</a>"##)
        })
        .unwrap_or_default();

    let mut html = format!("<div class=\"verse-container\" id=\"v{}\">\n", verse.number);
    if let Some(text) = hebrew {
        html.push_str(&format!(
            "<p class=\"hebrew-text\" lang=\"he\" dir=\"rtl\">{}{}{}</p>\n",
            verse_number(config, hebrew_numeral(verse.number)),
            html_escape::encode_text(text),
            noteref
        ));
    }
    if let Some(text) = english {
        // the reference sits with the Hebrew when both are shown
        let noteref = if hebrew.is_some() { "" } else { noteref.as_str() };
        html.push_str(&format!(
            "<p class=\"english-text\" lang=\"en\">{}{}{}</p>\n",
            verse_number(config, verse.number.to_string()),
            html_escape::encode_text(text),
            noteref
        ));
    }
    if let Some((n, text)) = note {
        html.push_str(&format!(
            r#"<aside class="commentary-note" epub:type="footnote" id="fn{n}" lang="he" dir="rtl"><p><span class="note-number">{n}</span> רש״י: {}</p></aside>
"#,
            html_escape::encode_text(text)
        ));
    }
    html.push_str("</div>\n");
    Some(html)
}

fn verse_number(config: &Configuration, label: String) -> String {
    if config.epub.verse_numbers {
        format!("<span class=\"verse-number\">{label}</span> ")
    } else {
        String::new()
    }
}
