//! CSS generation for EPUB chapters.
//!
//! The generated stylesheet includes:
//!
//! - Base document styles for consistent layout across e-readers
//! - Hebrew (right to left) and English text classes sized from the font settings
//! - Parallel-text layout rules: a landscape media query that places Hebrew and
//!   English side by side, and a portrait media query that stacks them
//! - Rules for the Kobo screen sizes (1264x1680 and its landscape rotation)
//!
//! Both orientation queries are always emitted so a single book reads well
//! whichever way the device is held.

use super::config::{DisplayMode, LayoutPreference, EPUB};

/// Generate a complete CSS stylesheet for the EPUB.
pub fn generate_stylesheet(config: &EPUB) -> String {
    let mut css = String::with_capacity(4096);

    css.push_str(&generate_base_styles(config));

    css.push_str("\n/* Verse numbers */\n");
    if config.verse_numbers {
        css.push_str(VERSE_NUMBER_STYLES);
    } else {
        css.push_str(".verse-number {\n    display: none;\n}\n");
    }

    css.push_str("\n/* Parallel text */\n");
    css.push_str(&generate_orientation_styles(config));

    css
}

/// Generate base document styles.
fn generate_base_styles(config: &EPUB) -> String {
    format!(
        r#"/* Base styles */
body {{
    font-family: serif;
    line-height: 1.6;
    margin: 1em;
}}

.chapter-header {{
    text-align: center;
    margin: 1em 0 1.5em;
    padding-bottom: 0.5em;
    border-bottom: 1px solid #ccc;
}}

.chapter-title {{
    font-size: 1.6em;
    margin: 0;
}}

.chapter-title span {{
    display: block;
}}

.hebrew-title {{
    font-size: 1.2em;
    direction: rtl;
    unicode-bidi: embed;
}}

.book-transliteration {{
    font-size: 0.9em;
    letter-spacing: 0.05em;
    margin: 0.3em 0 0;
}}

.translation-name {{
    font-size: 0.85em;
    font-style: italic;
    color: #666;
    margin: 0.3em 0 0;
}}

/* Verses */
.verse-container {{
    margin: 0.6em 0;
}}

.hebrew-text {{
    font-size: {hebrew_size}em;
    direction: rtl;
    text-align: right;
    unicode-bidi: embed;
    margin: 0.3em 0;
}}

.english-text {{
    font-size: {english_size}em;
    direction: ltr;
    text-align: left;
    margin: 0.3em 0;
}}

/* Torah portions */
.parsha-marker {{
    text-align: center;
    margin: 1.5em 0 1em;
    padding: 0.4em;
    border-top: 2px solid #8b4513;
    border-bottom: 2px solid #8b4513;
    color: #8b4513;
}}

.parsha-marker .hebrew-name {{
    font-size: 1.3em;
    font-weight: bold;
    direction: rtl;
    unicode-bidi: embed;
}}

.parsha-marker .english-name {{
    font-size: 0.9em;
    font-style: italic;
}}

/* Commentary */
a.noteref {{
    font-size: 0.7em;
    vertical-align: super;
    text-decoration: none;
    color: #2f5f8f;
}}

aside.commentary-note {{
    font-size: 0.85em;
    direction: rtl;
    text-align: right;
    unicode-bidi: embed;
    color: #444;
    border-right: 3px solid #2f5f8f;
    padding-right: 0.5em;
    margin: 0.3em 0 0.8em;
}}

aside.commentary-note .note-number {{
    font-weight: bold;
    color: #2f5f8f;
}}
"#,
        hebrew_size = config.fonts.hebrew_size,
        english_size = config.fonts.english_size,
    )
}

const VERSE_NUMBER_STYLES: &str = r#".verse-number {
    font-size: 0.75em;
    font-weight: bold;
    color: #8b4513;
}

.hebrew-text .verse-number {
    margin-left: 0.3em;
}

.english-text .verse-number {
    margin-right: 0.3em;
}
"#;

/// Generate the landscape, portrait and device-specific rules.
fn generate_orientation_styles(config: &EPUB) -> String {
    let side_by_side = config.display_mode == DisplayMode::Both
        && config.layout == LayoutPreference::SideBySide;

    let landscape = if side_by_side {
        r#"    .verse-container {
        display: grid;
        grid-template-columns: 48% 48%;
        column-gap: 4%;
        align-items: start;
    }

    .verse-container .english-text {
        grid-column: 1;
        grid-row: 1;
    }

    .verse-container .hebrew-text {
        grid-column: 2;
        grid-row: 1;
        border-left: 1px solid #e0e0e0;
        padding-left: 0.8em;
    }

    .verse-container aside.commentary-note {
        grid-column: 1 / span 2;
    }
"#
    } else {
        r#"    .verse-container {
        display: block;
    }
"#
    };

    format!(
        r#"@media (orientation: landscape) and (min-width: 1000px) {{
{landscape}}}

@media (orientation: portrait), (max-width: 999px) {{
    .verse-container {{
        display: block;
    }}

    .verse-container .hebrew-text {{
        margin-bottom: 0.2em;
    }}

    .verse-container .english-text {{
        margin-top: 0;
    }}
}}

/* Kobo colour readers */
@media (width: 1264px), (width: 1680px) {{
    body {{
        font-size: 16px;
        margin: 0.8em;
    }}
}}
"#
    )
}
