//! EPUB generation for the Hebrew Bible.
//!
//! This module converts an `Anthology` into an EPUB ebook with:
//! - One XHTML document per chapter, in Hebrew, English or parallel text
//! - Verse numbers (Hebrew numerals beside the Hebrew text)
//! - Markers where each weekly Torah portion begins
//! - Rashi's commentary as EPUB 3 footnotes (if enabled)
//! - Hierarchical navigation: books, then chapters
//!
//! CSS is generated from the configuration, with media queries that place the
//! texts side by side on landscape screens and stack them in portrait.

mod config;
mod rendering;
mod styles;

pub use config::{DisplayMode, LayoutPreference, MetadataConfig, EPUB};
pub use rendering::{render_anthology, PackagingError, RenderError};
