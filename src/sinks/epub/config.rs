//! EPUB output configuration.
//!
//! Controls which languages each chapter shows, how parallel text is laid out
//! on a landscape screen, and the metadata written to the package document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which texts each verse shows.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Hebrew only, right to left
    Hebrew,
    /// The selected English translation only
    English,
    /// Hebrew and English for every verse
    #[default]
    Both,
}

impl DisplayMode {
    pub fn all() -> &'static [DisplayMode] {
        &[DisplayMode::Both, DisplayMode::Hebrew, DisplayMode::English]
    }

    pub fn shows_hebrew(&self) -> bool {
        matches!(self, DisplayMode::Hebrew | DisplayMode::Both)
    }

    pub fn shows_english(&self) -> bool {
        matches!(self, DisplayMode::English | DisplayMode::Both)
    }

    /// Primary language tag of documents in this mode.
    pub fn language(&self) -> &'static str {
        match self {
            DisplayMode::English => "en",
            DisplayMode::Hebrew | DisplayMode::Both => "he",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Hebrew => write!(f, "Hebrew only"),
            DisplayMode::English => write!(f, "English only"),
            DisplayMode::Both => write!(f, "Hebrew and English (parallel)"),
        }
    }
}

/// How parallel text is arranged on wide landscape screens. Portrait screens
/// always stack the texts.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutPreference {
    #[default]
    SideBySide,
    Stacked,
}

impl LayoutPreference {
    pub fn all() -> &'static [LayoutPreference] {
        &[LayoutPreference::SideBySide, LayoutPreference::Stacked]
    }
}

impl fmt::Display for LayoutPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPreference::SideBySide => write!(f, "Side by side in landscape"),
            LayoutPreference::Stacked => write!(f, "Always stacked"),
        }
    }
}

/// EPUB document metadata configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Book title. Empty string to derive one from the selected books.
    pub title: String,
    /// Subject/description for EPUB metadata.
    /// Empty string for none.
    pub subject: String,
    /// Author (`dc:creator`) for EPUB metadata.
    /// Empty string for none.
    pub author: String,
    /// Language code (BCP 47). Empty string to derive it from the display mode.
    pub language: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            author: String::new(),
            language: String::new(),
        }
    }
}

/// Font sizes, in `em`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub hebrew_size: f32,
    pub english_size: f32,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            hebrew_size: 1.2,
            english_size: 1.0,
        }
    }
}

/// EPUB output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::upper_case_acronyms)]
pub struct EPUB {
    /// Output EPUB file path
    pub outfile: PathBuf,
    pub display_mode: DisplayMode,
    pub layout: LayoutPreference,
    /// Show verse numbers (Hebrew numerals beside Hebrew text)
    pub verse_numbers: bool,

    /// EPUB document metadata
    pub metadata: MetadataConfig,
    /// Font configuration
    pub fonts: FontsConfig,
}

impl Default for EPUB {
    fn default() -> Self {
        Self {
            outfile: PathBuf::from("tanakh.epub"),
            display_mode: DisplayMode::default(),
            layout: LayoutPreference::default(),
            verse_numbers: true,
            metadata: MetadataConfig::default(),
            fonts: FontsConfig::default(),
        }
    }
}

impl EPUB {
    /// Returns the configured language, or the display mode's language.
    pub fn language(&self) -> &str {
        if self.metadata.language.is_empty() {
            self.display_mode.language()
        } else {
            &self.metadata.language
        }
    }

    /// Returns the subject, if configured.
    pub fn subject_opt(&self) -> Option<&str> {
        if self.metadata.subject.is_empty() {
            None
        } else {
            Some(&self.metadata.subject)
        }
    }

    /// Returns the author, if configured.
    pub fn author_opt(&self) -> Option<&str> {
        if self.metadata.author.is_empty() {
            None
        } else {
            Some(&self.metadata.author)
        }
    }
}

/// Statistics from writing an EPUB, used for user feedback.
pub struct RenderStats {
    /// Number of chapter documents in the EPUB
    pub document_count: usize,
}
