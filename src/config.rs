//! The run configuration, shared by every pipeline stage.
//!
//! A `Configuration` is built once (from CLI flags, a TOML file, or the
//! wizard) and then only ever borrowed.

use crate::canon::{BookInfo, BookSelection};
use crate::fetch::ApiConfig;
use crate::sinks::epub::EPUB;
use crate::source::Translation;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Default configuration file name, in the working directory.
pub const CONFIG_FILE: &str = "tanakh-epub.toml";

/// Complete configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub books: BookSelection,
    /// English translation fetched alongside the Hebrew
    pub translation: Translation,
    /// Attach Rashi's commentary as footnotes
    pub include_commentary: bool,
    /// Mark where each weekly Torah portion begins
    pub parsha_markers: bool,
    /// Only include the first N chapters of each book (sample editions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_limit: Option<u32>,

    pub api: ApiConfig,
    pub epub: EPUB,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            books: BookSelection::default(),
            translation: Translation::default(),
            include_commentary: false,
            parsha_markers: true,
            chapter_limit: None,
            api: ApiConfig::default(),
            epub: EPUB::default(),
        }
    }
}

impl Configuration {
    /// Load and validate a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: Configuration =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context(|| "Failed to convert configuration to TOML")
    }

    /// Reject settings no run could satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.chapter_limit == Some(0) {
            return Err(anyhow!("chapter_limit must be at least 1"));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(anyhow!("api.base_url must not be empty"));
        }
        if self.epub.fonts.hebrew_size <= 0.0 || self.epub.fonts.english_size <= 0.0 {
            return Err(anyhow!("font sizes must be positive"));
        }
        if self.epub.outfile.as_os_str().is_empty() {
            return Err(anyhow!("an output file is required"));
        }
        Ok(())
    }

    /// The chapters of `book` this run covers.
    pub fn chapters_for(&self, book: &BookInfo) -> RangeInclusive<u32> {
        let last = match self.chapter_limit {
            Some(limit) => limit.min(book.chapter_count),
            None => book.chapter_count,
        };
        1..=last
    }

    /// Number of chapters across all selected books, for progress reporting.
    pub fn total_chapters(&self) -> u64 {
        self.books
            .books()
            .iter()
            .map(|book| self.chapters_for(book).count() as u64)
            .sum()
    }

    /// The book title, derived from the selection when not configured.
    pub fn title(&self) -> String {
        if !self.epub.metadata.title.is_empty() {
            return self.epub.metadata.title.clone();
        }
        let books = match self.books {
            BookSelection::Torah => "Torah",
            BookSelection::Prophets => "Prophets",
            BookSelection::Both => "Torah and Prophets",
        };
        let mut title = if self.include_commentary {
            format!("{books} with Rashi")
        } else {
            books.to_string()
        };
        if self.translation != Translation::Default && self.epub.display_mode.shows_english() {
            title.push_str(&format!(" ({})", self.translation.abbreviation()));
        }
        title
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canon::TORAH;
    use crate::sinks::epub::DisplayMode;

    #[test]
    fn can_roundtrip_configuration() {
        let mut config = Configuration::default();
        config.books = BookSelection::Torah;
        config.translation = Translation::Jps1985;
        config.include_commentary = true;
        config.chapter_limit = Some(2);
        config.epub.display_mode = DisplayMode::Hebrew;

        let toml_str = config.to_toml().expect("can serialize");
        let deserialized: Configuration = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn partial_files_use_defaults() {
        let config: Configuration = toml::from_str(
            r#"
books = "prophets"

[epub]
display_mode = "english"
"#,
        )
        .expect("can parse partial configuration");
        assert_eq!(config.books, BookSelection::Prophets);
        assert_eq!(config.epub.display_mode, DisplayMode::English);
        assert_eq!(config.api, ApiConfig::default());
        assert!(config.parsha_markers);
    }

    #[test]
    fn chapter_limit_caps_chapters() {
        let genesis = &TORAH[0];
        let mut config = Configuration::default();
        assert_eq!(config.chapters_for(genesis), 1..=50);
        config.chapter_limit = Some(3);
        assert_eq!(config.chapters_for(genesis), 1..=3);
        config.chapter_limit = Some(500);
        assert_eq!(config.chapters_for(genesis), 1..=50);
    }

    #[test]
    fn counts_chapters_for_progress() {
        let mut config = Configuration::default();
        config.books = BookSelection::Torah;
        assert_eq!(config.total_chapters(), 187);
        config.chapter_limit = Some(1);
        assert_eq!(config.total_chapters(), 5);
    }

    #[test]
    fn derives_title_from_selection() {
        let mut config = Configuration::default();
        assert_eq!(config.title(), "Torah and Prophets");
        config.books = BookSelection::Torah;
        config.include_commentary = true;
        config.translation = Translation::Jps1985;
        assert_eq!(config.title(), "Torah with Rashi (JPS)");
        config.epub.metadata.title = "My Chumash".to_string();
        assert_eq!(config.title(), "My Chumash");
    }

    #[test]
    fn rejects_zero_chapter_limit() {
        let mut config = Configuration::default();
        config.chapter_limit = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn can_load_from_file() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        let config = Configuration::default();
        std::fs::write(&path, config.to_toml().expect("can serialize")).expect("can write");
        assert_eq!(Configuration::load(&path).expect("can load"), config);
    }
}
