use super::Translation;
use derive_builder::Builder;
use std::collections::BTreeMap;

/// A single verse as fetched from the text API.
///
/// Verses are immutable once built; the assembler only ever moves them into
/// chapters or drops them.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Verse {
    /// English book name (matches `BookInfo::name`)
    pub book: String,
    pub chapter: u32,
    pub number: u32,
    #[builder(default)]
    pub hebrew: String,
    #[builder(setter(each(name = "translation")), default)]
    pub translations: BTreeMap<Translation, String>,
    #[builder(setter(into, strip_option), default)]
    pub commentary: Option<String>,
}

impl VerseBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.chapter == Some(0) {
            return Err("chapter numbers start at 1".to_string());
        }
        if self.number == Some(0) {
            return Err("verse numbers start at 1".to_string());
        }
        Ok(())
    }
}

impl Verse {
    /// The text of the given translation, if it was fetched and isn't blank.
    pub fn translation(&self, translation: Translation) -> Option<&str> {
        self.translations
            .get(&translation)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn hebrew_text(&self) -> Option<&str> {
        Some(self.hebrew.as_str()).filter(|t| !t.trim().is_empty())
    }

    /// Commentary, if present and not blank.
    pub fn commentary_text(&self) -> Option<&str> {
        self.commentary.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// `Genesis 1:1` style reference.
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.number)
    }
}
