use serde::{Deserialize, Serialize};
use std::fmt;

/// English translations available from the text API.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Translation {
    /// Whatever the API serves when no version is requested
    #[default]
    Default,
    Jps1917,
    Jps1985,
    Contemporary,
    Koren,
    Fox,
    Community,
    Metsudah,
}

impl Translation {
    /// All translations, in the order offered by the configuration wizard.
    pub fn all() -> &'static [Translation] {
        &[
            Translation::Default,
            Translation::Jps1917,
            Translation::Jps1985,
            Translation::Contemporary,
            Translation::Koren,
            Translation::Fox,
            Translation::Community,
            Translation::Metsudah,
        ]
    }

    /// The version title the API expects in its `ven` parameter, or `None` for
    /// the default translation.
    pub fn version_title(&self) -> Option<&'static str> {
        match self {
            Translation::Default => None,
            Translation::Jps1917 => Some("The Holy Scriptures: A New Translation (JPS 1917)"),
            Translation::Jps1985 => Some("Tanakh: The Holy Scriptures, published by JPS"),
            Translation::Contemporary => {
                Some("The Contemporary Torah, Jewish Publication Society, 2006")
            }
            Translation::Koren => Some("The Koren Jerusalem Bible"),
            Translation::Fox => {
                Some("The Five Books of Moses, by Everett Fox. New York, Schocken Books, 1995")
            }
            Translation::Community => Some("Sefaria Community Translation"),
            Translation::Metsudah => Some("Metsudah Chumash, Metsudah Publications, 2009"),
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Translation::Default => "SEF",
            Translation::Jps1917 => "JPS1917",
            Translation::Jps1985 => "JPS",
            Translation::Contemporary => "CJPS",
            Translation::Koren => "KJB",
            Translation::Fox => "FOX",
            Translation::Community => "SCT",
            Translation::Metsudah => "MET",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Translation::Default => "Default Sefaria Translation",
            Translation::Jps1917 => "JPS 1917",
            Translation::Jps1985 => "JPS 1985",
            Translation::Contemporary => "The Contemporary Torah (JPS 2006)",
            Translation::Koren => "The Koren Jerusalem Bible",
            Translation::Fox => "The Five Books of Moses (Everett Fox)",
            Translation::Community => "Sefaria Community Translation",
            Translation::Metsudah => "Metsudah Chumash",
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_default_has_no_version_title() {
        for translation in Translation::all() {
            assert_eq!(
                translation.version_title().is_none(),
                *translation == Translation::Default
            );
        }
    }

    #[test]
    fn abbreviations_are_unique() {
        let mut abbreviations: Vec<_> = Translation::all()
            .iter()
            .map(|t| t.abbreviation())
            .collect();
        abbreviations.sort();
        abbreviations.dedup();
        assert_eq!(abbreviations.len(), Translation::all().len());
    }
}
