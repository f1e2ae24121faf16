use serde::{Deserialize, Serialize};
use std::fmt;

/// Which division of the Hebrew Bible a book belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    Torah,
    Prophets,
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Division::Torah => write!(f, "Torah"),
            Division::Prophets => write!(f, "Prophets"),
        }
    }
}

/// Static facts about a book of the Tanakh.
///
/// Chapter counts follow the Masoretic division served by the text API, which
/// differs from some English Bibles (Joel has 4 chapters, Malachi 3).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BookInfo {
    /// The English name, as the text API expects it (spaces become underscores in URLs)
    pub name: &'static str,
    pub hebrew_name: &'static str,
    pub transliteration: &'static str,
    pub division: Division,
    /// Canonical position within the division, starting at 1
    pub position: u32,
    pub chapter_count: u32,
}

impl BookInfo {
    /// The book name as it appears in API paths, e.g. `I_Samuel`.
    pub fn api_name(&self) -> String {
        self.name.replace(' ', "_")
    }

    /// Lowercase filename-safe name, e.g. `i_samuel`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }

    /// Look up a book by English name, ignoring case and treating `_` as a space.
    pub fn find(name: &str) -> Option<&'static BookInfo> {
        let wanted = name.replace('_', " ");
        TORAH
            .iter()
            .chain(PROPHETS.iter())
            .find(|b| b.name.eq_ignore_ascii_case(wanted.trim()))
    }
}

impl fmt::Display for BookInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

macro_rules! book {
    ($name:literal, $hebrew:literal, $translit:literal, $division:ident, $pos:literal, $chapters:literal) => {
        BookInfo {
            name: $name,
            hebrew_name: $hebrew,
            transliteration: $translit,
            division: Division::$division,
            position: $pos,
            chapter_count: $chapters,
        }
    };
}

pub static TORAH: [BookInfo; 5] = [
    book!("Genesis", "בראשית", "Bereshit", Torah, 1, 50),
    book!("Exodus", "שמות", "Shemot", Torah, 2, 40),
    book!("Leviticus", "ויקרא", "Vayikra", Torah, 3, 27),
    book!("Numbers", "במדבר", "Bamidbar", Torah, 4, 36),
    book!("Deuteronomy", "דברים", "Devarim", Torah, 5, 34),
];

pub static PROPHETS: [BookInfo; 21] = [
    book!("Joshua", "יהושע", "Yehoshua", Prophets, 1, 24),
    book!("Judges", "שופטים", "Shoftim", Prophets, 2, 21),
    book!("I Samuel", "שמואל א", "Shmuel I", Prophets, 3, 31),
    book!("II Samuel", "שמואל ב", "Shmuel II", Prophets, 4, 24),
    book!("I Kings", "מלכים א", "Melachim I", Prophets, 5, 22),
    book!("II Kings", "מלכים ב", "Melachim II", Prophets, 6, 25),
    book!("Isaiah", "ישעיהו", "Yeshayahu", Prophets, 7, 66),
    book!("Jeremiah", "ירמיהו", "Yirmiyahu", Prophets, 8, 52),
    book!("Ezekiel", "יחזקאל", "Yechezkel", Prophets, 9, 48),
    book!("Hosea", "הושע", "Hoshea", Prophets, 10, 14),
    book!("Joel", "יואל", "Yoel", Prophets, 11, 4),
    book!("Amos", "עמוס", "Amos", Prophets, 12, 9),
    book!("Obadiah", "עובדיה", "Ovadiah", Prophets, 13, 1),
    book!("Jonah", "יונה", "Yonah", Prophets, 14, 4),
    book!("Micah", "מיכה", "Michah", Prophets, 15, 7),
    book!("Nahum", "נחום", "Nachum", Prophets, 16, 3),
    book!("Habakkuk", "חבקוק", "Chavakuk", Prophets, 17, 3),
    book!("Zephaniah", "צפניה", "Tzefaniah", Prophets, 18, 3),
    book!("Haggai", "חגי", "Chaggai", Prophets, 19, 2),
    book!("Zechariah", "זכריה", "Zechariah", Prophets, 20, 14),
    book!("Malachi", "מלאכי", "Malachi", Prophets, 21, 3),
];

/// Which books go into the generated anthology.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BookSelection {
    Torah,
    Prophets,
    #[default]
    Both,
}

impl BookSelection {
    /// All available selections for the configuration wizard.
    pub fn all() -> &'static [BookSelection] {
        &[
            BookSelection::Torah,
            BookSelection::Prophets,
            BookSelection::Both,
        ]
    }

    /// The selected books in canonical order.
    pub fn books(&self) -> Vec<&'static BookInfo> {
        match self {
            BookSelection::Torah => TORAH.iter().collect(),
            BookSelection::Prophets => PROPHETS.iter().collect(),
            BookSelection::Both => TORAH.iter().chain(PROPHETS.iter()).collect(),
        }
    }

    /// Short name used when suggesting an output filename.
    pub fn file_stem(&self) -> &'static str {
        match self {
            BookSelection::Torah => "torah",
            BookSelection::Prophets => "prophets",
            BookSelection::Both => "tanakh",
        }
    }
}

impl fmt::Display for BookSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSelection::Torah => write!(f, "Torah only (Five Books of Moses)"),
            BookSelection::Prophets => write!(f, "Prophets only (Nevi'im)"),
            BookSelection::Both => write!(f, "Both Torah and Prophets"),
        }
    }
}
