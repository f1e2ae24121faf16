//! Weekly Torah portions (parshiyot).
//!
//! Each portion begins at a fixed verse. Verse references use the Masoretic
//! numbering served by the text API, so e.g. Vayishlach starts at Genesis 32:4
//! rather than the 32:3 found in many English Bibles.

use serde::{Deserialize, Serialize};

/// The start of one weekly Torah portion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParshaStart {
    /// English book name (matches `BookInfo::name`)
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub name: String,
    pub hebrew_name: String,
}

/// A lookup table of portion boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParshaTable {
    entries: Vec<ParshaStart>,
}

const CANONICAL: [(&str, u32, u32, &str, &str); 54] = [
    ("Genesis", 1, 1, "Bereshit", "בראשית"),
    ("Genesis", 6, 9, "Noach", "נח"),
    ("Genesis", 12, 1, "Lech-Lecha", "לך לך"),
    ("Genesis", 18, 1, "Vayera", "וירא"),
    ("Genesis", 23, 1, "Chayei Sarah", "חיי שרה"),
    ("Genesis", 25, 19, "Toldot", "תולדות"),
    ("Genesis", 28, 10, "Vayetzei", "ויצא"),
    ("Genesis", 32, 4, "Vayishlach", "וישלח"),
    ("Genesis", 37, 1, "Vayeshev", "וישב"),
    ("Genesis", 41, 1, "Miketz", "מקץ"),
    ("Genesis", 44, 18, "Vayigash", "ויגש"),
    ("Genesis", 47, 28, "Vayechi", "ויחי"),
    ("Exodus", 1, 1, "Shemot", "שמות"),
    ("Exodus", 6, 2, "Vaera", "וארא"),
    ("Exodus", 10, 1, "Bo", "בא"),
    ("Exodus", 13, 17, "Beshalach", "בשלח"),
    ("Exodus", 18, 1, "Yitro", "יתרו"),
    ("Exodus", 21, 1, "Mishpatim", "משפטים"),
    ("Exodus", 25, 1, "Terumah", "תרומה"),
    ("Exodus", 27, 20, "Tetzaveh", "תצוה"),
    ("Exodus", 30, 11, "Ki Tisa", "כי תשא"),
    ("Exodus", 35, 1, "Vayakhel", "ויקהל"),
    ("Exodus", 38, 21, "Pekudei", "פקודי"),
    ("Leviticus", 1, 1, "Vayikra", "ויקרא"),
    ("Leviticus", 6, 1, "Tzav", "צו"),
    ("Leviticus", 9, 1, "Shmini", "שמיני"),
    ("Leviticus", 12, 1, "Tazria", "תזריע"),
    ("Leviticus", 14, 1, "Metzora", "מצורע"),
    ("Leviticus", 16, 1, "Achrei Mot", "אחרי מות"),
    ("Leviticus", 19, 1, "Kedoshim", "קדשים"),
    ("Leviticus", 21, 1, "Emor", "אמור"),
    ("Leviticus", 25, 1, "Behar", "בהר"),
    ("Leviticus", 26, 3, "Bechukotai", "בחקתי"),
    ("Numbers", 1, 1, "Bamidbar", "במדבר"),
    ("Numbers", 4, 21, "Nasso", "נשא"),
    ("Numbers", 8, 1, "Beha'alotcha", "בהעלתך"),
    ("Numbers", 13, 1, "Sh'lach", "שלח"),
    ("Numbers", 16, 1, "Korach", "קרח"),
    ("Numbers", 19, 1, "Chukat", "חקת"),
    ("Numbers", 22, 2, "Balak", "בלק"),
    ("Numbers", 25, 10, "Pinchas", "פינחס"),
    ("Numbers", 30, 2, "Matot", "מטות"),
    ("Numbers", 33, 1, "Masei", "מסעי"),
    ("Deuteronomy", 1, 1, "Devarim", "דברים"),
    ("Deuteronomy", 3, 23, "Vaetchanan", "ואתחנן"),
    ("Deuteronomy", 7, 12, "Eikev", "עקב"),
    ("Deuteronomy", 11, 26, "Re'eh", "ראה"),
    ("Deuteronomy", 16, 18, "Shoftim", "שופטים"),
    ("Deuteronomy", 21, 10, "Ki Teitzei", "כי תצא"),
    ("Deuteronomy", 26, 1, "Ki Tavo", "כי תבוא"),
    ("Deuteronomy", 29, 9, "Nitzavim", "נצבים"),
    ("Deuteronomy", 31, 1, "Vayeilech", "וילך"),
    ("Deuteronomy", 32, 1, "Ha'Azinu", "האזינו"),
    ("Deuteronomy", 33, 1, "V'Zot HaBerachah", "וזאת הברכה"),
];

impl ParshaTable {
    /// The 54 weekly portions at their canonical starting verses.
    pub fn canonical() -> ParshaTable {
        ParshaTable {
            entries: CANONICAL
                .iter()
                .map(|&(book, chapter, verse, name, hebrew_name)| ParshaStart {
                    book: book.to_string(),
                    chapter,
                    verse,
                    name: name.to_string(),
                    hebrew_name: hebrew_name.to_string(),
                })
                .collect(),
        }
    }

    /// A table with no portions, for editions that omit markers.
    pub fn empty() -> ParshaTable {
        ParshaTable::default()
    }

    pub fn from_entries(entries: Vec<ParshaStart>) -> ParshaTable {
        ParshaTable { entries }
    }

    /// Portions starting in the given book, in canonical order.
    pub fn for_book<'a>(&'a self, book: &'a str) -> impl Iterator<Item = &'a ParshaStart> + 'a {
        self.entries.iter().filter(move |p| p.book == book)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
