//! Static knowledge about the Hebrew Bible: the books of the Torah and
//! Prophets in canonical order, the weekly Torah portions, and Hebrew numerals.

mod books;
pub use books::*;

mod numerals;
pub use numerals::*;

mod parsha;
pub use parsha::*;
