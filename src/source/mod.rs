//! The scripture text model: verses grouped into chapters, chapters into
//! books, and books into the anthology a run produces.

mod book;
pub use book::*;

mod translation;
pub use translation::*;

mod verse;
pub use verse::*;
