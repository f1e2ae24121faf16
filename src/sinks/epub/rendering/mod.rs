//! EPUB rendering orchestration.
//!
//! Every chapter of the anthology becomes a separate XHTML document so
//! e-readers can page through one chapter at a time; the documents are then
//! planned into an `EpubPackage` together with the generated stylesheet and
//! a navigation tree of books and their chapters.

mod chapter;
mod package;

pub use chapter::{render as render_chapter, RenderError, RenderedChapter};
pub use package::{EpubPackage, PackageMetadata, PackagingError};

use super::config::{DisplayMode, RenderStats, EPUB};
use super::styles;
use crate::config::Configuration;
use crate::source::Anthology;
use indicatif::ProgressBar;

/// Each book's navigation title paired with its rendered chapters.
pub type RenderedBooks = Vec<(String, Vec<RenderedChapter>)>;

/// Render every chapter of every book, in canonical order.
pub fn render_anthology(
    anthology: &Anthology,
    config: &Configuration,
    progress: &ProgressBar,
) -> Result<RenderedBooks, RenderError> {
    progress.set_message("Rendering chapters...");
    anthology
        .books
        .iter()
        .map(|book| {
            let chapters = book
                .chapters
                .iter()
                .map(|chapter| {
                    let rendered = render_chapter(book, chapter, config);
                    progress.inc(1);
                    rendered
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((book_title(book.info), chapters))
        })
        .collect()
}

fn book_title(info: &crate::canon::BookInfo) -> String {
    format!("{} ({})", info.name, info.hebrew_name)
}

impl EPUB {
    /// Plan the archive for the rendered chapters.
    pub fn plan(&self, books: RenderedBooks, config: &Configuration) -> EpubPackage {
        let metadata = PackageMetadata {
            title: config.title(),
            language: self.language().to_string(),
            subject: Some(
                self.subject_opt()
                    .map(ToString::to_string)
                    .unwrap_or_else(generated_description),
            ),
            author: self.author_opt().map(ToString::to_string),
            right_to_left: self.display_mode == DisplayMode::Hebrew,
        };
        EpubPackage::plan(metadata, styles::generate_stylesheet(self), books)
    }

    /// Write a planned archive to the configured output file.
    pub fn write(&self, package: &EpubPackage) -> Result<RenderStats, PackagingError> {
        let document_count = package.write(&self.outfile)?;
        Ok(RenderStats { document_count })
    }
}

fn generated_description() -> String {
    format!(
        "Text from Sefaria, generated on {} by tanakh-epub v{}",
        chrono::Local::now().format("%Y-%m-%d"),
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canon::BookInfo;
    use crate::source::{Book, Chapter, Translation, VerseBuilder};

    fn book(name: &str, chapters: u32) -> Book {
        Book {
            info: BookInfo::find(name).expect("book exists"),
            chapters: (1..=chapters)
                .map(|number| Chapter {
                    number,
                    verses: vec![VerseBuilder::default()
                        .book(name)
                        .chapter(number)
                        .number(1u32)
                        .hebrew("בראשית")
                        .translation((Translation::Default, "In the beginning".to_string()))
                        .build()
                        .expect("can build verse")],
                    parshiyot: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn renders_books_in_order() {
        let anthology = Anthology {
            books: vec![book("Genesis", 2), book("Exodus", 1)],
        };
        let config = Configuration::default();
        let rendered = render_anthology(&anthology, &config, &ProgressBar::hidden())
            .expect("can render");
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].0, "Genesis (בראשית)");
        let files: Vec<&str> = rendered
            .iter()
            .flat_map(|(_, chapters)| chapters.iter().map(|c| c.filename.as_str()))
            .collect();
        assert_eq!(
            files,
            vec!["genesis_001.xhtml", "genesis_002.xhtml", "exodus_001.xhtml"]
        );
    }

    #[test]
    fn plans_package_with_metadata() {
        let anthology = Anthology {
            books: vec![book("Genesis", 1)],
        };
        let mut config = Configuration::default();
        config.epub.metadata.title = "Bereshit".to_string();
        let rendered = render_anthology(&anthology, &config, &ProgressBar::hidden())
            .expect("can render");
        let package = config.epub.plan(rendered, &config);
        assert_eq!(package.metadata.title, "Bereshit");
        assert_eq!(package.metadata.language, "he");
        assert!(package
            .metadata
            .subject
            .as_deref()
            .is_some_and(|s| s.starts_with("Text from Sefaria")));
        assert!(package.stylesheet.contains(".hebrew-text"));
        assert!(!package.metadata.right_to_left);
        package.validate().expect("plan is valid");
    }

    #[test]
    fn hebrew_only_pages_advance_right_to_left() {
        let anthology = Anthology {
            books: vec![book("Genesis", 1)],
        };
        let mut config = Configuration::default();
        config.epub.display_mode = DisplayMode::Hebrew;
        config.epub.metadata.author = "Sefaria".to_string();
        let rendered = render_anthology(&anthology, &config, &ProgressBar::hidden())
            .expect("can render");
        let package = config.epub.plan(rendered, &config);
        assert!(package.metadata.right_to_left);
        assert_eq!(package.metadata.author.as_deref(), Some("Sefaria"));
    }
}
