//! EPUB packaging.
//!
//! An `EpubPackage` is the complete plan of the archive: metadata, stylesheet,
//! the chapter documents in reading order and the navigation tree. It is
//! validated before anything touches the filesystem. Writing uses the
//! `epub-builder` crate, which produces the OPF manifest and spine, the EPUB 3
//! navigation document, the legacy NCX and the ZIP structure with its stored
//! `mimetype` entry. The archive is written to a temporary file next to the
//! destination and only renamed into place once generation succeeds.

use super::chapter::RenderedChapter;
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, TocElement, ZipLibrary};
use log::debug;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("nothing to package")]
    Empty,

    #[error("more than one document is named {0}")]
    DuplicateFilename(String),

    #[error("navigation lists {nav:?} but the chapters are {spine:?}")]
    NavMismatch { nav: Vec<String>, spine: Vec<String> },

    #[error("failed to build EPUB: {0}")]
    Builder(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Package-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub title: String,
    pub language: String,
    pub subject: Option<String>,
    pub author: Option<String>,
    /// Pages advance right to left
    pub right_to_left: bool,
}

/// A navigation entry and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    pub title: String,
    pub href: String,
    pub children: Vec<NavPoint>,
}

/// A fully planned archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubPackage {
    pub metadata: PackageMetadata,
    pub stylesheet: String,
    /// Content documents; this is also the spine order
    pub chapters: Vec<RenderedChapter>,
    /// One entry per book, with one child per chapter
    pub navigation: Vec<NavPoint>,
}

impl EpubPackage {
    /// Plan a package from each book's title and rendered chapters, in
    /// canonical order.
    pub fn plan(
        metadata: PackageMetadata,
        stylesheet: String,
        books: Vec<(String, Vec<RenderedChapter>)>,
    ) -> EpubPackage {
        let mut chapters = Vec::new();
        let mut navigation = Vec::new();
        for (title, rendered) in books {
            let Some(first) = rendered.first() else {
                continue;
            };
            navigation.push(NavPoint {
                title,
                href: first.filename.clone(),
                children: rendered
                    .iter()
                    .map(|c| NavPoint {
                        title: c.title.clone(),
                        href: c.filename.clone(),
                        children: Vec::new(),
                    })
                    .collect(),
            });
            chapters.extend(rendered);
        }

        EpubPackage {
            metadata,
            stylesheet,
            chapters,
            navigation,
        }
    }

    /// Check the plan without repairing anything.
    pub fn validate(&self) -> Result<(), PackagingError> {
        if self.chapters.is_empty() {
            return Err(PackagingError::Empty);
        }

        let mut seen = HashSet::new();
        for chapter in &self.chapters {
            if !seen.insert(chapter.filename.as_str()) {
                return Err(PackagingError::DuplicateFilename(chapter.filename.clone()));
            }
        }

        let nav: Vec<String> = self
            .navigation
            .iter()
            .flat_map(|book| book.children.iter().map(|c| c.href.clone()))
            .collect();
        let spine: Vec<String> = self.chapters.iter().map(|c| c.filename.clone()).collect();
        let books_point_at_first_child = self
            .navigation
            .iter()
            .all(|book| book.children.first().map(|c| &c.href) == Some(&book.href));
        if nav != spine || !books_point_at_first_child {
            return Err(PackagingError::NavMismatch { nav, spine });
        }
        Ok(())
    }

    /// Validate the plan and write it to `path`. Returns the number of
    /// chapter documents written.
    pub fn write(&self, path: &Path) -> Result<usize, PackagingError> {
        self.validate()?;

        let mut builder = self.builder()?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_error = |source| PackagingError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".tanakh-epub")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(io_error)?;
        builder
            .generate(&mut tmp)
            .map_err(|e| PackagingError::Builder(e.to_string()))?;
        tmp.persist(path).map_err(|e| io_error(e.error))?;

        debug!("wrote {} chapters to {}", self.chapters.len(), path.display());
        Ok(self.chapters.len())
    }

    fn builder(&self) -> Result<EpubBuilder<ZipLibrary>, PackagingError> {
        let zip = ZipLibrary::new().map_err(builder_error)?;
        let mut builder = EpubBuilder::new(zip).map_err(builder_error)?;
        builder.epub_version(EpubVersion::V30);

        builder
            .metadata("title", &self.metadata.title)
            .map_err(builder_error)?;
        builder
            .metadata("generator", concat!("tanakh-epub ", env!("CARGO_PKG_VERSION")))
            .map_err(builder_error)?;
        builder
            .metadata("lang", &self.metadata.language)
            .map_err(builder_error)?;
        if let Some(subject) = &self.metadata.subject {
            builder
                .metadata("description", subject)
                .map_err(builder_error)?;
        }
        if let Some(author) = &self.metadata.author {
            builder
                .metadata("author", author)
                .map_err(builder_error)?;
        }
        if self.metadata.right_to_left {
            builder
                .metadata("direction", "rtl")
                .map_err(builder_error)?;
        }

        builder
            .stylesheet(self.stylesheet.as_bytes())
            .map_err(builder_error)?;

        // the first chapter of each book carries the book's navigation entry
        // with every chapter as a child; the rest stay out of the table of
        // contents (an untitled content document gets no entry of its own)
        let mut books = self.navigation.iter().peekable();
        for (i, chapter) in self.chapters.iter().enumerate() {
            let mut content = EpubContent::new(&chapter.filename, chapter.xhtml.as_bytes());
            if let Some(book) = books.next_if(|book| book.href == chapter.filename) {
                content = content.title(&book.title);
                for child in &book.children {
                    content = content.child(TocElement::new(&child.href, &child.title));
                }
            }
            if i == 0 {
                content = content.reftype(ReferenceType::Text);
            }
            builder.add_content(content).map_err(builder_error)?;
        }

        Ok(builder)
    }
}

fn builder_error<E: std::fmt::Display>(e: E) -> PackagingError {
    PackagingError::Builder(e.to_string())
}
