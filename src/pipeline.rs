//! A generation run, from fetching text to writing the archive.
//!
//! The run moves through its stages strictly in order and stops at the first
//! failure, recording which stage failed. Nothing is written to the output
//! path unless every stage before packaging succeeded.

use crate::assemble::{assemble, AssemblyError};
use crate::canon::ParshaTable;
use crate::config::Configuration;
use crate::fetch::{FetchError, Fetcher, TextApi};
use crate::sinks::epub::{render_anthology, PackagingError, RenderError};
use crate::source::Anthology;
use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The working stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Assembling,
    Rendering,
    Packaging,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetching => write!(f, "fetching"),
            Stage::Assembling => write!(f, "assembling"),
            Stage::Rendering => write!(f, "rendering"),
            Stage::Packaging => write!(f, "packaging"),
        }
    }
}

/// Where a run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Configured,
    Working(Stage),
    Done,
    Failed(Stage),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetching failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("packaging failed: {0}")]
    Packaging(#[from] PackagingError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch(_) => Stage::Fetching,
            PipelineError::Assembly(_) => Stage::Assembling,
            PipelineError::Render(_) => Stage::Rendering,
            PipelineError::Packaging(_) => Stage::Packaging,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self.stage() {
            Stage::Fetching => 2,
            Stage::Assembling => 3,
            Stage::Rendering => 4,
            Stage::Packaging => 5,
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
    pub dropped_verses: usize,
    pub documents: usize,
    pub output: PathBuf,
}

/// Drives one generation run.
pub struct Generator<'c, A> {
    config: &'c Configuration,
    fetcher: Fetcher<A>,
    parshiyot: ParshaTable,
    state: RunState,
}

impl<'c, A: TextApi> Generator<'c, A> {
    pub fn new(api: A, config: &'c Configuration) -> Generator<'c, A> {
        Generator {
            config,
            fetcher: Fetcher::new(api, &config.api),
            parshiyot: ParshaTable::canonical(),
            state: RunState::Configured,
        }
    }

    /// Use a different table of portion boundaries.
    pub fn with_parshiyot(mut self, parshiyot: ParshaTable) -> Generator<'c, A> {
        self.parshiyot = parshiyot;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run every stage, recording where the run ended.
    pub fn run(&mut self, progress: &ProgressBar) -> Result<RunReport, PipelineError> {
        match self.run_stages(progress) {
            Ok(report) => {
                self.state = RunState::Done;
                info!("wrote {}", report.output.display());
                Ok(report)
            }
            Err(e) => {
                self.state = RunState::Failed(e.stage());
                error!("run failed while {}: {e}", e.stage());
                Err(e)
            }
        }
    }

    fn enter(&mut self, stage: Stage, progress: &ProgressBar) {
        info!("{stage}");
        self.state = RunState::Working(stage);
        progress.set_position(0);
    }

    fn run_stages(&mut self, progress: &ProgressBar) -> Result<RunReport, PipelineError> {
        let config = self.config;
        let books = config.books.books();
        progress.set_length(config.total_chapters());

        self.enter(Stage::Fetching, progress);
        let mut fetched = Vec::with_capacity(books.len());
        for info in books {
            let chapters = config.chapters_for(info);
            let verses = self
                .fetcher
                .fetch_book(info, chapters.clone(), config, progress)?;
            fetched.push((info, chapters, verses));
        }

        self.enter(Stage::Assembling, progress);
        progress.set_message("Assembling books...");
        if config.parsha_markers {
            if self.parshiyot.is_empty() {
                warn!("portion markers are enabled but no portion boundaries are known");
            } else {
                debug!("{} portion boundaries known", self.parshiyot.len());
            }
        }
        let mut anthology = Anthology::default();
        let mut dropped_verses = 0;
        for (info, chapters, verses) in fetched {
            let (book, stats) = assemble(info, verses, chapters, &self.parshiyot, config)?;
            dropped_verses += stats.dropped_verses;
            anthology.books.push(book);
        }

        self.enter(Stage::Rendering, progress);
        let rendered = render_anthology(&anthology, config, progress)?;

        self.enter(Stage::Packaging, progress);
        progress.set_message("Writing EPUB...");
        let package = config.epub.plan(rendered, config);
        let stats = config.epub.write(&package)?;

        Ok(RunReport {
            books: anthology.books.len(),
            chapters: anthology.chapter_count(),
            verses: anthology.verse_count(),
            dropped_verses,
            documents: stats.document_count,
            output: config.epub.outfile.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canon::{BookSelection, ParshaStart};
    use crate::fetch::fake::{chapter_body, FakeApi};
    use crate::sinks::epub::DisplayMode;
    use std::io::Read;

    fn config(dir: &std::path::Path, chapter_limit: u32) -> Configuration {
        let mut config = Configuration::default();
        config.books = BookSelection::Torah;
        config.chapter_limit = Some(chapter_limit);
        config.api.request_delay_ms = 0;
        config.api.backoff_ms = 1;
        config.epub.outfile = dir.join("torah.epub");
        config
    }

    fn entries(path: &std::path::Path) -> Vec<(String, String)> {
        let file = std::fs::File::open(path).expect("can open archive");
        let mut archive = zip::ZipArchive::new(file).expect("is a zip archive");
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index(i).expect("can open entry");
                let mut contents = String::new();
                entry.read_to_string(&mut contents).expect("can read entry");
                (entry.name().to_string(), contents)
            })
            .collect()
    }

    fn chapter_documents(path: &std::path::Path) -> Vec<(String, String)> {
        entries(path)
            .into_iter()
            .filter(|(name, _)| name.ends_with(".xhtml") && !name.ends_with("nav.xhtml"))
            .collect()
    }

    #[test]
    fn parallel_torah_without_commentary() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = config(dir.path(), 1);
        assert_eq!(config.epub.display_mode, DisplayMode::Both);
        assert!(!config.include_commentary);

        let mut generator = Generator::new(FakeApi::with_verses(3), &config);
        let report = generator
            .run(&ProgressBar::hidden())
            .expect("run succeeds");
        assert_eq!(generator.state(), RunState::Done);
        assert_eq!(report.books, 5);
        assert_eq!(report.chapters, 5);
        assert_eq!(report.verses, 15);
        assert_eq!(report.documents, 5);

        let documents = chapter_documents(&config.epub.outfile);
        assert_eq!(documents.len(), 5);
        let genesis: Vec<_> = documents
            .iter()
            .filter(|(name, _)| name.ends_with("genesis_001.xhtml"))
            .collect();
        assert_eq!(genesis.len(), 1);
        let xhtml = &genesis[0].1;
        assert_eq!(xhtml.matches("class=\"verse-container\"").count(), 3);
        assert!(xhtml.contains("עברית Genesis.1 1"));
        assert!(xhtml.contains("English Genesis.1 3"));
        assert!(!xhtml.contains("noteref"));
        assert!(!xhtml.contains("footnote"));
    }

    #[test]
    fn timeout_fails_the_run_without_output() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = config(dir.path(), 3);
        let api = FakeApi::new(|path, _| {
            if path == "api/texts/Genesis.2" {
                Err(FetchError::Timeout {
                    url: path.to_string(),
                })
            } else {
                Ok(chapter_body(path, 3))
            }
        });

        let mut generator = Generator::new(api, &config);
        let result = generator.run(&ProgressBar::hidden());
        let error = result.expect_err("run fails");
        assert!(matches!(error, PipelineError::Fetch(FetchError::Timeout { .. })));
        assert_eq!(error.exit_code(), 2);
        assert_eq!(generator.state(), RunState::Failed(Stage::Fetching));
        assert!(!config.epub.outfile.exists());
        assert_eq!(
            std::fs::read_dir(dir.path()).expect("can list dir").count(),
            0
        );
    }

    #[test]
    fn parsha_marker_appears_only_in_its_chapter() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = config(dir.path(), 2);
        let table = ParshaTable::from_entries(vec![ParshaStart {
            book: "Genesis".to_string(),
            chapter: 1,
            verse: 1,
            name: "Bereshit".to_string(),
            hebrew_name: "בראשית".to_string(),
        }]);

        let mut generator = Generator::new(FakeApi::with_verses(3), &config).with_parshiyot(table);
        generator
            .run(&ProgressBar::hidden())
            .expect("run succeeds");

        for (name, xhtml) in chapter_documents(&config.epub.outfile) {
            let markers = xhtml.matches("class=\"parsha-marker\"").count();
            if name.ends_with("genesis_001.xhtml") {
                assert_eq!(markers, 1);
            } else {
                assert_eq!(markers, 0, "unexpected marker in {name}");
            }
        }
    }

    #[test]
    fn assembly_failure_is_reported_by_stage() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = config(dir.path(), 1);
        let table = ParshaTable::from_entries(vec![ParshaStart {
            book: "Genesis".to_string(),
            chapter: 1,
            verse: 40,
            name: "Nowhere".to_string(),
            hebrew_name: "אין".to_string(),
        }]);

        let mut generator = Generator::new(FakeApi::with_verses(3), &config).with_parshiyot(table);
        let error = generator
            .run(&ProgressBar::hidden())
            .expect_err("run fails");
        assert_eq!(error.stage(), Stage::Assembling);
        assert_eq!(error.exit_code(), 3);
        assert_eq!(generator.state(), RunState::Failed(Stage::Assembling));
        assert!(!config.epub.outfile.exists());
    }

    #[test]
    fn chapter_without_displayable_text_fails_assembly() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let mut config = config(dir.path(), 1);
        config.epub.display_mode = DisplayMode::English;
        let api = FakeApi::new(|_, _| Ok(serde_json::json!({ "he": ["א", "ב"], "text": [] })));

        let mut generator = Generator::new(api, &config);
        let error = generator
            .run(&ProgressBar::hidden())
            .expect_err("run fails");
        assert!(matches!(
            error,
            PipelineError::Assembly(AssemblyError::EmptyChapter { chapter: 1, .. })
        ));
        assert_eq!(error.exit_code(), 3);
        assert_eq!(generator.state(), RunState::Failed(Stage::Assembling));
        assert!(!config.epub.outfile.exists());
    }

    #[test]
    fn new_generator_is_configured() {
        let config = Configuration::default();
        let generator = Generator::new(FakeApi::with_verses(1), &config);
        assert_eq!(generator.state(), RunState::Configured);
    }
}
