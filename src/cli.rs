use crate::canon::BookSelection;
use crate::config::{Configuration, CONFIG_FILE};
use crate::fetch::ApiConfig;
use crate::sinks::epub::{DisplayMode, LayoutPreference, MetadataConfig, EPUB};
use crate::source::Translation;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a tanakh-epub.toml config file
    Config,
    /// Generates the EPUB according to the contents of a config file
    Render {
        /// Configuration file to read
        #[clap(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },
    /// Generates an EPUB from command-line options
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log more (-v for progress details, -vv for debugging)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Which books to include
    #[clap(long, value_enum, default_value_t = BookSelection::Both)]
    pub books: BookSelection,

    /// Which texts each verse shows
    #[clap(long, value_enum, default_value_t = DisplayMode::Both)]
    pub display_mode: DisplayMode,

    /// English translation to show
    #[clap(long, value_enum, default_value_t = Translation::Default)]
    pub translation: Translation,

    /// Parallel text layout on landscape screens
    #[clap(long, value_enum, default_value_t = LayoutPreference::SideBySide)]
    pub layout: LayoutPreference,

    /// Include Rashi's commentary as footnotes
    #[clap(long)]
    pub commentary: bool,

    /// Hide verse numbers
    #[clap(long)]
    pub no_verse_numbers: bool,

    /// Don't mark where weekly Torah portions begin
    #[clap(long)]
    pub no_parsha_markers: bool,

    /// Only include the first N chapters of each book
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub chapter_limit: Option<u32>,

    /// Book title (derived from the selected books by default)
    #[clap(long)]
    pub title: Option<String>,

    /// Output EPUB file (defaults to torah.epub, prophets.epub or tanakh.epub)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Base URL of the text API
    #[clap(long, env = "TANAKH_EPUB_API_URL")]
    pub api_url: Option<String>,

    /// Delay between API requests, in milliseconds
    #[clap(long)]
    pub request_delay_ms: Option<u64>,

    /// Retries for failed API requests
    #[clap(long)]
    pub max_retries: Option<u32>,
}

impl GenerateArgs {
    /// The configuration these options describe.
    pub fn into_configuration(self) -> Configuration {
        let defaults = ApiConfig::default();
        let api = ApiConfig {
            base_url: self.api_url.unwrap_or(defaults.base_url),
            request_delay_ms: self.request_delay_ms.unwrap_or(defaults.request_delay_ms),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            ..defaults
        };

        let outfile = self
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}.epub", self.books.file_stem())));

        Configuration {
            books: self.books,
            translation: self.translation,
            include_commentary: self.commentary,
            parsha_markers: !self.no_parsha_markers,
            chapter_limit: self.chapter_limit,
            api,
            epub: EPUB {
                outfile,
                display_mode: self.display_mode,
                layout: self.layout,
                verse_numbers: !self.no_verse_numbers,
                metadata: MetadataConfig {
                    title: self.title.unwrap_or_default(),
                    ..MetadataConfig::default()
                },
                ..EPUB::default()
            },
        }
    }
}
