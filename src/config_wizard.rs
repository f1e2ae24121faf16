//! Interactive configuration wizard for creating `tanakh-epub.toml`.
//!
//! The wizard walks through the edition's contents (books, languages,
//! translation, commentary) and its presentation (layout, verse numbers,
//! title, output file), writes the resulting configuration, and offers to
//! generate the book straight away.

use crate::canon::BookSelection;
use crate::config::{Configuration, CONFIG_FILE};
use crate::sinks::epub::{DisplayMode, LayoutPreference};
use crate::source::Translation;
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input, Select};
use std::path::PathBuf;

/// Run the interactive configuration wizard.
///
/// Writes `tanakh-epub.toml` to the current directory and returns the
/// configuration if the user wants to generate the EPUB now.
pub fn run() -> Result<Option<Configuration>> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };
    let mut config = Configuration::default();

    let books = Select::with_theme(&theme)
        .with_prompt("Which books should the edition contain?")
        .items(BookSelection::all())
        .default(0)
        .interact()
        .with_context(|| "Failed to obtain book selection")?;
    config.books = BookSelection::all()[books];

    let display_mode = Select::with_theme(&theme)
        .with_prompt("Which texts should each verse show?")
        .items(DisplayMode::all())
        .default(0)
        .interact()
        .with_context(|| "Failed to obtain display mode")?;
    config.epub.display_mode = DisplayMode::all()[display_mode];

    if config.epub.display_mode.shows_english() {
        let translation = FuzzySelect::with_theme(&theme)
            .with_prompt("English translation")
            .items(Translation::all())
            .default(0)
            .interact()?;
        config.translation = Translation::all()[translation];
    }

    if config.epub.display_mode == DisplayMode::Both {
        let layout = Select::with_theme(&theme)
            .with_prompt("Layout on landscape screens")
            .items(LayoutPreference::all())
            .default(0)
            .interact()?;
        config.epub.layout = LayoutPreference::all()[layout];
    }

    config.include_commentary = Confirm::with_theme(&theme)
        .with_prompt("Include Rashi's commentary as footnotes?")
        .default(false)
        .interact()?;

    config.parsha_markers = config.books != BookSelection::Prophets
        && Confirm::with_theme(&theme)
            .with_prompt("Mark where each weekly Torah portion begins?")
            .default(true)
            .interact()?;

    config.epub.verse_numbers = Confirm::with_theme(&theme)
        .with_prompt("Show verse numbers?")
        .default(true)
        .interact()?;

    if Confirm::with_theme(&theme)
        .with_prompt("Generate a sample edition with only the first chapters of each book?")
        .default(false)
        .interact()?
    {
        let limit: u32 = Input::with_theme(&theme)
            .with_prompt("Chapters per book")
            .default(1)
            .validate_with(|input: &u32| {
                if *input > 0 {
                    Ok(())
                } else {
                    Err("A sample needs at least one chapter")
                }
            })
            .interact()?;
        config.chapter_limit = Some(limit);
    }

    let title: String = Input::with_theme(&theme)
        .with_prompt("Book title")
        .with_initial_text(config.title())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;
    if title != config.title() {
        config.epub.metadata.title = title;
    }

    let outfile: String = Input::with_theme(&theme)
        .with_prompt("Output epub file")
        .default(format!("{}.epub", config.books.file_stem()))
        .allow_empty(false)
        .interact()?;
    let mut outfile = PathBuf::from(outfile);
    let ext = outfile
        .extension()
        .map(std::ffi::OsStr::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != *"epub" {
        outfile.set_extension("epub");
    }
    config.epub.outfile = outfile;

    config.validate()?;
    let contents = config.to_toml()?;

    let config_path = PathBuf::from(CONFIG_FILE);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{CONFIG_FILE} already exists, do you want to override it?"
            ))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", contents);
    } else {
        std::fs::write(&config_path, contents)
            .with_context(|| "Failed to write configuration file")?;
        println!("{CONFIG_FILE} written!");
    }

    let generate = Confirm::with_theme(&theme)
        .with_prompt("Generate the EPUB now?")
        .default(true)
        .interact()?;
    Ok(generate.then_some(config))
}
