use anyhow::{Context, Result};
use cli::Cli;
use config::Configuration;
use fetch::HttpApi;
use indicatif::{ProgressBar, ProgressStyle};
use pipeline::{Generator, PipelineError};
use std::process::ExitCode;

mod assemble;
mod canon;
mod cli;
mod config;
mod config_wizard;
mod fetch;
mod pipeline;
mod sinks;
mod source;

fn main() -> ExitCode {
    use clap::Parser;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = try_main(cli) {
        eprintln!("{}: {e:#}", console::style("Error").red());
        let code = e
            .downcast_ref::<PipelineError>()
            .map(PipelineError::exit_code)
            .unwrap_or(1);
        ExitCode::from(code)
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn try_main(cli: Cli) -> Result<()> {
    match cli.command {
        cli::Commands::Config => match config_wizard::run()? {
            Some(config) => generate(&config),
            None => Ok(()),
        },
        cli::Commands::Render { config } => {
            println!("Loading configuration...");
            let config = Configuration::load(&config)?;
            generate(&config)
        }
        cli::Commands::Generate(args) => {
            let config = args.into_configuration();
            config.validate()?;
            generate(&config)
        }
    }
}

fn generate(config: &Configuration) -> Result<()> {
    let api = HttpApi::new(&config.api).map_err(PipelineError::from)?;

    println!(
        "Generating {} ({} chapters)...",
        config.title(),
        config.total_chapters()
    );
    let progress = ProgressBar::new(config.total_chapters());
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .with_context(|| "Failed to parse progress style")?
            .progress_chars("#>-"),
    );
    progress.set_message("Fetching text...");

    let mut generator = Generator::new(api, config);
    let result = generator.run(&progress);
    progress.finish_and_clear();
    let report = result?;

    println!();
    println!("  EPUB:      {}", report.output.display());
    println!("  Books:     {}", report.books);
    println!("  Chapters:  {}", report.chapters);
    println!("  Verses:    {}", report.verses);
    println!("  Documents: {}", report.documents);
    if report.dropped_verses > 0 {
        println!(
            "  Dropped:   {} verses with no text to display",
            report.dropped_verses
        );
    }
    println!();

    Ok(())
}
