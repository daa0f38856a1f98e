// src/main.rs

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2markdown::{
    CommandLineInput, ExportConfig, ExportReport, Exporter, HttpFetcher, LocalStore,
    NotionHttpClient,
};
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion2markdown.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Runs one export with live HTTP capabilities and the local filesystem.
async fn run_export(config: &ExportConfig) -> anyhow::Result<ExportReport> {
    let source = NotionHttpClient::new(&config.api_key)
        .context("Failed to build the Notion API client")?;
    let fetcher = HttpFetcher::new().context("Failed to build the asset fetcher")?;

    let mut exporter = Exporter::new(
        Arc::new(source),
        Arc::new(fetcher),
        Arc::new(LocalStore),
        Some(config.api_key.clone()),
    );

    exporter
        .export(&config.root_id, &config.output_dir)
        .await
        .with_context(|| format!("Export of {} failed", config.root_id))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match CommandLineInput::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match ExportConfig::resolve(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::from(1);
        }
    };

    match run_export(&config).await {
        Ok(report) => {
            println!(
                "✓ Exported {} pages to {} ({} assets written, {} reused)",
                report.pages_exported,
                report.root_document.display(),
                report.assets_written,
                report.assets_reused
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::from(1)
        }
    }
}
