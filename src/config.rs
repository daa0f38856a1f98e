// src/config.rs
use crate::constants::DEFAULT_OUTPUT_DIR;
use crate::error::AppError;
use crate::types::{ApiKey, NotionId};
use clap::Parser;
use std::path::PathBuf;

/// Environment variable holding the Notion integration token.
pub const API_KEY_ENV: &str = "NOTION_API_KEY";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Root Notion page URL or ID (e.g., "https://www.notion.so/...")
    pub notion_input: String,

    /// Directory the export is written into
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub root_id: NotionId,
    pub api_key: ApiKey,
    pub output_dir: PathBuf,
    pub verbose: bool,
}

impl ExportConfig {
    /// Resolves the configuration from CLI input and the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::from_parts(cli, std::env::var(API_KEY_ENV).ok())
    }

    /// Resolves the configuration from CLI input and an optional raw key.
    pub fn from_parts(cli: CommandLineInput, api_key: Option<String>) -> Result<Self, AppError> {
        let api_key_str = api_key.ok_or_else(|| {
            AppError::MissingConfiguration(format!("{} environment variable not set", API_KEY_ENV))
        })?;

        let api_key = ApiKey::new(api_key_str)?;
        let root_id = NotionId::parse(&cli.notion_input)?;

        Ok(ExportConfig {
            root_id,
            api_key,
            output_dir: PathBuf::from(cli.output_dir),
            verbose: cli.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommandLineInput {
        CommandLineInput::try_parse_from(std::iter::once("notion2markdown").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_output_dir_defaults() {
        let cli = parse(&["0123456789abcdef0123456789abcdef"]);
        assert_eq!(cli.output_dir, DEFAULT_OUTPUT_DIR);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_missing_input_is_a_parse_error() {
        let result = CommandLineInput::try_parse_from(["notion2markdown"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_with_key() {
        let cli = parse(&[
            "https://www.notion.so/Home-0123456789abcdef0123456789abcdef",
            "out",
            "-v",
        ]);
        let config = ExportConfig::from_parts(cli, Some("secret_abc".to_string())).unwrap();
        assert_eq!(config.root_id.as_str(), "01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.verbose);
        assert_eq!(config.api_key.as_str(), "secret_abc");
    }

    #[test]
    fn test_missing_key_is_missing_configuration() {
        let cli = parse(&["0123456789abcdef0123456789abcdef"]);
        let result = ExportConfig::from_parts(cli, None);
        assert!(matches!(result, Err(AppError::MissingConfiguration(_))));
    }

    #[test]
    fn test_bad_identifier_is_rejected() {
        let cli = parse(&["not-an-id"]);
        let result = ExportConfig::from_parts(cli, Some("secret_abc".to_string()));
        assert!(matches!(result, Err(AppError::InvalidIdentifier(_))));
    }
}
