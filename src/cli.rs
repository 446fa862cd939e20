//! Command-line argument parsing
//!
//! Supports:
//! - Opening a document in the preview window
//! - Config file override and per-run style flags
//! - `render` and `outline` subcommands for headless use

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ConfigError, PreviewConfig};

/// A markdown preview window
#[derive(Parser, Debug)]
#[command(name = "markview", version, about = "A markdown preview window")]
pub struct CliArgs {
    /// Markdown or HTML document to preview
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Read configuration from FILE instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// CSS font size for the preview (e.g. 16px)
    #[arg(long, value_name = "SIZE", global = true)]
    pub font_size: Option<String>,

    /// Render without the GitHub `markdown-body` style
    #[arg(long, global = true)]
    pub no_github_style: bool,

    /// Keep raw HTML and script links
    #[arg(long, global = true)]
    pub no_sanitize: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print the rendered HTML of a markdown file
    Render {
        path: PathBuf,
        /// Print the complete page instead of the content fragment
        #[arg(long)]
        page: bool,
    },
    /// Print the heading outline of a markdown file
    Outline {
        path: PathBuf,
        /// Print the outline as JSON
        #[arg(long)]
        json: bool,
    },
}

impl CliArgs {
    /// Load the config named by `--config` (or the default one) and apply overrides
    ///
    /// An explicit `--config` that cannot be read is an error; the default
    /// location falls back to defaults.
    pub fn load_config(&self) -> Result<PreviewConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PreviewConfig::load_from(path)?,
            None => PreviewConfig::load(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut PreviewConfig) {
        if let Some(size) = &self.font_size {
            config.markdown.font_size = Some(size.clone());
        }
        if self.no_github_style {
            config.markdown.github_style = false;
        }
        if self.no_sanitize {
            config.markdown.sanitize = false;
        }
    }
}
