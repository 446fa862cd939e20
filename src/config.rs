//! Preview configuration persistence
//!
//! Stores user preferences in `~/.config/markview/config.yaml`.
//! Every section falls back to its defaults when missing from the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level preview configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub file_ext: FileExtConfig,
    pub markdown: MarkdownConfig,
    pub emoji: EmojiConfig,
    pub diagrams: DiagramConfig,
    pub window: WindowConfig,
}

/// File extensions (without the leading dot) recognized per document kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtConfig {
    pub markdown: Vec<String>,
    pub html: Vec<String>,
}

impl Default for FileExtConfig {
    fn default() -> Self {
        Self {
            markdown: ["md", "markdown", "mkd", "mdown", "mkdn"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            html: vec!["html".to_string(), "htm".to_string()],
        }
    }
}

/// Markdown rendering and styling options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// CSS font-size override for the preview container (e.g. "16px")
    pub font_size: Option<String>,
    /// Extra stylesheet appended after the built-in one
    pub css_path: Option<PathBuf>,
    /// Color scheme for the page and highlighted code ("dark" or "light")
    pub code_theme: String,
    /// Keep the `markdown-body` class on the container
    pub github_style: bool,
    /// Strip `javascript:`/`vbscript:` links and escape raw HTML
    pub sanitize: bool,
    /// Highlight fenced code blocks
    pub highlight: bool,
    /// Prefix prepended to every heading id
    pub header_prefix: String,
    /// Suffix repeated heading ids with `-1`, `-2`, ...
    pub unique_heading_ids: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            font_size: None,
            css_path: None,
            code_theme: "dark".to_string(),
            github_style: true,
            sanitize: true,
            highlight: true,
            header_prefix: String::new(),
            unique_heading_ids: true,
        }
    }
}

/// Emoji shortcode substitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    pub enabled: bool,
    /// Directory of `<shortcode>.png` images; defaults to `~/.config/markview/emoji`
    pub image_dir: Option<PathBuf>,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            image_dir: None,
        }
    }
}

impl EmojiConfig {
    /// Configured image dir, or the default one under the config dir
    pub fn resolved_image_dir(&self) -> Option<PathBuf> {
        self.image_dir
            .clone()
            .or_else(crate::config_paths::emoji_dir)
    }
}

/// Script sources for the diagram and math renderers loaded by the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub mermaid: bool,
    pub mermaid_src: String,
    pub katex: bool,
    pub katex_src: String,
    pub katex_css: String,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            mermaid: true,
            mermaid_src: "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js".to_string(),
            katex: true,
            katex_src: "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js".to_string(),
            katex_css: "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css".to_string(),
        }
    }
}

/// Initial window geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub hide_title_bar: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 800,
            hide_title_bar: false,
        }
    }
}

/// What kind of document a path holds, judged by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    Html,
}

impl PreviewConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self)?;

        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Classify a path by its extension (case-insensitive)
    pub fn document_kind(&self, path: &Path) -> Option<DocumentKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if self.file_ext.markdown.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            Some(DocumentKind::Markdown)
        } else if self.file_ext.html.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            Some(DocumentKind::Html)
        } else {
            None
        }
    }
}
