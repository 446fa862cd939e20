//! Preview pane component
//!
//! Elm-style: [`PreviewMsg`] goes through [`update_preview`], which mutates the
//! [`PreviewPane`] and returns an optional [`Cmd`]; [`execute`] applies the
//! command to a [`PreviewSurface`] (the webview, or a test double).

mod commands;
mod dispatch;
mod execute;
mod messages;
mod update;

pub use commands::Cmd;
pub use dispatch::{document_path, resolve, ClickAction, IpcMessage, LinkClick, LinkClickKind};
pub use execute::{execute, PreviewHooks, PreviewSurface};
pub use messages::PreviewMsg;
pub use update::update_preview;

use crate::config::PreviewConfig;
use crate::emoji::EmojiReplacer;
use crate::markdown::{build_outline_tree, Heading, MarkdownRenderer, OutlineNode, RendererOptions};

/// Lifecycle of the pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneState {
    /// No container yet; documents are kept until attach
    #[default]
    Detached,
    Idle,
    Rendering,
}

/// Settings the pane applies when it attaches
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    pub renderer: RendererOptions,
    pub emoji: EmojiReplacer,
    /// CSS font-size override for the container
    pub font_size: Option<String>,
    /// Keep the `markdown-body` class on the container
    pub github_style: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            renderer: RendererOptions::default(),
            emoji: EmojiReplacer::default(),
            font_size: None,
            github_style: true,
        }
    }
}

impl PreviewSettings {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            renderer: RendererOptions::from_config(config),
            emoji: EmojiReplacer::from_config(&config.emoji),
            font_size: config.markdown.font_size.clone(),
            github_style: config.markdown.github_style,
        }
    }
}

/// State of one preview pane
#[derive(Debug, Default)]
pub struct PreviewPane {
    pub(crate) state: PaneState,
    pub(crate) settings: PreviewSettings,
    pub(crate) renderer: Option<MarkdownRenderer>,
    /// Latest document text, rendered or pending
    pub(crate) document: Option<String>,
    pub(crate) html: String,
    pub(crate) outline: Vec<Heading>,
    /// Bumped on every render
    pub(crate) revision: u64,
}

impl PreviewPane {
    pub fn new(settings: PreviewSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::new(PreviewSettings::from_config(config))
    }

    pub fn state(&self) -> PaneState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state != PaneState::Detached
    }

    /// HTML of the last render
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Headings of the last render, in document order
    pub fn outline(&self) -> &[Heading] {
        &self.outline
    }

    /// Outline nested by heading level
    pub fn outline_tree(&self) -> Vec<OutlineNode> {
        build_outline_tree(&self.outline)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }
}
