//! markview - live Markdown preview
//!
//! This crate provides the rendering and preview-pane logic: markdown to
//! HTML with routed links, heading outline, diagrams, math and highlighted
//! code, plus an Elm-style pane component driven by messages.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod emoji;
pub mod markdown;
pub mod preview;
pub mod syntax;
pub mod tracing;
pub mod watcher;

// Re-export commonly used types
pub use config::PreviewConfig;
pub use markdown::{Heading, MarkdownRenderer, RenderOutput};
pub use preview::{update_preview, Cmd, PreviewMsg, PreviewPane};
