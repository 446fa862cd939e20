//! Runtime module - winit/platform integration
//!
//! This module contains the desktop host for the preview:
//! - `app` - ApplicationHandler, window and document lifecycle
//! - `webview` - wry webview hosting the preview page

pub mod app;
pub mod webview;

use std::path::PathBuf;

use anyhow::Result;
use winit::event_loop::EventLoop;

use markview::config::PreviewConfig;

pub use app::App;

/// Events delivered to the event loop from the webview and preview hooks
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// Raw IPC message body posted by the page
    Ipc(String),
    /// Show another document in this window
    Navigate(PathBuf),
    /// Show a document in a new window
    OpenWindow(PathBuf),
    /// A render finished; `title` is the first heading, if any
    DocumentUpdated { title: Option<String> },
}

/// Open the preview window and run until it closes
pub fn run(config: PreviewConfig, path: Option<PathBuf>) -> Result<()> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let mut app = App::new(config, path, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;
    Ok(())
}
