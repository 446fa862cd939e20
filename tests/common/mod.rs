//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use markview::emoji::EmojiReplacer;
use markview::markdown::{MarkdownRenderer, RenderOutput, RendererOptions};
use markview::preview::{PreviewHooks, PreviewSurface};

/// Render with default options (sanitize on, highlighting on, no emoji)
pub fn render(markdown: &str) -> RenderOutput {
    MarkdownRenderer::new(RendererOptions::default()).render(markdown)
}

/// Render with options tweaked by `f`
pub fn render_with(markdown: &str, f: impl FnOnce(&mut RendererOptions)) -> RenderOutput {
    let mut options = RendererOptions::default();
    f(&mut options);
    MarkdownRenderer::new(options).render(markdown)
}

/// Renderer that knows a couple of emoji shortcodes under `/emoji`
pub fn emoji_renderer() -> MarkdownRenderer {
    let emoji = EmojiReplacer::new(
        "/emoji",
        ["smile", "+1"].into_iter().map(str::to_string),
    );
    MarkdownRenderer::new(RendererOptions::default()).with_emoji(emoji)
}

/// One call made against a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Style(Option<String>, bool),
    Content(String),
    Diagrams,
    Math,
    Hash(String),
    ScrollTo(String),
}

/// Surface double that records every call in order
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl PreviewSurface for RecordingSurface {
    fn set_container_style(&mut self, font_size: Option<&str>, github_style: bool) {
        self.calls
            .push(SurfaceCall::Style(font_size.map(str::to_string), github_style));
    }

    fn replace_content(&mut self, html: &str) {
        self.calls.push(SurfaceCall::Content(html.to_string()));
    }

    fn render_diagrams(&mut self) {
        self.calls.push(SurfaceCall::Diagrams);
    }

    fn render_math(&mut self) {
        self.calls.push(SurfaceCall::Math);
    }

    fn set_hash(&mut self, hash: &str) {
        self.calls.push(SurfaceCall::Hash(hash.to_string()));
    }

    fn scroll_to(&mut self, id: &str) {
        self.calls.push(SurfaceCall::ScrollTo(id.to_string()));
    }
}

/// What the host hooks were asked to do
#[derive(Debug, Default)]
pub struct HookLog {
    pub external: Vec<String>,
    pub documents: Vec<(PathBuf, bool)>,
    pub updates: Vec<(u64, usize)>,
}

/// Hooks that record into a shared log instead of touching the system
pub fn recording_hooks(with_document_hook: bool) -> (PreviewHooks, Rc<RefCell<HookLog>>) {
    let log = Rc::new(RefCell::new(HookLog::default()));

    let external_log = Rc::clone(&log);
    let update_log = Rc::clone(&log);
    let mut hooks = PreviewHooks::default()
        .with_open_external(move |url: &str| {
            external_log.borrow_mut().external.push(url.to_string());
            Ok(())
        })
        .on_document_updated(move |revision, outline| {
            update_log.borrow_mut().updates.push((revision, outline.len()));
        });

    if with_document_hook {
        let document_log = Rc::clone(&log);
        hooks = hooks.on_open_markdown_doc(move |path, new_window| {
            document_log
                .borrow_mut()
                .documents
                .push((path.to_path_buf(), new_window));
        });
    }

    (hooks, log)
}
