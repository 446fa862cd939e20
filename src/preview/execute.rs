//! Command execution against the page and the host application

use std::path::Path;

use super::commands::Cmd;
use crate::markdown::Heading;

/// The page hosting the preview container
pub trait PreviewSurface {
    fn set_container_style(&mut self, font_size: Option<&str>, github_style: bool);
    fn replace_content(&mut self, html: &str);
    fn render_diagrams(&mut self);
    fn render_math(&mut self);
    fn set_hash(&mut self, hash: &str);
    fn scroll_to(&mut self, id: &str);
}

type OpenExternalHook = Box<dyn FnMut(&str) -> std::io::Result<()>>;
type OpenDocumentHook = Box<dyn FnMut(&Path, bool)>;
type DocumentUpdatedHook = Box<dyn FnMut(u64, &[Heading])>;

/// Callbacks supplied by the host application
pub struct PreviewHooks {
    /// Opens a URL in the system browser
    pub open_external: OpenExternalHook,
    /// Opens a markdown document in the app (`true` = new window)
    pub open_markdown_doc: Option<OpenDocumentHook>,
    /// Called after every render with the revision and outline
    pub document_updated: Option<DocumentUpdatedHook>,
}

impl PreviewHooks {
    pub fn on_open_markdown_doc(mut self, hook: impl FnMut(&Path, bool) + 'static) -> Self {
        self.open_markdown_doc = Some(Box::new(hook));
        self
    }

    pub fn on_document_updated(mut self, hook: impl FnMut(u64, &[Heading]) + 'static) -> Self {
        self.document_updated = Some(Box::new(hook));
        self
    }

    pub fn with_open_external(
        mut self,
        hook: impl FnMut(&str) -> std::io::Result<()> + 'static,
    ) -> Self {
        self.open_external = Box::new(hook);
        self
    }
}

impl Default for PreviewHooks {
    fn default() -> Self {
        Self {
            open_external: Box::new(|url: &str| open::that(url)),
            open_markdown_doc: None,
            document_updated: None,
        }
    }
}

impl std::fmt::Debug for PreviewHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHooks")
            .field("open_markdown_doc", &self.open_markdown_doc.is_some())
            .field("document_updated", &self.document_updated.is_some())
            .finish()
    }
}

/// Apply a command produced by `update_preview`
pub fn execute(cmd: Cmd, surface: &mut dyn PreviewSurface, hooks: &mut PreviewHooks) {
    match cmd {
        Cmd::ApplyContainerStyle {
            font_size,
            github_style,
        } => surface.set_container_style(font_size.as_deref(), github_style),
        Cmd::ReplaceContent(html) => surface.replace_content(&html),
        Cmd::InitDiagrams => surface.render_diagrams(),
        Cmd::RenderMath => surface.render_math(),
        Cmd::NotifyDocumentUpdated { revision, outline } => {
            if let Some(hook) = hooks.document_updated.as_mut() {
                hook(revision, &outline);
            }
        }
        Cmd::OpenExternal(url) => {
            tracing::info!("Opening external link: {}", url);
            if let Err(e) = (hooks.open_external)(&url) {
                tracing::error!("Failed to open {}: {}", url, e);
            }
        }
        Cmd::OpenDocument { path, new_window } => match hooks.open_markdown_doc.as_mut() {
            Some(hook) => hook(&path, new_window),
            None => tracing::warn!(
                "No handler for opening markdown documents, skipping {}",
                path.display()
            ),
        },
        Cmd::SetHash(hash) => surface.set_hash(&hash),
        Cmd::ScrollToElement(id) => surface.scroll_to(&id),
        Cmd::Batch(cmds) => {
            for cmd in cmds {
                execute(cmd, surface, hooks);
            }
        }
    }
}
