use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};
use winit::window::Window;

use markview::config::{DocumentKind, PreviewConfig};
use markview::markdown::{html_to_preview, PageShell};
use markview::preview::{
    execute, update_preview, IpcMessage, PreviewHooks, PreviewMsg, PreviewPane,
};
use markview::watcher::DocumentWatcher;

use super::webview::PreviewWebview;
use super::UserEvent;

const WATCH_INTERVAL: Duration = Duration::from_millis(250);

const WELCOME: &str = "# markview\n\nOpen a markdown file: `markview notes.md`\n";

/// The document currently shown
struct OpenDocument {
    path: PathBuf,
    kind: DocumentKind,
}

pub struct App {
    config: PreviewConfig,
    document: Option<OpenDocument>,
    pane: PreviewPane,
    hooks: PreviewHooks,
    window: Option<Rc<Window>>,
    webview: Option<PreviewWebview>,
    watcher: Option<DocumentWatcher>,
    proxy: EventLoopProxy<UserEvent>,
}

impl App {
    pub fn new(config: PreviewConfig, path: Option<PathBuf>, proxy: EventLoopProxy<UserEvent>) -> Self {
        let document = path.map(|path| {
            let kind = config.document_kind(&path).unwrap_or_else(|| {
                tracing::warn!(
                    "{} has no markdown or HTML extension, previewing as markdown",
                    path.display()
                );
                DocumentKind::Markdown
            });
            OpenDocument { path, kind }
        });

        let hooks = hooks_for(proxy.clone());

        Self {
            pane: PreviewPane::from_config(&config),
            config,
            document,
            hooks,
            window: None,
            webview: None,
            watcher: None,
            proxy,
        }
    }

    fn window_title(&self) -> String {
        match &self.document {
            Some(doc) => match doc.path.file_name() {
                Some(name) => format!("{} - markview", name.to_string_lossy()),
                None => "markview".to_string(),
            },
            None => "markview".to_string(),
        }
    }

    /// Page for the current document; HTML documents are shown verbatim
    fn initial_page(&self) -> String {
        match &self.document {
            Some(doc) if doc.kind == DocumentKind::Html => {
                html_to_preview(&read_document(&doc.path).unwrap_or_default())
            }
            doc => {
                let base_dir = doc.as_ref().and_then(|d| d.path.parent());
                PageShell::from_config(&self.config, base_dir).page("")
            }
        }
    }

    /// Reset the pane and feed it the current document
    fn start_preview(&mut self) {
        self.watcher = None;
        self.pane = PreviewPane::from_config(&self.config);

        let text = match &self.document {
            Some(doc) if doc.kind == DocumentKind::Html => None,
            Some(doc) => read_document(&doc.path),
            None => Some(WELCOME.to_string()),
        };

        if !self.showing_html() {
            self.dispatch(PreviewMsg::Attach);
            if let Some(text) = text {
                self.dispatch(PreviewMsg::DocumentChanged(text));
            }
        }
        self.watch_current();
    }

    fn showing_html(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|doc| doc.kind == DocumentKind::Html)
    }

    fn watch_current(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        match DocumentWatcher::new(&doc.path) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(e) => tracing::warn!("Live reload disabled for {}: {}", doc.path.display(), e),
        }
    }

    fn dispatch(&mut self, msg: PreviewMsg) {
        let Some(cmd) = update_preview(&mut self.pane, msg) else {
            return;
        };
        match self.webview.as_mut() {
            Some(webview) => execute(cmd, webview, &mut self.hooks),
            None => tracing::warn!("No webview yet, dropping {:?}", cmd),
        }
    }

    fn handle_ipc(&mut self, body: &str) {
        match IpcMessage::from_json(body) {
            Ok(IpcMessage::Ready) => {
                if let Some(webview) = self.webview.as_mut() {
                    webview.mark_ready();
                }
            }
            Ok(IpcMessage::Link(click)) => self.dispatch(PreviewMsg::LinkClicked(click)),
            Err(e) => tracing::warn!("Malformed IPC message {:?}: {}", body, e),
        }
    }

    /// Retarget this window at another document
    fn navigate(&mut self, path: PathBuf) {
        let path = self.resolve_link_path(path);
        let Some(kind) = self.config.document_kind(&path) else {
            tracing::warn!("Not a previewable document: {}", path.display());
            return;
        };

        tracing::info!("Navigating to {}", path.display());
        self.document = Some(OpenDocument { path, kind });

        let page = self.initial_page();
        if let Some(webview) = self.webview.as_mut() {
            webview.load_page(&page);
        }
        if let Some(window) = &self.window {
            window.set_title(&self.window_title());
        }
        self.start_preview();
    }

    /// Relative link targets resolve against the current document's directory
    fn resolve_link_path(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            return path;
        }
        match self.document.as_ref().and_then(|doc| doc.path.parent()) {
            Some(dir) => dir.join(path),
            None => path,
        }
    }

    fn reload_if_changed(&mut self) {
        let changed = self.watcher.as_ref().is_some_and(|w| w.poll_changed());
        if !changed {
            return;
        }
        let Some(text) = self.document.as_ref().and_then(|doc| read_document(&doc.path)) else {
            return;
        };

        if self.showing_html() {
            if let Some(webview) = self.webview.as_mut() {
                webview.load_page(&html_to_preview(&text));
            }
        } else {
            self.dispatch(PreviewMsg::DocumentChanged(text));
        }
    }
}

/// Hooks forwarding navigation and outline updates back to the event loop
fn hooks_for(proxy: EventLoopProxy<UserEvent>) -> PreviewHooks {
    let nav_proxy = proxy.clone();
    PreviewHooks::default()
        .on_open_markdown_doc(move |path: &Path, new_window: bool| {
            let event = if new_window {
                UserEvent::OpenWindow(path.to_path_buf())
            } else {
                UserEvent::Navigate(path.to_path_buf())
            };
            if nav_proxy.send_event(event).is_err() {
                tracing::warn!("Event loop closed, dropping navigation");
            }
        })
        .on_document_updated(move |revision, outline| {
            tracing::debug!("Revision {} has {} headings", revision, outline.len());
            let title = outline.first().map(|h| h.title.clone());
            if proxy.send_event(UserEvent::DocumentUpdated { title }).is_err() {
                tracing::warn!("Event loop closed, dropping outline update");
            }
        })
}

fn read_document(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Open `path` in a separate process window
fn spawn_window(path: &Path) {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            tracing::error!("Cannot locate executable for new window: {}", e);
            return;
        }
    };
    match std::process::Command::new(exe).arg(path).spawn() {
        Ok(child) => tracing::info!("Opened {} in new window (pid {})", path.display(), child.id()),
        Err(e) => tracing::error!("Failed to open new window for {}: {}", path.display(), e),
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_config = &self.config.window;
        let window_attributes = Window::default_attributes()
            .with_title(self.window_title())
            .with_decorations(!window_config.hide_title_bar)
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let page = self.initial_page();
        match PreviewWebview::new(&window, &page, self.proxy.clone()) {
            Ok(webview) => self.webview = Some(webview),
            Err(e) => {
                tracing::error!("Failed to create webview: {}", e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
        self.start_preview();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Ipc(body) => self.handle_ipc(&body),
            UserEvent::Navigate(path) => self.navigate(path),
            UserEvent::OpenWindow(path) => spawn_window(&self.resolve_link_path(path)),
            UserEvent::DocumentUpdated { title } => {
                if let (Some(window), Some(title)) = (&self.window, title) {
                    window.set_title(&format!("{} - {}", title, self.window_title()));
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.reload_if_changed();
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + WATCH_INTERVAL));
    }
}
