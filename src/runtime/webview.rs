//! Webview hosting the preview page
//!
//! Scripts issued before the page reports `ready` are queued and flushed
//! once `window.markview` exists.

use std::rc::Rc;

use winit::event_loop::EventLoopProxy;
use winit::window::Window;
use wry::http::Request;
use wry::{WebView, WebViewBuilder};

use markview::markdown::{
    container_style_script, scroll_to_script, set_content_script, set_hash_script,
    RENDER_DIAGRAMS_SCRIPT, RENDER_MATH_SCRIPT,
};
use markview::preview::PreviewSurface;

use super::UserEvent;

pub struct PreviewWebview {
    webview: WebView,
    ready: bool,
    pending: Vec<String>,
}

impl PreviewWebview {
    /// Create the webview filling `window`, with IPC forwarded to the event loop
    pub fn new(
        window: &Rc<Window>,
        html: &str,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Result<Self, wry::Error> {
        let webview = WebViewBuilder::new()
            .with_html(html)
            .with_transparent(false)
            .with_ipc_handler(move |request: Request<String>| {
                if proxy.send_event(UserEvent::Ipc(request.into_body())).is_err() {
                    tracing::warn!("Event loop closed, dropping IPC message");
                }
            })
            .with_navigation_handler(|url| {
                // Open external links in the default browser
                if url.starts_with("http://") || url.starts_with("https://") {
                    if let Err(e) = open::that(&url) {
                        tracing::error!("Failed to open {}: {}", url, e);
                    }
                    false
                } else {
                    // Allow internal navigation (e.g., anchor links, about:blank)
                    true
                }
            })
            .build(window)?;

        Ok(Self {
            webview,
            ready: false,
            pending: Vec::new(),
        })
    }

    /// Replace the whole page; scripts queue until it reports ready again
    pub fn load_page(&mut self, html: &str) {
        self.ready = false;
        self.pending.clear();
        if let Err(e) = self.webview.load_html(html) {
            tracing::error!("Failed to load preview page: {}", e);
        }
    }

    /// The page script has loaded; run everything queued so far
    pub fn mark_ready(&mut self) {
        self.ready = true;
        let pending = std::mem::take(&mut self.pending);
        tracing::debug!("Preview page ready, flushing {} scripts", pending.len());
        for script in pending {
            self.eval(script);
        }
    }

    fn eval(&mut self, script: String) {
        if !self.ready {
            self.pending.push(script);
            return;
        }
        if let Err(e) = self.webview.evaluate_script(&script) {
            tracing::error!("Failed to evaluate preview script: {}", e);
        }
    }
}

impl PreviewSurface for PreviewWebview {
    fn set_container_style(&mut self, font_size: Option<&str>, github_style: bool) {
        self.eval(container_style_script(font_size, github_style));
    }

    fn replace_content(&mut self, html: &str) {
        self.eval(set_content_script(html));
    }

    fn render_diagrams(&mut self) {
        self.eval(RENDER_DIAGRAMS_SCRIPT.to_string());
    }

    fn render_math(&mut self) {
        self.eval(RENDER_MATH_SCRIPT.to_string());
    }

    fn set_hash(&mut self, hash: &str) {
        self.eval(set_hash_script(hash));
    }

    fn scroll_to(&mut self, id: &str) {
        self.eval(scroll_to_script(id));
    }
}
