//! HTML page shell loaded once into the preview webview
//!
//! The shell carries the stylesheet, the `window.markview` click
//! dispatchers and the diagram/math libraries. Later renders only swap the
//! inner HTML of `#markview-content` through the script helpers below.

use std::path::{Path, PathBuf};

use super::theme::PreviewTheme;
use super::MarkdownRenderer;
use crate::config::{DiagramConfig, DocumentKind, PreviewConfig};
use crate::syntax::{css_class, highlight_id_for_name};

/// Element id of the content container
pub const CONTENT_ID: &str = "markview-content";

/// Script and stylesheet tags for mermaid and KaTeX
///
/// Built once at startup and embedded in the page head, so the libraries
/// load exactly once per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAssets {
    head: String,
    mermaid: bool,
    katex: bool,
}

impl PageAssets {
    pub fn init(diagrams: &DiagramConfig, code_theme: &str) -> Self {
        let mut head = String::new();

        if diagrams.katex {
            head.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n<script src=\"{}\"></script>\n",
                html_escape::encode_double_quoted_attribute(&diagrams.katex_css),
                html_escape::encode_double_quoted_attribute(&diagrams.katex_src),
            ));
        }

        if diagrams.mermaid {
            let mermaid_theme = if code_theme.eq_ignore_ascii_case("light") {
                "default"
            } else {
                "dark"
            };
            head.push_str(&format!(
                "<script src=\"{}\"></script>\n<script>if (window.mermaid) mermaid.initialize({{ startOnLoad: false, theme: '{}' }});</script>\n",
                html_escape::encode_double_quoted_attribute(&diagrams.mermaid_src),
                mermaid_theme,
            ));
        }

        tracing::debug!(
            "Page assets initialized (mermaid: {}, katex: {})",
            diagrams.mermaid,
            diagrams.katex
        );

        Self {
            head,
            mermaid: diagrams.mermaid,
            katex: diagrams.katex,
        }
    }

    /// No external libraries at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn head_html(&self) -> &str {
        &self.head
    }

    pub fn has_mermaid(&self) -> bool {
        self.mermaid
    }

    pub fn has_katex(&self) -> bool {
        self.katex
    }
}

/// Everything needed to build the page around rendered content
#[derive(Debug, Clone)]
pub struct PageShell {
    pub assets: PageAssets,
    pub theme: PreviewTheme,
    /// Directory of the previewed document, used as `<base href>`
    pub base_dir: Option<PathBuf>,
    /// User stylesheet appended after the built-in one
    pub custom_css: Option<String>,
}

impl PageShell {
    pub fn from_config(config: &PreviewConfig, base_dir: Option<&Path>) -> Self {
        Self {
            assets: PageAssets::init(&config.diagrams, &config.markdown.code_theme),
            theme: PreviewTheme::named(&config.markdown.code_theme),
            base_dir: base_dir.map(Path::to_path_buf),
            custom_css: config
                .markdown
                .css_path
                .as_deref()
                .and_then(load_custom_css),
        }
    }

    /// Complete HTML document with `body` inside the content container
    pub fn page(&self, body: &str) -> String {
        let base = self
            .base_dir
            .as_deref()
            .map(|dir| {
                format!(
                    "<base href=\"{}\">\n    ",
                    html_escape::encode_double_quoted_attribute(&base_href(dir))
                )
            })
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {base}<style>{css}</style>
    <style>{custom}</style>
{assets}</head>
<body>
    <div id="{id}" class="markdown-body">{body}</div>
    <script>{js}</script>
</body>
</html>"#,
            base = base,
            css = generate_css(&self.theme),
            custom = self.custom_css.as_deref().unwrap_or(""),
            assets = self.assets.head_html(),
            id = CONTENT_ID,
            body = body,
            js = MARKVIEW_JS,
        )
    }
}

/// Convert content to preview HTML based on document kind
///
/// Markdown is rendered into the page shell. HTML documents are shown as-is
/// so their own styles take effect.
pub fn content_to_preview_html(
    content: &str,
    kind: DocumentKind,
    renderer: &MarkdownRenderer,
    shell: &PageShell,
) -> String {
    match kind {
        DocumentKind::Markdown => shell.page(&renderer.render(content).html),
        DocumentKind::Html => html_to_preview(content),
    }
}

/// Wrap raw HTML content for preview display
pub fn html_to_preview(html_content: &str) -> String {
    let trimmed = html_content.trim_start().to_lowercase();
    if trimmed.starts_with("<!doctype") || trimmed.starts_with("<html") {
        html_content.to_string()
    } else {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
{}
</body>
</html>"#,
            html_content
        )
    }
}

/// Read the user stylesheet; unreadable files are logged and ignored
pub fn load_custom_css(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(css) => Some(css),
        Err(e) => {
            tracing::warn!("Failed to read custom CSS {}: {}", path.display(), e);
            None
        }
    }
}

/// `file://` URL of a directory, with a trailing slash
fn base_href(dir: &Path) -> String {
    let mut path = dir.to_string_lossy().replace('\\', "/");
    if !path.ends_with('/') {
        path.push('/');
    }
    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}

/// Script replacing the container contents
pub fn set_content_script(html: &str) -> String {
    format!(
        "markview.setContent({});",
        serde_json::to_string(html).unwrap_or_default()
    )
}

/// Script applying the font size override and GitHub style class
pub fn container_style_script(font_size: Option<&str>, github_style: bool) -> String {
    format!(
        "markview.setContainerStyle({}, {});",
        serde_json::to_string(&font_size).unwrap_or_else(|_| "null".to_string()),
        github_style
    )
}

/// Script scrolling the element with `id` to the top of the container
pub fn scroll_to_script(id: &str) -> String {
    format!(
        "markview.scrollToId({});",
        serde_json::to_string(id).unwrap_or_default()
    )
}

/// Script navigating to a fragment of the current page
pub fn set_hash_script(hash: &str) -> String {
    format!(
        "markview.setHash({});",
        serde_json::to_string(hash).unwrap_or_default()
    )
}

pub const RENDER_DIAGRAMS_SCRIPT: &str = "markview.renderDiagrams();";
pub const RENDER_MATH_SCRIPT: &str = "markview.renderMath();";

/// Generate CSS from theme colors
fn generate_css(theme: &PreviewTheme) -> String {
    let syntax = &theme.syntax;
    let highlight_rules: String = [
        ("keyword", &syntax.keyword),
        ("function", &syntax.function),
        ("function.method", &syntax.function),
        ("function.builtin", &syntax.function),
        ("constructor", &syntax.type_name),
        ("string", &syntax.string),
        ("string.special", &syntax.string),
        ("escape", &syntax.constant),
        ("comment", &syntax.comment),
        ("type", &syntax.type_name),
        ("type.builtin", &syntax.type_name),
        ("constant", &syntax.constant),
        ("constant.builtin", &syntax.constant),
        ("number", &syntax.constant),
        ("boolean", &syntax.constant),
        ("variable.builtin", &syntax.keyword),
        ("variable.parameter", &syntax.variable),
        ("property", &syntax.variable),
        ("attribute", &syntax.type_name),
        ("label", &syntax.type_name),
        ("tag", &syntax.keyword),
        ("operator", &syntax.punctuation),
        ("punctuation", &syntax.punctuation),
        ("punctuation.bracket", &syntax.punctuation),
        ("punctuation.delimiter", &syntax.punctuation),
    ]
    .iter()
    .filter_map(|(name, color)| {
        highlight_id_for_name(name).map(|id| format!(".{} {{ color: {}; }}\n", css_class(id), color))
    })
    .collect();

    format!(
        r#"
* {{
    box-sizing: border-box;
}}

body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 14px;
    line-height: 1.6;
    color: {text};
    background: {background};
    margin: 0;
}}

#markview-content {{
    padding: 20px;
}}

.markdown-body {{
    max-width: 800px;
    margin: 0 auto;
}}

h1, h2, h3, h4, h5, h6 {{
    color: {heading};
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}}

h1 {{
    font-size: 2em;
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

h2 {{
    font-size: 1.5em;
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

h3 {{
    font-size: 1.25em;
}}

h6 {{
    font-size: 0.85em;
    color: {muted};
}}

p {{
    margin-top: 0;
    margin-bottom: 16px;
}}

code {{
    background: {code_background};
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: "SF Mono", "Fira Code", Consolas, "Liberation Mono", Menlo, Courier, monospace;
    font-size: 0.9em;
}}

pre {{
    background: {code_background};
    padding: 16px;
    border-radius: 6px;
    overflow-x: auto;
    margin-top: 0;
    margin-bottom: 16px;
}}

pre code {{
    background: none;
    padding: 0;
    font-size: 0.875em;
    line-height: 1.45;
}}

blockquote {{
    border-left: 4px solid {accent};
    margin: 0 0 16px 0;
    padding: 0 16px;
    color: {muted};
}}

a {{
    color: {link};
    text-decoration: none;
}}

a:hover {{
    text-decoration: underline;
}}

ul, ol {{
    padding-left: 2em;
    margin-top: 0;
    margin-bottom: 16px;
}}

hr {{
    height: 0.25em;
    padding: 0;
    margin: 24px 0;
    background-color: {border};
    border: 0;
}}

table {{
    border-collapse: collapse;
    border-spacing: 0;
    margin-bottom: 16px;
    width: 100%;
    overflow: auto;
}}

th, td {{
    padding: 6px 13px;
    border: 1px solid {border};
}}

th {{
    font-weight: 600;
    background: {code_background};
}}

img {{
    max-width: 100%;
    box-sizing: content-box;
}}

img.emoji {{
    vertical-align: middle;
}}

.task-list-item {{
    list-style-type: none;
}}

.task-list-item input {{
    margin: 0 0.2em 0.25em -1.6em;
    vertical-align: middle;
}}

del {{
    color: {muted};
}}

.mermaid, .katex-block {{
    margin-bottom: 16px;
    text-align: center;
}}

.md-link-tooltip {{
    display: none;
    position: fixed;
    z-index: 10;
    max-width: 60%;
    padding: 2px 8px;
    border: 1px solid {border};
    border-radius: 3px;
    background: {code_background};
    color: {muted};
    font-size: 12px;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
    pointer-events: none;
}}

.md-link-tooltip.visible {{
    display: block;
}}

{highlight_rules}"#,
        text = theme.text,
        background = theme.background,
        heading = theme.heading,
        link = theme.link,
        code_background = theme.code_background,
        border = theme.border,
        accent = theme.accent,
        muted = theme.muted,
        highlight_rules = highlight_rules,
    )
}

/// Click dispatchers, content swapping and diagram/math initialization
const MARKVIEW_JS: &str = r#"
(function () {
    const content = () => document.getElementById('markview-content');

    function post(kind, event) {
        event.preventDefault();
        const anchor = event.target && event.target.closest ? event.target.closest('a') : null;
        const message = {
            type: 'link',
            kind: kind,
            href: anchor ? anchor.getAttribute('href') : null,
            ctrl: !!event.ctrlKey,
            meta: !!event.metaKey,
        };
        if (window.ipc) {
            window.ipc.postMessage(JSON.stringify(message));
        }
        return false;
    }

    window.markview = {
        openExternal: (event) => post('external', event),
        openDocument: (event) => post('document', event),
        openHash: (event) => post('hash', event),
        cancelClick: (event) => {
            event.preventDefault();
            return false;
        },
        setContent: (html) => {
            content().innerHTML = html;
        },
        setContainerStyle: (fontSize, githubStyle) => {
            const el = content();
            el.style.fontSize = fontSize || '';
            el.classList.toggle('markdown-body', githubStyle);
        },
        renderDiagrams: () => {
            if (!window.mermaid) return;
            const nodes = content().querySelectorAll('.mermaid:not([data-processed])');
            if (nodes.length > 0) {
                mermaid.run({ nodes: nodes }).catch((e) => console.warn('mermaid', e));
            }
        },
        renderMath: () => {
            if (!window.katex) return;
            for (const el of content().querySelectorAll('.katex-block:not([data-rendered])')) {
                katex.render(el.textContent, el, {
                    displayMode: el.dataset.display === 'true',
                    throwOnError: false,
                });
                el.dataset.rendered = 'true';
            }
        },
        setHash: (hash) => {
            location.hash = hash;
        },
        scrollToId: (id) => {
            const el = document.getElementById(id);
            if (el) {
                el.scrollIntoView({ block: 'start' });
            }
        },
    };

    function tooltipFor(target) {
        const anchor = target && target.closest ? target.closest('a[id^="md-link-"]') : null;
        if (!anchor) return null;
        return { anchor: anchor, tip: document.querySelector(`.md-link-tooltip[data-for="${anchor.id}"]`) };
    }

    document.addEventListener('mouseover', (event) => {
        const found = tooltipFor(event.target);
        if (!found || !found.tip) return;
        const rect = found.anchor.getBoundingClientRect();
        found.tip.style.left = `${rect.left}px`;
        found.tip.style.top = `${rect.bottom + 4}px`;
        found.tip.classList.add('visible');
    });

    document.addEventListener('mouseout', (event) => {
        const found = tooltipFor(event.target);
        if (found && found.tip) {
            found.tip.classList.remove('visible');
        }
    });

    window.markview.renderDiagrams();
    window.markview.renderMath();
    if (window.ipc) {
        window.ipc.postMessage(JSON.stringify({ type: 'ready' }));
    }
})();
"#;
