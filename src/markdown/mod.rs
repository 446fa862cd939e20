//! Markdown preview rendering
//!
//! Renders markdown to HTML with preview-specific hooks (task lists, emoji,
//! routed links, heading outline, diagrams/math/highlighted code) and builds
//! the page shell the webview loads.

mod code;
mod links;
mod outline;
mod page;
mod renderer;
mod theme;

pub use links::{is_unsafe_href, LinkKind, LinkRouter};
pub use outline::{build_outline_tree, slugify, Heading, OutlineNode};
pub use page::{
    container_style_script, content_to_preview_html, html_to_preview, load_custom_css,
    scroll_to_script, set_content_script, set_hash_script, PageAssets, PageShell, CONTENT_ID,
    RENDER_DIAGRAMS_SCRIPT, RENDER_MATH_SCRIPT,
};
pub use renderer::{MarkdownRenderer, RenderOutput, RendererOptions};
pub use theme::{PreviewTheme, SyntaxColors};
