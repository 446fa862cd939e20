//! Syntax highlighting module
//!
//! Provides tree-sitter based highlighting of fenced code blocks:
//! - Language detection from fence tags
//! - Highlight query execution with bundled grammar queries
//! - Conversion of captures into `<span class="hl-…">` HTML

mod highlighter;
mod highlights;
mod languages;

pub use highlighter::{HighlightError, Highlighter};
pub use highlights::{
    css_class, highlight_id_for_name, spans_to_html, HighlightId, HighlightSpan, HIGHLIGHT_NAMES,
};
pub use languages::LanguageId;
