//! Fenced code block rendering: diagrams, math, highlighted code

use crate::syntax::{HighlightError, Highlighter};

/// Rendered code block plus what the page has to initialize for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeBlock {
    pub html: String,
    pub diagram: bool,
    pub math: bool,
}

impl CodeBlock {
    fn plain(html: String) -> Self {
        Self {
            html,
            diagram: false,
            math: false,
        }
    }
}

/// Render a code block whose fence info string is `info`
///
/// `highlighter` is `None` when highlighting is switched off.
pub(crate) fn render_code_block(
    info: Option<&str>,
    code: &str,
    highlighter: Option<&Highlighter>,
) -> CodeBlock {
    let lang = info
        .and_then(|info| info.split_whitespace().next())
        .unwrap_or("");
    let escaped = html_escape::encode_text(code);

    match lang {
        "" => CodeBlock::plain(format!("<pre><code>{}</code></pre>\n", escaped)),
        "mermaid" => CodeBlock {
            html: format!("<div class=\"mermaid\">{}</div>\n", escaped),
            diagram: true,
            math: false,
        },
        "katex" => CodeBlock {
            html: format!(
                "<div class=\"katex-block\" data-display=\"true\">{}</div>\n",
                escaped
            ),
            diagram: false,
            math: true,
        },
        _ => {
            let body = match highlighter.map(|h| h.highlight(lang, code)) {
                Some(Ok(highlighted)) => highlighted,
                Some(Err(HighlightError::UnsupportedLanguage(_))) => {
                    tracing::debug!("No highlighter for '{}', rendering plain", lang);
                    escaped.into_owned()
                }
                Some(Err(e)) => {
                    tracing::warn!("Error on highlight: {}", e);
                    escaped.into_owned()
                }
                None => escaped.into_owned(),
            };
            CodeBlock::plain(format!(
                "<pre><code class=\"hljs {}\">{}</code></pre>\n",
                html_escape::encode_double_quoted_attribute(lang),
                body
            ))
        }
    }
}
