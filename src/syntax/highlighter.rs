//! Tree-sitter highlighting of code blocks
//!
//! Grammars and highlight queries are compiled once when the highlighter is
//! built. A fresh parser is created per call so `highlight` only needs `&self`.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use super::highlights::{highlight_id_for_name, spans_to_html, HighlightSpan};
use super::languages::LanguageId;

// Highlight queries bundled with the grammar crates
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const CPP_HIGHLIGHTS: &str = tree_sitter_cpp::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;

/// Why a code block could not be highlighted
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("no grammar for language '{0}'")]
    UnsupportedLanguage(String),
    #[error("{language:?} grammar unavailable: {message}")]
    Grammar {
        language: LanguageId,
        message: String,
    },
    #[error("tree-sitter failed to parse {0:?} code")]
    ParseFailed(LanguageId),
}

struct Grammar {
    language: Language,
    query: Query,
}

/// Syntax highlighter producing HTML for fenced code
pub struct Highlighter {
    grammars: HashMap<LanguageId, Grammar>,
    /// Languages whose grammar or query failed to load, with the reason
    broken: HashMap<LanguageId, String>,
}

impl Highlighter {
    /// Create a highlighter with every bundled language initialized
    pub fn new() -> Self {
        let mut highlighter = Self {
            grammars: HashMap::new(),
            broken: HashMap::new(),
        };
        for lang in LanguageId::ALL {
            highlighter.init_language(lang);
        }
        highlighter
    }

    /// Create a highlighter that rejects every language
    pub fn empty() -> Self {
        Self {
            grammars: HashMap::new(),
            broken: HashMap::new(),
        }
    }

    fn init_language(&mut self, lang: LanguageId) {
        let (ts_lang, highlights_scm): (Language, &str) = match lang {
            LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS),
            LanguageId::Python => (tree_sitter_python::LANGUAGE.into(), PYTHON_HIGHLIGHTS),
            LanguageId::Go => (tree_sitter_go::LANGUAGE.into(), GO_HIGHLIGHTS),
            LanguageId::C => (tree_sitter_c::LANGUAGE.into(), C_HIGHLIGHTS),
            LanguageId::Cpp => (tree_sitter_cpp::LANGUAGE.into(), CPP_HIGHLIGHTS),
            LanguageId::Java => (tree_sitter_java::LANGUAGE.into(), JAVA_HIGHLIGHTS),
            LanguageId::Bash => (tree_sitter_bash::LANGUAGE.into(), BASH_HIGHLIGHTS),
        };

        // Query compilation may fail if the bundled query and grammar disagree
        match Query::new(&ts_lang, highlights_scm) {
            Ok(query) => {
                self.grammars.insert(
                    lang,
                    Grammar {
                        language: ts_lang,
                        query,
                    },
                );
            }
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", lang, e);
                self.broken.insert(lang, format!("{:?}", e));
            }
        }
    }

    /// Whether `tag` names a language with a working grammar
    pub fn supports(&self, tag: &str) -> bool {
        LanguageId::from_fence_tag(tag).is_some_and(|lang| self.grammars.contains_key(&lang))
    }

    /// Highlight `code` written in the language named by the fence `tag`
    pub fn highlight(&self, tag: &str, code: &str) -> Result<String, HighlightError> {
        let lang = LanguageId::from_fence_tag(tag)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(tag.to_string()))?;

        let grammar = match self.grammars.get(&lang) {
            Some(g) => g,
            None => {
                let message = self
                    .broken
                    .get(&lang)
                    .cloned()
                    .unwrap_or_else(|| "not initialized".to_string());
                return Err(HighlightError::Grammar {
                    language: lang,
                    message,
                });
            }
        };

        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language)
            .map_err(|e| HighlightError::Grammar {
                language: lang,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(code, None)
            .ok_or(HighlightError::ParseFailed(lang))?;

        let spans = collect_spans(&grammar.query, &tree, code);
        tracing::trace!("Highlighted {:?} block: {} spans", lang, spans.len());
        Ok(spans_to_html(code, &spans))
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("languages", &self.grammars.keys().collect::<Vec<_>>())
            .field("broken", &self.broken)
            .finish()
    }
}

/// Run the highlight query and collect byte spans in capture order
fn collect_spans(query: &Query, tree: &tree_sitter::Tree, source: &str) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut cursor = QueryCursor::new();

    let mut captures = cursor.captures(query, tree.root_node(), source.as_bytes());
    while let Some((query_match, capture_idx)) = captures.next() {
        let capture = &query_match.captures[*capture_idx];
        let capture_name = &query.capture_names()[capture.index as usize];

        // Skip captures the stylesheet has no class for
        let Some(highlight) = highlight_id_for_name(capture_name) else {
            continue;
        };

        let node = capture.node;
        spans.push(HighlightSpan {
            start: node.start_byte(),
            end: node.end_byte(),
            highlight,
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_queries_compile() {
        let highlighter = Highlighter::new();
        for lang in LanguageId::ALL {
            assert!(
                highlighter.grammars.contains_key(&lang),
                "Query failed to compile for {:?}: {:?}",
                lang,
                highlighter.broken.get(&lang)
            );
        }
    }

    #[test]
    fn test_rust_highlighting() {
        let highlighter = Highlighter::new();
        let html = highlighter
            .highlight("rust", "fn main() {\n    let x = 1;\n}")
            .unwrap();

        assert!(html.contains(r#"<span class="hl-keyword">fn</span>"#));
        assert!(html.contains(r#"<span class="hl-function">main</span>"#));
    }

    #[test]
    fn test_python_highlighting_escapes_text() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("py", "if a < b:\n    pass\n").unwrap();

        assert!(html.contains("&lt;"));
        assert!(!html.contains("a < b"));
        assert!(html.contains("hl-keyword"));
    }

    #[test]
    fn test_unsupported_language() {
        let highlighter = Highlighter::new();
        let err = highlighter.highlight("cobol", "DISPLAY 'HI'.").unwrap_err();
        assert!(matches!(err, HighlightError::UnsupportedLanguage(ref t) if t == "cobol"));
    }

    #[test]
    fn test_empty_highlighter_reports_grammar_error() {
        let highlighter = Highlighter::empty();
        assert!(!highlighter.supports("rust"));
        assert!(matches!(
            highlighter.highlight("rust", "fn f() {}"),
            Err(HighlightError::Grammar { .. })
        ));
    }

    #[test]
    fn test_invalid_code_still_highlights() {
        // tree-sitter recovers from syntax errors
        let highlighter = Highlighter::new();
        assert!(highlighter.highlight("rust", "fn (((").is_ok());
    }
}
